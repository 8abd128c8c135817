//! Data Transfer Objects (DTOs) for API requests and responses

pub mod accounts;
pub mod auth;
pub mod common;
pub mod follows;
pub mod users;
pub mod withdrawals;

// Re-exports
pub use accounts::*;
pub use auth::*;
pub use common::*;
pub use follows::*;
pub use users::*;
pub use withdrawals::*;
