//! Request handlers for API endpoints

pub mod accounts;
pub mod auth;
pub mod follows;
pub mod health;
pub mod helpers;
pub mod users;
pub mod withdrawals;

// Re-export commonly used handlers
pub use accounts::*;
pub use auth::*;
pub use follows::*;
pub use health::*;
pub use users::*;
pub use withdrawals::*;
