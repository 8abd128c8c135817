//! Business logic services
//!
//! - [`token_codec`]: signing and verification of access/refresh tokens
//! - [`user_service`]: the domain boundary handlers call through
//! - [`pg_user_service`]: PostgreSQL implementation of that boundary
//! - [`storage`]: object storage for uploaded files

pub mod password;
pub mod pg_user_service;
pub mod storage;
pub mod token_codec;
pub mod user_service;

pub use pg_user_service::PgUserService;
pub use storage::{ObjectStorage, S3Storage};
pub use token_codec::{IssuedToken, TokenClaims, TokenCodec, TokenError, TokenKind};
pub use user_service::UserService;
