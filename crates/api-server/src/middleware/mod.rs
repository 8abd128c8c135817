//! HTTP middleware and request extractors

pub mod auth;
pub mod cors;

pub use auth::{bearer_token, resolve, JwtAuth, Principal, RefreshToken};
pub use cors::cors;

/// Header carrying the refresh token on /logout and /refresh
pub const REFRESH_TOKEN_HEADER: &str = "x-refresh-token";
