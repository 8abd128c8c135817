//! Token Codec
//!
//! Signs and verifies the access and refresh tokens handed out at login.
//!
//! # Token Kinds
//!
//! - **Access**: short-lived, sent as `Authorization: Bearer <token>`
//! - **Refresh**: long-lived, sent as `X-Refresh-Token` to rotate or log out
//!
//! Each kind is signed with its own secret, so a refresh token can never be
//! replayed as an access token (and vice versa). The `scope` claim repeats the
//! kind and is checked as well.
//!
//! The codec is pure computation: no I/O, no clock other than `Utc::now()`.

use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use shared::config::JwtConfig;
use thiserror::Error;
use uuid::Uuid;

/// Which secret a token is signed with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Access,
    Refresh,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Access => "access",
            TokenKind::Refresh => "refresh",
        }
    }
}

/// Claims carried by both token kinds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject (user id)
    pub sub: String,
    /// Issued at (UTC timestamp)
    pub iat: i64,
    /// Expiration time (UTC timestamp)
    pub exp: i64,
    /// Token kind name
    pub scope: String,
    /// Unique token id
    pub jti: String,
}

impl TokenClaims {
    pub fn expires_at(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.exp, 0)
            .single()
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }
}

/// Errors produced by the codec
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Token has expired")]
    Expired,

    #[error("Invalid token")]
    Invalid,

    #[error("Token lifetime must be between one second and ten years")]
    InvalidTtl,

    #[error("Unsupported signing algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("Failed to sign token: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

/// A freshly signed token
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

struct SigningKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl SigningKeys {
    fn from_secret(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }
}

/// Longest lifetime any token may be issued with
pub const MAX_TTL_SECS: i64 = 10 * 365 * 24 * 60 * 60;

fn check_ttl(ttl: Duration) -> Result<(), TokenError> {
    if (1..=MAX_TTL_SECS).contains(&ttl.num_seconds()) {
        Ok(())
    } else {
        Err(TokenError::InvalidTtl)
    }
}

/// Signs and verifies tokens; built once at startup and shared read-only
pub struct TokenCodec {
    algorithm: Algorithm,
    access: SigningKeys,
    refresh: SigningKeys,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenCodec {
    pub fn new(
        algorithm: Algorithm,
        access_secret: &[u8],
        refresh_secret: &[u8],
        access_ttl: Duration,
        refresh_ttl: Duration,
    ) -> Result<Self, TokenError> {
        if !matches!(
            algorithm,
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512
        ) {
            return Err(TokenError::UnsupportedAlgorithm(format!("{:?}", algorithm)));
        }
        check_ttl(access_ttl)?;
        check_ttl(refresh_ttl)?;

        Ok(Self {
            algorithm,
            access: SigningKeys::from_secret(access_secret),
            refresh: SigningKeys::from_secret(refresh_secret),
            access_ttl,
            refresh_ttl,
        })
    }

    /// Build the codec from the startup configuration
    pub fn from_config(config: &JwtConfig) -> Result<Self, TokenError> {
        let algorithm: Algorithm = config
            .algorithm
            .parse()
            .map_err(|_| TokenError::UnsupportedAlgorithm(config.algorithm.clone()))?;

        let access_ttl =
            Duration::try_seconds(config.access_ttl_secs).ok_or(TokenError::InvalidTtl)?;
        let refresh_ttl =
            Duration::try_seconds(config.refresh_ttl_secs).ok_or(TokenError::InvalidTtl)?;

        Self::new(
            algorithm,
            config.access_secret.as_bytes(),
            config.refresh_secret.as_bytes(),
            access_ttl,
            refresh_ttl,
        )
    }

    /// Configured lifetime for a token kind
    pub fn ttl(&self, kind: TokenKind) -> Duration {
        match kind {
            TokenKind::Access => self.access_ttl,
            TokenKind::Refresh => self.refresh_ttl,
        }
    }

    fn keys(&self, kind: TokenKind) -> &SigningKeys {
        match kind {
            TokenKind::Access => &self.access,
            TokenKind::Refresh => &self.refresh,
        }
    }

    /// Sign a token for `subject` valid for `ttl` from now
    pub fn issue(
        &self,
        subject: &str,
        kind: TokenKind,
        ttl: Duration,
    ) -> Result<IssuedToken, TokenError> {
        check_ttl(ttl)?;

        let now = Utc::now().timestamp();
        let claims = TokenClaims {
            sub: subject.to_string(),
            iat: now,
            exp: now + ttl.num_seconds(),
            scope: kind.as_str().to_string(),
            jti: Uuid::new_v4().to_string(),
        };

        let token = encode(
            &Header::new(self.algorithm),
            &claims,
            &self.keys(kind).encoding,
        )
        .map_err(TokenError::Signing)?;

        Ok(IssuedToken {
            token,
            issued_at: Utc.timestamp_opt(claims.iat, 0).single().unwrap_or_else(Utc::now),
            expires_at: claims.expires_at(),
        })
    }

    /// Sign a token of `kind` with its configured lifetime
    pub fn issue_default(&self, subject: &str, kind: TokenKind) -> Result<IssuedToken, TokenError> {
        self.issue(subject, kind, self.ttl(kind))
    }

    /// Verify signature, expiry and kind; only then trust the claims
    pub fn verify(&self, token: &str, kind: TokenKind) -> Result<TokenClaims, TokenError> {
        let mut validation = Validation::new(self.algorithm);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "iat", "sub"]);

        let claims = decode::<TokenClaims>(token, &self.keys(kind).decoding, &validation)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            })?
            .claims;

        if claims.scope != kind.as_str() || claims.exp <= claims.iat || claims.sub.is_empty() {
            return Err(TokenError::Invalid);
        }

        Ok(claims)
    }
}
