//! Authentication Middleware
//!
//! Resolves the caller of a protected route from the `Authorization` header.
//!
//! # Flow
//!
//! 1. [`JwtAuth`] wraps the protected scope and runs before any extractor
//! 2. [`resolve`] reads `Authorization: Bearer <token>` and verifies it as an
//!    access token with the shared [`TokenCodec`]
//! 3. On success the [`Principal`] is stored in request extensions; on failure
//!    the request ends with 401 and the handler never runs
//! 4. Handlers receive the [`Principal`] as a typed argument
//!
//! The resolver is read-only: it never touches storage.

use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Payload, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{HeaderMap, AUTHORIZATION},
    web, Error, FromRequest, HttpMessage, HttpRequest,
};
use futures_util::future::LocalBoxFuture;
use std::{
    future::{ready, Ready},
    rc::Rc,
};
use tracing::debug;

use super::REFRESH_TOKEN_HEADER;
use crate::error::ApiError;
use crate::services::{TokenCodec, TokenKind};

/// The authenticated subject of a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    subject: String,
}

impl Principal {
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
        }
    }

    /// User id carried by the access token
    pub fn subject(&self) -> &str {
        &self.subject
    }
}

/// Extract the bearer credential from the `Authorization` header
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or_else(|| ApiError::unauthenticated("Missing Authorization header"))?
        .to_str()
        .map_err(|_| ApiError::unauthenticated("Malformed Authorization header"))?;

    let (scheme, token) = value
        .split_once(' ')
        .ok_or_else(|| ApiError::unauthenticated("Malformed Authorization header"))?;

    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(ApiError::unauthenticated(
            "Authorization scheme must be Bearer",
        ));
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(ApiError::unauthenticated("Missing bearer token"));
    }

    Ok(token)
}

/// Resolve the caller from request headers
pub fn resolve(headers: &HeaderMap, codec: &TokenCodec) -> Result<Principal, ApiError> {
    let token = bearer_token(headers)?;
    let claims = codec.verify(token, TokenKind::Access).map_err(|e| {
        debug!(error = %e, "Rejected access token");
        ApiError::from(e)
    })?;

    Ok(Principal::new(claims.sub))
}

impl FromRequest for Principal {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<Principal>()
                .cloned()
                .ok_or_else(|| ApiError::unauthenticated("Authentication required")),
        )
    }
}

/// Raw refresh token from the `X-Refresh-Token` header
///
/// Absence is a validation failure, not an authentication one: the caller
/// forgot an input, they are not unknown.
#[derive(Debug, Clone)]
pub struct RefreshToken(pub String);

impl FromRequest for RefreshToken {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let token = req
            .headers()
            .get(REFRESH_TOKEN_HEADER)
            .and_then(|h| h.to_str().ok())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| RefreshToken(s.to_string()))
            .ok_or_else(|| ApiError::validation("X-Refresh-Token header is required"));

        ready(token)
    }
}

/// JWT authentication middleware for the protected scope
pub struct JwtAuth;

impl JwtAuth {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JwtAuth {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, B> Transform<S, ServiceRequest> for JwtAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtAuthMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct JwtAuthMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for JwtAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();

        Box::pin(async move {
            // Unregistered paths fall through to the default service (404)
            if !req.resource_map().has_resource(req.path()) {
                return service
                    .call(req)
                    .await
                    .map(ServiceResponse::map_into_left_body);
            }

            let resolved = match req.app_data::<web::Data<TokenCodec>>() {
                Some(codec) => resolve(req.headers(), codec),
                None => Err(ApiError::internal("TokenCodec missing from app data")),
            };

            match resolved {
                Ok(principal) => {
                    req.extensions_mut().insert(principal);
                    service
                        .call(req)
                        .await
                        .map(ServiceResponse::map_into_left_body)
                }
                // Short-circuit: the wrapped handler never runs
                Err(err) => Ok(req.error_response(err).map_into_right_body()),
            }
        })
    }
}
