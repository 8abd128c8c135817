//! Common Handler Helpers
//!
//! ## Validation
//! - [`validate_request`] - Validate a payload or fail with field-level details
//!
//! ## Fallback
//! - [`not_found`] - default service for unregistered paths
//!
//! ## Extractor errors
//! - [`json_error_handler`], [`query_error_handler`], [`path_error_handler`] -
//!   route actix extractor failures into the standard error envelope

use actix_web::{
    error::{JsonPayloadError, PathError, QueryPayloadError},
    HttpRequest, HttpResponse, ResponseError,
};
use validator::Validate;

use crate::error::ApiError;

/// Validate a request struct or return a 400 with per-field details
///
/// # Example
///
/// ```ignore
/// validate_request(&req)?;
/// ```
pub fn validate_request<T: Validate>(req: &T) -> Result<(), ApiError> {
    req.validate().map_err(ApiError::from)
}

/// 404 envelope for any path no route is registered for
pub async fn not_found(req: HttpRequest) -> HttpResponse {
    ApiError::NotFound(format!("No route for {} {}", req.method(), req.path())).error_response()
}

/// Malformed or mistyped JSON body
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    tracing::debug!(error = %err, "Rejected JSON body");
    ApiError::validation(format!("Invalid request body: {}", err)).into()
}

/// Query string that does not fit the declared shape
pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    ApiError::validation(format!("Invalid query string: {}", err)).into()
}

/// Path segment that does not fit the declared type
pub fn path_error_handler(err: PathError, _req: &HttpRequest) -> actix_web::Error {
    ApiError::validation(format!("Invalid path parameter: {}", err)).into()
}
