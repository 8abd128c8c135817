//! Envelopes shared by every endpoint
//!
//! - [`RequestEnvelope`] carries a validated payload together with the
//!   authenticated subject it was stamped with
//! - [`WebResponse`] is the success body: `{data, paging, errors: null}`
//! - [`ErrorResponse`] is the failure body: `{errors: {error, message, details}}`

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::middleware::Principal;

/// Default page number when none is given
pub const DEFAULT_PAGE: u32 = 1;

/// Default page size when none is given
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Largest page size a caller may request
pub const MAX_PAGE_SIZE: u32 = 100;

// ============================================================================
// Request side
// ============================================================================

/// A validated payload bound to the subject making the request
///
/// Built in one step from the payload and the resolved [`Principal`]; the
/// subject can never come from the request body.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestEnvelope<T> {
    subject: String,
    payload: T,
}

impl<T> RequestEnvelope<T> {
    pub fn new(principal: &Principal, payload: T) -> Self {
        Self {
            subject: principal.subject().to_string(),
            payload,
        }
    }

    /// Identifier of the authenticated user
    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn payload(&self) -> &T {
        &self.payload
    }

    pub fn into_parts(self) -> (String, T) {
        (self.subject, self.payload)
    }
}

/// Validated page window; both values are at least 1, size is at most
/// [`MAX_PAGE_SIZE`] and the row offset fits in an `i64`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagingParams {
    page: u32,
    size: u32,
}

impl Default for PagingParams {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PagingParams {
    pub fn new(page: u32, size: u32) -> Result<Self, ApiError> {
        if page < 1 {
            return Err(ApiError::validation("page must be a positive integer"));
        }
        if size < 1 {
            return Err(ApiError::validation("size must be a positive integer"));
        }
        if size > MAX_PAGE_SIZE {
            return Err(ApiError::validation(format!(
                "size must not exceed {}",
                MAX_PAGE_SIZE
            )));
        }
        if checked_offset(page, size).is_none() {
            return Err(ApiError::validation("page is out of range"));
        }
        Ok(Self { page, size })
    }

    /// Coerce raw query values, applying defaults for absent ones
    pub fn from_query(page: Option<&str>, size: Option<&str>) -> Result<Self, ApiError> {
        let page = parse_positive("page", page, DEFAULT_PAGE)?;
        let size = parse_positive("size", size, DEFAULT_PAGE_SIZE)?;
        Self::new(page, size)
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    /// Number of rows to skip
    pub fn offset(&self) -> i64 {
        checked_offset(self.page, self.size).unwrap_or(i64::MAX)
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.size)
    }
}

fn checked_offset(page: u32, size: u32) -> Option<i64> {
    i64::from(page)
        .checked_sub(1)?
        .checked_mul(i64::from(size))
}

fn parse_positive(field: &str, raw: Option<&str>, default: u32) -> Result<u32, ApiError> {
    let raw = match raw.map(str::trim) {
        None | Some("") => return Ok(default),
        Some(raw) => raw,
    };

    match raw.parse::<u32>() {
        Ok(value) if value >= 1 => Ok(value),
        _ => Err(ApiError::validation(format!(
            "{} must be a positive integer, got '{}'",
            field, raw
        ))),
    }
}

// ============================================================================
// Response side
// ============================================================================

/// Page metadata returned with list results
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Paging {
    pub page: u32,
    pub size: u32,
    pub total_item: u64,
    pub total_page: u64,
}

impl Paging {
    pub fn new(params: PagingParams, total_item: u64) -> Self {
        Self {
            page: params.page(),
            size: params.size(),
            total_item,
            // size >= 1 is guaranteed by PagingParams
            total_page: total_item.div_ceil(u64::from(params.size())),
        }
    }
}

/// Standard success envelope
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct WebResponse<T> {
    pub data: T,
    pub paging: Option<Paging>,
    /// Always null on success
    #[schema(value_type = Option<Object>)]
    pub errors: Option<serde_json::Value>,
}

impl<T> WebResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            data,
            paging: None,
            errors: None,
        }
    }

    pub fn paged(data: T, params: PagingParams, total_item: u64) -> Self {
        Self {
            data,
            paging: Some(Paging::new(params, total_item)),
            errors: None,
        }
    }
}

/// Simple acknowledgement payload
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Error details inside the failure envelope
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Standard error envelope
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub errors: ErrorBody,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            errors: ErrorBody {
                error: error.into(),
                message: message.into(),
                details: None,
            },
        }
    }

    pub fn with_details(
        error: impl Into<String>,
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        Self {
            errors: ErrorBody {
                error: error.into(),
                message: message.into(),
                details: Some(details),
            },
        }
    }
}
