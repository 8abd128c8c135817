//! Bank account DTOs

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::error::ApiError;
use crate::models::PagingParams;
use crate::validators::ACCOUNT_NUMBER_REGEX;

/// Add bank account request
#[derive(Debug, Clone, PartialEq, Deserialize, Validate, ToSchema)]
#[schema(example = json!({"bank": "BCA", "name": "Jane Doe", "number": "1234567890"}))]
pub struct AddAccountRequest {
    #[validate(length(min = 1, max = 100))]
    pub bank: String,

    #[validate(length(min = 1, max = 100))]
    pub name: String,

    #[validate(regex(path = *ACCOUNT_NUMBER_REGEX))]
    pub number: String,
}

/// Partial bank account update
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Validate, ToSchema)]
pub struct UpdateAccountRequest {
    #[validate(length(min = 1, max = 100))]
    pub bank: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,

    #[validate(regex(path = *ACCOUNT_NUMBER_REGEX))]
    pub number: Option<String>,
}

/// Raw query string of GET /accounts
///
/// Everything arrives as text so that coercion failures can be reported per
/// field instead of as an opaque extractor error.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListAccountsQuery {
    /// Filter by bank (substring, case-insensitive)
    pub bank: Option<String>,
    /// Filter by account holder name (substring, case-insensitive)
    pub name: Option<String>,
    /// Filter by account number (substring)
    pub number: Option<String>,
    /// Page number, starting at 1 (default 1)
    pub page: Option<String>,
    /// Page size (default 10)
    pub size: Option<String>,
}

/// Optional account filters; `None` matches everything
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountFilter {
    pub bank: Option<String>,
    pub name: Option<String>,
    pub number: Option<String>,
}

impl ListAccountsQuery {
    /// Split into filters and a validated page window
    pub fn into_parts(self) -> Result<(AccountFilter, PagingParams), ApiError> {
        let paging = PagingParams::from_query(self.page.as_deref(), self.size.as_deref())?;
        let filter = AccountFilter {
            bank: non_blank(self.bank),
            name: non_blank(self.name),
            number: non_blank(self.number),
        };
        Ok((filter, paging))
    }
}

/// An empty filter value means "no filter", not "match the empty string"
fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Bank account response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AccountResponse {
    pub id: String,
    pub bank: String,
    pub name: String,
    pub number: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<shared::models::BankAccount> for AccountResponse {
    fn from(account: shared::models::BankAccount) -> Self {
        Self {
            id: account.id,
            bank: account.bank,
            name: account.name,
            number: account.number,
            created_at: account.created_at,
            updated_at: account.updated_at,
        }
    }
}
