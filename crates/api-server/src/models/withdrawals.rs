//! Withdrawal DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Withdrawal request
#[derive(Debug, Clone, PartialEq, Deserialize, Validate, ToSchema)]
#[schema(example = json!({"account_id": "6b0c5c1e-8f53-4a55-9d55-0a3c8f1d2e11", "amount": 50000}))]
pub struct WithdrawalRequest {
    #[validate(length(min = 1))]
    pub account_id: String,

    /// Amount in the smallest currency unit
    #[validate(range(min = 1))]
    pub amount: i64,
}

/// Withdrawal response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct WithdrawalResponse {
    pub id: String,
    pub account_id: String,
    pub amount: i64,
    pub status: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<shared::models::Withdrawal> for WithdrawalResponse {
    fn from(withdrawal: shared::models::Withdrawal) -> Self {
        Self {
            id: withdrawal.id,
            account_id: withdrawal.account_id,
            amount: withdrawal.amount,
            status: withdrawal.status,
            created_at: withdrawal.created_at,
        }
    }
}
