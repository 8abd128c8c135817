//! Withdrawal handler

use actix_web::{web, HttpResponse};

use crate::error::ApiError;
use crate::handlers::helpers::validate_request;
use crate::middleware::Principal;
use crate::models::{
    ErrorResponse, RequestEnvelope, WebResponse, WithdrawalRequest, WithdrawalResponse,
};
use crate::services::UserService;

/// Withdraw from the caller's balance to one of their bank accounts
#[utoipa::path(
    post,
    path = "/withdrawal",
    tag = "Withdrawals",
    request_body = WithdrawalRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Withdrawal created", body = WebResponse<WithdrawalResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Account belongs to another user", body = ErrorResponse),
        (status = 404, description = "Account not found", body = ErrorResponse),
        (status = 409, description = "Insufficient balance", body = ErrorResponse)
    )
)]
pub async fn withdraw(
    principal: Principal,
    service: web::Data<dyn UserService>,
    req: web::Json<WithdrawalRequest>,
) -> Result<HttpResponse, ApiError> {
    let req = req.into_inner();
    validate_request(&req)?;

    let withdrawal = service.withdraw(RequestEnvelope::new(&principal, req)).await?;

    Ok(HttpResponse::Created().json(WebResponse::success(WithdrawalResponse::from(withdrawal))))
}
