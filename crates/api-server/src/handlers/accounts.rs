//! Bank account handlers
//!
//! Every route acts on the caller's own accounts; the owner is always the
//! authenticated principal, never a value from the request.

use actix_web::{web, HttpResponse};

use crate::error::ApiError;
use crate::handlers::helpers::validate_request;
use crate::middleware::Principal;
use crate::models::{
    AccountResponse, AddAccountRequest, ErrorResponse, ListAccountsQuery, MessageResponse,
    RequestEnvelope, UpdateAccountRequest, WebResponse,
};
use crate::services::UserService;

/// Add a bank account
#[utoipa::path(
    post,
    path = "/add_account",
    tag = "Accounts",
    request_body = AddAccountRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Account created", body = WebResponse<AccountResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    )
)]
pub async fn add_account(
    principal: Principal,
    service: web::Data<dyn UserService>,
    req: web::Json<AddAccountRequest>,
) -> Result<HttpResponse, ApiError> {
    let req = req.into_inner();
    validate_request(&req)?;

    let account = service
        .add_account(RequestEnvelope::new(&principal, req))
        .await?;

    Ok(HttpResponse::Created().json(WebResponse::success(AccountResponse::from(account))))
}

/// Get one of the caller's bank accounts
#[utoipa::path(
    get,
    path = "/account/{id}",
    tag = "Accounts",
    params(("id" = String, Path, description = "Account ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Account details", body = WebResponse<AccountResponse>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Account belongs to another user", body = ErrorResponse),
        (status = 404, description = "Account not found", body = ErrorResponse)
    )
)]
pub async fn get_account(
    principal: Principal,
    service: web::Data<dyn UserService>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let account = service.get_account(principal.subject(), &path).await?;
    Ok(HttpResponse::Ok().json(WebResponse::success(AccountResponse::from(account))))
}

/// List the caller's bank accounts
#[utoipa::path(
    get,
    path = "/accounts",
    tag = "Accounts",
    params(ListAccountsQuery),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "One page of accounts", body = WebResponse<Vec<AccountResponse>>),
        (status = 400, description = "Invalid page or size", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    )
)]
pub async fn list_accounts(
    principal: Principal,
    service: web::Data<dyn UserService>,
    query: web::Query<ListAccountsQuery>,
) -> Result<HttpResponse, ApiError> {
    let (filter, paging) = query.into_inner().into_parts()?;

    let (accounts, total) = service
        .list_accounts(principal.subject(), filter, paging)
        .await?;
    let data: Vec<AccountResponse> = accounts.into_iter().map(AccountResponse::from).collect();

    Ok(HttpResponse::Ok().json(WebResponse::paged(data, paging, total)))
}

/// Update one of the caller's bank accounts
#[utoipa::path(
    patch,
    path = "/account/{id}",
    tag = "Accounts",
    params(("id" = String, Path, description = "Account ID")),
    request_body = UpdateAccountRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Account updated", body = WebResponse<AccountResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Account belongs to another user", body = ErrorResponse),
        (status = 404, description = "Account not found", body = ErrorResponse)
    )
)]
pub async fn update_account(
    principal: Principal,
    service: web::Data<dyn UserService>,
    path: web::Path<String>,
    req: web::Json<UpdateAccountRequest>,
) -> Result<HttpResponse, ApiError> {
    let req = req.into_inner();
    validate_request(&req)?;

    let account = service
        .update_account(&path, RequestEnvelope::new(&principal, req))
        .await?;

    Ok(HttpResponse::Ok().json(WebResponse::success(AccountResponse::from(account))))
}

/// Delete one of the caller's bank accounts
#[utoipa::path(
    delete,
    path = "/account/{id}",
    tag = "Accounts",
    params(("id" = String, Path, description = "Account ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Account deleted", body = WebResponse<MessageResponse>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Account belongs to another user", body = ErrorResponse),
        (status = 404, description = "Account not found", body = ErrorResponse)
    )
)]
pub async fn delete_account(
    principal: Principal,
    service: web::Data<dyn UserService>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    service.delete_account(principal.subject(), &path).await?;

    Ok(HttpResponse::Ok().json(WebResponse::success(MessageResponse::new(
        "Account deleted successfully",
    ))))
}
