//! Authentication handlers
//!
//! Register, login, token refresh and logout. Login and refresh answer with a
//! fresh token pair; logout revokes the refresh token it is given.

use actix_web::{web, HttpResponse};

use crate::error::ApiError;
use crate::handlers::helpers::validate_request;
use crate::middleware::{Principal, RefreshToken};
use crate::models::{
    ErrorResponse, LoginUserRequest, MessageResponse, RegisterUserRequest, TokenResponse,
    UserResponse, WebResponse,
};
use crate::services::{TokenCodec, TokenKind, UserService};

/// Sign a new access/refresh pair for `subject`
pub fn issue_token_pair(codec: &TokenCodec, subject: &str) -> Result<TokenResponse, ApiError> {
    let access = codec.issue_default(subject, TokenKind::Access)?;
    let refresh = codec.issue_default(subject, TokenKind::Refresh)?;

    Ok(TokenResponse {
        access_token: access.token,
        token_type: "bearer".to_string(),
        expires_in: codec.ttl(TokenKind::Access).num_seconds(),
        refresh_token: refresh.token,
        scope: format!("{} {}", TokenKind::Access.as_str(), TokenKind::Refresh.as_str()),
    })
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/register",
    tag = "Authentication",
    request_body = RegisterUserRequest,
    responses(
        (status = 201, description = "User created", body = WebResponse<UserResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 409, description = "Email or phone already registered", body = ErrorResponse)
    )
)]
pub async fn register(
    service: web::Data<dyn UserService>,
    req: web::Json<RegisterUserRequest>,
) -> Result<HttpResponse, ApiError> {
    let req = req.into_inner();
    validate_request(&req)?;

    let user = service.register(req).await?;

    Ok(HttpResponse::Created().json(WebResponse::success(UserResponse::from(user))))
}

/// Log in with email or phone number
#[utoipa::path(
    post,
    path = "/login",
    tag = "Authentication",
    request_body = LoginUserRequest,
    responses(
        (status = 200, description = "Login successful", body = WebResponse<TokenResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse)
    )
)]
pub async fn login(
    service: web::Data<dyn UserService>,
    codec: web::Data<TokenCodec>,
    req: web::Json<LoginUserRequest>,
) -> Result<HttpResponse, ApiError> {
    let req = req.into_inner();
    validate_request(&req)?;

    let user = service.login(req).await?;
    let tokens = issue_token_pair(&codec, &user.id)?;

    tracing::info!(user_id = %user.id, "User logged in");
    Ok(HttpResponse::Ok().json(WebResponse::success(tokens)))
}

/// Exchange a refresh token for a new token pair
///
/// The presented refresh token is revoked, so each one can be used once.
#[utoipa::path(
    post,
    path = "/refresh",
    tag = "Authentication",
    params(
        ("X-Refresh-Token" = String, Header, description = "Refresh token issued at login")
    ),
    responses(
        (status = 200, description = "New token pair", body = WebResponse<TokenResponse>),
        (status = 400, description = "Missing X-Refresh-Token header", body = ErrorResponse),
        (status = 401, description = "Invalid, expired or revoked refresh token", body = ErrorResponse)
    )
)]
pub async fn refresh(
    service: web::Data<dyn UserService>,
    codec: web::Data<TokenCodec>,
    refresh_token: RefreshToken,
) -> Result<HttpResponse, ApiError> {
    let claims = codec.verify(&refresh_token.0, TokenKind::Refresh)?;

    // Fast path; the revocation below is authoritative
    if service.is_refresh_token_revoked(&refresh_token.0).await? {
        tracing::debug!(user_id = %claims.sub, "Rejected revoked refresh token");
        return Err(ApiError::unauthenticated("Refresh token has been revoked"));
    }

    let user = service.get_by_id(&claims.sub).await.map_err(|e| match e {
        shared::Error::NotFound { .. } => ApiError::unauthenticated("User no longer exists"),
        other => ApiError::from(other),
    })?;

    // Only the request whose revocation lands may rotate
    let revoked = service
        .logout(&user.id, &refresh_token.0, claims.expires_at())
        .await?;
    if !revoked {
        tracing::debug!(user_id = %user.id, "Refresh token reused concurrently");
        return Err(ApiError::unauthenticated("Refresh token has been revoked"));
    }

    let tokens = issue_token_pair(&codec, &user.id)?;

    Ok(HttpResponse::Ok().json(WebResponse::success(tokens)))
}

/// Log out: revoke the refresh token of the current session
#[utoipa::path(
    delete,
    path = "/logout",
    tag = "Authentication",
    params(
        ("X-Refresh-Token" = String, Header, description = "Refresh token to revoke")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Logged out", body = WebResponse<MessageResponse>),
        (status = 400, description = "Missing X-Refresh-Token header", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Refresh token belongs to another user", body = ErrorResponse)
    )
)]
pub async fn logout(
    principal: Principal,
    refresh_token: RefreshToken,
    service: web::Data<dyn UserService>,
    codec: web::Data<TokenCodec>,
) -> Result<HttpResponse, ApiError> {
    let claims = codec.verify(&refresh_token.0, TokenKind::Refresh)?;
    if claims.sub != principal.subject() {
        return Err(ApiError::forbidden(
            "Refresh token does not belong to the current user",
        ));
    }

    service
        .logout(principal.subject(), &refresh_token.0, claims.expires_at())
        .await?;

    Ok(HttpResponse::Ok().json(WebResponse::success(MessageResponse::new(
        "Logged out successfully",
    ))))
}
