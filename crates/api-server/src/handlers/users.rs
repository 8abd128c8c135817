//! Current-user handlers: profile, password and photo

use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use futures_util::StreamExt;

use crate::error::ApiError;
use crate::handlers::helpers::validate_request;
use crate::middleware::Principal;
use crate::models::{
    ChangePasswordRequest, ChangeProfileForm, ErrorResponse, MessageResponse, ProfileUpload,
    RequestEnvelope, UpdateUserRequest, UserResponse, WebResponse,
};
use crate::services::UserService;

/// Multipart field holding the profile photo
pub const PHOTO_FIELD: &str = "photo";

/// Largest accepted profile photo
pub const MAX_PHOTO_BYTES: usize = 5 * 1024 * 1024;

/// Get the caller's profile
#[utoipa::path(
    get,
    path = "/current",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = WebResponse<UserResponse>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
pub async fn current(
    principal: Principal,
    service: web::Data<dyn UserService>,
) -> Result<HttpResponse, ApiError> {
    let user = service.get_by_id(principal.subject()).await?;
    Ok(HttpResponse::Ok().json(WebResponse::success(UserResponse::from(user))))
}

/// Update name, email or phone
#[utoipa::path(
    patch,
    path = "/update",
    tag = "Users",
    request_body = UpdateUserRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Profile updated", body = WebResponse<UserResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 409, description = "Email or phone already registered", body = ErrorResponse)
    )
)]
pub async fn update(
    principal: Principal,
    service: web::Data<dyn UserService>,
    req: web::Json<UpdateUserRequest>,
) -> Result<HttpResponse, ApiError> {
    let req = req.into_inner();
    validate_request(&req)?;

    let user = service.update(RequestEnvelope::new(&principal, req)).await?;
    Ok(HttpResponse::Ok().json(WebResponse::success(UserResponse::from(user))))
}

/// Change the caller's password
#[utoipa::path(
    patch,
    path = "/change_password",
    tag = "Users",
    request_body = ChangePasswordRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Password changed", body = WebResponse<MessageResponse>),
        (status = 400, description = "Invalid request or wrong current password", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    )
)]
pub async fn change_password(
    principal: Principal,
    service: web::Data<dyn UserService>,
    req: web::Json<ChangePasswordRequest>,
) -> Result<HttpResponse, ApiError> {
    let req = req.into_inner();
    validate_request(&req)?;

    service
        .change_password(RequestEnvelope::new(&principal, req))
        .await?;

    Ok(HttpResponse::Ok().json(WebResponse::success(MessageResponse::new(
        "Password changed successfully",
    ))))
}

/// Upload a new profile photo
///
/// The whole `photo` part is read before the domain service is called; its
/// contents are never inspected here.
#[utoipa::path(
    patch,
    path = "/change_profile",
    tag = "Users",
    request_body(content = ChangeProfileForm, content_type = "multipart/form-data"),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Photo updated", body = WebResponse<UserResponse>),
        (status = 400, description = "Missing or oversized photo", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    )
)]
pub async fn change_profile(
    principal: Principal,
    service: web::Data<dyn UserService>,
    payload: Multipart,
) -> Result<HttpResponse, ApiError> {
    let upload = read_photo(payload).await?;

    let user = service
        .change_profile(RequestEnvelope::new(&principal, upload))
        .await?;
    Ok(HttpResponse::Ok().json(WebResponse::success(UserResponse::from(user))))
}

/// Read the `photo` part of a multipart body into memory
async fn read_photo(mut payload: Multipart) -> Result<ProfileUpload, ApiError> {
    while let Some(field) = payload.next().await {
        let mut field = field.map_err(multipart_error)?;
        if field.name() != Some(PHOTO_FIELD) {
            continue;
        }

        let filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .unwrap_or_default()
            .to_string();
        let content_type = field.content_type().map(|mime| mime.to_string());

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(multipart_error)?;
            if bytes.len() + chunk.len() > MAX_PHOTO_BYTES {
                return Err(ApiError::validation(format!(
                    "photo must not exceed {} bytes",
                    MAX_PHOTO_BYTES
                )));
            }
            bytes.extend_from_slice(&chunk);
        }

        if bytes.is_empty() {
            return Err(ApiError::validation("photo must not be empty"));
        }

        return Ok(ProfileUpload {
            filename,
            content_type,
            bytes,
        });
    }

    Err(ApiError::validation("photo file is required"))
}

fn multipart_error(err: actix_multipart::MultipartError) -> ApiError {
    ApiError::validation(format!("Invalid multipart body: {}", err))
}
