//! Follow handler

use actix_web::{web, HttpResponse};

use crate::error::ApiError;
use crate::middleware::Principal;
use crate::models::{ErrorResponse, FollowResponse, WebResponse};
use crate::services::UserService;

/// Follow another user
#[utoipa::path(
    post,
    path = "/follow/{target_id}",
    tag = "Users",
    params(("target_id" = String, Path, description = "ID of the user to follow")),
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Now following", body = WebResponse<FollowResponse>),
        (status = 400, description = "Cannot follow yourself", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 409, description = "Already following", body = ErrorResponse)
    )
)]
pub async fn follow(
    principal: Principal,
    service: web::Data<dyn UserService>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let follow = service.follow(principal.subject(), &path).await?;
    Ok(HttpResponse::Created().json(WebResponse::success(FollowResponse::from(follow))))
}
