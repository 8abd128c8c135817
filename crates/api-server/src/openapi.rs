//! OpenAPI Documentation Configuration
//!
//! Generated with utoipa from handler annotations and DTO schemas.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::handlers;
use crate::handlers::health::HealthResponse;
use crate::models;

/// OpenAPI documentation for the user account API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "User Account API",
        version = "1.0.0",
        description = "User registration, authentication, bank accounts and withdrawals.\n\n## Authentication\n\nProtected endpoints expect `Authorization: Bearer <access_token>`. Tokens come from `POST /login`; `POST /refresh` exchanges the refresh token (sent as `X-Refresh-Token`) for a new pair.\n\n## Envelopes\n\nSuccess bodies are `{data, paging, errors: null}`; failures are `{errors: {error, message, details}}`.",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Development server")
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Authentication", description = "Registration, login, token refresh and logout"),
        (name = "Users", description = "Current user profile and social graph"),
        (name = "Accounts", description = "Bank account management"),
        (name = "Withdrawals", description = "Balance withdrawals")
    ),
    paths(
        // Health
        handlers::health_check,
        handlers::openapi_json,
        // Authentication
        handlers::register,
        handlers::login,
        handlers::refresh,
        handlers::logout,
        // Users
        handlers::current,
        handlers::update,
        handlers::change_password,
        handlers::change_profile,
        handlers::follow,
        // Accounts
        handlers::add_account,
        handlers::get_account,
        handlers::list_accounts,
        handlers::update_account,
        handlers::delete_account,
        // Withdrawals
        handlers::withdraw,
    ),
    components(
        schemas(
            HealthResponse,
            models::ErrorResponse,
            models::ErrorBody,
            models::Paging,
            models::MessageResponse,
            models::RegisterUserRequest,
            models::LoginUserRequest,
            models::TokenResponse,
            models::UserResponse,
            models::UpdateUserRequest,
            models::ChangePasswordRequest,
            models::ChangeProfileForm,
            models::AddAccountRequest,
            models::UpdateAccountRequest,
            models::AccountResponse,
            models::WithdrawalRequest,
            models::WithdrawalResponse,
            models::FollowResponse,
        )
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// Security scheme modifier for OpenAPI
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);

        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("Access token obtained from /login"))
                    .build(),
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_has_all_routes() {
        let doc = ApiDoc::openapi();
        for path in [
            "/health",
            "/register",
            "/login",
            "/refresh",
            "/logout",
            "/current",
            "/update",
            "/change_password",
            "/change_profile",
            "/add_account",
            "/account/{id}",
            "/accounts",
            "/withdrawal",
            "/follow/{target_id}",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
    }
}
