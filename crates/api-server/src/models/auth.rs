//! Authentication DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::validators::PHONE_REGEX;

/// Register request
#[derive(Debug, Clone, PartialEq, Deserialize, Validate, ToSchema)]
#[schema(example = json!({"name": "Jane Doe", "email": "jane@example.com", "phone": "081234567890", "password": "securepassword123"}))]
pub struct RegisterUserRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,

    #[validate(email)]
    pub email: String,

    #[validate(regex(path = *PHONE_REGEX))]
    pub phone: String,

    #[validate(length(min = 8, max = 100))]
    pub password: String,
}

/// Login request
#[derive(Debug, Clone, PartialEq, Deserialize, Validate, ToSchema)]
#[schema(example = json!({"email_or_phone": "jane@example.com", "password": "securepassword123"}))]
pub struct LoginUserRequest {
    #[validate(length(min = 1))]
    pub email_or_phone: String,

    #[validate(length(min = 1))]
    pub password: String,
}

/// Issued token pair
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    pub access_token: String,
    /// Always `bearer`
    pub token_type: String,
    /// Access token lifetime in seconds
    pub expires_in: i64,
    pub refresh_token: String,
    pub scope: String,
}

/// User response (safe for API, without password or balance internals)
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub photo: Option<String>,
    pub role: String,
    pub balance: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<shared::models::User> for UserResponse {
    fn from(user: shared::models::User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            phone: user.phone,
            photo: user.photo,
            role: user.role,
            balance: user.balance,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    fn register_request() -> RegisterUserRequest {
        RegisterUserRequest {
            name: "Jane Doe".to_string(),
            email: "jane@example.com".to_string(),
            phone: "081234567890".to_string(),
            password: "securepassword123".to_string(),
        }
    }

    // ========================================================================
    // RegisterUserRequest validation tests
    // ========================================================================

    #[test]
    fn test_register_request_valid() {
        assert!(register_request().validate().is_ok());
    }

    #[test]
    fn test_register_request_empty_name() {
        let req = RegisterUserRequest {
            name: String::new(),
            ..register_request()
        };
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("name"));
    }

    #[test]
    fn test_register_request_invalid_email() {
        let req = RegisterUserRequest {
            email: "not-an-email".to_string(),
            ..register_request()
        };
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));
    }

    #[test]
    fn test_register_request_invalid_phone() {
        let req = RegisterUserRequest {
            phone: "12ab".to_string(),
            ..register_request()
        };
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("phone"));
    }

    #[test]
    fn test_register_request_password_too_short() {
        let req = RegisterUserRequest {
            password: "short".to_string(),
            ..register_request()
        };
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("password"));
    }

    #[test]
    fn test_register_request_missing_field_fails_deserialization() {
        let json = r#"{"name": "Jane", "email": "jane@example.com", "password": "securepassword123"}"#;
        let result: Result<RegisterUserRequest, _> = serde_json::from_str(json);
        let err = result.unwrap_err().to_string();
        assert!(err.contains("phone"));
    }

    // ========================================================================
    // LoginUserRequest validation tests
    // ========================================================================

    #[test]
    fn test_login_request_valid() {
        let req = LoginUserRequest {
            email_or_phone: "a@b.com".to_string(),
            password: "x".to_string(),
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_login_request_empty_password() {
        let req = LoginUserRequest {
            email_or_phone: "a@b.com".to_string(),
            password: String::new(),
        };
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("password"));
    }

    // ========================================================================
    // Serialization tests
    // ========================================================================

    #[test]
    fn test_user_response_hides_password_hash() {
        let now = chrono::Utc::now();
        let user = shared::models::User {
            id: "user-123".to_string(),
            name: "Jane".to_string(),
            email: "jane@example.com".to_string(),
            phone: "081234567890".to_string(),
            photo: None,
            role: "user".to_string(),
            password_hash: "$argon2id$v=19$secret".to_string(),
            balance: 0,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };

        let json = serde_json::to_string(&UserResponse::from(user)).unwrap();
        assert!(json.contains("user-123"));
        assert!(!json.contains("argon2"));
    }
}
