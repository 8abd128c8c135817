//! Profile management DTOs

use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::validators::PHONE_REGEX;

/// Partial profile update; absent fields are left unchanged
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Validate, ToSchema)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,

    #[validate(email)]
    pub email: Option<String>,

    #[validate(regex(path = *PHONE_REGEX))]
    pub phone: Option<String>,
}

impl UpdateUserRequest {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.phone.is_none()
    }
}

/// Password change request
#[derive(Debug, Clone, PartialEq, Deserialize, Validate, ToSchema)]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1))]
    pub old_password: String,

    #[validate(length(min = 8, max = 100))]
    pub new_password: String,
}

/// Uploaded profile photo, read in full before reaching the domain service
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileUpload {
    /// File name as declared by the client
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Multipart body of PATCH /change_profile (documentation only)
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct ChangeProfileForm {
    #[schema(value_type = String, format = Binary)]
    pub photo: Vec<u8>,
}
