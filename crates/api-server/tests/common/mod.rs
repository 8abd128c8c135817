//! Common test utilities for integration tests
//!
//! - [`MockUserService`]: mockall double of the domain service
//! - [`test_codec`] and token helpers signed with fixed test secrets
//! - `init_test_app!`: the real route table wired to a mock service
//! - sample rows for stubbed return values

#![allow(dead_code)]

use api_server::models::{
    AccountFilter, AddAccountRequest, ChangePasswordRequest, LoginUserRequest, PagingParams,
    ProfileUpload, RegisterUserRequest, RequestEnvelope, UpdateAccountRequest, UpdateUserRequest,
    WithdrawalRequest,
};
use api_server::services::{TokenClaims, TokenCodec, TokenKind, UserService};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use mockall::mock;
use shared::models::{BankAccount, Follow, User, Withdrawal};
use shared::Result;

// Test configuration constants
pub const TEST_ACCESS_SECRET: &str = "t3st-Acc3ss-k9X2mQ7vL4pR8wZ1nB6cT";
pub const TEST_REFRESH_SECRET: &str = "t3st-R3fr3sh-P4sW8eR2tY6uI0oL3kJ7";
pub const TEST_ACCESS_TTL_SECS: i64 = 900;
pub const TEST_USER_ID: &str = "user-1";

mock! {
    pub UserService {}

    #[async_trait]
    impl UserService for UserService {
        async fn register(&self, request: RegisterUserRequest) -> Result<User>;
        async fn login(&self, request: LoginUserRequest) -> Result<User>;
        async fn get_by_id(&self, user_id: &str) -> Result<User>;
        async fn logout(
            &self,
            user_id: &str,
            refresh_token: &str,
            expires_at: DateTime<Utc>,
        ) -> Result<bool>;
        async fn update(&self, request: RequestEnvelope<UpdateUserRequest>) -> Result<User>;
        async fn change_password(
            &self,
            request: RequestEnvelope<ChangePasswordRequest>,
        ) -> Result<()>;
        async fn change_profile(&self, request: RequestEnvelope<ProfileUpload>) -> Result<User>;
        async fn add_account(
            &self,
            request: RequestEnvelope<AddAccountRequest>,
        ) -> Result<BankAccount>;
        async fn get_account(&self, user_id: &str, account_id: &str) -> Result<BankAccount>;
        async fn list_accounts(
            &self,
            user_id: &str,
            filter: AccountFilter,
            paging: PagingParams,
        ) -> Result<(Vec<BankAccount>, u64)>;
        async fn update_account(
            &self,
            account_id: &str,
            request: RequestEnvelope<UpdateAccountRequest>,
        ) -> Result<BankAccount>;
        async fn delete_account(&self, user_id: &str, account_id: &str) -> Result<()>;
        async fn withdraw(&self, request: RequestEnvelope<WithdrawalRequest>) -> Result<Withdrawal>;
        async fn follow(&self, user_id: &str, target_id: &str) -> Result<Follow>;
        async fn is_refresh_token_revoked(&self, refresh_token: &str) -> Result<bool>;
    }
}

/// Build a test service with the real route table and a mocked domain service
///
/// # Example
///
/// ```ignore
/// let app = init_test_app!(MockUserService::new());
/// let resp = test::call_service(&app, req).await;
/// ```
macro_rules! init_test_app {
    ($service:expr) => {{
        let service: std::sync::Arc<dyn api_server::services::UserService> =
            std::sync::Arc::new($service);
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::new(crate::common::test_codec()))
                .app_data(actix_web::web::Data::from(service))
                .configure(api_server::routes::configure),
        )
        .await
    }};
}

pub fn test_codec() -> TokenCodec {
    TokenCodec::new(
        Algorithm::HS256,
        TEST_ACCESS_SECRET.as_bytes(),
        TEST_REFRESH_SECRET.as_bytes(),
        Duration::seconds(TEST_ACCESS_TTL_SECS),
        Duration::days(30),
    )
    .unwrap()
}

/// Valid access token for `user_id`
pub fn access_token(user_id: &str) -> String {
    test_codec()
        .issue_default(user_id, TokenKind::Access)
        .unwrap()
        .token
}

/// Valid refresh token for `user_id`
pub fn refresh_token(user_id: &str) -> String {
    test_codec()
        .issue_default(user_id, TokenKind::Refresh)
        .unwrap()
        .token
}

/// Access token that expired an hour ago, correctly signed
pub fn expired_access_token(user_id: &str) -> String {
    let now = Utc::now().timestamp();
    let claims = TokenClaims {
        sub: user_id.to_string(),
        iat: now - 7200,
        exp: now - 3600,
        scope: TokenKind::Access.as_str().to_string(),
        jti: "expired".to_string(),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(TEST_ACCESS_SECRET.as_bytes()),
    )
    .unwrap()
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token))
}

pub fn sample_user(id: &str) -> User {
    let now = Utc::now();
    User {
        id: id.to_string(),
        name: "Jane Doe".to_string(),
        email: "jane@example.com".to_string(),
        phone: "081234567890".to_string(),
        photo: None,
        role: "user".to_string(),
        password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdHNhbHQ$aGFzaGhhc2g".to_string(),
        balance: 100_000,
        created_at: now,
        updated_at: now,
        deleted_at: None,
    }
}

pub fn sample_account(id: &str, user_id: &str) -> BankAccount {
    let now = Utc::now();
    BankAccount {
        id: id.to_string(),
        user_id: user_id.to_string(),
        bank: "BCA".to_string(),
        name: "Jane Doe".to_string(),
        number: "1234567890".to_string(),
        created_at: now,
        updated_at: now,
    }
}

pub fn sample_withdrawal(user_id: &str, account_id: &str, amount: i64) -> Withdrawal {
    Withdrawal {
        id: "wd-1".to_string(),
        user_id: user_id.to_string(),
        account_id: account_id.to_string(),
        amount,
        status: "pending".to_string(),
        created_at: Utc::now(),
    }
}

pub fn sample_follow(follower_id: &str, following_id: &str) -> Follow {
    Follow {
        id: "follow-1".to_string(),
        follower_id: follower_id.to_string(),
        following_id: following_id.to_string(),
        created_at: Utc::now(),
    }
}
