//! Domain service boundary
//!
//! Handlers only ever talk to [`UserService`]. Every method returns the domain
//! error kind ([`shared::Error`]); the transport layer re-tags it.
//!
//! Operations acting on behalf of a caller take a [`RequestEnvelope`], so the
//! acting user id always comes from the verified token.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::models::{BankAccount, Follow, User, Withdrawal};
use shared::Result;

use crate::models::{
    AccountFilter, AddAccountRequest, ChangePasswordRequest, LoginUserRequest, PagingParams,
    ProfileUpload, RegisterUserRequest, RequestEnvelope, UpdateAccountRequest, UpdateUserRequest,
    WithdrawalRequest,
};

#[async_trait]
pub trait UserService: Send + Sync {
    async fn register(&self, request: RegisterUserRequest) -> Result<User>;

    /// Check credentials; any mismatch is `Authentication("Invalid credentials")`
    async fn login(&self, request: LoginUserRequest) -> Result<User>;

    async fn get_by_id(&self, user_id: &str) -> Result<User>;

    /// Revoke a refresh token until it expires
    ///
    /// Returns `false` when the token was already revoked.
    async fn logout(
        &self,
        user_id: &str,
        refresh_token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<bool>;

    async fn update(&self, request: RequestEnvelope<UpdateUserRequest>) -> Result<User>;

    async fn change_password(&self, request: RequestEnvelope<ChangePasswordRequest>)
        -> Result<()>;

    async fn change_profile(&self, request: RequestEnvelope<ProfileUpload>) -> Result<User>;

    async fn add_account(&self, request: RequestEnvelope<AddAccountRequest>)
        -> Result<BankAccount>;

    async fn get_account(&self, user_id: &str, account_id: &str) -> Result<BankAccount>;

    /// One page of the caller's accounts plus the total number of matches
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
