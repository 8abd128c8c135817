//! PostgreSQL-backed [`UserService`]

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::models::{BankAccount, Follow, User, Withdrawal};
use shared::{DbPool, Error, Result};
use std::sync::Arc;
use tracing::{debug, info};

use crate::models::{
    AccountFilter, AddAccountRequest, ChangePasswordRequest, LoginUserRequest, PagingParams,
    ProfileUpload, RegisterUserRequest, RequestEnvelope, UpdateAccountRequest, UpdateUserRequest,
    WithdrawalRequest,
};
use crate::repositories::{
    hash_token, unique_violation, AccountRepository, FollowRepository, RevokedTokenRepository,
    UserRepository, WithdrawalRepository,
};
use crate::services::password::{hash_password, verify_password};
use crate::services::storage::{profile_photo_key, ObjectStorage};
use crate::services::UserService;

const INVALID_CREDENTIALS: &str = "Invalid credentials";
const EMAIL_TAKEN: &str = "Email already registered";
const PHONE_TAKEN: &str = "Phone number already registered";
const ALREADY_FOLLOWING: &str = "Already following this user";

/// Duplicate writes that slip past the availability check surface as the
/// same conflict the check would have reported
fn user_write_error(err: anyhow::Error) -> Error {
    match unique_violation(&err) {
        Some(constraint) if constraint.contains("phone") => Error::conflict(PHONE_TAKEN),
        Some(_) => Error::conflict(EMAIL_TAKEN),
        None => err.into(),
    }
}

fn follow_write_error(err: anyhow::Error) -> Error {
    match unique_violation(&err) {
        Some(_) => Error::conflict(ALREADY_FOLLOWING),
        None => err.into(),
    }
}

pub struct PgUserService {
    pool: DbPool,
    storage: Arc<dyn ObjectStorage>,
}

impl PgUserService {
    pub fn new(pool: DbPool, storage: Arc<dyn ObjectStorage>) -> Self {
        Self { pool, storage }
    }

    /// Load a user that has not been soft-deleted
    async fn active_user(&self, user_id: &str) -> Result<User> {
        UserRepository::find_by_id(&self.pool, user_id)
            .await?
            .filter(|user| !user.is_deleted())
            .ok_or_else(|| Error::not_found("User", user_id))
    }

    /// Load an account and check that `user_id` owns it
    async fn owned_account(&self, user_id: &str, account_id: &str) -> Result<BankAccount> {
        let account = AccountRepository::find_by_id(&self.pool, account_id)
            .await?
            .ok_or_else(|| Error::not_found("BankAccount", account_id))?;

        if account.user_id != user_id {
            return Err(Error::authorization(
                "You do not have access to this bank account",
            ));
        }

        Ok(account)
    }

    async fn ensure_contact_available(
        &self,
        email: Option<&str>,
        phone: Option<&str>,
        except_id: Option<&str>,
    ) -> Result<()> {
        if let Some(email) = email {
            if UserRepository::email_taken(&self.pool, email, except_id).await? {
                return Err(Error::conflict(EMAIL_TAKEN));
            }
        }
        if let Some(phone) = phone {
            if UserRepository::phone_taken(&self.pool, phone, except_id).await? {
                return Err(Error::conflict(PHONE_TAKEN));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl UserService for PgUserService {
    async fn register(&self, request: RegisterUserRequest) -> Result<User> {
        self.ensure_contact_available(Some(&request.email), Some(&request.phone), None)
            .await?;

        let password_hash = hash_password(&request.password)?;
        let user = UserRepository::create(
            &self.pool,
            &request.name,
            &request.email,
            &request.phone,
            &password_hash,
        )
        .await
        .map_err(user_write_error)?;

        info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    async fn login(&self, request: LoginUserRequest) -> Result<User> {
        let identifier = request.email_or_phone.trim();
        let user = if identifier.contains('@') {
            UserRepository::find_by_email(&self.pool, identifier).await?
        } else {
            UserRepository::find_by_phone(&self.pool, identifier).await?
        };

        let user = match user {
            Some(user) if !user.is_deleted() => user,
            _ => {
                debug!("Login attempt for unknown or deleted user");
                return Err(Error::authentication(INVALID_CREDENTIALS));
            }
        };

        if !verify_password(&request.password, &user.password_hash)? {
            debug!(user_id = %user.id, "Login attempt with wrong password");
            return Err(Error::authentication(INVALID_CREDENTIALS));
        }

        Ok(user)
    }

    async fn get_by_id(&self, user_id: &str) -> Result<User> {
        self.active_user(user_id).await
    }

    async fn logout(
        &self,
        user_id: &str,
        refresh_token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<bool> {
        let revoked = RevokedTokenRepository::revoke(
            &self.pool,
            user_id,
            &hash_token(refresh_token),
            expires_at,
        )
        .await?;

        if revoked {
            info!(user_id = %user_id, "Refresh token revoked");
        } else {
            debug!(user_id = %user_id, "Refresh token was already revoked");
        }
        Ok(revoked)
    }

    async fn update(&self, request: RequestEnvelope<UpdateUserRequest>) -> Result<User> {
        let (user_id, changes) = request.into_parts();
        if changes.is_empty() {
            return Err(Error::validation("At least one field must be provided"));
        }

        self.active_user(&user_id).await?;
        self.ensure_contact_available(
            changes.email.as_deref(),
            changes.phone.as_deref(),
            Some(&user_id),
        )
        .await?;

        UserRepository::update_profile(
            &self.pool,
            &user_id,
            changes.name.as_deref(),
            changes.email.as_deref(),
            changes.phone.as_deref(),
        )
        .await
        .map_err(user_write_error)?
        .ok_or_else(|| Error::not_found("User", &user_id))
    }

    async fn change_password(
        &self,
        request: RequestEnvelope<ChangePasswordRequest>,
    ) -> Result<()> {
        let (user_id, change) = request.into_parts();
        let user = self.active_user(&user_id).await?;

        if !verify_password(&change.old_password, &user.password_hash)? {
            return Err(Error::validation("Current password is incorrect"));
        }
        if change.old_password == change.new_password {
            return Err(Error::validation(
                "New password must differ from the current password",
            ));
        }

        let password_hash = hash_password(&change.new_password)?;
        UserRepository::update_password(&self.pool, &user_id, &password_hash).await?;

        info!(user_id = %user_id, "Password changed");
        Ok(())
    }

    async fn change_profile(&self, request: RequestEnvelope<ProfileUpload>) -> Result<User> {
        let (user_id, upload) = request.into_parts();
        self.active_user(&user_id).await?;

        let key = profile_photo_key(&user_id, &upload.filename);
        let url = self
            .storage
            .put(&key, upload.content_type.as_deref(), upload.bytes)
            .await?;

        UserRepository::update_photo(&self.pool, &user_id, &url)
            .await?
            .ok_or_else(|| Error::not_found("User", &user_id))
    }

    async fn add_account(
        &self,
        request: RequestEnvelope<AddAccountRequest>,
    ) -> Result<BankAccount> {
        let (user_id, account) = request.into_parts();
        self.active_user(&user_id).await?;

        let account = AccountRepository::create(
            &self.pool,
            &user_id,
            &account.bank,
            &account.name,
            &account.number,
        )
        .await?;

        info!(user_id = %user_id, account_id = %account.id, "Bank account added");
        Ok(account)
    }

    async fn get_account(&self, user_id: &str, account_id: &str) -> Result<BankAccount> {
        self.owned_account(user_id, account_id).await
    }

    async fn list_accounts(
        &self,
        user_id: &str,
        filter: AccountFilter,
        paging: PagingParams,
    ) -> Result<(Vec<BankAccount>, u64)> {
        let total = AccountRepository::count_by_user(&self.pool, user_id, &filter).await?;
        let items = AccountRepository::list_by_user(
            &self.pool,
            user_id,
            &filter,
            paging.limit(),
            paging.offset(),
        )
        .await?;

        Ok((items, u64::try_from(total).unwrap_or_default()))
    }

    async fn update_account(
        &self,
        account_id: &str,
        request: RequestEnvelope<UpdateAccountRequest>,
    ) -> Result<BankAccount> {
        let (user_id, changes) = request.into_parts();
        self.owned_account(&user_id, account_id).await?;

        AccountRepository::update(
            &self.pool,
            account_id,
            changes.bank.as_deref(),
            changes.name.as_deref(),
            changes.number.as_deref(),
        )
        .await?
        .ok_or_else(|| Error::not_found("BankAccount", account_id))
    }

    async fn delete_account(&self, user_id: &str, account_id: &str) -> Result<()> {
        self.owned_account(user_id, account_id).await?;

        if !AccountRepository::delete(&self.pool, account_id).await? {
            return Err(Error::not_found("BankAccount", account_id));
        }

        info!(user_id = %user_id, account_id = %account_id, "Bank account deleted");
        Ok(())
    }

    async fn withdraw(&self, request: RequestEnvelope<WithdrawalRequest>) -> Result<Withdrawal> {
        let (user_id, withdrawal) = request.into_parts();
        if withdrawal.amount < 1 {
            return Err(Error::validation("amount must be at least 1"));
        }
        self.owned_account(&user_id, &withdrawal.account_id).await?;

        let mut tx = self.pool.begin().await?;

        let balance = UserRepository::lock_balance(&mut *tx, &user_id)
            .await?
            .ok_or_else(|| Error::not_found("User", &user_id))?;
        if balance < withdrawal.amount {
            return Err(Error::conflict("Insufficient balance"));
        }

        UserRepository::debit_balance(&mut *tx, &user_id, withdrawal.amount).await?;
        let created = WithdrawalRepository::create(
            &mut *tx,
            &user_id,
            &withdrawal.account_id,
            withdrawal.amount,
        )
        .await?;

        tx.commit().await?;

        info!(
            user_id = %user_id,
            withdrawal_id = %created.id,
            amount = created.amount,
            "Withdrawal requested"
        );
        Ok(created)
    }

    async fn follow(&self, user_id: &str, target_id: &str) -> Result<Follow> {
        if user_id == target_id {
            return Err(Error::validation("You cannot follow yourself"));
        }
        self.active_user(target_id).await?;

        if FollowRepository::exists(&self.pool, user_id, target_id).await? {
            return Err(Error::conflict(ALREADY_FOLLOWING));
        }

        FollowRepository::create(&self.pool, user_id, target_id)
            .await
            .map_err(follow_write_error)
    }

    async fn is_refresh_token_revoked(&self, refresh_token: &str) -> Result<bool> {
        Ok(RevokedTokenRepository::is_revoked(&self.pool, &hash_token(refresh_token)).await?)
    }
}
