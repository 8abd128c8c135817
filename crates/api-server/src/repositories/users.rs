//! User repository for database operations

use anyhow::{Context, Result};
use shared::models::User;
use shared::DbPool;
use sqlx::{Executor, Postgres};
use uuid::Uuid;

pub struct UserRepository;

impl UserRepository {
    /// Create a new user with role `user` and an empty balance
    pub async fn create(
        pool: &DbPool,
        name: &str,
        email: &str,
        phone: &str,
        password_hash: &str,
    ) -> Result<User> {
        let user_id = Uuid::new_v4().to_string();
        let now = chrono::Utc::now();

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, name, email, phone, password_hash, role, balance, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, 'user', 0, $6, $6)
            RETURNING *
            "#,
        )
        .bind(&user_id)
        .bind(name)
        .bind(email)
        .bind(phone)
        .bind(password_hash)
        .bind(now)
        .fetch_one(pool)
        .await
        .context("Failed to create user")?;

        Ok(user)
    }

    /// Find user by ID, including soft-deleted rows
    pub async fn find_by_id(pool: &DbPool, user_id: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT * FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await
        .context("Failed to find user by ID")?;

        Ok(user)
    }

    /// Find user by email (case-insensitive)
    pub async fn find_by_email(pool: &DbPool, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT * FROM users
            WHERE LOWER(email) = LOWER($1)
            "#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await
        .context("Failed to find user by email")?;

        Ok(user)
    }

    /// Find user by phone number
    pub async fn find_by_phone(pool: &DbPool, phone: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT * FROM users
            WHERE phone = $1
            "#,
        )
        .bind(phone)
        .fetch_optional(pool)
        .await
        .context("Failed to find user by phone")?;

        Ok(user)
    }

    /// Check if an email is used by anyone other than `except_id`
    pub async fn email_taken(pool: &DbPool, email: &str, except_id: Option<&str>) -> Result<bool> {
        let result = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM users
                WHERE LOWER(email) = LOWER($1) AND ($2::text IS NULL OR id <> $2)
            )
            "#,
        )
        .bind(email)
        .bind(except_id)
        .fetch_one(pool)
        .await
        .context("Failed to check if email exists")?;

        Ok(result)
    }

    /// Check if a phone number is used by anyone other than `except_id`
    pub async fn phone_taken(pool: &DbPool, phone: &str, except_id: Option<&str>) -> Result<bool> {
        let result = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM users
                WHERE phone = $1 AND ($2::text IS NULL OR id <> $2)
            )
            "#,
        )
        .bind(phone)
        .bind(except_id)
        .fetch_one(pool)
        .await
        .context("Failed to check if phone exists")?;

        Ok(result)
    }

    /// Update name, email and phone; `None` keeps the stored value
    pub async fn update_profile(
        pool: &DbPool,
        user_id: &str,
        name: Option<&str>,
        email: Option<&str>,
        phone: Option<&str>,
    ) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET name = COALESCE($2, name),
                email = COALESCE($3, email),
                phone = COALESCE($4, phone),
                updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(name)
        .bind(email)
        .bind(phone)
        .fetch_optional(pool)
        .await
        .context("Failed to update user")?;

        Ok(user)
    }

    /// Replace the stored password hash
    pub async fn update_password(pool: &DbPool, user_id: &str, password_hash: &str) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET password_hash = $2, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .bind(password_hash)
        .execute(pool)
        .await
        .context("Failed to update password")?;

        Ok(())
    }

    /// Store the public URL of a new profile photo
    pub async fn update_photo(pool: &DbPool, user_id: &str, photo_url: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET photo = $2, updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(photo_url)
        .fetch_optional(pool)
        .await
        .context("Failed to update profile photo")?;

        Ok(user)
    }

    /// Read the balance and lock the row until the transaction ends
    pub async fn lock_balance<'e, E>(executor: E, user_id: &str) -> Result<Option<i64>>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let balance = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT balance FROM users
            WHERE id = $1 AND deleted_at IS NULL
            FOR UPDATE
            "#,
        )
        .bind(user_id)
        .fetch_optional(executor)
        .await
        .context("Failed to lock user balance")?;

        Ok(balance)
    }

    /// Subtract `amount` from the balance
    pub async fn debit_balance<'e, E>(executor: E, user_id: &str, amount: i64) -> Result<()>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            UPDATE users
            SET balance = balance - $2, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .bind(amount)
        .execute(executor)
        .await
        .context("Failed to debit balance")?;

        Ok(())
    }
}
