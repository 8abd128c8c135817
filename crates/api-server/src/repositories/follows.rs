//! Follow repository

use anyhow::{Context, Result};
use shared::models::Follow;
use shared::DbPool;
use uuid::Uuid;

pub struct FollowRepository;

impl FollowRepository {
    pub async fn create(pool: &DbPool, follower_id: &str, following_id: &str) -> Result<Follow> {
        let id = Uuid::new_v4().to_string();

        let follow = sqlx::query_as::<_, Follow>(
            r#"
            INSERT INTO follows (id, follower_id, following_id, created_at)
            VALUES ($1, $2, $3, NOW())
            RETURNING *
            "#,
        )
        .bind(&id)
        .bind(follower_id)
        .bind(following_id)
        .fetch_one(pool)
        .await
        .context("Failed to create follow")?;

        Ok(follow)
    }

    pub async fn exists(pool: &DbPool, follower_id: &str, following_id: &str) -> Result<bool> {
        let result = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(SELECT 1 FROM follows WHERE follower_id = $1 AND following_id = $2)
            "#,
        )
        .bind(follower_id)
        .bind(following_id)
        .fetch_one(pool)
        .await
        .context("Failed to check follow")?;

        Ok(result)
    }
}
