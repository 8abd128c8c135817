//! Follow DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FollowResponse {
    pub id: String,
    pub follower_id: String,
    pub following_id: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<shared::models::Follow> for FollowResponse {
    fn from(follow: shared::models::Follow) -> Self {
        Self {
            id: follow.id,
            follower_id: follow.follower_id,
            following_id: follow.following_id,
            created_at: follow.created_at,
        }
    }
}
