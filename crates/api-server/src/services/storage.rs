//! Object storage for uploaded files
//!
//! [`ObjectStorage`] is the narrow seam the domain service writes through;
//! [`S3Storage`] is the production implementation.

use anyhow::{Context, Result};
use async_trait::async_trait;
use aws_sdk_s3::{
    config::{Credentials, Region},
    primitives::ByteStream,
    Client,
};
use shared::config::StorageConfig;
use uuid::Uuid;

#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Store `bytes` under `key` and return the public URL of the object
    async fn put(&self, key: &str, content_type: Option<&str>, bytes: Vec<u8>) -> Result<String>;
}

/// Amazon S3 (or S3-compatible) bucket
pub struct S3Storage {
    client: Client,
    bucket: String,
    public_url: String,
}

impl S3Storage {
    /// Build the client from configuration
    ///
    /// Static keys are used when configured; otherwise the default AWS
    /// credential chain applies.
    pub async fn from_config(config: &StorageConfig) -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new(config.region.clone()));

        if !config.access_key_id.is_empty() && !config.secret_access_key.is_empty() {
            loader = loader.credentials_provider(Credentials::new(
                config.access_key_id.clone(),
                config.secret_access_key.clone(),
                None,
                None,
                "static",
            ));
        }

        let sdk_config = loader.load().await;

        Self {
            client: Client::new(&sdk_config),
            bucket: config.bucket.clone(),
            public_url: public_base_url(config),
        }
    }
}

#[async_trait]
impl ObjectStorage for S3Storage {
    async fn put(&self, key: &str, content_type: Option<&str>, bytes: Vec<u8>) -> Result<String> {
        let size = bytes.len();

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .set_content_type(content_type.map(str::to_string))
            .body(ByteStream::from(bytes))
            .send()
            .await
            .with_context(|| format!("Failed to upload object {}", key))?;

        tracing::debug!(key = %key, size, "Uploaded object");

        Ok(format!("{}/{}", self.public_url, key))
    }
}

/// `AWS_URL` when set, the virtual-hosted bucket URL otherwise
fn public_base_url(config: &StorageConfig) -> String {
    if config.public_url.is_empty() {
        format!("https://{}.s3.{}.amazonaws.com", config.bucket, config.region)
    } else {
        config.public_url.trim_end_matches('/').to_string()
    }
}

/// Object key for a user's profile photo: `profiles/{user_id}/{uuid}.{ext}`
///
/// Only the extension of the declared filename is kept; the rest of the name
/// never reaches the key.
pub fn profile_photo_key(user_id: &str, filename: &str) -> String {
    let extension = std::path::Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|ext| ext.to_ascii_lowercase());

    match extension {
        Some(ext) => format!("profiles/{}/{}.{}", user_id, Uuid::new_v4(), ext),
        None => format!("profiles/{}/{}", user_id, Uuid::new_v4()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage_config(public_url: &str) -> StorageConfig {
        StorageConfig {
            access_key_id: String::new(),
            secret_access_key: String::new(),
            region: "ap-southeast-1".to_string(),
            bucket: "avatars".to_string(),
            public_url: public_url.to_string(),
        }
    }

    #[test]
    fn test_public_base_url_default() {
        assert_eq!(
            public_base_url(&storage_config("")),
            "https://avatars.s3.ap-southeast-1.amazonaws.com"
        );
    }

    #[test]
    fn test_public_base_url_override_trims_slash() {
        assert_eq!(
            public_base_url(&storage_config("https://cdn.example.com/")),
            "https://cdn.example.com"
        );
    }

    #[test]
    fn test_profile_photo_key_keeps_extension() {
        let key = profile_photo_key("user-1", "Me At The Beach.JPG");
        assert!(key.starts_with("profiles/user-1/"));
        assert!(key.ends_with(".jpg"));
        assert!(!key.contains("Beach"));
    }

    #[test]
    fn test_profile_photo_key_without_extension() {
        let key = profile_photo_key("user-1", "photo");
        assert!(key.starts_with("profiles/user-1/"));
        assert!(!key.contains('.'));

        let key = profile_photo_key("user-1", "../../etc/passwd.sh;rm");
        assert!(!key.contains(".."));
    }
}
