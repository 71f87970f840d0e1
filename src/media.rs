//! Image storage
//!
//! One upload abstraction for every form that takes a picture. The strategy
//! (local disk or a hosted image service) comes from configuration.

use crate::config::UploadConfig;
use crate::error::AppError;
use async_trait::async_trait;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

/// A file taken from a multipart form
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedImage {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("Failed to write image: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image service request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Image service rejected the upload ({status}): {body}")]
    Rejected { status: u16, body: String },
}

impl From<UploadError> for AppError {
    fn from(e: UploadError) -> Self {
        AppError::Upload(e.to_string())
    }
}

/// Stores an image and returns the reference to persist on the entity
#[async_trait]
pub trait ImageStore: Send + Sync {
    async fn store(&self, image: UploadedImage) -> Result<String, UploadError>;
}

/// Build the configured store
pub fn image_store(config: &UploadConfig) -> Arc<dyn ImageStore> {
    match config {
        UploadConfig::Local { dir } => Arc::new(LocalImageStore::new(dir.clone())),
        UploadConfig::Hosted {
            cloud_name,
            api_key,
            api_secret,
        } => Arc::new(HostedImageStore::new(
            format!("https://api.cloudinary.com/v1_1/{}/image/upload", cloud_name),
            api_key.clone(),
            api_secret.clone(),
        )),
    }
}

/// Upload the image when there is one
pub async fn store_optional(
    store: &dyn ImageStore,
    image: Option<UploadedImage>,
) -> Result<Option<String>, UploadError> {
    match image {
        Some(image) => store.store(image).await.map(Some),
        None => Ok(None),
    }
}

/// `<uuid>_<original name>`, keeping only the last path component of the original
pub fn unique_file_name(original: &str) -> String {
    let base = original.rsplit(['/', '\\']).next().unwrap_or_default();
    let safe: String = base
        .chars()
        .map(|c| if c.is_whitespace() || c.is_control() || c == ':' { '_' } else { c })
        .collect();
    let safe = match safe.trim_matches('.') {
        "" => "image",
        _ => safe.as_str(),
    };
    format!("{}_{}", Uuid::new_v4(), safe)
}

/// Writes images under a directory served as static content
pub struct LocalImageStore {
    dir: PathBuf,
}

impl LocalImageStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }
}

#[async_trait]
impl ImageStore for LocalImageStore {
    async fn store(&self, image: UploadedImage) -> Result<String, UploadError> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let file_name = unique_file_name(&image.file_name);
        let path = self.dir.join(&file_name);
        tokio::fs::write(&path, &image.bytes).await?;

        info!("Stored image {} ({} bytes)", path.display(), image.bytes.len());
        Ok(file_name)
    }
}

/// Cloudinary-compatible signed upload
pub struct HostedImageStore {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    api_secret: String,
}

#[derive(Deserialize)]
struct HostedUploadResponse {
    secure_url: String,
}

impl HostedImageStore {
    pub fn new(endpoint: String, api_key: String, api_secret: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
            api_key,
            api_secret,
        }
    }

    /// Hex SHA-256 over the signed parameters followed by the secret
    fn signature(&self, timestamp: i64) -> String {
        let payload = format!("timestamp={}{}", timestamp, self.api_secret);
        format!("{:x}", Sha256::digest(payload.as_bytes()))
    }
}

#[async_trait]
impl ImageStore for HostedImageStore {
    async fn store(&self, image: UploadedImage) -> Result<String, UploadError> {
        let timestamp = chrono::Utc::now().timestamp();
        let signature = self.signature(timestamp);

        let mut file = reqwest::multipart::Part::bytes(image.bytes).file_name(image.file_name);
        if let Some(content_type) = image.content_type.as_deref() {
            file = file.mime_str(content_type)?;
        }

        let form = reqwest::multipart::Form::new()
            .part("file", file)
            .text("api_key", self.api_key.clone())
            .text("timestamp", timestamp.to_string())
            .text("signature_algorithm", "sha256")
            .text("signature", signature);

        debug!("Uploading image to {}", self.endpoint);
        let response = self.client.post(&self.endpoint).multipart(form).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UploadError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let uploaded: HostedUploadResponse = response.json().await?;
        info!("Uploaded image to {}", uploaded.secure_url);
        Ok(uploaded.secure_url)
    }
}
