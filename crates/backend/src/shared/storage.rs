//! Picture uploads on local disk.
//!
//! Objects land at `<root>/<category>-pictures/<timestamp_ms>-<name>` and are
//! published as `<public_base_url>/<category>-pictures/<timestamp_ms>-<name>`.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use once_cell::sync::{Lazy, OnceCell};
use regex::Regex;
use std::path::PathBuf;

use crate::shared::config::{resolve_path, Config};

pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

pub const ALLOWED_CONTENT_TYPES: [&str; 3] = ["image/jpeg", "image/png", "image/jpg"];

static UNSAFE_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-zA-Z0-9.]").expect("filename pattern"));

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum UploadRejection {
    #[error("Please upload a valid image file (JPEG, PNG)")]
    UnsupportedType,
    #[error("File size should be less than 5MB")]
    TooLarge,
    #[error("Unknown upload category: {0}")]
    UnknownCategory(String),
}

/// Folder family of an upload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadCategory {
    Contact,
    Profile,
}

impl UploadCategory {
    pub fn parse(value: &str) -> Result<Self, UploadRejection> {
        match value.trim().to_lowercase().as_str() {
            "contact" | "contacts" => Ok(UploadCategory::Contact),
            "profile" | "profiles" | "user" | "users" => Ok(UploadCategory::Profile),
            other => Err(UploadRejection::UnknownCategory(other.to_string())),
        }
    }

    pub fn folder(&self) -> &'static str {
        match self {
            UploadCategory::Contact => "contact-pictures",
            UploadCategory::Profile => "profile-pictures",
        }
    }
}

/// Every character outside `[a-zA-Z0-9.]` becomes `-`, then lowercase
pub fn sanitize_filename(name: &str) -> String {
    UNSAFE_CHARS.replace_all(name, "-").to_lowercase()
}

pub fn check_upload(content_type: &str, size: usize) -> Result<(), UploadRejection> {
    let content_type = content_type.trim().to_lowercase();
    if !ALLOWED_CONTENT_TYPES.contains(&content_type.as_str()) {
        return Err(UploadRejection::UnsupportedType);
    }
    if size > MAX_UPLOAD_BYTES {
        return Err(UploadRejection::TooLarge);
    }
    Ok(())
}

/// Object key for a new upload
pub fn object_key(category: UploadCategory, file_name: &str, timestamp_ms: i64) -> String {
    format!(
        "{}/{}-{}",
        category.folder(),
        timestamp_ms,
        sanitize_filename(file_name)
    )
}

/// Split `data:<mime>;base64,<payload>` into content type and bytes
pub fn decode_data_url(value: &str) -> Result<(String, Vec<u8>)> {
    let rest = value
        .strip_prefix("data:")
        .context("Not a data URL")?;
    let (header, payload) = rest.split_once(',').context("Malformed data URL")?;
    let content_type = header
        .strip_suffix(";base64")
        .context("Data URL is not base64 encoded")?;
    let bytes = general_purpose::STANDARD
        .decode(payload.trim())
        .context("Invalid base64 payload")?;
    Ok((content_type.to_string(), bytes))
}

/// Place where uploaded bytes live
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `bytes` under `key` and return the public URL
    async fn put(&self, key: &str, bytes: &[u8]) -> Result<String>;
}

/// Files under a directory, served by the `/media` route
pub struct LocalDiskStore {
    root: PathBuf,
    public_base_url: String,
}

impl LocalDiskStore {
    pub fn new(root: PathBuf, public_base_url: &str) -> Self {
        Self {
            root,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            resolve_path(&config.storage.root),
            &config.storage.public_base_url,
        )
    }

    pub fn root(&self) -> &PathBuf {
        &self.root
    }
}

#[async_trait]
impl BlobStore for LocalDiskStore {
    async fn put(&self, key: &str, bytes: &[u8]) -> Result<String> {
        if key.split('/').any(|part| part == ".." || part.is_empty()) {
            bail!("Invalid object key: {}", key);
        }
        let path = self.root.join(key);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        tokio::fs::write(&path, bytes)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::info!("Stored {} ({} bytes)", key, bytes.len());
        Ok(format!("{}/{}", self.public_base_url, key))
    }
}

static STORE: OnceCell<LocalDiskStore> = OnceCell::new();

pub fn init_store(config: &Config) -> &'static LocalDiskStore {
    STORE.get_or_init(|| LocalDiskStore::from_config(config))
}

pub fn get_store() -> &'static LocalDiskStore {
    STORE.get_or_init(|| LocalDiskStore::from_config(crate::shared::config::get_config()))
}

/// Validate and store an uploaded file
pub async fn store_upload(
    store: &dyn BlobStore,
    category: UploadCategory,
    file_name: &str,
    content_type: &str,
    bytes: &[u8],
) -> Result<String> {
    check_upload(content_type, bytes.len())?;
    let key = object_key(category, file_name, chrono::Utc::now().timestamp_millis());
    store.put(&key, bytes).await
}

/// Store a profile picture sent as a data URL. The object is named after the
/// local part of the user's email.
pub async fn store_profile_data_url(store: &dyn BlobStore, data_url: &str, email: &str) -> Result<String> {
    let (content_type, bytes) = decode_data_url(data_url)?;
    check_upload(&content_type, bytes.len())?;
    let local_part = email.split('@').next().unwrap_or("user");
    let key = object_key(
        UploadCategory::Profile,
        &format!("{}.jpg", local_part),
        chrono::Utc::now().timestamp_millis(),
    );
    store.put(&key, &bytes).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("My Photo (1).JPG"), "my-photo--1-.jpg");
        assert_eq!(sanitize_filename("ok.png"), "ok.png");
        assert_eq!(sanitize_filename("../etc/passwd"), "..-etc-passwd");
    }

    #[test]
    fn test_object_key() {
        assert_eq!(
            object_key(UploadCategory::Contact, "Amal P.png", 1700000000000),
            "contact-pictures/1700000000000-amal-p.png"
        );
    }

    #[test]
    fn test_check_upload() {
        assert_eq!(check_upload("image/png", 10), Ok(()));
        assert_eq!(check_upload("IMAGE/JPEG", MAX_UPLOAD_BYTES), Ok(()));
        assert_eq!(check_upload("image/gif", 10), Err(UploadRejection::UnsupportedType));
        assert_eq!(
            check_upload("image/png", MAX_UPLOAD_BYTES + 1),
            Err(UploadRejection::TooLarge)
        );
    }

    #[test]
    fn test_category_parse() {
        assert_eq!(UploadCategory::parse("contact"), Ok(UploadCategory::Contact));
        assert_eq!(UploadCategory::parse("Profile"), Ok(UploadCategory::Profile));
        assert!(UploadCategory::parse("misc").is_err());
    }

    #[test]
    fn test_decode_data_url() {
        let (content_type, bytes) = decode_data_url("data:image/png;base64,aGVsbG8=").unwrap();
        assert_eq!(content_type, "image/png");
        assert_eq!(bytes, b"hello");
        assert!(decode_data_url("https://example.com/a.png").is_err());
        assert!(decode_data_url("data:image/png,plain").is_err());
    }

    #[tokio::test]
    async fn test_local_store_writes_file_and_returns_url() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalDiskStore::new(dir.path().to_path_buf(), "http://localhost:3000/media/");

        let url = store_upload(&store, UploadCategory::Contact, "Face.png", "image/png", b"png")
            .await
            .unwrap();
        assert!(url.starts_with("http://localhost:3000/media/contact-pictures/"));
        assert!(url.ends_with("-face.png"));

        let key = url.trim_start_matches("http://localhost:3000/media/");
        let written = std::fs::read(dir.path().join(key)).unwrap();
        assert_eq!(written, b"png");
    }

    #[tokio::test]
    async fn test_profile_data_url_named_after_email() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalDiskStore::new(dir.path().to_path_buf(), "http://media");
        let url = store_profile_data_url(&store, "data:image/jpeg;base64,aGVsbG8=", "nimal.s@agri.gov.lk")
            .await
            .unwrap();
        assert!(url.starts_with("http://media/profile-pictures/"));
        assert!(url.ends_with("-nimal.s.jpg"));
    }

    #[tokio::test]
    async fn test_rejected_upload_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalDiskStore::new(dir.path().to_path_buf(), "http://media");
        let result = store_upload(&store, UploadCategory::Contact, "a.gif", "image/gif", b"gif").await;
        assert!(result.is_err());
        assert!(!dir.path().join("contact-pictures").exists());
    }
}
