//! Local image store
//!
//! Uploads are content-addressed: the stored name is the SHA-256 of the
//! bytes plus the validated extension, so re-uploading the same picture
//! returns the existing file. Writes go to a uuid temp file first and are
//! renamed into place.

use std::path::{Path, PathBuf};

use image::ImageFormat;
use sha2::{Digest, Sha256};
use thiserror::Error;
use uuid::Uuid;

use crate::utils::{AppError, ErrorCode};

/// Maximum file size (5MB)
pub const MAX_FILE_SIZE: usize = 5 * 1024 * 1024;

/// Supported image formats
const SUPPORTED_FORMATS: &[&str] = &["png", "jpg", "jpeg", "webp", "gif"];

#[derive(Debug, Error)]
pub enum ImageStoreError {
    #[error("Empty file provided")]
    Empty,

    #[error("File too large ({size} bytes). Maximum size is {max} bytes", max = MAX_FILE_SIZE)]
    TooLarge { size: usize },

    #[error("Unsupported file format '{0}'. Supported: png, jpg, jpeg, webp, gif")]
    UnsupportedFormat(String),

    #[error("File content does not match a {0} image")]
    ContentMismatch(String),

    #[error("Image could not be decoded: {0}")]
    Decode(#[from] image::ImageError),

    #[error("Image validation task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("Invalid filename")]
    InvalidFilename,

    #[error("Image not found: {0}")]
    NotFound(String),

    #[error("Image storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ImageStoreError> for AppError {
    fn from(err: ImageStoreError) -> Self {
        match err {
            ImageStoreError::NotFound(name) => AppError::not_found(format!("Image {name}")),
            ImageStoreError::Io(e) => {
                tracing::error!(error = %e, "Image storage I/O error");
                AppError::internal("Image storage failed")
            }
            ImageStoreError::Task(e) => crate::utils::error::join_error(e),
            other => AppError::with_message(ErrorCode::ImageRejected, other.to_string()),
        }
    }
}

/// A stored image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    pub filename: String,
    pub size: u64,
    /// Whether identical content was already stored
    pub existed: bool,
}

#[derive(Clone, Debug)]
pub struct ImageStore {
    dir: PathBuf,
}

impl ImageStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Validate and store an upload
    pub async fn save(&self, original_name: &str, data: &[u8]) -> Result<StoredImage, ImageStoreError> {
        // Decoding is CPU bound
        let name = original_name.to_string();
        let bytes = data.to_vec();
        let ext = tokio::task::spawn_blocking(move || validate_image(&name, &bytes)).await??;
        let filename = format!("{}.{}", content_hash(data), ext);
        let path = self.dir.join(&filename);

        if tokio::fs::try_exists(&path).await? {
            tracing::info!(
                original_name = %original_name,
                existing_file = %filename,
                "Duplicate image detected, returning existing file"
            );
            return Ok(StoredImage {
                filename,
                size: data.len() as u64,
                existed: true,
            });
        }

        tokio::fs::create_dir_all(&self.dir).await?;
        let tmp = self.dir.join(format!(".{}.tmp", Uuid::new_v4()));
        if let Err(e) = tokio::fs::write(&tmp, data).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        tokio::fs::rename(&tmp, &path).await?;

        tracing::info!(
            original_name = %original_name,
            filename = %filename,
            size = data.len(),
            "Image stored"
        );
        Ok(StoredImage {
            filename,
            size: data.len() as u64,
            existed: false,
        })
    }

    /// Read a stored image, returning bytes and content type
    pub async fn read(&self, filename: &str) -> Result<(Vec<u8>, String), ImageStoreError> {
        if !is_safe_filename(filename) {
            return Err(ImageStoreError::InvalidFilename);
        }
        match tokio::fs::read(self.dir.join(filename)).await {
            Ok(bytes) => {
                let mime = mime_guess::from_path(filename)
                    .first_or_octet_stream()
                    .to_string();
                Ok((bytes, mime))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(ImageStoreError::NotFound(filename.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Calculate SHA256 hash of data
fn content_hash(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Single path segment, no traversal, no hidden temp files
fn is_safe_filename(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('.')
        && !name.contains("..")
        && !name.contains('/')
        && !name.contains('\\')
}

/// Check size, extension, detected format and a full decode; returns the
/// canonical extension
fn validate_image(original_name: &str, data: &[u8]) -> Result<&'static str, ImageStoreError> {
    if data.is_empty() {
        return Err(ImageStoreError::Empty);
    }
    if data.len() > MAX_FILE_SIZE {
        return Err(ImageStoreError::TooLarge { size: data.len() });
    }

    let ext = Path::new(original_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    if !SUPPORTED_FORMATS.contains(&ext.as_str()) {
        return Err(ImageStoreError::UnsupportedFormat(ext));
    }

    let (canonical, expected) = match ext.as_str() {
        "png" => ("png", ImageFormat::Png),
        "jpg" | "jpeg" => ("jpg", ImageFormat::Jpeg),
        "gif" => ("gif", ImageFormat::Gif),
        _ => ("webp", ImageFormat::WebP),
    };
    match image::guess_format(data) {
        Ok(format) if format == expected => {}
        _ => return Err(ImageStoreError::ContentMismatch(ext)),
    }

    // A valid header is not enough; the whole picture must decode
    image::load_from_memory_with_format(data, expected)?;
    Ok(canonical)
}
