//! # Blob Store Trait
//!
//! The seam between the storefront and the storage backend. The app holds an
//! `Arc<dyn BlobStore>` so tests can swap Azure for [`MemoryBlobStore`].
//!
//! [`MemoryBlobStore`]: crate::memory::MemoryBlobStore

use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;
use vitrine_core::ImageUpload;

use crate::error::BlobResult;

/// A container of blobs addressed by key.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Writes `bytes` under `key`, replacing any existing blob, and returns
    /// the blob's public URL.
    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> BlobResult<String>;

    /// Name of the backing container, for logs and health output.
    fn container(&self) -> &str;
}

/// Generates a fresh blob key: a UUID v4 followed by the original extension.
///
/// ```rust
/// use vitrine_blob::blob_key;
///
/// let key = blob_key(Some("png"));
/// assert!(key.ends_with(".png"));
/// assert_eq!(key.len(), 36 + 4);
///
/// assert_eq!(blob_key(None).len(), 36);
/// ```
pub fn blob_key(extension: Option<&str>) -> String {
    let id = Uuid::new_v4();
    match extension {
        Some(ext) if !ext.is_empty() => format!("{id}.{ext}"),
        _ => id.to_string(),
    }
}

/// Uploads an image under a fresh key and returns its public URL.
///
/// Returns `Ok(None)` when no image is given, without touching the store.
pub async fn upload_image(
    store: &dyn BlobStore,
    image: Option<&ImageUpload>,
) -> BlobResult<Option<String>> {
    let Some(image) = image else {
        return Ok(None);
    };

    let extension = image.extension();
    let key = blob_key(extension.as_deref());
    let content_type = image.resolved_content_type();

    debug!(
        key = %key,
        size = image.bytes.len(),
        content_type = %content_type,
        container = store.container(),
        "Uploading image"
    );

    let url = store.put(&key, image.bytes.clone(), &content_type).await?;
    Ok(Some(url))
}
