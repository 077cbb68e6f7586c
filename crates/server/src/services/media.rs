//! Uploaded listing images on disk.
//!
//! Files are validated as a batch before anything is written, so a bad file
//! in the middle of an upload never leaves orphans behind. Stored files are
//! referenced everywhere else as `/uploads/{name}` paths.

use std::path::{Path, PathBuf};

use rand::Rng;
use thiserror::Error;

use crate::models::product::PLACEHOLDER_IMAGE;

/// Maximum number of images per listing.
pub const MAX_FILES: usize = 5;

/// Maximum size of a single image in bytes.
pub const MAX_FILE_BYTES: usize = 5 * 1024 * 1024;

/// Accepted image file extensions.
const ALLOWED_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "gif", "webp"];

/// Accepted image MIME types, matched against what the browser declares.
const ALLOWED_MIME_TYPES: [&str; 5] = [
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/gif",
    "image/webp",
];

/// Errors that can occur when storing uploaded images.
#[derive(Debug, Error)]
pub enum MediaError {
    /// More files than [`MAX_FILES`] were submitted.
    #[error("at most {MAX_FILES} images are allowed")]
    TooManyFiles,

    /// A file exceeds [`MAX_FILE_BYTES`].
    #[error("image '{0}' is larger than 5 MB")]
    FileTooLarge(String),

    /// A file is not an accepted image type.
    #[error("'{0}' is not an accepted image type")]
    UnsupportedType(String),

    /// Filesystem error while writing or removing files.
    #[error("storage error: {0}")]
    Io(#[from] std::io::Error),
}

impl MediaError {
    /// Whether this error was caused by the submitted files rather than
    /// the server, and is safe to show to the uploader.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::TooManyFiles | Self::FileTooLarge(_) | Self::UnsupportedType(_)
        )
    }
}

/// One file lifted out of a multipart request.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Filename as sent by the browser; only its extension is used.
    pub filename: String,
    /// Declared MIME type, if any.
    pub content_type: Option<String>,
    /// Raw file contents.
    pub bytes: Vec<u8>,
}

/// Store for uploaded listing images.
#[derive(Debug, Clone)]
pub struct MediaStore {
    upload_dir: PathBuf,
}

impl MediaStore {
    /// Create a media store, creating the upload directory if needed.
    ///
    /// # Errors
    ///
    /// Returns `MediaError::Io` if the directory cannot be created.
    pub async fn init(upload_dir: impl Into<PathBuf>) -> Result<Self, MediaError> {
        let upload_dir = upload_dir.into();
        tokio::fs::create_dir_all(&upload_dir).await?;
        Ok(Self { upload_dir })
    }

    /// Validate and store a batch of uploaded files.
    ///
    /// Returns the `/uploads/{name}` reference for each stored file, in
    /// input order. An empty batch returns an empty list; the caller
    /// decides whether to substitute the placeholder.
    ///
    /// # Errors
    ///
    /// Returns a validation error before anything is written if any file
    /// is oversized, of an unaccepted type, or the batch is too large.
    /// Returns `MediaError::Io` if writing fails; files written earlier in
    /// the batch are removed again first.
    pub async fn accept(&self, files: &[UploadedFile]) -> Result<Vec<String>, MediaError> {
        if files.len() > MAX_FILES {
            return Err(MediaError::TooManyFiles);
        }

        for file in files {
            validate(file)?;
        }

        let mut refs = Vec::with_capacity(files.len());
        let mut written: Vec<PathBuf> = Vec::with_capacity(files.len());

        for file in files {
            let name = generate_name(&file.filename);
            let path = self.upload_dir.join(&name);

            if let Err(e) = tokio::fs::write(&path, &file.bytes).await {
                for stale in &written {
                    if let Err(cleanup_err) = tokio::fs::remove_file(stale).await {
                        tracing::warn!(
                            path = %stale.display(),
                            error = %cleanup_err,
                            "Failed to remove partially stored upload"
                        );
                    }
                }
                return Err(MediaError::Io(e));
            }

            written.push(path);
            refs.push(format!("/uploads/{name}"));
        }

        Ok(refs)
    }

    /// Delete stored files by their `/uploads/{name}` references.
    ///
    /// The placeholder image and anything outside the upload directory are
    /// skipped. Individual failures are logged and do not interrupt the
    /// rest of the batch; the files are already unreferenced at this point.
    pub async fn discard(&self, refs: &[String]) {
        for image_ref in refs {
            if image_ref == PLACEHOLDER_IMAGE {
                continue;
            }
            let Some(name) = image_ref.strip_prefix("/uploads/") else {
                continue;
            };
            // Stored names never contain separators; anything else is not ours
            if name.contains('/') || name.contains('\\') || name.is_empty() {
                continue;
            }

            let path = self.upload_dir.join(name);
            if let Err(e) = tokio::fs::remove_file(&path).await {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Failed to remove stored upload"
                );
            }
        }
    }
}

fn validate(file: &UploadedFile) -> Result<(), MediaError> {
    if file.bytes.len() > MAX_FILE_BYTES {
        return Err(MediaError::FileTooLarge(file.filename.clone()));
    }

    let extension_ok = extension_of(&file.filename)
        .is_some_and(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()));
    let mime_ok = file
        .content_type
        .as_deref()
        .is_some_and(|mime| ALLOWED_MIME_TYPES.contains(&mime));

    if !extension_ok || !mime_ok {
        return Err(MediaError::UnsupportedType(file.filename.clone()));
    }

    Ok(())
}

fn extension_of(filename: &str) -> Option<String> {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase)
}

/// Unique stored filename: `product-{millis}-{random}.{ext}`.
fn generate_name(original: &str) -> String {
    let ext = extension_of(original).unwrap_or_else(|| "jpg".to_string());
    let millis = chrono::Utc::now().timestamp_millis();
    let nonce: u32 = rand::rng().random_range(0..1_000_000_000);
    format!("product-{millis}-{nonce}.{ext}")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn jpeg(name: &str, size: usize) -> UploadedFile {
        UploadedFile {
            filename: name.to_string(),
            content_type: Some("image/jpeg".to_string()),
            bytes: vec![0xFF; size],
        }
    }

    async fn store() -> (MediaStore, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = MediaStore::init(dir.path()).await.unwrap();
        (store, dir)
    }

    #[tokio::test]
    async fn test_accept_stores_files() {
        let (store, dir) = store().await;

        let refs = store
            .accept(&[jpeg("cat.JPG", 10), jpeg("dog.jpeg", 20)])
            .await
            .unwrap();

        assert_eq!(refs.len(), 2);
        for image_ref in &refs {
            let name = image_ref.strip_prefix("/uploads/").unwrap();
            assert!(name.starts_with("product-"));
            assert!(name.ends_with(".jpg") || name.ends_with(".jpeg"));
            assert!(dir.path().join(name).exists());
        }
    }

    #[tokio::test]
    async fn test_accept_empty_batch() {
        let (store, _dir) = store().await;
        let refs = store.accept(&[]).await.unwrap();
        assert!(refs.is_empty());
    }

    #[tokio::test]
    async fn test_accept_rejects_too_many() {
        let (store, _dir) = store().await;
        let files: Vec<_> = (0..=MAX_FILES).map(|i| jpeg(&format!("{i}.jpg"), 5)).collect();
        let result = store.accept(&files).await;
        assert!(matches!(result, Err(MediaError::TooManyFiles)));
    }

    #[tokio::test]
    async fn test_accept_rejects_oversized() {
        let (store, dir) = store().await;
        let result = store
            .accept(&[jpeg("ok.jpg", 10), jpeg("huge.jpg", MAX_FILE_BYTES + 1)])
            .await;
        assert!(matches!(result, Err(MediaError::FileTooLarge(_))));

        // Nothing was written, validation failed first
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_accept_rejects_wrong_type() {
        let (store, _dir) = store().await;

        let text = UploadedFile {
            filename: "notes.txt".to_string(),
            content_type: Some("text/plain".to_string()),
            bytes: vec![1, 2, 3],
        };
        assert!(matches!(
            store.accept(&[text]).await,
            Err(MediaError::UnsupportedType(_))
        ));

        // Image extension with a non-image MIME type is still rejected
        let spoofed = UploadedFile {
            filename: "image.jpg".to_string(),
            content_type: Some("application/octet-stream".to_string()),
            bytes: vec![1, 2, 3],
        };
        assert!(matches!(
            store.accept(&[spoofed]).await,
            Err(MediaError::UnsupportedType(_))
        ));

        let no_mime = UploadedFile {
            filename: "image.png".to_string(),
            content_type: None,
            bytes: vec![1, 2, 3],
        };
        assert!(matches!(
            store.accept(&[no_mime]).await,
            Err(MediaError::UnsupportedType(_))
        ));
    }

    #[tokio::test]
    async fn test_discard_removes_stored_files() {
        let (store, dir) = store().await;
        let refs = store.accept(&[jpeg("cat.jpg", 10)]).await.unwrap();

        store.discard(&refs).await;
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_discard_skips_placeholder_and_foreign_paths() {
        let (store, dir) = store().await;

        // Seed a file that a traversal attempt might target
        std::fs::write(dir.path().join("keep.jpg"), b"data").unwrap();

        store
            .discard(&[
                PLACEHOLDER_IMAGE.to_string(),
                "/etc/passwd".to_string(),
                "/uploads/../keep.jpg".to_string(),
                "/uploads/".to_string(),
            ])
            .await;

        assert!(dir.path().join("keep.jpg").exists());
    }

    #[test]
    fn test_generate_name_normalizes_extension() {
        let name = generate_name("Photo.PNG");
        assert!(name.starts_with("product-"));
        assert!(name.ends_with(".png"));

        // No extension falls back to jpg
        assert!(generate_name("raw").ends_with(".jpg"));
    }

    #[test]
    fn test_is_client_error() {
        assert!(MediaError::TooManyFiles.is_client_error());
        assert!(MediaError::UnsupportedType("x".into()).is_client_error());
        assert!(!MediaError::Io(std::io::Error::other("disk")).is_client_error());
    }
}
