//! Image intake: content-type validation and base64 encoding.
//!
//! Images are only accepted when their bytes carry a recognized image
//! signature; the declared type travels with the payload to the provider.

use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD as B64;
use base64::Engine;
use tracing::debug;

/// Image file magic bytes for validation.
const PNG_MAGIC: &[u8] = &[0x89, 0x50, 0x4E, 0x47];
const JPEG_MAGIC: &[u8] = &[0xFF, 0xD8, 0xFF];
const GIF_MAGIC: &[u8] = &[0x47, 0x49, 0x46];
const WEBP_MAGIC: &[u8] = b"RIFF";
const BMP_MAGIC: &[u8] = &[0x42, 0x4D];

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ImageError {
    #[error("not an image: {0}")]
    NotAnImage(String),
    #[error("file not found: {0}")]
    NotFound(PathBuf),
    #[error("not a regular file: {0}")]
    NotAFile(PathBuf),
    #[error("image too large: {size} bytes (max {max})")]
    TooLarge { size: u64, max: u64 },
    #[error("failed to read image: {0}")]
    Read(String),
}

impl ImageError {
    /// Whether the user picked something that is not an image, as opposed
    /// to the image failing to load or encode.
    pub fn is_validation(&self) -> bool {
        matches!(self, ImageError::NotAnImage(_))
    }
}

/// A base64-encoded image with its declared content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    pub mime_type: String,
    /// Standard base64, without any `data:` prefix.
    pub data: String,
}

impl ImagePayload {
    /// Validate raw bytes as an image and encode them.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ImageError> {
        let mime = detect_mime(bytes)
            .ok_or_else(|| ImageError::NotAnImage("not a recognized image format".into()))?;
        Ok(Self {
            mime_type: mime.to_string(),
            data: B64.encode(bytes),
        })
    }

    /// Parse a `data:<mime>;base64,<data>` URL, e.g. from a clipboard paste.
    pub fn from_data_url(url: &str) -> Result<Self, ImageError> {
        let rest = url
            .strip_prefix("data:")
            .ok_or_else(|| ImageError::NotAnImage("missing data: prefix".into()))?;
        let (mime, data) = rest
            .split_once(";base64,")
            .ok_or_else(|| ImageError::NotAnImage("data URL is not base64".into()))?;
        if !mime.starts_with("image/") {
            return Err(ImageError::NotAnImage(format!("content type {mime}")));
        }

        let data = data.trim();
        let bytes = B64
            .decode(data)
            .map_err(|e| ImageError::NotAnImage(format!("invalid base64: {e}")))?;
        // The bytes decide the type, not the declared prefix
        let detected = detect_mime(&bytes)
            .ok_or_else(|| ImageError::NotAnImage("not a recognized image format".into()))?;
        if detected != mime {
            debug!(declared = mime, detected, "data URL type mismatch");
        }
        Ok(Self {
            mime_type: detected.to_string(),
            data: data.to_string(),
        })
    }

    /// Approximate decoded size in bytes.
    pub fn decoded_len(&self) -> usize {
        self.data.len() / 4 * 3
    }
}

/// Detect an image MIME type from magic bytes.
pub fn detect_mime(bytes: &[u8]) -> Option<&'static str> {
    if bytes.len() < 4 {
        return None;
    }
    if bytes.starts_with(PNG_MAGIC) {
        Some("image/png")
    } else if bytes.starts_with(JPEG_MAGIC) {
        Some("image/jpeg")
    } else if bytes.starts_with(GIF_MAGIC) {
        Some("image/gif")
    } else if bytes.len() >= 12 && bytes.starts_with(WEBP_MAGIC) && &bytes[8..12] == b"WEBP" {
        Some("image/webp")
    } else if bytes.starts_with(BMP_MAGIC) {
        Some("image/bmp")
    } else {
        None
    }
}

fn expand_home(path: &Path) -> PathBuf {
    if let Ok(rest) = path.strip_prefix("~") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    path.to_path_buf()
}

/// Read an image file and encode it for sending.
pub async fn load_image(path: &Path, max_bytes: u64) -> Result<ImagePayload, ImageError> {
    let expanded = expand_home(path);

    let metadata = tokio::fs::metadata(&expanded)
        .await
        .map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ImageError::NotFound(expanded.clone()),
            _ => ImageError::Read(e.to_string()),
        })?;
    if !metadata.is_file() {
        return Err(ImageError::NotAFile(expanded));
    }
    if metadata.len() > max_bytes {
        return Err(ImageError::TooLarge {
            size: metadata.len(),
            max: max_bytes,
        });
    }

    let bytes = tokio::fs::read(&expanded)
        .await
        .map_err(|e| ImageError::Read(e.to_string()))?;
    let payload = ImagePayload::from_bytes(&bytes)?;

    debug!(
        path = %expanded.display(),
        mime = %payload.mime_type,
        bytes = bytes.len(),
        "image loaded"
    );
    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_HEADER: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn detects_common_formats() {
        assert_eq!(detect_mime(PNG_HEADER), Some("image/png"));
        assert_eq!(detect_mime(&[0xFF, 0xD8, 0xFF, 0xE0]), Some("image/jpeg"));
        assert_eq!(detect_mime(b"GIF89a"), Some("image/gif"));
        assert_eq!(detect_mime(b"RIFF\0\0\0\0WEBPVP8 "), Some("image/webp"));
        assert_eq!(detect_mime(b"BM\0\0\0\0"), Some("image/bmp"));
    }

    #[test]
    fn rejects_non_images() {
        assert_eq!(detect_mime(b"hello world"), None);
        assert_eq!(detect_mime(b"RIFF\0\0\0\0WAVEfmt "), None);
        assert_eq!(detect_mime(&[0x89]), None);
    }

    #[test]
    fn from_bytes_encodes_base64() {
        let payload = ImagePayload::from_bytes(PNG_HEADER).unwrap();
        assert_eq!(payload.mime_type, "image/png");
        assert_eq!(payload.data, "iVBORw0KGgo=");
    }

    #[test]
    fn from_bytes_rejects_text() {
        let err = ImagePayload::from_bytes(b"plain text file").unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn from_data_url_parses_image() {
        let payload = ImagePayload::from_data_url("data:image/jpeg;base64,/9j/4A==").unwrap();
        assert_eq!(payload.mime_type, "image/jpeg");
        assert_eq!(payload.data, "/9j/4A==");
    }

    #[test]
    fn from_data_url_rejects_non_image_type() {
        let err = ImagePayload::from_data_url("data:text/plain;base64,aGk=").unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn from_data_url_rejects_corrupt_payload() {
        let err = ImagePayload::from_data_url("data:image/png;base64,!!not base64!!").unwrap_err();
        assert!(err.is_validation());

        // Valid base64, but "hello world" is no image
        let err = ImagePayload::from_data_url("data:image/png;base64,aGVsbG8gd29ybGQ=").unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn from_data_url_trusts_bytes_over_declared_type() {
        let payload = ImagePayload::from_data_url("data:image/jpeg;base64,iVBORw0KGgo=").unwrap();
        assert_eq!(payload.mime_type, "image/png");
    }

    #[tokio::test]
    async fn load_image_reads_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pic.png");
        std::fs::write(&path, PNG_HEADER).unwrap();

        let payload = load_image(&path, 1024).await.unwrap();
        assert_eq!(payload.mime_type, "image/png");
    }

    #[tokio::test]
    async fn load_image_rejects_text_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.png");
        std::fs::write(&path, "definitely not a png").unwrap();

        let err = load_image(&path, 1024).await.unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn load_image_enforces_size_limit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.png");
        let mut bytes = PNG_HEADER.to_vec();
        bytes.resize(2048, 0);
        std::fs::write(&path, &bytes).unwrap();

        let err = load_image(&path, 1024).await.unwrap_err();
        assert_eq!(err, ImageError::TooLarge { size: 2048, max: 1024 });
        assert!(!err.is_validation());
    }

    #[tokio::test]
    async fn load_image_missing_and_directory() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.png");
        assert!(matches!(
            load_image(&missing, 1024).await,
            Err(ImageError::NotFound(_))
        ));
        assert!(matches!(
            load_image(dir.path(), 1024).await,
            Err(ImageError::NotAFile(_))
        ));
    }

    #[tokio::test]
    async fn load_image_unreadable_path_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("pic.png");
        std::fs::write(&file, PNG_HEADER).unwrap();

        // A regular file used as a directory fails with something other than NotFound
        let err = load_image(&file.join("inner.png"), 1024).await.unwrap_err();
        assert!(matches!(err, ImageError::Read(_)), "{err:?}");
        assert!(!err.is_validation());
    }
}
