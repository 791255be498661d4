use std::path::Path;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

use crate::Error;

/// An image attached to a generation request as visual reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceImage {
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl ReferenceImage {
    pub fn new(mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data,
        }
    }

    /// Load an image file, deriving the MIME type from its extension.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let mime_type = mime_for_path(path).ok_or_else(|| {
            Error::UnsupportedImage(path.display().to_string())
        })?;
        let data = std::fs::read(path)?;
        Ok(Self::new(mime_type, data))
    }

    /// Raw base64 payload, as used by inline-data parts.
    pub fn to_base64(&self) -> String {
        BASE64.encode(&self.data)
    }

    /// Complete `data:` URL, as used by `image_url` content parts.
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.to_base64())
    }
}

fn mime_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "bmp" => Some("image/bmp"),
        "svg" => Some("image/svg+xml"),
        _ => None,
    }
}
