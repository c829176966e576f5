use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ImageRefError {
    #[error("image must be a data URL, got '{0}'")]
    NotADataUrl(String),
}

/// An optional image attached to a certificate or used while rendering one.
///
/// Images are carried inline as `data:` URLs; there is no separate upload
/// storage. Deserializing anything else as `inline` fails.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, ToSchema)]
#[serde(tag = "kind", content = "data_url", rename_all = "snake_case")]
pub enum ImageRef {
    #[default]
    Absent,
    Inline(String),
}

/// Wire shape of [`ImageRef`] before the data URL is checked.
#[derive(Deserialize)]
#[serde(tag = "kind", content = "data_url", rename_all = "snake_case")]
enum RawImageRef {
    Absent,
    Inline(String),
}

impl<'de> Deserialize<'de> for ImageRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match RawImageRef::deserialize(deserializer)? {
            RawImageRef::Absent => Ok(ImageRef::Absent),
            RawImageRef::Inline(value) => {
                ImageRef::from_data_url(value).map_err(serde::de::Error::custom)
            }
        }
    }
}

impl ImageRef {
    /// Encode raw image bytes as an inline data URL.
    pub fn inline(mime: &str, bytes: &[u8]) -> Self {
        Self::Inline(format!("data:{};base64,{}", mime, STANDARD.encode(bytes)))
    }

    /// Accept an existing data URL.
    pub fn from_data_url(value: impl Into<String>) -> Result<Self, ImageRefError> {
        let value = value.into();
        if !value.starts_with("data:") {
            return Err(ImageRefError::NotADataUrl(value));
        }
        Ok(Self::Inline(value))
    }

    /// Guess a MIME type from a file extension. Unknown extensions fall back
    /// to `application/octet-stream`.
    pub fn mime_for_extension(ext: &str) -> &'static str {
        match ext.to_ascii_lowercase().as_str() {
            "png" => "image/png",
            "jpg" | "jpeg" => "image/jpeg",
            "gif" => "image/gif",
            "svg" => "image/svg+xml",
            "webp" => "image/webp",
            _ => "application/octet-stream",
        }
    }

    pub fn is_present(&self) -> bool {
        matches!(self, ImageRef::Inline(_))
    }

    pub fn data_url(&self) -> Option<&str> {
        match self {
            ImageRef::Absent => None,
            ImageRef::Inline(url) => Some(url),
        }
    }
}
