use std::fmt;
use std::str::FromStr;

use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};

use crate::UploadError;

/// 2 MB.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 2 * 1024 * 1024;

pub const ALLOWED_CONTENT_TYPES: [&str; 4] = ["image/jpeg", "image/jpg", "image/png", "image/gif"];

/// Which design slot an upload is destined for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadKind {
    Logo,
    Image,
}

impl FromStr for UploadKind {
    type Err = UploadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "logo" => Ok(Self::Logo),
            "image" => Ok(Self::Image),
            other => Err(UploadError::InvalidKind(other.to_string())),
        }
    }
}

impl fmt::Display for UploadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Logo => f.write_str("logo"),
            Self::Image => f.write_str("image"),
        }
    }
}

/// Result of an accepted upload, echoed back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedAsset {
    pub kind: UploadKind,
    pub url: String,
    pub filename: String,
    pub size: usize,
    pub content_type: String,
}

/// Gate an upload on presence, content type and size, in that order.
///
/// # Errors
///
/// Returns [`UploadError::NoFile`] for an empty payload,
/// [`UploadError::InvalidType`] for anything but JPEG, PNG or GIF, and
/// [`UploadError::TooLarge`] when `size` exceeds `max_bytes`.
pub fn validate_upload(content_type: &str, size: usize, max_bytes: usize) -> Result<(), UploadError> {
    if size == 0 {
        return Err(UploadError::NoFile);
    }
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    if !ALLOWED_CONTENT_TYPES.contains(&essence.as_str()) {
        return Err(UploadError::InvalidType(content_type.to_string()));
    }
    if size > max_bytes {
        return Err(UploadError::TooLarge { size, max: max_bytes });
    }
    Ok(())
}

/// Encode the payload as a `data:` URL.
#[must_use]
pub fn to_data_url(content_type: &str, bytes: &[u8]) -> String {
    format!("data:{content_type};base64,{}", STANDARD.encode(bytes))
}

/// Validate and encode in one step.
///
/// # Errors
///
/// See [`validate_upload`].
pub fn accept_upload(
    kind: UploadKind,
    filename: &str,
    content_type: &str,
    bytes: &[u8],
    max_bytes: usize,
) -> Result<UploadedAsset, UploadError> {
    validate_upload(content_type, bytes.len(), max_bytes)?;
    Ok(UploadedAsset {
        kind,
        url: to_data_url(content_type, bytes),
        filename: filename.to_string(),
        size: bytes.len(),
        content_type: content_type.to_string(),
    })
}
