//! Photo-related DTOs.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use meridian_core::{Photo, PhotoId};
use serde::{Deserialize, Serialize};

/// One file submitted to a batch upload. Ephemeral: it either becomes a
/// catalogued photo or leaves no observable state behind.
#[derive(Debug, Clone)]
pub struct PhotoUpload {
    /// Client-supplied file name, kept for logging only.
    pub file_name: Option<String>,
    /// Raw file content.
    pub data: Bytes,
}

/// Photo response DTO. The blob store key stays internal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhotoResponse {
    pub id: PhotoId,
    pub url: String,
    pub created_at: DateTime<Utc>,
}

impl From<Photo> for PhotoResponse {
    fn from(photo: Photo) -> Self {
        Self {
            id: photo.id,
            url: photo.url,
            created_at: photo.created_at,
        }
    }
}
