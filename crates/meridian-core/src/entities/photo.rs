//! Photo entity.

use crate::{PhotoId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Photo metadata row owned by the relational catalogue.
///
/// `object_key` is the durable handle into the blob store; `url` is the
/// derived, publicly reachable address for the same object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Photo {
    /// Catalogue-assigned identifier.
    pub id: PhotoId,

    /// Owning user.
    pub user_id: UserId,

    /// Public URL of the stored object.
    pub url: String,

    /// Blob store key of the stored object.
    pub object_key: String,

    /// Row creation timestamp.
    pub created_at: DateTime<Utc>,
}
