//! User entity.

use crate::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Geographic coordinates attached to a user profile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub longitude: f64,
    pub latitude: f64,
}

/// User entity representing a profile in the system.
///
/// The email address is the unique identifier for a profile; uniqueness is
/// enforced with an explicit existence check before insert, backed by a
/// unique constraint in the catalogue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier for the user.
    pub id: UserId,

    /// Display name.
    pub name: String,

    /// Unique email address.
    pub email: String,

    /// Last reported location, if any.
    pub location: Option<Coordinates>,

    /// Account creation timestamp.
    pub created_at: DateTime<Utc>,

    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Creates a new user with the given details.
    #[must_use]
    pub fn new(name: String, email: String, location: Option<Coordinates>) -> Self {
        let now = Utc::now();
        Self {
            id: UserId::new(),
            name,
            email,
            location,
            created_at: now,
            updated_at: now,
        }
    }
}
