//! User-related DTOs.

use chrono::{DateTime, Utc};
use meridian_core::{Coordinates, User, UserId};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to create a new user profile.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 64, message = "Name must be 1-64 characters"))]
    pub name: String,

    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    pub location: Option<Coordinates>,
}

/// User response DTO.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub location: Option<Coordinates>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            location: user.location,
            created_at: user.created_at,
        }
    }
}
