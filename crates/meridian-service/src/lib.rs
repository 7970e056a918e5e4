//! # Meridian Service
//!
//! Business logic for the Meridian profile/photo service: the cached user
//! lookup path and the photo persistence pipeline that keeps the blob store
//! and the relational catalogue consistent under partial failure.

pub mod dto;
pub mod photo_service;
pub mod user_service;

pub use dto::*;
pub use photo_service::*;
pub use user_service::*;
