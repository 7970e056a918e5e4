//! PostgreSQL repository implementations.

pub mod photo_repository;
pub mod user_repository;

pub use photo_repository::*;
pub use user_repository::*;
