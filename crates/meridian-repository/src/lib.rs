//! # Meridian Repository
//!
//! Relational catalogue access for users and photos, implemented with SQLx
//! against PostgreSQL.

pub mod pool;
pub mod postgres;
pub mod traits;

pub use pool::*;
pub use postgres::*;
pub use traits::*;
