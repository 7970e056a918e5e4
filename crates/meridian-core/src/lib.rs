//! # Meridian Core
//!
//! Core types, entities, and error definitions shared by every layer of the
//! Meridian profile/photo service.

pub mod entities;
pub mod error;
pub mod id;
pub mod result;
pub mod validation;

pub use entities::*;
pub use error::*;
pub use id::*;
pub use result::*;
pub use validation::*;
