//! # Meridian Blob
//!
//! Photo object persistence against an S3-compatible blob store.

pub mod object;
pub mod store;

pub use object::*;
pub use store::*;
