//! # Meridian REST
//!
//! HTTP surface of the Meridian service.

pub mod controllers;
pub mod responses;
pub mod router;
pub mod state;

pub use router::*;
pub use state::*;
