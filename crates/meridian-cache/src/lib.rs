//! # Meridian Cache
//!
//! Capacity-bounded, frequency-ranked caching on top of a remote key-value
//! store. The store contract is the seam: the LFU policy itself is backend
//! agnostic, and Redis provides the production implementation.

pub mod keys;
pub mod lfu;
pub mod pool;
pub mod remote;
pub mod user_cache;

pub use lfu::*;
pub use pool::*;
pub use remote::*;
pub use user_cache::*;
