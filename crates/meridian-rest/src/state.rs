//! Application state for Axum handlers.

use meridian_service::{PhotoService, UserService};
use std::sync::Arc;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserService>,
    pub photo_service: Arc<dyn PhotoService>,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(
        user_service: Arc<dyn UserService>,
        photo_service: Arc<dyn PhotoService>,
    ) -> Self {
        Self {
            user_service,
            photo_service,
        }
    }
}
