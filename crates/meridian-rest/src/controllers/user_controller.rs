//! User profile controller.

use crate::{
    controllers::photo_controller,
    responses::{created, ok, ApiResponse, ApiResult, AppError},
    state::AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use meridian_core::UserId;
use meridian_service::{CreateUserRequest, UserResponse};
use tracing::debug;
use uuid::Uuid;

/// Creates the user router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_user))
        .route("/:id", get(get_user))
        .nest("/:id/photos", photo_controller::router())
}

/// Create a new user profile.
async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserResponse>>), AppError> {
    debug!("Create user request: {}", request.email);

    let response = state.user_service.create_user(request).await?;
    Ok(created(response))
}

/// Get a user by ID.
async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<UserResponse> {
    debug!("Get user request: {}", id);

    let response = state.user_service.get_user(UserId::from_uuid(id)).await?;
    ok(response)
}
