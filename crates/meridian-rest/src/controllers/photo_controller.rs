//! Photo controller.

use crate::{
    responses::{no_content, ok, ApiResult, AppError},
    state::AppState,
};
use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    routing::{delete, get},
    Router,
};
use meridian_core::{MeridianError, PhotoId, UserId};
use meridian_service::{PhotoResponse, PhotoUpload};
use tracing::debug;
use uuid::Uuid;

/// Creates the photo router, nested under a user path.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_photos).post(upload_photos))
        .route("/:photo_id", delete(delete_photo))
}

/// List a user's photos.
async fn list_photos(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Vec<PhotoResponse>> {
    debug!("List photos request: {}", id);

    let photos = state
        .photo_service
        .get_photos(UserId::from_uuid(id))
        .await?;
    ok(photos)
}

/// Upload a batch of photos, one multipart part per file.
async fn upload_photos(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<StatusCode, AppError> {
    debug!("Upload photos request: {}", id);

    let mut files = Vec::new();
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        AppError(MeridianError::validation(format!(
            "Malformed multipart body: {}",
            e
        )))
    })? {
        let file_name = field.file_name().map(ToString::to_string);
        let data = field.bytes().await.map_err(|e| {
            AppError(MeridianError::validation(format!(
                "Failed to read multipart field: {}",
                e
            )))
        })?;
        files.push(PhotoUpload { file_name, data });
    }

    if files.is_empty() {
        return Err(AppError(MeridianError::validation(
            "Request contains no files",
        )));
    }

    state
        .photo_service
        .upload_photos(UserId::from_uuid(id), files)
        .await?;

    Ok(StatusCode::CREATED)
}

/// Delete a single photo.
async fn delete_photo(
    State(state): State<AppState>,
    Path((id, photo_id)): Path<(Uuid, i64)>,
) -> Result<StatusCode, AppError> {
    debug!("Delete photo request: {} / {}", id, photo_id);

    state
        .photo_service
        .delete_photo(UserId::from_uuid(id), PhotoId::from_i64(photo_id))
        .await?;

    Ok(no_content())
}
