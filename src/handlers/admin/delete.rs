use axum::extract::{Path, State};
use tracing::info;
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

/// DELETE /admin/delete/:id - Remove a listing and its image file
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<&'static str, ApiError> {
    state.listings.delete_listing(id).await?;
    info!(%id, "Property deleted");

    Ok("Property deleted successfully")
}
