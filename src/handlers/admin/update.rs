use axum::{
    extract::{Path, State},
    response::Json,
};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;
use crate::store::properties::{Property, PropertyPatch};

/// PUT /admin/update/:id - Apply a partial update and return the full record
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<PropertyPatch>,
) -> Result<Json<Property>, ApiError> {
    let property = state.listings.update_listing(id, patch).await?;
    Ok(Json(property))
}
