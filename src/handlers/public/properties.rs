use axum::{extract::State, response::Json};

use crate::error::ApiError;
use crate::state::AppState;
use crate::store::properties::Property;

/// GET /properties - All listings, as a plain JSON array
pub async fn list_properties(
    State(state): State<AppState>,
) -> Result<Json<Vec<Property>>, ApiError> {
    let properties = state.listings.list_properties().await?;
    Ok(Json(properties))
}
