use axum::{extract::State, response::Json, Extension};
use serde_json::{json, Value};

use crate::auth::Principal;
use crate::error::ApiError;
use crate::state::AppState;

/// GET /admin - Dashboard summary for the authenticated operator
pub async fn dashboard(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<Value>, ApiError> {
    let properties = state.listings.list_properties().await?;

    Ok(Json(json!({
        "success": true,
        "data": {
            "operator": principal.username,
            "properties": properties.len()
        }
    })))
}
