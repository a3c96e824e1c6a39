use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Json},
    routing::{self, get, post, put},
    Router,
};
use serde_json::{json, Value};
use std::time::Duration;
use tower_http::{services::ServeDir, timeout::TimeoutLayer, trace::TraceLayer};

use crate::handlers::{admin, public};
use crate::middleware::auth::{require_api_session, require_page_session, resolve_session};
use crate::state::AppState;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub fn app(state: AppState) -> Router {
    let uploads_dir = state.config.storage.upload_dir.clone();

    // Page-style admin routes redirect anonymous requests to the login entry
    // point; API-style ones answer 401 instead
    let admin_pages = Router::new()
        .route("/admin", get(admin::dashboard))
        .route("/admin/upload", post(admin::upload))
        .route_layer(middleware::from_fn(require_page_session));

    let admin_api = Router::new()
        .route("/admin/update/:id", put(admin::update))
        .route("/admin/delete/:id", routing::delete(admin::delete))
        .route_layer(middleware::from_fn(require_api_session));

    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .route("/properties", get(public::list_properties))
        .route("/admin/login", get(public::login_page).post(public::login))
        // Protected admin surface
        .merge(admin_pages)
        .merge(admin_api)
        // Stored images, served by file key
        .nest_service("/uploads", ServeDir::new(uploads_dir))
        // Global middleware
        .layer(middleware::from_fn_with_state(state.clone(), resolve_session))
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Estate API",
            "version": version,
            "description": "Real estate listing backend built with Rust (Axum)",
            "endpoints": {
                "properties": "GET /properties (public)",
                "uploads": "GET /uploads/:key (public)",
                "login": "GET+POST /admin/login (public)",
                "admin": "GET /admin (session)",
                "upload": "POST /admin/upload (session)",
                "update": "PUT /admin/update/:id (session)",
                "delete": "DELETE /admin/delete/:id (session)",
            }
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.listings.health().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "store": "ok"
                }
            })),
        ),
        Err(err) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "success": false,
                "error": "store unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "store_error": err.to_string()
                }
            })),
        ),
    }
}
