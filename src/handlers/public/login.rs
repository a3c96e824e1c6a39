use axum::{
    extract::{FromRequest, Request, State},
    http::header,
    response::{AppendHeaders, IntoResponse, Json, Redirect, Response},
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::error::ApiError;
use crate::middleware::auth::{clear_session_cookie, session_cookie, session_id_from_headers};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// GET /admin/login - Login entry point (the redirect target for anonymous
/// admin page requests)
pub async fn login_page() -> Json<Value> {
    Json(json!({
        "success": true,
        "data": {
            "login": "POST /admin/login with { username, password }"
        }
    }))
}

/// POST /admin/login - Verify the admin credential pair and start a session
///
/// Form submissions keep the original redirect flow (303 to /admin on
/// success, back to /admin/login on failure). JSON submissions get 200/401
/// bodies instead. Either way a failed attempt destroys any session the
/// request presented, and a successful one rotates the session id.
pub async fn login(State(state): State<AppState>, request: Request) -> Response {
    let wants_json = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.starts_with("application/json"))
        .unwrap_or(false);

    let presented = session_id_from_headers(request.headers());

    let credentials: LoginRequest = if wants_json {
        match Json::from_request(request, &()).await {
            Ok(Json(body)) => body,
            Err(rejection) => return rejection.into_response(),
        }
    } else {
        match axum::extract::Form::from_request(request, &()).await {
            Ok(axum::extract::Form(body)) => body,
            Err(rejection) => return rejection.into_response(),
        }
    };

    // Any session the client presented is dead after this point, whether the
    // attempt succeeds (rotation) or fails (source parity)
    if let Some(old) = presented {
        state.sessions.destroy(&old);
    }

    match state
        .credentials
        .verify(&credentials.username, &credentials.password)
    {
        Ok(principal) => {
            info!(username = %principal.username, "Admin login");
            let session = state.sessions.create(principal);
            let headers = AppendHeaders([(
                header::SET_COOKIE,
                session_cookie(&session, state.config.sessions.secure_cookies),
            )]);

            if wants_json {
                (headers, Json(json!({"success": true, "data": {"redirect": "/admin"}})))
                    .into_response()
            } else {
                (headers, Redirect::to("/admin")).into_response()
            }
        }
        Err(err) => {
            let headers = AppendHeaders([(header::SET_COOKIE, clear_session_cookie())]);

            if wants_json {
                (headers, ApiError::from(err)).into_response()
            } else {
                (headers, Redirect::to("/admin/login")).into_response()
            }
        }
    }
}
