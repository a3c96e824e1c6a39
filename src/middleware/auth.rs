use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::auth::Principal;
use crate::error::ApiError;
use crate::state::AppState;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "sid";

/// Always-on layer: resolve the session cookie to a [`Principal`] and attach
/// it to the request. Requests without a valid session pass through
/// unauthenticated; the route guards below decide what that means.
pub async fn resolve_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    if let Some(id) = session_id_from_headers(request.headers()) {
        if let Some(principal) = state.sessions.resolve(&id) {
            request.extensions_mut().insert(principal);
        }
    }

    next.run(request).await
}

/// Guard for page-style admin routes: anonymous requests are redirected to
/// the login entry point.
pub async fn require_page_session(request: Request, next: Next) -> Response {
    if request.extensions().get::<Principal>().is_none() {
        return Redirect::to("/admin/login").into_response();
    }

    next.run(request).await
}

/// Guard for API-style admin routes: anonymous requests get a 401 instead of
/// a redirect.
pub async fn require_api_session(request: Request, next: Next) -> Response {
    if request.extensions().get::<Principal>().is_none() {
        return ApiError::unauthorized("Authentication required").into_response();
    }

    next.run(request).await
}

/// Extract the session identifier from the request's Cookie header.
pub fn session_id_from_headers(headers: &HeaderMap) -> Option<String> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;

    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == SESSION_COOKIE).then(|| value.to_string())
    })
}

/// Build the Set-Cookie value carrying a session identifier.
pub fn session_cookie(id: &str, secure: bool) -> String {
    let mut cookie = format!("{SESSION_COOKIE}={id}; Path=/; HttpOnly; SameSite=Lax");
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Build the Set-Cookie value that clears the session cookie.
pub fn clear_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}
