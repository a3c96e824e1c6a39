use std::path::PathBuf;

use anyhow::{Context, Result};
use axum::body::{to_bytes, Body, Bytes};
use axum::http::{header, HeaderMap, Request, StatusCode};
use axum::Router;
use tempfile::TempDir;
use tower::ServiceExt;

use estate_api::config::{
    AdminConfig, AppConfig, Environment, ServerConfig, SessionConfig, StorageConfig,
};
use estate_api::routes;
use estate_api::state::AppState;

pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "correct-horse-battery-staple";

pub const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// Default form fields for an upload, matching the listing used throughout
/// the suites.
pub const LISTING_FIELDS: &[(&str, &str)] = &[
    ("title", "A"),
    ("description", "Two bedroom test cottage"),
    ("rate", "100"),
    ("sqft", "500"),
    ("beds", "2"),
    ("baths", "1"),
    ("rating", "4"),
    ("booking", "available"),
];

/// An application instance backed by a temp directory, driven in-process
/// through the router.
pub struct TestApp {
    pub state: AppState,
    _data: TempDir,
}

impl TestApp {
    pub async fn spawn() -> Result<Self> {
        let data = tempfile::tempdir().context("failed to create temp dir")?;

        let config = AppConfig {
            environment: Environment::Development,
            server: ServerConfig { port: 0 },
            admin: AdminConfig {
                username: ADMIN_USERNAME.to_string(),
                password: ADMIN_PASSWORD.to_string(),
            },
            sessions: SessionConfig {
                ttl_hours: 1,
                secure_cookies: false,
            },
            storage: StorageConfig {
                database_url: format!("sqlite://{}", data.path().join("estate.db").display()),
                upload_dir: data.path().join("uploads"),
                upload_limit_bytes: 80_000,
            },
        };

        let state = AppState::init(config).await?;
        Ok(Self { state, _data: data })
    }

    pub fn router(&self) -> Router {
        routes::app(self.state.clone())
    }

    pub fn uploads_dir(&self) -> PathBuf {
        self.state.config.storage.upload_dir.clone()
    }

    pub fn upload_count(&self) -> usize {
        std::fs::read_dir(self.uploads_dir())
            .map(|entries| entries.count())
            .unwrap_or(0)
    }

    pub async fn send(&self, request: Request<Body>) -> Result<TestResponse> {
        let response = self.router().oneshot(request).await?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), 1024 * 1024).await?;

        Ok(TestResponse {
            status,
            headers,
            body,
        })
    }

    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> Result<TestResponse> {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::empty())?).await
    }

    pub async fn login_json(&self, username: &str, password: &str) -> Result<TestResponse> {
        let body = serde_json::json!({ "username": username, "password": password });
        let request = Request::builder()
            .method("POST")
            .uri("/admin/login")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))?;
        self.send(request).await
    }

    /// Authenticate with the configured pair and return the session cookie.
    pub async fn login(&self) -> Result<String> {
        let response = self.login_json(ADMIN_USERNAME, ADMIN_PASSWORD).await?;
        assert_eq!(response.status, StatusCode::OK);
        response
            .session_cookie()
            .context("login response carried no session cookie")
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    pub fn json(&self) -> Result<serde_json::Value> {
        serde_json::from_slice(&self.body).context("response body is not JSON")
    }

    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok())
    }

    /// The `sid=...` pair from Set-Cookie, ready to send back as a Cookie
    /// header.
    pub fn session_cookie(&self) -> Option<String> {
        let raw = self.headers.get(header::SET_COOKIE)?.to_str().ok()?;
        let pair = raw.split(';').next()?.trim();
        pair.starts_with("sid=").then(|| pair.to_string())
    }
}

pub fn png_bytes(len: usize) -> Vec<u8> {
    let mut bytes = PNG_MAGIC.to_vec();
    bytes.resize(len, 0);
    bytes
}

/// Build a multipart upload request for POST /admin/upload.
pub fn upload_request(
    cookie: Option<&str>,
    fields: &[(&str, &str)],
    file: Option<(&str, &[u8])>,
) -> Result<Request<Body>> {
    const BOUNDARY: &str = "test-boundary-9f3b71";

    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((file_name, bytes)) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"{file_name}\"\r\nContent-Type: image/png\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    let mut builder = Request::builder()
        .method("POST")
        .uri("/admin/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        );
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }

    Ok(builder.body(Body::from(body))?)
}
