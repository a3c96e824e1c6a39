mod common;

use anyhow::Result;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};

use common::{TestApp, ADMIN_PASSWORD, ADMIN_USERNAME};

#[tokio::test]
async fn health_endpoint_responds() -> Result<()> {
    let app = TestApp::spawn().await?;

    let response = app.get("/health", None).await?;

    assert_eq!(response.status, StatusCode::OK);
    let body = response.json()?;
    assert_eq!(body["data"]["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn form_login_redirects_to_admin_and_sets_cookie() -> Result<()> {
    let app = TestApp::spawn().await?;

    let request = Request::builder()
        .method("POST")
        .uri("/admin/login")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(format!(
            "username={ADMIN_USERNAME}&password={ADMIN_PASSWORD}"
        )))?;
    let response = app.send(request).await?;

    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/admin"));

    let cookie = response.session_cookie().expect("session cookie");
    let raw = response.headers[header::SET_COOKIE].to_str()?;
    assert!(raw.contains("HttpOnly"));
    assert!(cookie.starts_with("sid="));
    Ok(())
}

#[tokio::test]
async fn form_login_failure_redirects_back_and_clears_cookie() -> Result<()> {
    let app = TestApp::spawn().await?;

    let request = Request::builder()
        .method("POST")
        .uri("/admin/login")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from("username=admin&password=guess"))?;
    let response = app.send(request).await?;

    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/admin/login"));

    let raw = response.headers[header::SET_COOKIE].to_str()?;
    assert!(raw.contains("Max-Age=0"));
    Ok(())
}

#[tokio::test]
async fn wrong_username_and_wrong_password_responses_are_identical() -> Result<()> {
    let app = TestApp::spawn().await?;

    let wrong_username = app.login_json("intruder", ADMIN_PASSWORD).await?;
    let wrong_password = app.login_json(ADMIN_USERNAME, "guess").await?;

    assert_eq!(wrong_username.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_username.body, wrong_password.body);
    Ok(())
}

#[tokio::test]
async fn anonymous_admin_page_redirects_to_login() -> Result<()> {
    let app = TestApp::spawn().await?;

    let response = app.get("/admin", None).await?;

    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/admin/login"));
    Ok(())
}

#[tokio::test]
async fn anonymous_mutating_api_routes_get_401() -> Result<()> {
    let app = TestApp::spawn().await?;
    let id = uuid::Uuid::new_v4();

    let update = Request::builder()
        .method("PUT")
        .uri(format!("/admin/update/{id}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{}"))?;
    assert_eq!(app.send(update).await?.status, StatusCode::UNAUTHORIZED);

    let delete = Request::builder()
        .method("DELETE")
        .uri(format!("/admin/delete/{id}"))
        .body(Body::empty())?;
    assert_eq!(app.send(delete).await?.status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn authenticated_dashboard_reports_the_operator() -> Result<()> {
    let app = TestApp::spawn().await?;
    let cookie = app.login().await?;

    let response = app.get("/admin", Some(&cookie)).await?;

    assert_eq!(response.status, StatusCode::OK);
    let body = response.json()?;
    assert_eq!(body["data"]["operator"], ADMIN_USERNAME);
    assert_eq!(body["data"]["properties"], 0);
    Ok(())
}

#[tokio::test]
async fn failed_login_destroys_the_presented_session() -> Result<()> {
    let app = TestApp::spawn().await?;
    let cookie = app.login().await?;

    // Session works before the failed attempt
    assert_eq!(app.get("/admin", Some(&cookie)).await?.status, StatusCode::OK);

    let request = Request::builder()
        .method("POST")
        .uri("/admin/login")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::COOKIE, &cookie)
        .body(Body::from(r#"{"username":"admin","password":"guess"}"#))?;
    assert_eq!(app.send(request).await?.status, StatusCode::UNAUTHORIZED);

    // The old id is gone server-side, so the page redirects again
    let response = app.get("/admin", Some(&cookie)).await?;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    Ok(())
}

#[tokio::test]
async fn successful_login_rotates_the_session_id() -> Result<()> {
    let app = TestApp::spawn().await?;
    let first = app.login().await?;

    let request = Request::builder()
        .method("POST")
        .uri("/admin/login")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::COOKIE, &first)
        .body(Body::from(format!(
            r#"{{"username":"{ADMIN_USERNAME}","password":"{ADMIN_PASSWORD}"}}"#
        )))?;
    let response = app.send(request).await?;
    let second = response.session_cookie().expect("rotated cookie");

    assert_ne!(first, second);
    // The pre-rotation id no longer resolves
    assert_eq!(
        app.get("/admin", Some(&first)).await?.status,
        StatusCode::SEE_OTHER
    );
    assert_eq!(
        app.get("/admin", Some(&second)).await?.status,
        StatusCode::OK
    );
    Ok(())
}

#[tokio::test]
async fn login_entry_point_is_public() -> Result<()> {
    let app = TestApp::spawn().await?;

    let response = app.get("/admin/login", None).await?;

    assert_eq!(response.status, StatusCode::OK);
    Ok(())
}
