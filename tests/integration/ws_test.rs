//! WebSocket admission and health endpoint.

use http::StatusCode;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_ws_rejects_missing_token() {
    let (app, _mailer) = TestApp::new().await;

    let res = app.request("GET", "/ws", None, None).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);

    app.finish().await;
}

#[tokio::test]
async fn test_ws_rejects_bad_token() {
    let (app, _mailer) = TestApp::new().await;

    let res = app.request("GET", "/ws?token=not-a-jwt", None, None).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);

    app.finish().await;
}

#[tokio::test]
async fn test_ws_valid_token_without_upgrade_headers_is_not_a_401() {
    let (app, _mailer) = TestApp::new().await;
    let token = app.token(&app.talent);

    let res = app
        .request("GET", &format!("/ws?token={token}"), None, None)
        .await;
    assert_ne!(res.status, StatusCode::UNAUTHORIZED);
    assert!(res.status.is_client_error());

    app.finish().await;
}

#[tokio::test]
async fn test_health_reports_connections() {
    let (app, _mailer) = TestApp::new().await;

    let res = app.request("GET", "/api/health", None, None).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.data()["status"], "ok");
    assert_eq!(res.data()["ws_connections"], 0);

    app.finish().await;
}
