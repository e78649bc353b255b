//! Notification fan-out and inbox management over HTTP.

use std::sync::Arc;

use http::StatusCode;
use serde_json::json;

use crate::helpers::{FailingMailer, TestApp};

async fn assign(app: &TestApp, deliverable: &str) {
    let res = app
        .request(
            "PATCH",
            &format!("/api/deliverables/{deliverable}/assign"),
            Some(json!({ "talent_id": app.talent.id })),
            Some(&app.client),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK, "{}", res.body);
}

#[tokio::test]
async fn test_assignment_persists_and_emails_the_talent() {
    let (app, mailer) = TestApp::new().await;
    let project = app.create_project("Launch").await;
    let deliverable = app.create_deliverable(&project, "Hero spot").await;
    assign(&app, &deliverable).await;

    let inbox = app.wait_for_notifications(&app.talent, 1).await;
    assert_eq!(inbox[0]["type"], "TALENT_ASSIGNED");
    assert_eq!(inbox[0]["read"], false);
    assert_eq!(inbox[0]["link"], format!("/workspace/{project}"));

    let talent_email = app.talent.email.clone();
    app.finish().await;

    let sent = mailer.sent.lock().unwrap();
    assert_eq!(
        *sent,
        vec![(talent_email, "talent_assigned".to_string())]
    );
}

#[tokio::test]
async fn test_failing_email_still_persists_exactly_one_row() {
    let app = TestApp::with_mailer(Arc::new(FailingMailer)).await;
    let project = app.create_project("Launch").await;
    let deliverable = app.create_deliverable(&project, "Hero spot").await;
    assign(&app, &deliverable).await;

    app.wait_for_notifications(&app.talent, 1).await;
    let talent = app.talent.id;
    let stores = app.stores.clone();
    app.finish().await;

    let rows = stores.notifications.list_for_user(talent, 50).await.unwrap();
    assert_eq!(rows.len(), 1);
}

#[tokio::test]
async fn test_project_status_reaches_talent_but_not_the_actor() {
    let (app, _mailer) = TestApp::new().await;
    let project = app.create_project("Launch").await;

    let res = app
        .request(
            "PATCH",
            &format!("/api/projects/{project}/status"),
            Some(json!({ "status": "IN_PROGRESS" })),
            Some(&app.client),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK, "{}", res.body);
    assert_eq!(res.data()["status"], "IN_PROGRESS");

    let inbox = app.wait_for_notifications(&app.talent, 1).await;
    assert_eq!(inbox[0]["type"], "PROJECT_STATUS_CHANGED");

    let client = app.client.id;
    let stores = app.stores.clone();
    app.finish().await;

    let rows = stores.notifications.list_for_user(client, 50).await.unwrap();
    assert!(rows.is_empty());
}

#[tokio::test]
async fn test_inbox_read_and_delete() {
    let (app, _mailer) = TestApp::new().await;
    let project = app.create_project("Launch").await;
    for title in ["Cut 1", "Cut 2", "Cut 3"] {
        let deliverable = app.create_deliverable(&project, title).await;
        assign(&app, &deliverable).await;
    }
    let inbox = app.wait_for_notifications(&app.talent, 3).await;
    let first = inbox[0]["id"].as_str().unwrap().to_string();
    let second = inbox[1]["id"].as_str().unwrap().to_string();

    let res = app
        .request("GET", "/api/notifications/unread-count", None, Some(&app.talent))
        .await;
    assert_eq!(res.data()["count"], 3);

    let res = app
        .request(
            "PATCH",
            &format!("/api/notifications/{first}/read"),
            None,
            Some(&app.talent),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK, "{}", res.body);

    // Someone else's notification looks missing.
    let res = app
        .request(
            "PATCH",
            &format!("/api/notifications/{second}/read"),
            None,
            Some(&app.outsider),
        )
        .await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);

    let res = app
        .request("GET", "/api/notifications/unread-count", None, Some(&app.talent))
        .await;
    assert_eq!(res.data()["count"], 2);

    let res = app
        .request(
            "DELETE",
            &format!("/api/notifications/{second}"),
            None,
            Some(&app.talent),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK, "{}", res.body);

    let res = app
        .request("PATCH", "/api/notifications/read-all", None, Some(&app.talent))
        .await;
    assert_eq!(res.data()["marked"], 1);

    let res = app
        .request("GET", "/api/notifications", None, Some(&app.talent))
        .await;
    let items = res.data().as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert!(items.iter().all(|n| n["read"] == true));

    app.finish().await;
}
