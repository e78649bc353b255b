//! Assignment, version, feedback, and phase flows over HTTP.

use http::StatusCode;
use serde_json::json;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_assignment_accept_and_version_review_cycle() {
    let (app, _mailer) = TestApp::new().await;
    let project = app.create_project("Spring campaign").await;
    let deliverable = app.create_deliverable(&project, "Teaser").await;

    let res = app
        .request(
            "PATCH",
            &format!("/api/deliverables/{deliverable}/assign"),
            Some(json!({ "talent_id": app.talent.id })),
            Some(&app.client),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK, "{}", res.body);
    assert_eq!(res.data()["acceptance_status"], "PENDING");

    let res = app
        .request(
            "POST",
            &format!("/api/deliverables/{deliverable}/accept"),
            None,
            Some(&app.talent),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK, "{}", res.body);
    assert_eq!(res.data()["acceptance_status"], "ACCEPTED");

    let res = app
        .request(
            "POST",
            &format!("/api/deliverables/{deliverable}/versions"),
            Some(json!({ "video_url": "https://cdn.test/teaser-v1.mp4" })),
            Some(&app.talent),
        )
        .await;
    assert_eq!(res.status, StatusCode::CREATED, "{}", res.body);
    assert_eq!(res.data()["version_number"], 1);
    let version = res.id();

    let res = app
        .request(
            "GET",
            &format!("/api/deliverables/{deliverable}"),
            None,
            Some(&app.client),
        )
        .await;
    assert_eq!(res.data()["status"], "REVIEW");

    let res = app
        .request(
            "POST",
            &format!("/api/versions/{version}/feedback"),
            Some(json!({
                "raw_text": "Logo is too small at 0:12",
                "tasks": ["Enlarge logo", "  "],
            })),
            Some(&app.client),
        )
        .await;
    assert_eq!(res.status, StatusCode::CREATED, "{}", res.body);
    assert_eq!(res.data()["tasks"].as_array().unwrap().len(), 1);

    let res = app
        .request(
            "GET",
            &format!("/api/deliverables/{deliverable}/versions"),
            None,
            Some(&app.talent),
        )
        .await;
    assert_eq!(res.data()[0]["status"], "CHANGES_REQUESTED");

    let res = app
        .request(
            "PATCH",
            &format!("/api/versions/{version}/status"),
            Some(json!({ "status": "APPROVED" })),
            Some(&app.client),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK, "{}", res.body);
    assert_eq!(res.data()["status"], "APPROVED");

    // Assigned, feedback, approved.
    let inbox = app.wait_for_notifications(&app.talent, 3).await;
    let kinds: Vec<&str> = inbox.iter().filter_map(|n| n["type"].as_str()).collect();
    assert!(kinds.contains(&"TALENT_ASSIGNED"));
    assert!(kinds.contains(&"FEEDBACK_RECEIVED"));
    assert!(kinds.contains(&"VERSION_APPROVED"));

    // Accepted, uploaded.
    let inbox = app.wait_for_notifications(&app.client, 2).await;
    let kinds: Vec<&str> = inbox.iter().filter_map(|n| n["type"].as_str()).collect();
    assert!(kinds.contains(&"ASSIGNMENT_ACCEPTED"));
    assert!(kinds.contains(&"VERSION_UPLOADED"));

    app.finish().await;
}

#[tokio::test]
async fn test_only_the_assignee_may_answer_an_assignment() {
    let (app, _mailer) = TestApp::new().await;
    let project = app.create_project("Documentary").await;
    let deliverable = app.create_deliverable(&project, "Trailer").await;

    app.request(
        "PATCH",
        &format!("/api/deliverables/{deliverable}/assign"),
        Some(json!({ "talent_id": app.talent.id })),
        Some(&app.client),
    )
    .await;

    let res = app
        .request(
            "POST",
            &format!("/api/deliverables/{deliverable}/accept"),
            None,
            Some(&app.outsider),
        )
        .await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);

    let res = app
        .request(
            "POST",
            &format!("/api/deliverables/{deliverable}/reject"),
            Some(json!({ "reason": "Booked that week" })),
            Some(&app.talent),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK, "{}", res.body);
    assert_eq!(res.data()["acceptance_status"], "REJECTED");
    assert!(res.data()["assigned_talent_id"].is_null());

    let inbox = app.wait_for_notifications(&app.client, 1).await;
    assert_eq!(inbox[0]["type"], "ASSIGNMENT_REJECTED");
    assert!(
        inbox[0]["message"]
            .as_str()
            .unwrap()
            .contains("Booked that week")
    );

    app.finish().await;
}

#[tokio::test]
async fn test_talent_cannot_see_deliverables_assigned_elsewhere() {
    let (app, _mailer) = TestApp::new().await;
    let project = app.create_project("Brand film").await;
    let mine = app.create_deliverable(&project, "Cut A").await;
    let theirs = app.create_deliverable(&project, "Cut B").await;

    for (deliverable, talent) in [(&mine, &app.talent), (&theirs, &app.outsider)] {
        app.request(
            "PATCH",
            &format!("/api/deliverables/{deliverable}/assign"),
            Some(json!({ "talent_id": talent.id })),
            Some(&app.client),
        )
        .await;
    }

    let res = app
        .request(
            "GET",
            &format!("/api/projects/{project}/deliverables"),
            None,
            Some(&app.talent),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK, "{}", res.body);
    let ids: Vec<&str> = res
        .data()
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|d| d["id"].as_str())
        .collect();
    assert_eq!(ids, vec![mine.as_str()]);

    let res = app
        .request(
            "POST",
            &format!("/api/deliverables/{theirs}/versions"),
            Some(json!({ "video_url": "https://cdn.test/b.mp4" })),
            Some(&app.talent),
        )
        .await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);

    let res = app
        .request(
            "GET",
            &format!("/api/projects/{project}/deliverables"),
            None,
            Some(&app.client),
        )
        .await;
    assert_eq!(res.data().as_array().unwrap().len(), 2);

    app.finish().await;
}

#[tokio::test]
async fn test_invalid_input_maps_to_client_errors() {
    let (app, _mailer) = TestApp::new().await;
    let project = app.create_project("Series").await;
    let deliverable = app.create_deliverable(&project, "Episode 1").await;

    let res = app
        .request(
            "PATCH",
            &format!("/api/projects/{project}/status"),
            Some(json!({ "status": "ARCHIVED" })),
            Some(&app.client),
        )
        .await;
    assert_eq!(res.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(res.body["error"], "INVALID_TRANSITION");

    let res = app
        .request(
            "PATCH",
            &format!("/api/deliverables/{deliverable}/progress"),
            Some(json!({ "progress": 140 })),
            Some(&app.client),
        )
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["error"], "VALIDATION_ERROR");

    let res = app
        .request(
            "POST",
            "/api/projects",
            Some(json!({ "title": "Not allowed" })),
            Some(&app.talent),
        )
        .await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);

    let res = app.request("GET", "/api/projects", None, None).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);

    let res = app
        .request(
            "GET",
            &format!("/api/projects/{}", studioflow_core::types::ProjectId::new()),
            None,
            Some(&app.client),
        )
        .await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);

    app.finish().await;
}

#[tokio::test]
async fn test_phases_and_tasks() {
    let (app, _mailer) = TestApp::new().await;
    let project = app.create_project("Music video").await;
    let deliverable = app.create_deliverable(&project, "Full cut").await;

    let res = app
        .request(
            "POST",
            &format!("/api/deliverables/{deliverable}/phases"),
            Some(json!({
                "name": "Shoot",
                "order_index": 1,
                "assigned_to": "TALENT",
                "tasks": ["Scout location"],
            })),
            Some(&app.client),
        )
        .await;
    assert_eq!(res.status, StatusCode::CREATED, "{}", res.body);
    let phase = res.id();
    let first_task = res.data()["tasks"][0]["id"].as_str().unwrap().to_string();

    let res = app
        .request(
            "POST",
            &format!("/api/phases/{phase}/tasks"),
            Some(json!({ "title": "Book crew" })),
            Some(&app.client),
        )
        .await;
    assert_eq!(res.status, StatusCode::CREATED, "{}", res.body);

    let res = app
        .request(
            "PATCH",
            &format!("/api/workflow-tasks/{first_task}/toggle"),
            None,
            Some(&app.client),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK, "{}", res.body);
    assert_eq!(res.data()["completed"], true);

    let res = app
        .request(
            "GET",
            &format!("/api/deliverables/{deliverable}/phases"),
            None,
            Some(&app.client),
        )
        .await;
    assert_eq!(res.data()[0]["tasks"].as_array().unwrap().len(), 2);

    app.finish().await;
}

#[tokio::test]
async fn test_assignment_target_must_be_a_known_talent() {
    let (app, _mailer) = TestApp::new().await;
    let project = app.create_project("Podcast").await;
    let deliverable = app.create_deliverable(&project, "Episode art").await;

    let res = app
        .request(
            "PATCH",
            &format!("/api/deliverables/{deliverable}/assign"),
            Some(json!({ "talent_id": app.client.id })),
            Some(&app.client),
        )
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST, "{}", res.body);

    let res = app
        .request(
            "PATCH",
            &format!("/api/deliverables/{deliverable}/assign"),
            Some(json!({ "talent_id": studioflow_core::types::UserId::new() })),
            Some(&app.client),
        )
        .await;
    assert_eq!(res.status, StatusCode::NOT_FOUND, "{}", res.body);

    let res = app
        .request(
            "PATCH",
            &format!("/api/projects/{project}/talent"),
            Some(json!({ "talent_id": app.admin.id })),
            Some(&app.client),
        )
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST, "{}", res.body);

    app.finish().await;
}

#[tokio::test]
async fn test_outsiders_cannot_touch_tasks() {
    let (app, _mailer) = TestApp::new().await;
    let project = app.create_project("Festival").await;
    let deliverable = app.create_deliverable(&project, "Recap").await;

    let res = app
        .request(
            "POST",
            &format!("/api/deliverables/{deliverable}/versions"),
            Some(json!({ "video_url": "https://cdn.test/recap-v1.mp4" })),
            Some(&app.client),
        )
        .await;
    let version = res.id();

    let res = app
        .request(
            "POST",
            &format!("/api/versions/{version}/feedback"),
            Some(json!({ "raw_text": "Trim the intro", "tasks": ["Cut 3s"] })),
            Some(&app.client),
        )
        .await;
    assert_eq!(res.status, StatusCode::CREATED, "{}", res.body);
    let feedback = res.id();
    let revision_task = res.data()["tasks"][0]["id"].as_str().unwrap().to_string();

    let res = app
        .request(
            "PATCH",
            &format!("/api/revision-tasks/{revision_task}/toggle"),
            None,
            Some(&app.outsider),
        )
        .await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);

    let res = app
        .request(
            "POST",
            &format!("/api/feedback/{feedback}/tasks"),
            Some(json!({ "description": "Sneaky" })),
            Some(&app.outsider),
        )
        .await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);

    let res = app
        .request(
            "DELETE",
            &format!("/api/revision-tasks/{revision_task}"),
            None,
            Some(&app.outsider),
        )
        .await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);

    let res = app
        .request(
            "POST",
            &format!("/api/deliverables/{deliverable}/phases"),
            Some(json!({ "name": "Edit", "tasks": ["Rough cut"] })),
            Some(&app.client),
        )
        .await;
    assert_eq!(res.status, StatusCode::CREATED, "{}", res.body);
    let workflow_task = res.data()["tasks"][0]["id"].as_str().unwrap().to_string();

    let res = app
        .request(
            "PATCH",
            &format!("/api/workflow-tasks/{workflow_task}/toggle"),
            None,
            Some(&app.outsider),
        )
        .await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);

    let res = app
        .request(
            "DELETE",
            &format!("/api/revision-tasks/{revision_task}"),
            None,
            Some(&app.client),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK, "{}", res.body);

    app.finish().await;
}

#[tokio::test]
async fn test_edit_and_delete_workflow_records() {
    let (app, _mailer) = TestApp::new().await;
    let project = app.create_project("Product launch").await;
    let deliverable = app.create_deliverable(&project, "Hero film").await;

    let res = app
        .request(
            "PATCH",
            &format!("/api/deliverables/{deliverable}"),
            Some(json!({
                "title": "Hero film 60s",
                "type": "reel",
                "deadline": "2026-12-01T00:00:00Z",
            })),
            Some(&app.client),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK, "{}", res.body);
    assert_eq!(res.data()["title"], "Hero film 60s");
    assert_eq!(res.data()["type"], "REEL");
    assert!(res.data()["deadline"].is_string());

    let res = app
        .request(
            "PATCH",
            &format!("/api/deliverables/{deliverable}"),
            Some(json!({ "title": "Mine now" })),
            Some(&app.outsider),
        )
        .await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);

    let res = app
        .request(
            "POST",
            &format!("/api/deliverables/{deliverable}/versions"),
            Some(json!({ "video_url": "https://cdn.test/hero-v1.mp4" })),
            Some(&app.client),
        )
        .await;
    let first = res.id();

    let res = app
        .request(
            "PATCH",
            &format!("/api/versions/{first}"),
            Some(json!({ "description": "Wrong grade" })),
            Some(&app.client),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK, "{}", res.body);
    assert_eq!(res.data()["description"], "Wrong grade");
    assert_eq!(res.data()["video_url"], "https://cdn.test/hero-v1.mp4");

    let res = app
        .request("DELETE", &format!("/api/versions/{first}"), None, Some(&app.client))
        .await;
    assert_eq!(res.status, StatusCode::OK, "{}", res.body);

    let res = app
        .request(
            "POST",
            &format!("/api/deliverables/{deliverable}/versions"),
            Some(json!({ "video_url": "https://cdn.test/hero-v2.mp4" })),
            Some(&app.client),
        )
        .await;
    assert_eq!(res.data()["version_number"], 2);

    let res = app
        .request(
            "POST",
            &format!("/api/deliverables/{deliverable}/phases"),
            Some(json!({ "name": "Grade", "tasks": ["Match shots"] })),
            Some(&app.client),
        )
        .await;
    let phase = res.id();
    let task = res.data()["tasks"][0]["id"].as_str().unwrap().to_string();

    let res = app
        .request(
            "PATCH",
            &format!("/api/phases/{phase}"),
            Some(json!({ "name": "Color grade", "assigned_to": "CLIENT" })),
            Some(&app.client),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK, "{}", res.body);
    assert_eq!(res.data()["name"], "Color grade");
    assert_eq!(res.data()["assigned_to"], "CLIENT");

    let res = app
        .request(
            "PATCH",
            &format!("/api/workflow-tasks/{task}"),
            Some(json!({ "title": "Match all shots" })),
            Some(&app.talent),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK, "{}", res.body);
    assert_eq!(res.data()["title"], "Match all shots");

    let res = app
        .request(
            "DELETE",
            &format!("/api/workflow-tasks/{task}"),
            None,
            Some(&app.talent),
        )
        .await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);

    let res = app
        .request(
            "DELETE",
            &format!("/api/workflow-tasks/{task}"),
            None,
            Some(&app.client),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK, "{}", res.body);

    let res = app
        .request("DELETE", &format!("/api/phases/{phase}"), None, Some(&app.client))
        .await;
    assert_eq!(res.status, StatusCode::OK, "{}", res.body);

    let res = app
        .request(
            "GET",
            &format!("/api/deliverables/{deliverable}/phases"),
            None,
            Some(&app.client),
        )
        .await;
    assert!(res.data().as_array().unwrap().is_empty());

    app.finish().await;
}
