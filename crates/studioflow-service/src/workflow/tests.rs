use std::collections::BTreeSet;

use studioflow_core::error::ErrorKind;
use studioflow_core::events::WorkflowEvent;
use studioflow_core::types::{UserId, VersionId};
use studioflow_entity::deliverable::{AcceptanceStatus, DeliverableStatus};
use studioflow_entity::user::UserRole;
use studioflow_entity::version::VersionStatus;
use studioflow_entity::workflow::PhaseAssignee;

use crate::context::RequestContext;
use crate::testing::Harness;

use super::{
    AddFeedbackRequest, AddVersionRequest, CreatePhaseRequest, UpdatePhaseRequest,
    UpdateVersionRequest,
};

fn upload(url: &str) -> AddVersionRequest {
    AddVersionRequest {
        video_url: url.into(),
        description: None,
    }
}

fn feedback(text: &str, tasks: &[&str]) -> AddFeedbackRequest {
    AddFeedbackRequest {
        raw_text: text.into(),
        structured_text: None,
        kind: Default::default(),
        tasks: tasks.iter().map(|t| t.to_string()).collect(),
    }
}

#[tokio::test]
async fn test_assign_then_accept() {
    let h = Harness::new().await;
    let d = h.deliverable().await;
    h.sink.take();

    let assigned = h
        .workflow
        .assign_talent(&h.client_ctx(), d.id, Some(h.talent))
        .await
        .unwrap();
    assert_eq!(assigned.acceptance_status, Some(AcceptanceStatus::Pending));
    let events = h.sink.take();
    assert_eq!(events.len(), 1);
    assert!(matches!(
        events[0].payload,
        WorkflowEvent::TalentAssigned { talent_id, .. } if talent_id == h.talent
    ));

    let accepted = h
        .workflow
        .accept_assignment(&h.talent_ctx(), d.id)
        .await
        .unwrap();
    assert_eq!(accepted.acceptance_status, Some(AcceptanceStatus::Accepted));
    let events = h.sink.take();
    assert!(matches!(
        events[0].payload,
        WorkflowEvent::AssignmentAccepted { client_id, .. } if client_id == h.client
    ));
}

#[tokio::test]
async fn test_reaccept_is_silent_noop() {
    let h = Harness::new().await;
    let d = h.assigned_deliverable().await;
    h.workflow
        .accept_assignment(&h.talent_ctx(), d.id)
        .await
        .unwrap();
    h.sink.take();

    let again = h
        .workflow
        .accept_assignment(&h.talent_ctx(), d.id)
        .await
        .unwrap();
    assert_eq!(again.acceptance_status, Some(AcceptanceStatus::Accepted));
    assert!(h.sink.take().is_empty());
}

#[tokio::test]
async fn test_unassign_emits_nothing() {
    let h = Harness::new().await;
    let d = h.assigned_deliverable().await;
    let cleared = h
        .workflow
        .assign_talent(&h.client_ctx(), d.id, None)
        .await
        .unwrap();
    assert_eq!(cleared.assigned_talent_id, None);
    assert_eq!(cleared.acceptance_status, None);
    assert!(h.sink.take().is_empty());
}

#[tokio::test]
async fn test_only_assignee_can_accept_or_reject() {
    let h = Harness::new().await;
    let d = h.assigned_deliverable().await;
    let other = RequestContext::new(UserId::new(), UserRole::Talent);

    let err = h.workflow.accept_assignment(&other, d.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Forbidden);
    let err = h
        .workflow
        .reject_assignment(&other, d.id, None)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Forbidden);
}

#[tokio::test]
async fn test_reject_then_reassign_resets_to_pending() {
    let h = Harness::new().await;
    let d = h.assigned_deliverable().await;

    let rejected = h
        .workflow
        .reject_assignment(&h.talent_ctx(), d.id, Some("  booked that week ".into()))
        .await
        .unwrap();
    assert_eq!(rejected.assigned_talent_id, None);
    assert_eq!(rejected.acceptance_status, Some(AcceptanceStatus::Rejected));
    let events = h.sink.take();
    assert!(matches!(
        &events[0].payload,
        WorkflowEvent::AssignmentRejected { reason: Some(r), .. } if r == "booked that week"
    ));

    let next = h.user(UserRole::Talent).await;
    let reassigned = h
        .workflow
        .assign_talent(&h.client_ctx(), d.id, Some(next))
        .await
        .unwrap();
    assert_eq!(reassigned.assigned_talent_id, Some(next));
    assert_eq!(reassigned.acceptance_status, Some(AcceptanceStatus::Pending));
}

#[tokio::test]
async fn test_talent_cannot_assign() {
    let h = Harness::new().await;
    let d = h.deliverable().await;
    let err = h
        .workflow
        .assign_talent(&h.talent_ctx(), d.id, Some(h.talent))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Forbidden);
}

#[tokio::test]
async fn test_assign_missing_deliverable_is_not_found() {
    let h = Harness::new().await;
    let err = h
        .workflow
        .assign_talent(&h.client_ctx(), Default::default(), Some(h.talent))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_two_versions_are_numbered_in_sequence() {
    let h = Harness::new().await;
    let d = h.assigned_deliverable().await;

    let v1 = h
        .workflow
        .add_version(&h.talent_ctx(), d.id, upload("https://cdn/v1.mp4"))
        .await
        .unwrap();
    let v2 = h
        .workflow
        .add_version(&h.talent_ctx(), d.id, upload("https://cdn/v2.mp4"))
        .await
        .unwrap();

    assert_eq!(v1.version_number, 1);
    assert_eq!(v2.version_number, 2);
    assert_eq!(v1.status, VersionStatus::NeedsReview);

    let d = h.stores.deliverables.find_by_id(d.id).await.unwrap().unwrap();
    assert_eq!(d.status, DeliverableStatus::Review);

    let events = h.sink.take();
    assert_eq!(events.len(), 2);
    assert!(matches!(
        events[1].payload,
        WorkflowEvent::VersionUploaded { version_number: 2, client_id, .. } if client_id == h.client
    ));
}

#[tokio::test]
async fn test_concurrent_uploads_have_no_gaps_or_duplicates() {
    let h = Harness::new().await;
    let d = h.assigned_deliverable().await;
    let ctx = h.talent_ctx();
    let id = d.id;

    let uploads = (0..16).map(|i| {
        let workflow = h.workflow.clone();
        tokio::spawn(async move {
            workflow
                .add_version(&ctx, id, upload(&format!("https://cdn/{i}.mp4")))
                .await
                .unwrap()
                .version_number
        })
    });
    let numbers: BTreeSet<i32> = futures::future::join_all(uploads)
        .await
        .into_iter()
        .map(|r| r.unwrap())
        .collect();

    assert_eq!(numbers, (1..=16).collect());
}

#[tokio::test]
async fn test_empty_video_url_is_rejected() {
    let h = Harness::new().await;
    let d = h.assigned_deliverable().await;
    let err = h
        .workflow
        .add_version(&h.talent_ctx(), d.id, upload("   "))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
}

#[tokio::test]
async fn test_version_status_events_follow_assignment() {
    let h = Harness::new().await;
    let d = h.assigned_deliverable().await;
    let v = h
        .workflow
        .add_version(&h.talent_ctx(), d.id, upload("https://cdn/v1.mp4"))
        .await
        .unwrap();
    h.sink.take();

    h.workflow
        .set_version_status(&h.client_ctx(), v.id, "APPROVED")
        .await
        .unwrap();
    let events = h.sink.take();
    assert!(matches!(
        events[0].payload,
        WorkflowEvent::VersionApproved { talent_id, .. } if talent_id == h.talent
    ));

    // Any status is reachable from any other.
    let back = h
        .workflow
        .set_version_status(&h.client_ctx(), v.id, "PROCESSING")
        .await
        .unwrap();
    assert_eq!(back.status, VersionStatus::Processing);
    assert!(h.sink.take().is_empty());

    h.workflow
        .assign_talent(&h.client_ctx(), d.id, None)
        .await
        .unwrap();
    h.workflow
        .set_version_status(&h.client_ctx(), v.id, "CHANGES_REQUESTED")
        .await
        .unwrap();
    assert!(h.sink.take().is_empty());
}

#[tokio::test]
async fn test_malformed_version_status_is_invalid_transition() {
    let h = Harness::new().await;
    let err = h
        .workflow
        .set_version_status(&h.client_ctx(), VersionId::new(), "DONE")
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidTransition);
}

#[tokio::test]
async fn test_feedback_creates_tasks_and_requests_changes() {
    let h = Harness::new().await;
    let d = h.assigned_deliverable().await;
    let v = h
        .workflow
        .add_version(&h.talent_ctx(), d.id, upload("https://cdn/v1.mp4"))
        .await
        .unwrap();
    h.sink.take();

    let created = h
        .workflow
        .add_feedback(&h.client_ctx(), v.id, feedback("fix intro", &["trim 3s"]))
        .await
        .unwrap();
    assert_eq!(created.tasks.len(), 1);
    assert!(!created.tasks[0].completed);

    let v = h.stores.versions.find_by_id(v.id).await.unwrap().unwrap();
    assert_eq!(v.status, VersionStatus::ChangesRequested);

    let events = h.sink.take();
    assert!(matches!(
        events[0].payload,
        WorkflowEvent::FeedbackReceived { talent_id, .. } if talent_id == h.talent
    ));

    let toggled = h
        .workflow
        .toggle_revision_task(&h.talent_ctx(), created.tasks[0].id)
        .await
        .unwrap();
    assert!(toggled.completed);
    assert!(h.sink.take().is_empty());
}

#[tokio::test]
async fn test_talent_feedback_does_not_notify_self() {
    let h = Harness::new().await;
    let d = h.assigned_deliverable().await;
    let v = h
        .workflow
        .add_version(&h.talent_ctx(), d.id, upload("https://cdn/v1.mp4"))
        .await
        .unwrap();
    h.sink.take();

    h.workflow
        .add_feedback(&h.talent_ctx(), v.id, feedback("note to self", &[]))
        .await
        .unwrap();
    assert!(h.sink.take().is_empty());
}

#[tokio::test]
async fn test_only_author_or_admin_deletes_feedback() {
    let h = Harness::new().await;
    let d = h.assigned_deliverable().await;
    let v = h
        .workflow
        .add_version(&h.talent_ctx(), d.id, upload("https://cdn/v1.mp4"))
        .await
        .unwrap();
    let created = h
        .workflow
        .add_feedback(&h.client_ctx(), v.id, feedback("tighten pacing", &[]))
        .await
        .unwrap();

    let err = h
        .workflow
        .delete_feedback(&h.talent_ctx(), created.feedback.id)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Forbidden);

    h.workflow
        .delete_feedback(&h.client_ctx(), created.feedback.id)
        .await
        .unwrap();
    assert!(
        h.workflow
            .list_feedback(&h.client_ctx(), v.id)
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn test_phases_list_in_order_with_tasks() {
    let h = Harness::new().await;
    let d = h.assigned_deliverable().await;

    for (i, name) in ["Script", "Shoot"].iter().enumerate() {
        h.workflow
            .create_workflow_phase(
                &h.client_ctx(),
                d.id,
                CreatePhaseRequest {
                    name: name.to_string(),
                    order_index: i as i32,
                    assigned_to: PhaseAssignee::Talent,
                    tasks: vec!["Draft".into(), "Approve".into()],
                },
            )
            .await
            .unwrap();
    }

    let phases = h
        .workflow
        .list_workflow_phases(&h.talent_ctx(), d.id)
        .await
        .unwrap();
    assert_eq!(phases.len(), 2);
    assert_eq!(phases[0].phase.name, "Script");
    assert_eq!(phases[0].tasks.len(), 2);

    let task = h
        .workflow
        .toggle_workflow_task(&h.talent_ctx(), phases[1].tasks[0].id)
        .await
        .unwrap();
    assert!(task.completed);
}

#[tokio::test]
async fn test_assign_requires_an_existing_talent() {
    let h = Harness::new().await;
    let d = h.deliverable().await;

    let err = h
        .workflow
        .assign_talent(&h.client_ctx(), d.id, Some(UserId::new()))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);

    let other_client = h.user(UserRole::Client).await;
    let err = h
        .workflow
        .assign_talent(&h.client_ctx(), d.id, Some(other_client))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    let d = h.stores.deliverables.find_by_id(d.id).await.unwrap().unwrap();
    assert_eq!(d.assigned_talent_id, None);
    assert_eq!(d.acceptance_status, None);
    assert!(h.sink.take().is_empty());
}

#[tokio::test]
async fn test_outsiders_cannot_touch_revision_tasks() {
    let h = Harness::new().await;
    let d = h.assigned_deliverable().await;
    let v = h
        .workflow
        .add_version(&h.talent_ctx(), d.id, upload("https://cdn/v1.mp4"))
        .await
        .unwrap();
    let created = h
        .workflow
        .add_feedback(&h.client_ctx(), v.id, feedback("fix intro", &["trim 3s"]))
        .await
        .unwrap();
    let task_id = created.tasks[0].id;
    let stranger = h.stranger_ctx().await;

    let err = h
        .workflow
        .toggle_revision_task(&stranger, task_id)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Forbidden);
    let err = h
        .workflow
        .add_revision_task(&stranger, created.feedback.id, "add logo")
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Forbidden);
    let err = h
        .workflow
        .delete_revision_task(&stranger, task_id)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Forbidden);

    // The assignee works the tasks but cannot delete the client's.
    let err = h
        .workflow
        .delete_revision_task(&h.talent_ctx(), task_id)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Forbidden);

    let task = h.stores.feedback.find_task(task_id).await.unwrap().unwrap();
    assert!(!task.completed);
    let entry = h
        .stores
        .feedback
        .find_by_id(created.feedback.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(entry.tasks.len(), 1);

    h.workflow
        .delete_revision_task(&h.client_ctx(), task_id)
        .await
        .unwrap();
    let err = h
        .workflow
        .toggle_revision_task(&h.client_ctx(), task_id)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_outsiders_cannot_toggle_workflow_tasks() {
    let h = Harness::new().await;
    let d = h.assigned_deliverable().await;
    let phase = h
        .workflow
        .create_workflow_phase(
            &h.client_ctx(),
            d.id,
            CreatePhaseRequest {
                name: "Edit".into(),
                order_index: 0,
                assigned_to: PhaseAssignee::Talent,
                tasks: vec!["Rough cut".into()],
            },
        )
        .await
        .unwrap();
    let task_id = phase.tasks[0].id;
    let stranger = h.stranger_ctx().await;

    let err = h
        .workflow
        .toggle_workflow_task(&stranger, task_id)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Forbidden);
    let err = h
        .workflow
        .update_workflow_task(&stranger, task_id, "Mine now")
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Forbidden);

    let task = h.stores.workflow.find_task(task_id).await.unwrap().unwrap();
    assert!(!task.completed);
    assert_eq!(task.title, "Rough cut");
}

#[tokio::test]
async fn test_version_edit_and_delete() {
    let h = Harness::new().await;
    let d = h.assigned_deliverable().await;
    let v1 = h
        .workflow
        .add_version(&h.talent_ctx(), d.id, upload("https://cdn/v1.mp4"))
        .await
        .unwrap();

    let edited = h
        .workflow
        .update_version(
            &h.talent_ctx(),
            v1.id,
            UpdateVersionRequest {
                video_url: Some(" https://cdn/v1-fixed.mp4 ".into()),
                description: Some("audio fixed".into()),
            },
        )
        .await
        .unwrap();
    assert_eq!(edited.video_url, "https://cdn/v1-fixed.mp4");
    assert_eq!(edited.version_number, 1);
    assert_eq!(edited.status, VersionStatus::NeedsReview);

    let stranger = h.stranger_ctx().await;
    let err = h
        .workflow
        .delete_version(&stranger, v1.id)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Forbidden);

    h.workflow.delete_version(&h.client_ctx(), v1.id).await.unwrap();
    let v2 = h
        .workflow
        .add_version(&h.talent_ctx(), d.id, upload("https://cdn/v2.mp4"))
        .await
        .unwrap();
    assert_eq!(v2.version_number, 2);

    let listed = h.workflow.list_versions(&h.client_ctx(), d.id).await.unwrap();
    assert_eq!(listed.len(), 1);
}

#[tokio::test]
async fn test_phase_and_task_management() {
    let h = Harness::new().await;
    let d = h.assigned_deliverable().await;
    let phase = h
        .workflow
        .create_workflow_phase(
            &h.client_ctx(),
            d.id,
            CreatePhaseRequest {
                name: "Shoot".into(),
                order_index: 1,
                assigned_to: PhaseAssignee::Talent,
                tasks: vec!["Call sheet".into(), "B-roll".into()],
            },
        )
        .await
        .unwrap();

    let err = h
        .workflow
        .update_workflow_phase(
            &h.talent_ctx(),
            phase.phase.id,
            UpdatePhaseRequest {
                name: Some("Pickup shoot".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Forbidden);

    let updated = h
        .workflow
        .update_workflow_phase(
            &h.client_ctx(),
            phase.phase.id,
            UpdatePhaseRequest {
                order_index: Some(0),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.order_index, 0);
    assert_eq!(updated.name, "Shoot");

    let renamed = h
        .workflow
        .update_workflow_task(&h.talent_ctx(), phase.tasks[0].id, "Call sheet v2")
        .await
        .unwrap();
    assert_eq!(renamed.title, "Call sheet v2");

    let err = h
        .workflow
        .delete_workflow_task(&h.talent_ctx(), phase.tasks[1].id)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Forbidden);
    h.workflow
        .delete_workflow_task(&h.client_ctx(), phase.tasks[1].id)
        .await
        .unwrap();

    let phases = h
        .workflow
        .list_workflow_phases(&h.client_ctx(), d.id)
        .await
        .unwrap();
    assert_eq!(phases[0].tasks.len(), 1);

    h.workflow
        .delete_workflow_phase(&h.client_ctx(), phase.phase.id)
        .await
        .unwrap();
    assert!(
        h.workflow
            .list_workflow_phases(&h.client_ctx(), d.id)
            .await
            .unwrap()
            .is_empty()
    );
    assert!(h.sink.take().is_empty());
}
