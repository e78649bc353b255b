use std::sync::Arc;

use chrono::{Duration, Utc};

use studioflow_core::error::ErrorKind;
use studioflow_core::types::{UserId, VersionId};
use studioflow_entity::deliverable::{AcceptanceStatus, DeliverableStatus};
use studioflow_entity::feedback::FeedbackType;
use studioflow_entity::notification::{NewNotification, NotificationKind};
use studioflow_entity::version::VersionStatus;
use studioflow_entity::workflow::PhaseAssignee;

use super::MemoryStore;
use crate::store::{
    NewDeliverable, NewFeedback, NewProject, NewVersion, NewWorkflowPhase, PhaseChanges, Stores,
};

async fn seeded() -> (Stores, studioflow_entity::deliverable::Deliverable) {
    let stores = Stores::memory(Arc::new(MemoryStore::new()));
    let project = stores
        .projects
        .create(NewProject {
            title: "Launch film".into(),
            description: None,
            client_id: UserId::new(),
            talent_id: None,
            brief: serde_json::json!({}),
            deadline: None,
        })
        .await
        .unwrap();
    let deliverable = stores
        .deliverables
        .create(NewDeliverable {
            project_id: project.id,
            title: "Hero cut".into(),
            kind: "VIDEO".into(),
            deadline: None,
        })
        .await
        .unwrap();
    (stores, deliverable)
}

fn new_version(deliverable: studioflow_core::types::DeliverableId, url: &str) -> NewVersion {
    NewVersion {
        deliverable_id: deliverable,
        uploaded_by_id: UserId::new(),
        video_url: url.into(),
        description: None,
        status: VersionStatus::NeedsReview,
    }
}

#[tokio::test]
async fn test_concurrent_versions_are_gap_free() {
    let (stores, deliverable) = seeded().await;

    let handles: Vec<_> = (0..32)
        .map(|i| {
            let versions = stores.versions.clone();
            let id = deliverable.id;
            tokio::spawn(async move {
                versions
                    .create_version(new_version(id, &format!("https://cdn/v{i}.mp4")))
                    .await
            })
        })
        .collect();

    let mut numbers: Vec<i32> = futures::future::join_all(handles)
        .await
        .into_iter()
        .map(|r| r.unwrap().unwrap().version_number)
        .collect();
    numbers.sort_unstable();
    assert_eq!(numbers, (1..=32).collect::<Vec<_>>());

    let d = stores
        .deliverables
        .find_by_id(deliverable.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(d.version_counter, 32);
    assert_eq!(d.status, DeliverableStatus::Review);
}

#[tokio::test]
async fn test_feedback_on_missing_version_writes_nothing() {
    let (stores, _) = seeded().await;
    let missing = VersionId::new();

    let err = stores
        .feedback
        .create_feedback(NewFeedback {
            version_id: missing,
            author_id: UserId::new(),
            raw_text: "too long".into(),
            structured_text: None,
            kind: FeedbackType::Text,
            tasks: vec!["cut".into()],
        })
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::NotFound);
    assert!(stores.feedback.list_by_version(missing).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_reject_only_applies_to_current_assignee() {
    let (stores, deliverable) = seeded().await;
    let talent = UserId::new();
    stores
        .deliverables
        .assign_talent(deliverable.id, Some(talent))
        .await
        .unwrap();

    let stranger = stores
        .deliverables
        .reject_assignment(deliverable.id, UserId::new())
        .await
        .unwrap();
    assert!(stranger.is_none());

    let rejected = stores
        .deliverables
        .reject_assignment(deliverable.id, talent)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(rejected.assigned_talent_id, None);
    assert_eq!(rejected.acceptance_status, Some(AcceptanceStatus::Rejected));
}

#[tokio::test]
async fn test_room_members_are_distinct() {
    let (stores, deliverable) = seeded().await;
    let user = UserId::new();
    stores.rooms.record_member(deliverable.project_id, user).await.unwrap();
    stores.rooms.record_member(deliverable.project_id, user).await.unwrap();

    assert_eq!(
        stores.rooms.members(deliverable.project_id).await.unwrap(),
        vec![user]
    );
}

#[tokio::test]
async fn test_retention_only_removes_read_rows() {
    let (stores, _) = seeded().await;
    let user = UserId::new();
    let row = |title: &str| NewNotification {
        user_id: user,
        kind: NotificationKind::VersionUploaded,
        title: title.into(),
        message: String::new(),
        link: None,
    };
    let created = stores
        .notifications
        .create_many(vec![row("read"), row("unread")])
        .await
        .unwrap();
    stores
        .notifications
        .mark_read(created[0].id, user)
        .await
        .unwrap();

    let removed = stores
        .notifications
        .delete_read_before(Utc::now() + Duration::seconds(1))
        .await
        .unwrap();

    assert_eq!(removed, 1);
    assert_eq!(stores.notifications.count_unread(user).await.unwrap(), 1);
}

#[tokio::test]
async fn test_deleted_version_number_is_not_reissued() {
    let (stores, deliverable) = seeded().await;
    let first = stores
        .versions
        .create_version(new_version(deliverable.id, "https://cdn/v1.mp4"))
        .await
        .unwrap();
    stores
        .feedback
        .create_feedback(NewFeedback {
            version_id: first.id,
            author_id: UserId::new(),
            raw_text: "darker grade".into(),
            structured_text: None,
            kind: FeedbackType::Text,
            tasks: vec!["regrade".into()],
        })
        .await
        .unwrap();

    assert!(stores.versions.delete(first.id).await.unwrap());
    assert!(!stores.versions.delete(first.id).await.unwrap());
    assert!(stores.feedback.list_by_version(first.id).await.unwrap().is_empty());

    let second = stores
        .versions
        .create_version(new_version(deliverable.id, "https://cdn/v2.mp4"))
        .await
        .unwrap();
    assert_eq!(second.version_number, 2);
}

#[tokio::test]
async fn test_phase_delete_takes_its_tasks() {
    let (stores, deliverable) = seeded().await;
    let phase = stores
        .workflow
        .create_phase(NewWorkflowPhase {
            deliverable_id: deliverable.id,
            name: "Edit".into(),
            order_index: 0,
            assigned_to: PhaseAssignee::Talent,
            tasks: vec!["rough cut".into(), "fine cut".into()],
        })
        .await
        .unwrap();

    let renamed = stores
        .workflow
        .update_phase(
            phase.phase.id,
            PhaseChanges {
                name: Some("Offline edit".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(renamed.name, "Offline edit");
    assert_eq!(renamed.assigned_to, PhaseAssignee::Talent);

    let task_id = phase.tasks[0].id;
    assert!(stores.workflow.delete_phase(phase.phase.id).await.unwrap());
    assert!(stores.workflow.find_task(task_id).await.unwrap().is_none());
    assert!(stores.workflow.list_phases(deliverable.id).await.unwrap().is_empty());
}
