//! Tests for the grievance store.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{TimeDelta, TimeZone, Utc};
use rstest::{fixture, rstest};
use serde_json::json;

use super::*;
use crate::domain::GrievanceStatus;
use crate::domain::ports::{
    FixtureGrievanceSnapshotRepository, MockGrievanceSnapshotRepository, SnapshotRepositoryError,
};
use crate::test_support::SteppingClock;

#[fixture]
fn clock() -> Arc<dyn Clock> {
    let start = Utc
        .with_ymd_and_hms(2026, 10, 17, 9, 0, 0)
        .single()
        .expect("valid fixture instant");
    Arc::new(SteppingClock::new(start, TimeDelta::milliseconds(250)))
}

fn draft_for(user_id: &str) -> GrievanceDraft {
    GrievanceDraft {
        user_id: Some(user_id.to_owned()),
        company: Some("ABC Electronics".into()),
        grievance: Some("Refund not processed".into()),
        ..GrievanceDraft::default()
    }
}

fn update(id: &str, status: &str) -> StatusUpdate {
    StatusUpdate {
        grievance_id: GrievanceId::new(id),
        status: GrievanceStatus::new(status),
        submission_data: json!({"reference": "NCH-1"}),
    }
}

async fn open_fixture_store(
    repo: Arc<FixtureGrievanceSnapshotRepository>,
    clock: Arc<dyn Clock>,
) -> GrievanceStore<FixtureGrievanceSnapshotRepository> {
    GrievanceStore::open(repo, clock).await
}

#[rstest]
#[tokio::test]
async fn submissions_receive_consecutive_ids(clock: Arc<dyn Clock>) {
    let repo = Arc::new(FixtureGrievanceSnapshotRepository::default());
    let store = open_fixture_store(repo.clone(), clock).await;

    let mut ids = Vec::new();
    for _ in 0..3 {
        let record = store.submit(draft_for("U1")).await.expect("submit");
        ids.push(record.id.as_str().to_owned());
    }

    assert_eq!(ids, ["GRV_0001", "GRV_0002", "GRV_0003"]);
    let saved = repo.stored().expect("snapshot saved");
    assert_eq!(saved.counter, 4);
    assert_eq!(saved.grievances.len(), 3);
}

#[rstest]
#[tokio::test]
async fn submitted_records_start_pending_with_equal_timestamps(clock: Arc<dyn Clock>) {
    let store = open_fixture_store(Arc::default(), clock).await;

    let record = store
        .submit(GrievanceDraft::default())
        .await
        .expect("submit");

    assert!(record.is_pending());
    assert_eq!(record.user_id, crate::domain::UNKNOWN_USER_ID);
    assert_eq!(record.created_at, record.updated_at);
    assert_eq!(record.created_at.as_str(), "2026-10-17T09:00:00.000000Z");
}

#[rstest]
#[tokio::test]
async fn every_mutation_writes_a_snapshot(clock: Arc<dyn Clock>) {
    let mut repo = MockGrievanceSnapshotRepository::new();
    repo.expect_load().times(1).return_once(|| Ok(None));
    repo.expect_save()
        .withf(|snapshot| snapshot.counter == 2 && snapshot.grievances.len() == 1)
        .times(2)
        .returning(|_| Ok(()));
    let store = GrievanceStore::open(Arc::new(repo), clock).await;

    store.submit(draft_for("U1")).await.expect("submit");
    store
        .update_status(update("GRV_0001", "resolved"))
        .await
        .expect("update");
}

#[rstest]
#[tokio::test]
async fn failed_save_keeps_record_in_memory(clock: Arc<dyn Clock>) {
    let mut repo = MockGrievanceSnapshotRepository::new();
    repo.expect_load().times(1).return_once(|| Ok(None));
    repo.expect_save()
        .times(1)
        .returning(|_| Err(SnapshotRepositoryError::io("read-only filesystem")));
    let store = GrievanceStore::open(Arc::new(repo), clock).await;

    let record = store.submit(draft_for("U7")).await.expect("submit succeeds");

    let latest = store
        .latest_pending_for_user("U7")
        .await
        .expect("query")
        .expect("record retained");
    assert_eq!(latest.id, record.id);
}

#[rstest]
#[tokio::test]
async fn unreadable_snapshot_starts_empty(clock: Arc<dyn Clock>) {
    let mut repo = MockGrievanceSnapshotRepository::new();
    repo.expect_load()
        .times(1)
        .return_once(|| Err(SnapshotRepositoryError::decode("expected value")));
    repo.expect_save().returning(|_| Ok(()));
    let store = GrievanceStore::open(Arc::new(repo), clock).await;

    assert!(store.snapshot().grievances.is_empty());
    let record = store.submit(draft_for("U1")).await.expect("submit");
    assert_eq!(record.id.as_str(), "GRV_0001");
}

#[rstest]
#[tokio::test]
async fn stale_counter_is_lifted_past_loaded_ids(clock: Arc<dyn Clock>) {
    let seed_repo = Arc::new(FixtureGrievanceSnapshotRepository::default());
    let seed_store = open_fixture_store(seed_repo.clone(), clock.clone()).await;
    for _ in 0..5 {
        seed_store.submit(draft_for("U1")).await.expect("seed");
    }
    let mut stale = seed_repo.stored().expect("seeded snapshot");
    stale.counter = 2;

    let repo = Arc::new(FixtureGrievanceSnapshotRepository::with_snapshot(stale));
    let store = open_fixture_store(repo, clock).await;
    let record = store.submit(draft_for("U1")).await.expect("submit");

    assert_eq!(record.id.as_str(), "GRV_0006");
}

#[rstest]
#[tokio::test]
async fn mixed_type_snapshot_keeps_records_and_counter(clock: Arc<dyn Clock>) {
    let loaded: GrievanceSnapshot = serde_json::from_value(json!({
        "grievances": [
            {
                "id": "GRV_0001",
                "user_id": "USER123",
                "productValue": 15000,
                "status": "pending",
                "created_at": "2025-01-05T10:00:00.000000"
            },
            {
                "id": "GRV_0002",
                "user_id": null,
                "category": ["Refund", "Delay"],
                "status": null,
                "created_at": "2025-01-06T10:00:00.000000"
            }
        ],
        "counter": 3
    }))
    .expect("mixed snapshot decodes");
    let repo = Arc::new(FixtureGrievanceSnapshotRepository::with_snapshot(loaded));
    let store = open_fixture_store(repo.clone(), clock).await;

    let stats = store.stats().await.expect("stats");
    assert_eq!((stats.total, stats.pending), (2, 1));
    let latest = store
        .latest_pending()
        .await
        .expect("latest")
        .expect("one pending record");
    assert_eq!(latest.product_value, Some(json!(15000)));

    let next = store.submit(draft_for("U1")).await.expect("submit");
    assert_eq!(next.id.as_str(), "GRV_0003");
    let saved = repo.stored().expect("snapshot saved");
    assert_eq!(saved.counter, 4);
    assert_eq!(saved.grievances[1].category, Some(json!(["Refund", "Delay"])));
}

#[rstest]
#[tokio::test]
async fn reopening_restores_collection_and_counter(clock: Arc<dyn Clock>) {
    let repo = Arc::new(FixtureGrievanceSnapshotRepository::default());
    let store = open_fixture_store(repo.clone(), clock.clone()).await;
    for user in ["U1", "U2", "U3"] {
        store.submit(draft_for(user)).await.expect("submit");
    }
    let before = store.snapshot();

    let reopened = open_fixture_store(repo, clock).await;

    assert_eq!(reopened.snapshot(), before);
    let next = reopened.submit(draft_for("U4")).await.expect("submit");
    assert_eq!(next.id.as_str(), "GRV_0004");
}

#[rstest]
#[tokio::test]
async fn updating_unknown_id_changes_nothing(clock: Arc<dyn Clock>) {
    let mut repo = MockGrievanceSnapshotRepository::new();
    repo.expect_load().times(1).return_once(|| Ok(None));
    repo.expect_save().times(1).returning(|_| Ok(()));
    let store = GrievanceStore::open(Arc::new(repo), clock).await;
    store.submit(draft_for("U1")).await.expect("submit");
    let before = store.snapshot();

    let outcome = store
        .update_status(update("GRV_9999", "resolved"))
        .await
        .expect("update");

    assert!(outcome.is_none());
    assert_eq!(store.snapshot(), before);
}

#[rstest]
#[tokio::test]
async fn updating_known_id_sets_status_fields(clock: Arc<dyn Clock>) {
    let store = open_fixture_store(Arc::default(), clock).await;
    let created = store.submit(draft_for("U1")).await.expect("submit");

    let updated = store
        .update_status(update("GRV_0001", "submitted"))
        .await
        .expect("update")
        .expect("record found");

    assert_eq!(updated.status.as_str(), Some("submitted"));
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at > created.updated_at);
    assert_eq!(updated.submission_data, Some(json!({"reference": "NCH-1"})));
    assert_eq!(updated.company, created.company);
}

#[rstest]
#[tokio::test]
async fn latest_pending_ignores_later_resolved_records(clock: Arc<dyn Clock>) {
    let store = open_fixture_store(Arc::default(), clock).await;
    for _ in 0..3 {
        store.submit(draft_for("U1")).await.expect("submit");
    }
    store
        .update_status(update("GRV_0002", "resolved"))
        .await
        .expect("update");
    store
        .update_status(update("GRV_0003", "resolved"))
        .await
        .expect("update");

    let latest = store
        .latest_pending()
        .await
        .expect("query")
        .expect("pending record");
    assert_eq!(latest.id.as_str(), "GRV_0001");
}

#[rstest]
#[tokio::test]
async fn list_and_stats_reflect_updates(clock: Arc<dyn Clock>) {
    let store = open_fixture_store(Arc::default(), clock).await;
    for user in ["U1", "U2", "U1"] {
        store.submit(draft_for(user)).await.expect("submit");
    }
    store
        .update_status(update("GRV_0001", "resolved"))
        .await
        .expect("update");

    let pending_u1 = store
        .list(GrievanceFilter::new(
            Some("pending".to_owned()),
            Some("U1".to_owned()),
        ))
        .await
        .expect("list");
    let ids: Vec<&str> = pending_u1.iter().map(|record| record.id.as_str()).collect();
    assert_eq!(ids, ["GRV_0003"]);

    let counts = store.stats().await.expect("stats");
    assert_eq!(counts, GrievanceStats { total: 3, pending: 2 });
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_submissions_never_share_an_id() {
    let repo = Arc::new(FixtureGrievanceSnapshotRepository::default());
    let clock: Arc<dyn Clock> = Arc::new(mockable::DefaultClock);
    let store = Arc::new(GrievanceStore::open(repo.clone(), clock).await);

    let mut handles = Vec::new();
    for worker in 0..16 {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            store
                .submit(draft_for(&format!("U{worker}")))
                .await
                .expect("submit")
                .id
        }));
    }

    let mut ids = HashSet::new();
    for handle in handles {
        ids.insert(handle.await.expect("task joins"));
    }

    assert_eq!(ids.len(), 16);
    assert_eq!(store.snapshot().counter, 17);
    assert_eq!(repo.stored().map(|snapshot| snapshot.counter), Some(17));
}
