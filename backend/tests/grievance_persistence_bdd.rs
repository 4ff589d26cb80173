//! Behavioural tests for restoring the grievance store from its JSON snapshot.

use std::sync::Arc;

use grievance_backend::domain::ports::{GrievanceCommand, GrievanceQuery};
use grievance_backend::domain::{
    GrievanceDraft, GrievanceId, GrievanceSnapshot, GrievanceStatus, GrievanceStore, StatusUpdate,
};
use grievance_backend::outbound::persistence::JsonSnapshotRepository;
use grievance_backend::test_support::snapshot_dir::SnapshotDir;
use mockable::{Clock, DefaultClock};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use serde_json::json;
use tokio::runtime::Runtime;

struct PersistenceWorld {
    runtime: Runtime,
    dir: SnapshotDir,
    store: Option<GrievanceStore<JsonSnapshotRepository>>,
    last_id: Option<GrievanceId>,
}

impl PersistenceWorld {
    fn open_store(&self) -> GrievanceStore<JsonSnapshotRepository> {
        let repository = Arc::new(JsonSnapshotRepository::new(self.dir.snapshot_path()));
        let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
        self.runtime.block_on(GrievanceStore::open(repository, clock))
    }

    /// Runtime plus the current store, opening the store on first use.
    fn parts(&mut self) -> (&Runtime, &GrievanceStore<JsonSnapshotRepository>) {
        if self.store.is_none() {
            self.store = Some(self.open_store());
        }
        let store = self.store.as_ref().expect("store opened above");
        (&self.runtime, store)
    }
}

#[fixture]
fn world() -> PersistenceWorld {
    PersistenceWorld {
        runtime: Runtime::new().expect("create tokio runtime"),
        dir: SnapshotDir::new().expect("create snapshot dir"),
        store: None,
        last_id: None,
    }
}

#[given("an empty snapshot directory")]
fn an_empty_snapshot_directory(world: &mut PersistenceWorld) {
    assert!(world.dir.read_snapshot().is_err(), "no snapshot yet");
}

#[given("a snapshot file that is not valid JSON")]
fn a_snapshot_file_that_is_not_valid_json(world: &mut PersistenceWorld) {
    world
        .dir
        .write_snapshot("{\"grievances\": [")
        .expect("write corrupt snapshot");
}

#[when("{count} grievances are submitted")]
fn grievances_are_submitted(world: &mut PersistenceWorld, count: usize) {
    for index in 0..count {
        let draft = GrievanceDraft {
            user_id: Some("USER123".to_owned()),
            company: Some(format!("Company {index}").into()),
            grievance: Some("Refund not processed".into()),
            ..GrievanceDraft::default()
        };
        let (runtime, store) = world.parts();
        let record = runtime
            .block_on(store.submit(draft))
            .expect("submit succeeds");
        world.last_id = Some(record.id);
    }
}

#[when("the last grievance is marked completed")]
fn the_last_grievance_is_marked_completed(world: &mut PersistenceWorld) {
    let grievance_id = world.last_id.clone().expect("a grievance was submitted");
    let update = StatusUpdate {
        grievance_id,
        status: GrievanceStatus::new("completed"),
        submission_data: json!({"reference": "NCH-42"}),
    };
    let (runtime, store) = world.parts();
    let updated = runtime
        .block_on(store.update_status(update))
        .expect("update succeeds");
    assert!(updated.is_some(), "known grievance is updated");
}

#[when("the service restarts")]
fn the_service_restarts(world: &mut PersistenceWorld) {
    world.store = Some(world.open_store());
}

#[then("the last identifier is {expected}")]
fn the_last_identifier_is(world: &mut PersistenceWorld, expected: String) {
    let last_id = world.last_id.as_ref().expect("a grievance was submitted");
    assert_eq!(last_id.as_str(), expected);
}

#[then("the snapshot file lists {count} grievances")]
fn the_snapshot_file_lists_grievances(world: &mut PersistenceWorld, count: usize) {
    let contents = world.dir.read_snapshot().expect("read snapshot");
    let snapshot: GrievanceSnapshot = serde_json::from_str(&contents).expect("valid snapshot");
    assert_eq!(snapshot.grievances.len(), count);
    assert_eq!(snapshot.counter, count as u64 + 1);
}

#[then("no pending grievance remains")]
fn no_pending_grievance_remains(world: &mut PersistenceWorld) {
    let (runtime, store) = world.parts();
    let latest = runtime
        .block_on(store.latest_pending())
        .expect("query succeeds");
    assert!(latest.is_none());
    let stats = runtime.block_on(store.stats()).expect("stats succeed");
    assert_eq!((stats.total, stats.pending), (1, 0));
}

#[scenario(
    path = "tests/features/grievance_persistence.feature",
    name = "Identifiers continue after a restart"
)]
fn identifiers_continue_after_a_restart(world: PersistenceWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/grievance_persistence.feature",
    name = "A corrupt snapshot starts an empty store"
)]
fn a_corrupt_snapshot_starts_an_empty_store(world: PersistenceWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/grievance_persistence.feature",
    name = "Status updates survive a restart"
)]
fn status_updates_survive_a_restart(world: PersistenceWorld) {
    drop(world);
}
