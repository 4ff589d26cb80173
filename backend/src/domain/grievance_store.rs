//! In-memory grievance store implementing the driving ports.
//!
//! The store owns the collection and the identifier counter. Mutations are
//! serialised by an async writer lock held across mutate-then-persist, while
//! the collection itself sits behind a short-lived `RwLock` so readers only
//! ever wait for the in-memory push or update, never for the disk.
//!
//! Records are built and updated only while the write guard is held, so a
//! reader observes either the old or the new state of a record.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use mockable::Clock;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::domain::grievance_queries::{
    filter_sorted, latest_pending, latest_pending_for_user, stats,
};
use crate::domain::ports::{GrievanceCommand, GrievanceQuery, GrievanceSnapshotRepository};
use crate::domain::{
    Error, GrievanceDraft, GrievanceFilter, GrievanceId, GrievanceRecord, GrievanceSnapshot,
    GrievanceStats, StatusUpdate, Timestamp,
};

#[derive(Debug)]
struct StoreState {
    grievances: Vec<GrievanceRecord>,
    counter: u64,
}

impl StoreState {
    fn from_snapshot(snapshot: GrievanceSnapshot) -> Self {
        let counter = snapshot.next_sequence();
        Self {
            grievances: snapshot.grievances,
            counter,
        }
    }

    fn to_snapshot(&self) -> GrievanceSnapshot {
        GrievanceSnapshot {
            grievances: self.grievances.clone(),
            counter: self.counter,
        }
    }
}

/// Authoritative grievance collection backed by a snapshot repository.
///
/// Construct one per process with [`GrievanceStore::open`] and share it
/// behind an `Arc`; it implements both [`GrievanceCommand`] and
/// [`GrievanceQuery`].
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use grievance_backend::domain::ports::{FixtureGrievanceSnapshotRepository, GrievanceCommand};
/// use grievance_backend::domain::{GrievanceDraft, GrievanceStore};
/// use mockable::DefaultClock;
///
/// # tokio::runtime::Runtime::new().expect("runtime").block_on(async {
/// let store = GrievanceStore::open(
///     Arc::new(FixtureGrievanceSnapshotRepository::default()),
///     Arc::new(DefaultClock),
/// )
/// .await;
/// let record = store.submit(GrievanceDraft::default()).await.expect("submit");
/// assert_eq!(record.id.as_str(), "GRV_0001");
/// # });
/// ```
pub struct GrievanceStore<R> {
    state: RwLock<StoreState>,
    writer: Mutex<()>,
    snapshots: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> GrievanceStore<R>
where
    R: GrievanceSnapshotRepository,
{
    /// Load the persisted snapshot and build the store around it.
    ///
    /// A missing snapshot starts an empty store. A snapshot that cannot be
    /// read or decoded is logged and also starts an empty store; startup
    /// never fails because of persistence.
    pub async fn open(snapshots: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        let snapshot = match snapshots.load().await {
            Ok(Some(snapshot)) => snapshot,
            Ok(None) => {
                info!("no grievance snapshot found; starting empty");
                GrievanceSnapshot::default()
            }
            Err(err) => {
                warn!(error = %err, "failed to load grievance snapshot; starting empty");
                GrievanceSnapshot::default()
            }
        };
        let state = StoreState::from_snapshot(snapshot);
        info!(
            grievances = state.grievances.len(),
            counter = state.counter,
            "grievance store opened"
        );
        Self {
            state: RwLock::new(state),
            writer: Mutex::new(()),
            snapshots,
            clock,
        }
    }

    /// Consistent copy of the collection and counter.
    pub fn snapshot(&self) -> GrievanceSnapshot {
        self.read_state().to_snapshot()
    }

    fn read_state(&self) -> RwLockReadGuard<'_, StoreState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, StoreState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn now(&self) -> Timestamp {
        Timestamp::from_datetime(self.clock.utc())
    }

    async fn persist(&self, snapshot: GrievanceSnapshot) {
        if let Err(err) = self.snapshots.save(&snapshot).await {
            error!(
                error = %err,
                grievances = snapshot.grievances.len(),
                counter = snapshot.counter,
                "failed to persist grievance snapshot; in-memory state kept"
            );
        }
    }
}

#[async_trait]
impl<R> GrievanceCommand for GrievanceStore<R>
where
    R: GrievanceSnapshotRepository,
{
    async fn submit(&self, draft: GrievanceDraft) -> Result<GrievanceRecord, Error> {
        let _writer = self.writer.lock().await;
        let now = self.now();
        let (record, snapshot) = {
            let mut state = self.write_state();
            let record =
                GrievanceRecord::from_draft(GrievanceId::from_sequence(state.counter), draft, now);
            state.grievances.push(record.clone());
            state.counter = state.counter.saturating_add(1);
            (record, state.to_snapshot())
        };
        info!(
            grievance_id = %record.id,
            user_id = %record.user_id,
            "grievance submitted"
        );
        self.persist(snapshot).await;
        Ok(record)
    }

    async fn update_status(&self, update: StatusUpdate) -> Result<Option<GrievanceRecord>, Error> {
        let _writer = self.writer.lock().await;
        let now = self.now();
        let StatusUpdate {
            grievance_id,
            status,
            submission_data,
        } = update;
        let outcome = {
            let mut state = self.write_state();
            let found = state
                .grievances
                .iter_mut()
                .find(|record| record.id == grievance_id);
            match found {
                Some(record) => {
                    record.apply_status(status, submission_data, now);
                    let updated = record.clone();
                    Some((updated, state.to_snapshot()))
                }
                None => None,
            }
        };
        let Some((record, snapshot)) = outcome else {
            info!(grievance_id = %grievance_id, "status update for unknown grievance");
            return Ok(None);
        };
        info!(
            grievance_id = %record.id,
            status = record.status.as_str(),
            "grievance status updated"
        );
        self.persist(snapshot).await;
        Ok(Some(record))
    }
}

#[async_trait]
impl<R> GrievanceQuery for GrievanceStore<R>
where
    R: GrievanceSnapshotRepository,
{
    async fn latest_pending(&self) -> Result<Option<GrievanceRecord>, Error> {
        Ok(latest_pending(&self.read_state().grievances).cloned())
    }

    async fn latest_pending_for_user(
        &self,
        user_id: &str,
    ) -> Result<Option<GrievanceRecord>, Error> {
        Ok(latest_pending_for_user(&self.read_state().grievances, user_id).cloned())
    }

    async fn list(&self, filter: GrievanceFilter) -> Result<Vec<GrievanceRecord>, Error> {
        Ok(filter_sorted(&self.read_state().grievances, &filter))
    }

    async fn stats(&self) -> Result<GrievanceStats, Error> {
        Ok(stats(&self.read_state().grievances))
    }
}

#[cfg(test)]
#[path = "grievance_store_tests.rs"]
mod tests;
