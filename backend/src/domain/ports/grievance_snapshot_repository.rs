//! Port for persisting the grievance collection as a single snapshot.
//!
//! The store hands the adapter its complete state after every mutation and
//! reads it back once at startup. Adapters decide where the snapshot lives;
//! the domain only relies on a save being all-or-nothing.

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use crate::domain::GrievanceSnapshot;

use super::define_port_error;

define_port_error! {
    /// Errors raised by snapshot persistence adapters.
    pub enum SnapshotRepositoryError {
        /// The backing storage could not be read or written.
        Io { message: String } => "snapshot storage failed: {message}",
        /// Stored content was not a valid snapshot document.
        Decode { message: String } => "snapshot could not be decoded: {message}",
        /// The snapshot could not be rendered for storage.
        Encode { message: String } => "snapshot could not be encoded: {message}",
    }
}

/// Whole-collection persistence for grievances.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GrievanceSnapshotRepository: Send + Sync {
    /// Read the stored snapshot.
    ///
    /// Returns `Ok(None)` when nothing has been stored yet.
    async fn load(&self) -> Result<Option<GrievanceSnapshot>, SnapshotRepositoryError>;

    /// Replace the stored snapshot with `snapshot`.
    ///
    /// Readers of the storage must observe either the previous snapshot or
    /// this one, never a partial write.
    async fn save(&self, snapshot: &GrievanceSnapshot) -> Result<(), SnapshotRepositoryError>;
}

/// In-memory repository holding the last saved snapshot.
///
/// Useful for wiring the store in tests and in the `test-support` helpers
/// without touching the filesystem.
#[derive(Debug, Default)]
pub struct FixtureGrievanceSnapshotRepository {
    stored: Mutex<Option<GrievanceSnapshot>>,
}

impl FixtureGrievanceSnapshotRepository {
    /// Start with `snapshot` already stored.
    pub fn with_snapshot(snapshot: GrievanceSnapshot) -> Self {
        Self {
            stored: Mutex::new(Some(snapshot)),
        }
    }

    /// Copy of the most recently saved snapshot.
    pub fn stored(&self) -> Option<GrievanceSnapshot> {
        self.stored
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl GrievanceSnapshotRepository for FixtureGrievanceSnapshotRepository {
    async fn load(&self) -> Result<Option<GrievanceSnapshot>, SnapshotRepositoryError> {
        Ok(self.stored())
    }

    async fn save(&self, snapshot: &GrievanceSnapshot) -> Result<(), SnapshotRepositoryError> {
        *self.stored.lock().unwrap_or_else(PoisonError::into_inner) = Some(snapshot.clone());
        Ok(())
    }
}
