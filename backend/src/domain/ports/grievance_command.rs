//! Driving port for grievance mutations.
//!
//! Inbound adapters submit new grievances and move existing ones between
//! statuses through this port. Persistence happens behind it; a failed save
//! is not reported to the caller because the in-memory state stays
//! authoritative until the next successful write.

use async_trait::async_trait;

use crate::domain::{Error, GrievanceDraft, GrievanceRecord, StatusUpdate};

/// Domain use-case port for changing the grievance collection.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GrievanceCommand: Send + Sync {
    /// Store a new pending grievance built from `draft`.
    async fn submit(&self, draft: GrievanceDraft) -> Result<GrievanceRecord, Error>;

    /// Apply `update` to the grievance it names.
    ///
    /// Returns `Ok(None)` when no grievance carries that identifier.
    async fn update_status(&self, update: StatusUpdate) -> Result<Option<GrievanceRecord>, Error>;
}
