//! Driving port for read-only grievance lookups.

use async_trait::async_trait;

use crate::domain::{Error, GrievanceFilter, GrievanceRecord, GrievanceStats};

/// Domain use-case port for reading the grievance collection.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GrievanceQuery: Send + Sync {
    /// Most recently created pending grievance across all users.
    async fn latest_pending(&self) -> Result<Option<GrievanceRecord>, Error>;

    /// Most recently created pending grievance filed by `user_id`.
    async fn latest_pending_for_user(
        &self,
        user_id: &str,
    ) -> Result<Option<GrievanceRecord>, Error>;

    /// Grievances matching `filter`, newest first.
    async fn list(&self, filter: GrievanceFilter) -> Result<Vec<GrievanceRecord>, Error>;

    /// Total and pending counts.
    async fn stats(&self) -> Result<GrievanceStats, Error>;
}
