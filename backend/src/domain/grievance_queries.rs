//! Read-only views derived from the grievance collection.
//!
//! Every function here takes a consistent slice of the collection and
//! never mutates it. "Latest" means the maximal `created_at`; with the
//! fixed-width timestamps the store writes that is the most recently
//! created record.

use crate::domain::GrievanceRecord;

/// Optional equality filters for [`filter_sorted`].
///
/// Empty strings are treated as absent so `?status=&user_id=` lists
/// everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GrievanceFilter {
    pub status: Option<String>,
    pub user_id: Option<String>,
}

impl GrievanceFilter {
    /// Build a filter, discarding blank values.
    ///
    /// # Examples
    /// ```
    /// use grievance_backend::domain::GrievanceFilter;
    ///
    /// let filter = GrievanceFilter::new(Some("pending".into()), Some(String::new()));
    /// assert_eq!(filter.status.as_deref(), Some("pending"));
    /// assert!(filter.user_id.is_none());
    /// ```
    pub fn new(status: Option<String>, user_id: Option<String>) -> Self {
        Self {
            status: status.filter(|value| !value.is_empty()),
            user_id: user_id.filter(|value| !value.is_empty()),
        }
    }

    fn matches(&self, record: &GrievanceRecord) -> bool {
        let status_ok = self
            .status
            .as_deref()
            .is_none_or(|status| record.status.as_str() == Some(status));
        let user_ok = self
            .user_id
            .as_deref()
            .is_none_or(|user_id| record.user_id == user_id);
        status_ok && user_ok
    }
}

/// Record counts reported by the health endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GrievanceStats {
    pub total: usize,
    pub pending: usize,
}

/// Most recently created pending grievance.
pub fn latest_pending(records: &[GrievanceRecord]) -> Option<&GrievanceRecord> {
    records
        .iter()
        .filter(|record| record.is_pending())
        .max_by(|left, right| left.created_at.cmp(&right.created_at))
}

/// Most recently created pending grievance filed by `user_id`.
pub fn latest_pending_for_user<'a>(
    records: &'a [GrievanceRecord],
    user_id: &str,
) -> Option<&'a GrievanceRecord> {
    records
        .iter()
        .filter(|record| record.is_pending() && record.user_id == user_id)
        .max_by(|left, right| left.created_at.cmp(&right.created_at))
}

/// Records matching `filter`, newest first.
///
/// The sort is stable: records sharing a `created_at` keep their insertion
/// order.
pub fn filter_sorted(
    records: &[GrievanceRecord],
    filter: &GrievanceFilter,
) -> Vec<GrievanceRecord> {
    let mut matching: Vec<GrievanceRecord> = records
        .iter()
        .filter(|record| filter.matches(record))
        .cloned()
        .collect();
    matching.sort_by(|left, right| right.created_at.cmp(&left.created_at));
    matching
}

/// Total and pending counts.
pub fn stats(records: &[GrievanceRecord]) -> GrievanceStats {
    GrievanceStats {
        total: records.len(),
        pending: records.iter().filter(|record| record.is_pending()).count(),
    }
}
