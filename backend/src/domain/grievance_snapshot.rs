//! Full persisted state of the grievance store.

use serde::{Deserialize, Serialize};

use crate::domain::GrievanceRecord;

fn first_sequence() -> u64 {
    1
}

/// Every record plus the counter used to mint the next identifier.
///
/// Serialised as `{"grievances": [...], "counter": n}`. Both keys are
/// optional on input and default to an empty collection and `1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrievanceSnapshot {
    #[serde(default)]
    pub grievances: Vec<GrievanceRecord>,
    #[serde(default = "first_sequence")]
    pub counter: u64,
}

impl Default for GrievanceSnapshot {
    fn default() -> Self {
        Self {
            grievances: Vec::new(),
            counter: first_sequence(),
        }
    }
}

impl GrievanceSnapshot {
    /// Counter value that cannot collide with any loaded identifier.
    ///
    /// A stale or hand-edited file may carry a counter at or below an
    /// identifier already present; the next sequence is lifted past the
    /// highest `GRV_` sequence in that case so identifiers are never reissued.
    ///
    /// # Examples
    /// ```
    /// use grievance_backend::domain::GrievanceSnapshot;
    ///
    /// let snapshot = GrievanceSnapshot { grievances: Vec::new(), counter: 0 };
    /// assert_eq!(snapshot.next_sequence(), 1);
    /// ```
    pub fn next_sequence(&self) -> u64 {
        let after_highest = self
            .grievances
            .iter()
            .filter_map(|record| record.id.sequence())
            .max()
            .map_or(1, |highest| highest.saturating_add(1));
        self.counter.max(after_highest).max(1)
    }
}
