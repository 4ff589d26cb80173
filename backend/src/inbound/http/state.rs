//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::GrievanceStore;
use crate::domain::ports::{GrievanceCommand, GrievanceQuery, GrievanceSnapshotRepository};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub grievances: Arc<dyn GrievanceCommand>,
    pub grievances_query: Arc<dyn GrievanceQuery>,
    /// Source of the timestamp reported by `/health`.
    pub clock: Arc<dyn Clock>,
}

impl HttpState {
    /// Construct state from individual ports.
    pub fn new(
        grievances: Arc<dyn GrievanceCommand>,
        grievances_query: Arc<dyn GrievanceQuery>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            grievances,
            grievances_query,
            clock,
        }
    }

    /// Serve both ports from one store.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use grievance_backend::domain::GrievanceStore;
    /// use grievance_backend::domain::ports::FixtureGrievanceSnapshotRepository;
    /// use grievance_backend::inbound::http::state::HttpState;
    /// use mockable::DefaultClock;
    ///
    /// # tokio::runtime::Runtime::new().expect("runtime").block_on(async {
    /// let store = GrievanceStore::open(
    ///     Arc::new(FixtureGrievanceSnapshotRepository::default()),
    ///     Arc::new(DefaultClock),
    /// )
    /// .await;
    /// let state = HttpState::from_store(Arc::new(store), Arc::new(DefaultClock));
    /// let _query = state.grievances_query.clone();
    /// # });
    /// ```
    pub fn from_store<R>(store: Arc<GrievanceStore<R>>, clock: Arc<dyn Clock>) -> Self
    where
        R: GrievanceSnapshotRepository + 'static,
    {
        Self::new(store.clone(), store, clock)
    }
}
