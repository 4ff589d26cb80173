//! Domain primitives, the grievance store and its ports.
//!
//! Purpose: hold the grievance record model and every rule about it
//! (identifier allocation, status transitions, "latest" and filtered views)
//! independently of HTTP and the filesystem. Adapters reach the domain only
//! through the traits in [`ports`].
//!
//! Public surface:
//! - `GrievanceRecord` and its value types: the stored complaint.
//! - `GrievanceSnapshot`: the persisted collection plus counter.
//! - `GrievanceStore`: the in-memory store implementing the driving ports.
//! - `Error` / `ErrorCode`: transport-agnostic failure payload.

pub mod error;
pub mod grievance;
pub mod grievance_queries;
pub mod grievance_snapshot;
pub mod grievance_store;
pub mod ports;
pub mod trace_id;

pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::grievance::{
    GrievanceDraft, GrievanceId, GrievanceRecord, GrievanceStatus, StatusUpdate, Timestamp,
    UNKNOWN_USER_ID,
};
pub use self::grievance_queries::{GrievanceFilter, GrievanceStats};
pub use self::grievance_snapshot::GrievanceSnapshot;
pub use self::grievance_store::GrievanceStore;
pub use self::trace_id::TraceId;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use grievance_backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::not_found("no pending grievance"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
