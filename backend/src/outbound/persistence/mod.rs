//! Persistence adapters for the grievance snapshot port.
//!
//! Adapters only translate between the domain snapshot and a storage format.
//! No business rules live here; identifier minting and status handling stay in
//! the domain store.

mod json_snapshot_repository;

pub use json_snapshot_repository::JsonSnapshotRepository;
