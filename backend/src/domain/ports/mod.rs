//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driving ports ([`GrievanceCommand`], [`GrievanceQuery`]) are what inbound
//! adapters call. The driven port ([`GrievanceSnapshotRepository`]) is what
//! the store calls to persist its state.

mod macros;
pub(crate) use macros::define_port_error;

mod grievance_command;
mod grievance_query;
mod grievance_snapshot_repository;

pub use grievance_command::GrievanceCommand;
#[cfg(test)]
pub use grievance_command::MockGrievanceCommand;
pub use grievance_query::GrievanceQuery;
#[cfg(test)]
pub use grievance_query::MockGrievanceQuery;
#[cfg(test)]
pub use grievance_snapshot_repository::MockGrievanceSnapshotRepository;
pub use grievance_snapshot_repository::{
    FixtureGrievanceSnapshotRepository, GrievanceSnapshotRepository, SnapshotRepositoryError,
};
