//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: file-backed snapshot storage for the grievance store
//!
//! Adapters are thin translators that convert between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod persistence;
