//! Request middleware.
//!
//! Purpose: request lifecycle concerns shared by every route: trace
//! identifier propagation and cross-origin headers.

pub mod cors;
pub mod trace;

pub use trace::Trace;
