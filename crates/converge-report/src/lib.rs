//! The `{name, result, comment, changes}` report convention.
//!
//! State modules read current state, compute desired state, diff the two
//! with `converge-diff`, and report the outcome through this shape. The
//! diff engine itself stays report-agnostic; this crate is the thin
//! companion every caller shares.

pub mod report;

pub use report::StateReport;
