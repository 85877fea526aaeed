//! Validation gates that decide whether the wizard may move past a panel.
//!
//! Gates are pure: they read the draft, the stage registry and the derived
//! cross-panel state, and return a [`GateReport`]. Nothing is cached.

pub mod derived;
pub mod gates;
pub mod result;

pub use derived::DerivedState;
pub use gates::evaluate;
pub use result::{GateIssue, GateReport, IssueKind};
