//! Shared DTOs (schemas-as-code) for the podfix workspace.
//!
//! # Design constraints
//! - These types are intended to be serialized to disk.
//! - Be conservative with breaking changes.
//! - Prefer adding optional fields over changing semantics.

pub mod report;
pub mod rules;

/// Schema identifiers.
pub mod schema {
    pub const PODFIX_REPORT_V1: &str = "podfix.report.v1";
}
