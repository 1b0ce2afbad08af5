//! Embeddable core library for podfix.
//!
//! Provides a clap-free entry point suitable for linking into other tools
//! (a prebuild step, an editor integration) as well as the `podfix` binary.
//!
//! Artifact output goes through the [`WritePort`](ports::WritePort) trait; the
//! [`adapters`] module provides the filesystem-backed implementation.
//!
//! # Entry points
//!
//! - [`run_patch`](pipeline::run_patch) - resolve inputs, patch the Podfile, build a report
//! - [`write_patch_artifacts`](pipeline::write_patch_artifacts) - persist the report and patch

pub mod adapters;
pub mod pipeline;
pub mod ports;
pub mod settings;

// Re-export the domain's ProjectView so callers don't need podfix-domain directly.
pub use podfix_domain::ProjectView;
