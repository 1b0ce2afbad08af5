//! Domain logic: turn a Podfile plus (project name, SDK version) into a patched Podfile.
//!
//! This crate owns *what* gets injected and when. It does not own *how* the result reaches
//! disk; that's the `podfix-edit` crate.

pub mod anchors;
mod discovery;
mod engine;
mod ports;
mod rules;
mod version;

pub use discovery::{
    discover_project_name, discover_sdk_version, podfile_path, ProjectError, PODFILE_NAME,
};
pub use engine::{update_podfile, PatchContext, PatchEngine, PatchRun};
pub use ports::{FsProjectView, ProjectView};
pub use rules::{
    builtin_rules, AutolinkRequireRule, NativeModulesConfigRule, PatchReactImportsRule, PatchRule,
    RuleEffect, UseExpoModulesRule,
};
pub use version::{SdkVersion, VersionError, VersionGate, SDK_44, SDK_52};
