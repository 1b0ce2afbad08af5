use crate::engine::PatchContext;
use crate::version::VersionGate;
use podfix_types::rules::{RuleId, RuleStatus};

mod autolink_require;
mod native_modules_config;
mod patch_react_imports;
mod use_expo_modules;

pub use autolink_require::AutolinkRequireRule;
pub use native_modules_config::NativeModulesConfigRule;
pub use patch_react_imports::PatchReactImportsRule;
pub use use_expo_modules::UseExpoModulesRule;

/// Result of running one rule over the buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleEffect {
    pub text: String,
    pub status: RuleStatus,
    pub detail: Option<String>,
}

impl RuleEffect {
    pub fn applied(text: String) -> Self {
        Self {
            text,
            status: RuleStatus::Applied,
            detail: None,
        }
    }

    pub fn unchanged(text: String, status: RuleStatus) -> Self {
        Self {
            text,
            status,
            detail: None,
        }
    }

    pub fn anchor_missing(text: String, detail: impl Into<String>) -> Self {
        Self {
            text,
            status: RuleStatus::AnchorMissing,
            detail: Some(detail.into()),
        }
    }
}

/// One idempotent edit to a Podfile.
///
/// The engine checks [`gate`](PatchRule::gate) and [`is_present`](PatchRule::is_present)
/// before calling [`apply`](PatchRule::apply). `apply` must leave text that `is_present`
/// (or its own search pattern) recognizes, so a second run is a no-op.
pub trait PatchRule {
    fn id(&self) -> RuleId;

    fn gate(&self) -> VersionGate;

    fn is_present(&self, text: &str, ctx: &PatchContext) -> bool;

    fn apply(&self, text: String, ctx: &PatchContext) -> RuleEffect;
}

pub fn builtin_rules() -> Vec<Box<dyn PatchRule>> {
    vec![
        Box::new(AutolinkRequireRule),
        Box::new(UseExpoModulesRule),
        Box::new(NativeModulesConfigRule),
        Box::new(PatchReactImportsRule),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_rules_run_in_declared_order() {
        let ids: Vec<RuleId> = builtin_rules().iter().map(|r| r.id()).collect();
        assert_eq!(ids, RuleId::ALL.to_vec());
    }
}
