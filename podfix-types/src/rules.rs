use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a built-in patch rule.
///
/// Declaration order is pipeline order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleId {
    AutolinkRequire,
    UseExpoModules,
    NativeModulesConfig,
    PatchReactImports,
}

impl RuleId {
    pub const ALL: [RuleId; 4] = [
        RuleId::AutolinkRequire,
        RuleId::UseExpoModules,
        RuleId::NativeModulesConfig,
        RuleId::PatchReactImports,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RuleId::AutolinkRequire => "autolink-require",
            RuleId::UseExpoModules => "use-expo-modules",
            RuleId::NativeModulesConfig => "native-modules-config",
            RuleId::PatchReactImports => "patch-react-imports",
        }
    }

    pub fn parse(s: &str) -> Option<RuleId> {
        RuleId::ALL.into_iter().find(|id| id.as_str() == s)
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a rule did to the manifest during one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleStatus {
    /// The rule rewrote the text.
    Applied,
    /// The rule's marker was already present; nothing to do.
    AlreadyPresent,
    /// The SDK version gate excluded the rule.
    NotApplicable,
    /// The rule wanted to edit but the text it anchors on was not found.
    AnchorMissing,
}

impl RuleStatus {
    pub fn changed(self) -> bool {
        matches!(self, RuleStatus::Applied)
    }

    pub fn is_anchor_missing(self) -> bool {
        matches!(self, RuleStatus::AnchorMissing)
    }
}

/// Outcome of a single rule in a pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleOutcome {
    pub rule: RuleId,
    pub status: RuleStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl RuleOutcome {
    pub fn new(rule: RuleId, status: RuleStatus) -> Self {
        Self {
            rule,
            status,
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_ids_roundtrip_through_str() {
        for id in RuleId::ALL {
            assert_eq!(RuleId::parse(id.as_str()), Some(id));
        }
        assert_eq!(RuleId::parse("nope"), None);
    }

    #[test]
    fn rule_id_serializes_kebab_case() {
        let json = serde_json::to_string(&RuleId::NativeModulesConfig).unwrap();
        assert_eq!(json, "\"native-modules-config\"");
    }

    #[test]
    fn outcome_detail_is_omitted_when_empty() {
        let json =
            serde_json::to_value(RuleOutcome::new(RuleId::AutolinkRequire, RuleStatus::Applied))
                .unwrap();
        assert_eq!(json["status"], "applied");
        assert!(json.get("detail").is_none());
    }
}
