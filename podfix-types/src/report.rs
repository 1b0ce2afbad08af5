use crate::rules::{RuleOutcome, RuleStatus};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PodfixReport {
    pub schema: String,
    pub tool: ReportToolInfo,
    pub run: ReportRunInfo,
    pub verdict: ReportVerdict,
    pub target: ReportTarget,

    #[serde(default)]
    pub rules: Vec<RuleOutcome>,

    /// Pointers to related artifact files.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifacts: Option<ReportArtifacts>,
}

impl PodfixReport {
    pub fn new(tool: ReportToolInfo, run: ReportRunInfo, target: ReportTarget) -> Self {
        Self {
            schema: crate::schema::PODFIX_REPORT_V1.to_string(),
            tool,
            run,
            verdict: ReportVerdict::default(),
            target,
            rules: Vec::new(),
            artifacts: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportToolInfo {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportRunInfo {
    pub started_at: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,

    /// True for a preview run that never writes the Podfile.
    #[serde(default)]
    pub dry_run: bool,
}

/// The Podfile and the inputs the engine was run with.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportTarget {
    pub podfile: String,
    pub project_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sdk_version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha256_before: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha256_after: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backup: Option<String>,

    #[serde(default)]
    pub written: bool,

    #[serde(default)]
    pub patch_bytes: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportVerdict {
    pub status: ReportStatus,
    pub counts: ReportCounts,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reasons: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    /// Nothing left to patch.
    #[default]
    Pass,
    /// Edits were produced, or an anchor was missing.
    Warn,
    /// Strict mode blocked the write.
    Fail,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportCounts {
    pub applied: u64,
    pub already_present: u64,
    pub not_applicable: u64,
    pub anchor_missing: u64,
}

impl ReportCounts {
    pub fn from_outcomes(outcomes: &[RuleOutcome]) -> Self {
        let mut counts = Self::default();
        for o in outcomes {
            match o.status {
                RuleStatus::Applied => counts.applied += 1,
                RuleStatus::AlreadyPresent => counts.already_present += 1,
                RuleStatus::NotApplicable => counts.not_applicable += 1,
                RuleStatus::AnchorMissing => counts.anchor_missing += 1,
            }
        }
        counts
    }
}

/// Pointers to related artifact files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportArtifacts {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patch: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}
