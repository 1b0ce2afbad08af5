use crate::rules::{self, PatchRule};
use crate::version::{SdkVersion, VersionError};
use podfix_types::rules::{RuleId, RuleOutcome, RuleStatus};
use tracing::{debug, warn};

/// Inputs shared by every rule in one run.
#[derive(Debug, Clone)]
pub struct PatchContext {
    pub project_name: String,
    pub sdk_version: Option<SdkVersion>,
}

impl PatchContext {
    pub fn new(project_name: impl Into<String>, sdk_version: Option<SdkVersion>) -> Self {
        Self {
            project_name: project_name.into(),
            sdk_version,
        }
    }

    /// Parses the SDK version; a malformed string is an error, not a disabled gate.
    /// A blank string counts as no version.
    pub fn parse(project_name: &str, sdk_version: Option<&str>) -> Result<Self, VersionError> {
        let sdk_version = sdk_version
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(SdkVersion::parse)
            .transpose()?;
        Ok(Self::new(project_name, sdk_version))
    }
}

/// Patched text plus what each rule did to it.
#[derive(Debug, Clone)]
pub struct PatchRun {
    pub text: String,
    pub outcomes: Vec<RuleOutcome>,
}

impl PatchRun {
    pub fn changed(&self) -> bool {
        self.outcomes.iter().any(|o| o.status.changed())
    }

    pub fn missing_anchors(&self) -> impl Iterator<Item = &RuleOutcome> {
        self.outcomes.iter().filter(|o| o.status.is_anchor_missing())
    }

    pub fn outcome(&self, rule: RuleId) -> Option<&RuleOutcome> {
        self.outcomes.iter().find(|o| o.rule == rule)
    }
}

pub struct PatchEngine {
    rules: Vec<Box<dyn PatchRule>>,
}

impl Default for PatchEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl PatchEngine {
    pub fn new() -> Self {
        Self {
            rules: rules::builtin_rules(),
        }
    }

    pub fn with_rules(rules: Vec<Box<dyn PatchRule>>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[Box<dyn PatchRule>] {
        &self.rules
    }

    /// Thread `text` through every rule in order.
    pub fn run(&self, text: String, ctx: &PatchContext) -> PatchRun {
        let mut text = text;
        let mut outcomes = Vec::with_capacity(self.rules.len());

        for rule in &self.rules {
            let id = rule.id();

            if !rule.gate().allows(ctx.sdk_version.as_ref()) {
                debug!(rule = %id, gate = %rule.gate(), "rule not applicable");
                outcomes.push(RuleOutcome::new(id, RuleStatus::NotApplicable));
                continue;
            }

            if rule.is_present(&text, ctx) {
                debug!(rule = %id, "already present");
                outcomes.push(RuleOutcome::new(id, RuleStatus::AlreadyPresent));
                continue;
            }

            let effect = rule.apply(text, ctx);
            text = effect.text;

            let mut outcome = RuleOutcome::new(id, effect.status);
            if let Some(detail) = effect.detail {
                outcome = outcome.with_detail(detail);
            }
            match outcome.status {
                RuleStatus::AnchorMissing => warn!(
                    rule = %id,
                    detail = outcome.detail.as_deref().unwrap_or(""),
                    "anchor not found; rule skipped"
                ),
                status => debug!(rule = %id, ?status, "rule ran"),
            }
            outcomes.push(outcome);
        }

        PatchRun { text, outcomes }
    }

    pub fn transform(&self, text: String, ctx: &PatchContext) -> String {
        self.run(text, ctx).text
    }
}

/// Patch `content` for `project_name` with the built-in rules.
///
/// Missing anchors are not errors; only a malformed `sdk_version` is.
pub fn update_podfile(
    content: String,
    project_name: &str,
    sdk_version: Option<&str>,
) -> Result<String, VersionError> {
    let ctx = PatchContext::parse(project_name, sdk_version)?;
    Ok(PatchEngine::new().transform(content, &ctx))
}
