//! The patch pipeline, extracted from the CLI.
//!
//! Inputs are resolved from settings first and project discovery second; artifact
//! output goes through [`WritePort`].

use crate::ports::WritePort;
use crate::settings::PatchSettings;
use anyhow::Context;
use camino::Utf8Path;
use chrono::{DateTime, Utc};
use podfix_domain::{
    discover_project_name, discover_sdk_version, podfile_path, FsProjectView, PatchContext,
    PatchEngine, ProjectView,
};
use podfix_edit::{check_anchors, prepare_edit, write_edit, ApplyOptions, PodfileEdit, WriteOutcome};
use podfix_render::render_report_md;
use podfix_types::report::{
    PodfixReport, ReportArtifacts, ReportCounts, ReportRunInfo, ReportStatus, ReportTarget,
    ReportToolInfo,
};
use tracing::{debug, info, warn};

pub const REPORT_JSON: &str = "report.json";
pub const REPORT_MD: &str = "report.md";
pub const PATCH_DIFF: &str = "patch.diff";

/// Error type for pipeline results.  Exit code 2 = policy block, 1 = tool error.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("policy block")]
    PolicyBlock,
    #[error("{0:#}")]
    Internal(#[from] anyhow::Error),
}

/// Outcome of `run_patch`.
pub struct PatchOutcome {
    pub report: PodfixReport,
    pub patch: String,
    pub policy_block: bool,
}

/// Run the patch pipeline against the project at `settings.project_root`.
///
/// A strict-anchor block is not an `Err`: the outcome carries `policy_block` and a
/// failing report so the caller can still write artifacts before exiting with 2.
pub fn run_patch(settings: &PatchSettings, tool: ReportToolInfo) -> Result<PatchOutcome, ToolError> {
    let started = Utc::now();
    let project = FsProjectView::new(settings.project_root.clone());

    let podfile = podfile_path(&project, &settings.platform_dir).context("locate Podfile")?;
    let ctx = resolve_context(settings, &project)?;
    debug!(
        podfile = %podfile,
        project_name = %ctx.project_name,
        sdk_version = ?ctx.sdk_version.as_ref().map(|v| v.to_string()),
        "resolved patch inputs"
    );

    let opts = ApplyOptions {
        dry_run: settings.dry_run,
        strict_anchors: settings.strict_anchors,
        backup_enabled: settings.backup_enabled,
        backup_suffix: settings.backup_suffix.clone(),
    };

    let engine = PatchEngine::new();
    let edit = prepare_edit(&settings.project_root, &podfile, &engine, &ctx)?;
    let patch = edit.patch();

    let mut reasons = Vec::new();
    let (written, policy_block) = match check_anchors(&edit, &opts) {
        Ok(()) => (write_edit(&settings.project_root, &edit, &opts)?, false),
        Err(block) => {
            warn!(error = %block, "strict anchors: write blocked");
            reasons.push(block.to_string());
            (WriteOutcome::default(), true)
        }
    };

    let report = build_report(ReportInputs {
        tool,
        started,
        settings,
        ctx: &ctx,
        edit: &edit,
        written: &written,
        patch_bytes: patch.len() as u64,
        policy_block,
        reasons,
    });
    info!(
        status = ?report.verdict.status,
        applied = report.verdict.counts.applied,
        anchor_missing = report.verdict.counts.anchor_missing,
        written = written.written,
        "patch run complete"
    );

    Ok(PatchOutcome {
        report,
        patch,
        policy_block,
    })
}

/// Write the report (json + markdown) and patch to the output directory.
pub fn write_patch_artifacts(
    outcome: &PatchOutcome,
    out_dir: &Utf8Path,
    writer: &dyn WritePort,
) -> anyhow::Result<()> {
    writer.create_dir_all(out_dir)?;

    let report_json = serde_json::to_string_pretty(&outcome.report).context("serialize report")?;
    writer.write_file(&out_dir.join(REPORT_JSON), report_json.as_bytes())?;

    let report_md = render_report_md(&outcome.report);
    writer.write_file(&out_dir.join(REPORT_MD), report_md.as_bytes())?;

    writer.write_file(&out_dir.join(PATCH_DIFF), outcome.patch.as_bytes())?;

    Ok(())
}

/// Overrides win; otherwise discover the project name and SDK version.
fn resolve_context(
    settings: &PatchSettings,
    project: &dyn ProjectView,
) -> anyhow::Result<PatchContext> {
    let project_name = match &settings.project_name {
        Some(name) => name.clone(),
        None => discover_project_name(project, &settings.platform_dir)
            .context("discover project name")?,
    };
    let sdk_version = match &settings.sdk_version {
        Some(v) => Some(v.clone()),
        None => discover_sdk_version(project).context("discover SDK version")?,
    };
    if sdk_version.is_none() {
        debug!("no SDK version found; version-gated rules are skipped");
    }
    Ok(PatchContext::parse(&project_name, sdk_version.as_deref())?)
}

struct ReportInputs<'a> {
    tool: ReportToolInfo,
    started: DateTime<Utc>,
    settings: &'a PatchSettings,
    ctx: &'a PatchContext,
    edit: &'a PodfileEdit,
    written: &'a WriteOutcome,
    patch_bytes: u64,
    policy_block: bool,
    reasons: Vec<String>,
}

fn build_report(inputs: ReportInputs<'_>) -> PodfixReport {
    let ended = Utc::now();
    let duration_ms = (ended - inputs.started).num_milliseconds().max(0) as u64;

    let run = ReportRunInfo {
        started_at: inputs.started.to_rfc3339(),
        ended_at: Some(ended.to_rfc3339()),
        duration_ms: Some(duration_ms),
        dry_run: inputs.settings.dry_run,
    };
    let target = ReportTarget {
        podfile: inputs.edit.path.to_string(),
        project_name: inputs.ctx.project_name.clone(),
        sdk_version: inputs.ctx.sdk_version.as_ref().map(|v| v.to_string()),
        sha256_before: Some(inputs.edit.sha256_before.clone()),
        sha256_after: Some(inputs.edit.sha256_after.clone()),
        backup: inputs.written.backup.as_ref().map(|p| p.to_string()),
        written: inputs.written.written,
        patch_bytes: inputs.patch_bytes,
    };

    let mut report = PodfixReport::new(inputs.tool, run, target);
    report.rules = inputs.edit.outcomes.clone();
    report.verdict.counts = ReportCounts::from_outcomes(&report.rules);

    let mut reasons = inputs.reasons;
    if !inputs.policy_block {
        for o in report.rules.iter().filter(|o| o.status.is_anchor_missing()) {
            reasons.push(format!(
                "{}: {}",
                o.rule,
                o.detail.as_deref().unwrap_or("anchor not found")
            ));
        }
    }
    let pending = inputs.edit.changed() && !inputs.written.written;
    if pending && !inputs.policy_block {
        reasons.push(format!(
            "{} rule(s) would change {}",
            report.verdict.counts.applied, inputs.edit.path
        ));
    }

    report.verdict.status = if inputs.policy_block {
        ReportStatus::Fail
    } else if report.verdict.counts.anchor_missing > 0 || pending {
        ReportStatus::Warn
    } else {
        ReportStatus::Pass
    };
    report.verdict.reasons = reasons;
    report.artifacts = Some(ReportArtifacts {
        patch: Some(PATCH_DIFF.to_string()),
        summary: Some(REPORT_MD.to_string()),
    });
    report
}
