//! Rendering helpers (markdown) for human-readable artifacts.

use podfix_types::report::{PodfixReport, ReportStatus};
use podfix_types::rules::RuleStatus;

pub fn render_report_md(report: &PodfixReport) -> String {
    let mut out = String::new();
    out.push_str("# podfix report\n\n");
    out.push_str(&format!(
        "- Verdict: `{}`\n",
        verdict_label(report.verdict.status)
    ));
    out.push_str(&format!("- Podfile: `{}`\n", report.target.podfile));
    out.push_str(&format!("- Project: `{}`\n", report.target.project_name));
    out.push_str(&format!(
        "- SDK version: {}\n",
        report
            .target
            .sdk_version
            .as_deref()
            .map(|v| format!("`{v}`"))
            .unwrap_or_else(|| "_unknown_".to_string())
    ));
    out.push_str(&format!(
        "- Mode: {}\n",
        if report.run.dry_run { "dry run" } else { "apply" }
    ));
    if report.target.written {
        out.push_str("- Written: yes\n");
    }
    if let Some(backup) = &report.target.backup {
        out.push_str(&format!("- Backup: `{}`\n", backup));
    }
    if let (Some(before), Some(after)) = (&report.target.sha256_before, &report.target.sha256_after)
    {
        out.push_str(&format!("- sha256: {} → {}\n", short(before), short(after)));
    }
    if report.target.patch_bytes > 0 {
        out.push_str(&format!("- Patch bytes: {}\n", report.target.patch_bytes));
    }
    out.push('\n');

    if !report.verdict.reasons.is_empty() {
        out.push_str("## Reasons\n\n");
        for reason in &report.verdict.reasons {
            out.push_str(&format!("- {}\n", reason));
        }
        out.push('\n');
    }

    out.push_str("## Rules\n\n");
    if report.rules.is_empty() {
        out.push_str("_No rules ran._\n");
        return out;
    }

    out.push_str("| Rule | Status | Detail |\n|---|---|---|\n");
    for r in &report.rules {
        out.push_str(&format!(
            "| `{}` | {} | {} |\n",
            r.rule,
            status_label(r.status),
            r.detail.as_deref().unwrap_or("-")
        ));
    }

    out
}

fn verdict_label(s: ReportStatus) -> &'static str {
    match s {
        ReportStatus::Pass => "pass",
        ReportStatus::Warn => "warn",
        ReportStatus::Fail => "fail",
    }
}

fn status_label(s: RuleStatus) -> &'static str {
    match s {
        RuleStatus::Applied => "applied",
        RuleStatus::AlreadyPresent => "already present",
        RuleStatus::NotApplicable => "not applicable",
        RuleStatus::AnchorMissing => "anchor missing",
    }
}

fn short(hash: &str) -> &str {
    hash.get(..12).unwrap_or(hash)
}
