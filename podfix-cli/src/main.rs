mod config;
mod explain;

use anyhow::Context;
use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use config::{ConfigMerger, PatchOverrides};
use podfix_core::adapters::FsWritePort;
use podfix_core::pipeline::{run_patch, write_patch_artifacts, ToolError};
use podfix_core::settings::PatchSettings;
use podfix_types::report::ReportToolInfo;
use std::process::ExitCode;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "podfix",
    version,
    about = "Patch a React Native Podfile to autolink Expo modules."
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Patch the Podfile (default: dry-run, prints the patch).
    Patch(PatchArgs),
    /// Explain what a rule inserts, when it applies, and how it detects prior runs.
    Explain(ExplainArgs),
    /// List all patch rules with their SDK version gates.
    ListRules(ListRulesArgs),
}

#[derive(Debug, Parser)]
struct PatchArgs {
    /// App project root holding app.json (default: current directory).
    #[arg(long, default_value = ".")]
    project_root: Utf8PathBuf,

    /// Platform directory holding the Podfile, relative to the project root (default: ios).
    #[arg(long)]
    platform_dir: Option<Utf8PathBuf>,

    /// Podfile target name (default: the .xcodeproj name in the platform directory).
    #[arg(long)]
    project_name: Option<String>,

    /// SDK version, e.g. 50.0.0 (default: from app.json or node_modules/expo).
    #[arg(long)]
    sdk_version: Option<String>,

    /// Write the patched Podfile. If omitted, only prints the patch.
    #[arg(long, default_value_t = false)]
    apply: bool,

    /// Fail with exit code 2, without writing, when a rule cannot find its anchor.
    #[arg(long, default_value_t = false)]
    strict: bool,

    /// Do not copy the Podfile aside before writing it.
    #[arg(long, default_value_t = false)]
    no_backup: bool,

    /// Write report.json, report.md and patch.diff to this directory.
    #[arg(long)]
    out_dir: Option<Utf8PathBuf>,
}

#[derive(Debug, Parser)]
struct ExplainArgs {
    /// Rule key to explain (e.g., "use-expo-modules").
    rule: String,
}

#[derive(Debug, Parser)]
struct ListRulesArgs {
    /// Output format (text, json).
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> ExitCode {
    match real_main() {
        Ok(()) => ExitCode::from(0),
        Err(ToolError::PolicyBlock) => ExitCode::from(2),
        Err(ToolError::Internal(e)) => {
            error!("{:?}", e);
            ExitCode::from(1)
        }
    }
}

fn real_main() -> Result<(), ToolError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Patch(args) => cmd_patch(args),
        Command::Explain(args) => Ok(cmd_explain(args)?),
        Command::ListRules(args) => Ok(cmd_list_rules(args)?),
    }
}

fn cmd_patch(args: PatchArgs) -> Result<(), ToolError> {
    // Load config file and merge with CLI arguments
    let file_config =
        config::load_or_default(&args.project_root).context("load podfix.toml config")?;
    let merged = ConfigMerger::new(file_config).merge_patch_args(&PatchOverrides {
        platform_dir: args.platform_dir,
        project_name: args.project_name,
        sdk_version: args.sdk_version,
        strict: args.strict,
        no_backup: args.no_backup,
    });
    debug!(?merged, "merged config");

    let settings = PatchSettings {
        project_root: args.project_root,
        platform_dir: merged.platform_dir,
        project_name: merged.project_name,
        sdk_version: merged.sdk_version,
        dry_run: !args.apply,
        strict_anchors: merged.strict_anchors,
        backup_enabled: merged.backups.enabled,
        backup_suffix: merged.backups.suffix,
    };

    let outcome = run_patch(&settings, tool_info())?;

    if let Some(out_dir) = &args.out_dir {
        write_patch_artifacts(&outcome, out_dir, &FsWritePort)?;
        info!("wrote patch artifacts to {}", out_dir);
    }

    print!("{}", outcome.patch);

    let report = &outcome.report;
    let counts = &report.verdict.counts;
    eprintln!(
        "{}: {} applied, {} already present, {} not applicable, {} anchor missing{}",
        report.target.podfile,
        counts.applied,
        counts.already_present,
        counts.not_applicable,
        counts.anchor_missing,
        if report.target.written {
            " (written)"
        } else if settings.dry_run {
            " (dry-run)"
        } else {
            ""
        }
    );
    for reason in &report.verdict.reasons {
        eprintln!("  - {}", reason);
    }

    if outcome.policy_block {
        return Err(ToolError::PolicyBlock);
    }
    Ok(())
}

fn tool_info() -> ReportToolInfo {
    ReportToolInfo {
        name: "podfix".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }
}

fn cmd_explain(args: ExplainArgs) -> anyhow::Result<()> {
    use explain::{list_rule_keys, lookup_rule, rule_gate};

    let Some(rule) = lookup_rule(&args.rule) else {
        let available = list_rule_keys().join(", ");
        anyhow::bail!(
            "Unknown rule: '{}'\n\nAvailable rules: {}",
            args.rule,
            available
        );
    };

    println!("================================================================================");
    println!("RULE: {}", rule.title);
    println!("================================================================================");
    println!();
    println!("Key:     {}", rule.rule);
    println!("Applies: {}", rule_gate(rule.rule));
    println!();

    println!("DESCRIPTION");
    println!("--------------------------------------------------------------------------------");
    println!("{}", rule.description);
    println!();

    println!("DETECTION");
    println!("--------------------------------------------------------------------------------");
    println!("{}", rule.detection);
    println!();

    println!("REMEDIATION GUIDANCE");
    println!("--------------------------------------------------------------------------------");
    println!("{}", rule.remediation);
    println!();

    Ok(())
}

fn cmd_list_rules(args: ListRulesArgs) -> anyhow::Result<()> {
    use explain::{rule_gate, RULE_REGISTRY};

    match args.format {
        OutputFormat::Text => {
            println!("Available rules:\n");
            println!("  {:<24} {:<20} TITLE", "KEY", "APPLIES");
            println!("  {:<24} {:<20} -----", "---", "-------");
            for rule in RULE_REGISTRY {
                println!(
                    "  {:<24} {:<20} {}",
                    rule.rule.as_str(),
                    rule_gate(rule.rule).to_string(),
                    rule.title
                );
            }
            println!();
            println!("Use 'podfix explain <key>' for details.");
        }
        OutputFormat::Json => {
            let rules: Vec<_> = RULE_REGISTRY
                .iter()
                .map(|r| {
                    serde_json::json!({
                        "key": r.rule,
                        "title": r.title,
                        "applies": rule_gate(r.rule).to_string(),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&rules)?);
        }
    }
    Ok(())
}
