//! Apply a patch run to a Podfile on disk.
//!
//! The engine in `podfix-domain` is pure text-in/text-out. This crate adds the file
//! handling around it: reading, hashing, a unified diff, the strict-anchor policy
//! check, a backup copy and the final write.
//!
//! ## Error Handling
//!
//! Functions return [`EditResult<T>`] which distinguishes between:
//! - [`EditError::PolicyBlock`]: strict mode refused a run with missing anchors (exit code 2)
//! - [`EditError::Runtime`]: I/O or other runtime errors (exit code 1)

pub mod error;

pub use error::{EditError, EditResult, PolicyBlockError};

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use diffy::PatchFormatter;
use fs_err as fs;
use podfix_domain::{PatchContext, PatchEngine};
use podfix_types::rules::{RuleId, RuleOutcome};
use sha2::{Digest, Sha256};
use tracing::{debug, info};

pub const DEFAULT_BACKUP_SUFFIX: &str = ".podfix.bak";

#[derive(Debug, Clone)]
pub struct ApplyOptions {
    pub dry_run: bool,
    /// Refuse to write when any rule reports a missing anchor.
    pub strict_anchors: bool,
    pub backup_enabled: bool,
    pub backup_suffix: String,
}

impl Default for ApplyOptions {
    fn default() -> Self {
        Self {
            dry_run: true,
            strict_anchors: false,
            backup_enabled: true,
            backup_suffix: DEFAULT_BACKUP_SUFFIX.to_string(),
        }
    }
}

/// One Podfile, before and after an engine run.
#[derive(Debug, Clone)]
pub struct PodfileEdit {
    /// Path relative to the project root.
    pub path: Utf8PathBuf,
    pub before: String,
    pub after: String,
    pub outcomes: Vec<RuleOutcome>,
    pub sha256_before: String,
    pub sha256_after: String,
}

impl PodfileEdit {
    pub fn changed(&self) -> bool {
        self.before != self.after
    }

    /// Unified diff between `before` and `after`; empty when unchanged.
    pub fn patch(&self) -> String {
        render_patch(&self.path, &self.before, &self.after)
    }

    pub fn missing_anchors(&self) -> Vec<RuleId> {
        self.outcomes
            .iter()
            .filter(|o| o.status.is_anchor_missing())
            .map(|o| o.rule)
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteOutcome {
    pub written: bool,
    /// Backup path relative to the project root.
    pub backup: Option<Utf8PathBuf>,
}

/// Read the Podfile and run the engine over it. Nothing is written.
pub fn prepare_edit(
    project_root: &Utf8Path,
    podfile: &Utf8Path,
    engine: &PatchEngine,
    ctx: &PatchContext,
) -> anyhow::Result<PodfileEdit> {
    let abs = abs_path(project_root, podfile);
    let before = fs::read_to_string(&abs).with_context(|| format!("read {}", abs))?;

    let run = engine.run(before.clone(), ctx);
    debug!(podfile = %podfile, changed = run.changed(), "engine run complete");

    Ok(PodfileEdit {
        path: podfile.to_path_buf(),
        sha256_before: sha256_hex(before.as_bytes()),
        sha256_after: sha256_hex(run.text.as_bytes()),
        before,
        after: run.text,
        outcomes: run.outcomes,
    })
}

/// The strict-anchor policy: with `strict_anchors` set, any missing anchor blocks the run.
pub fn check_anchors(edit: &PodfileEdit, opts: &ApplyOptions) -> Result<(), PolicyBlockError> {
    if !opts.strict_anchors {
        return Ok(());
    }
    let rules = edit.missing_anchors();
    if rules.is_empty() {
        return Ok(());
    }
    let message = edit
        .outcomes
        .iter()
        .filter(|o| o.status.is_anchor_missing())
        .filter_map(|o| o.detail.clone())
        .collect::<Vec<_>>()
        .join("; ");
    Err(PolicyBlockError::AnchorMissing { rules, message })
}

/// Write `edit.after` to disk when it differs from `edit.before` and this is not a dry run.
///
/// With backups enabled the original bytes are copied to `<podfile><suffix>` first.
pub fn write_edit(
    project_root: &Utf8Path,
    edit: &PodfileEdit,
    opts: &ApplyOptions,
) -> anyhow::Result<WriteOutcome> {
    if opts.dry_run || !edit.changed() {
        debug!(
            podfile = %edit.path,
            dry_run = opts.dry_run,
            changed = edit.changed(),
            "skipping write"
        );
        return Ok(WriteOutcome::default());
    }

    let abs = abs_path(project_root, &edit.path);
    let mut outcome = WriteOutcome {
        written: true,
        backup: None,
    };

    if opts.backup_enabled {
        let backup_rel = Utf8PathBuf::from(format!("{}{}", edit.path, opts.backup_suffix));
        let backup_abs = abs_path(project_root, &backup_rel);
        fs::write(&backup_abs, &edit.before)
            .with_context(|| format!("write backup {}", backup_abs))?;
        debug!(backup = %backup_rel, "backup written");
        outcome.backup = Some(backup_rel);
    }

    fs::write(&abs, &edit.after).with_context(|| format!("write {}", abs))?;
    info!(podfile = %edit.path, sha256 = %edit.sha256_after, "podfile patched");
    Ok(outcome)
}

/// Prepare, check and write in one step.
pub fn apply_podfile(
    project_root: &Utf8Path,
    podfile: &Utf8Path,
    engine: &PatchEngine,
    ctx: &PatchContext,
    opts: &ApplyOptions,
) -> EditResult<(PodfileEdit, WriteOutcome)> {
    let edit = prepare_edit(project_root, podfile, engine, ctx)?;
    check_anchors(&edit, opts)?;
    let written = write_edit(project_root, &edit, opts)?;
    Ok((edit, written))
}

/// Unified diff of one file in `diff --git` form.
pub fn render_patch(path: &Utf8Path, old: &str, new: &str) -> String {
    if old == new {
        return String::new();
    }

    let mut out = String::new();
    out.push_str(&format!("diff --git a/{0} b/{0}\n", path));
    out.push_str(&format!("--- a/{0}\n+++ b/{0}\n", path));

    let patch = diffy::create_patch(old, new);
    let formatted = PatchFormatter::new().fmt_patch(&patch).to_string();
    // diffy emits its own `--- original` / `+++ modified` pair; keep only the hunks.
    for line in formatted
        .lines()
        .skip_while(|l| l.starts_with("--- ") || l.starts_with("+++ "))
    {
        out.push_str(line);
        out.push('\n');
    }

    out
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut h = Sha256::new();
    h.update(bytes);
    hex::encode(h.finalize())
}

fn abs_path(root: &Utf8Path, rel: &Utf8Path) -> Utf8PathBuf {
    if rel.is_absolute() {
        rel.to_path_buf()
    } else {
        root.join(rel)
    }
}
