//! Configuration file loading for podfix.
//!
//! Discovers and loads `podfix.toml` from the project root.
//! Merges config file settings with CLI arguments (CLI takes precedence).

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use serde::Deserialize;
use tracing::debug;

/// The config file name to search for.
pub const CONFIG_FILE_NAME: &str = "podfix.toml";

pub const DEFAULT_PLATFORM_DIR: &str = "ios";
pub const DEFAULT_BACKUP_SUFFIX: &str = ".podfix.bak";

/// Top-level configuration from podfix.toml.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PodfixConfig {
    /// Patch inputs and policy.
    pub patch: PatchConfig,

    /// Backup settings.
    pub backups: BackupsConfig,
}

/// Patch section of the config.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PatchConfig {
    /// Platform directory holding the Podfile, relative to the project root.
    pub platform_dir: Option<Utf8PathBuf>,

    /// Xcode project name; discovered from `*.xcodeproj` when unset.
    pub project_name: Option<String>,

    /// SDK version; discovered from `app.json` or the installed package when unset.
    pub sdk_version: Option<String>,

    /// Treat missing anchors as a policy block.
    pub strict_anchors: bool,
}

/// Backups section of the config.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BackupsConfig {
    /// Whether to copy the Podfile aside before writing it.
    pub enabled: bool,

    /// Suffix for backup files.
    pub suffix: String,
}

impl Default for BackupsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            suffix: DEFAULT_BACKUP_SUFFIX.to_string(),
        }
    }
}

/// Discover the podfix.toml config file.
///
/// Returns `None` if no config file is found at the project root.
pub fn discover_config(project_root: &Utf8Path) -> Option<Utf8PathBuf> {
    let config_path = project_root.join(CONFIG_FILE_NAME);
    if config_path.exists() {
        debug!("found config file at {}", config_path);
        Some(config_path)
    } else {
        debug!("no config file found at {}", config_path);
        None
    }
}

/// Load and parse a podfix.toml config file.
pub fn load_config(path: &Utf8Path) -> anyhow::Result<PodfixConfig> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read config file {}", path))?;
    parse_config(&contents).with_context(|| format!("parse config file {}", path))
}

/// Parse a config file from a string.
pub fn parse_config(contents: &str) -> anyhow::Result<PodfixConfig> {
    let config: PodfixConfig = toml::from_str(contents).context("invalid TOML")?;
    Ok(config)
}

/// Load config from the project root, or return default if not found.
pub fn load_or_default(project_root: &Utf8Path) -> anyhow::Result<PodfixConfig> {
    match discover_config(project_root) {
        Some(path) => load_config(&path),
        None => Ok(PodfixConfig::default()),
    }
}

/// Values given on the command line for `podfix patch`.
#[derive(Debug, Clone, Default)]
pub struct PatchOverrides {
    pub platform_dir: Option<Utf8PathBuf>,
    pub project_name: Option<String>,
    pub sdk_version: Option<String>,
    pub strict: bool,
    pub no_backup: bool,
}

/// Merged configuration combining config file and CLI arguments.
#[derive(Debug, Clone)]
pub struct MergedConfig {
    pub platform_dir: Utf8PathBuf,
    pub project_name: Option<String>,
    pub sdk_version: Option<String>,
    pub strict_anchors: bool,
    pub backups: BackupsConfig,
}

/// Builder for merging config file with CLI arguments.
pub struct ConfigMerger {
    config: PodfixConfig,
}

impl ConfigMerger {
    /// Create a new merger from a loaded config.
    pub fn new(config: PodfixConfig) -> Self {
        Self { config }
    }

    /// Merge with patch command CLI arguments.
    ///
    /// Values override the file; boolean flags can only tighten it
    /// (`--strict` turns strict mode on, `--no-backup` turns backups off).
    pub fn merge_patch_args(self, cli: &PatchOverrides) -> MergedConfig {
        let patch = self.config.patch;
        let mut backups = self.config.backups;
        if cli.no_backup {
            backups.enabled = false;
        }

        MergedConfig {
            platform_dir: cli
                .platform_dir
                .clone()
                .or(patch.platform_dir)
                .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_PLATFORM_DIR)),
            project_name: cli.project_name.clone().or(patch.project_name),
            sdk_version: cli.sdk_version.clone().or(patch.sdk_version),
            strict_anchors: cli.strict || patch.strict_anchors,
            backups,
        }
    }
}
