//! Clap-free settings for the patch pipeline.

use camino::Utf8PathBuf;
use podfix_edit::DEFAULT_BACKUP_SUFFIX;

/// Settings for the patch pipeline.
#[derive(Debug, Clone)]
pub struct PatchSettings {
    /// App project root (holds `app.json` and the platform directory).
    pub project_root: Utf8PathBuf,
    /// Platform directory relative to `project_root`.
    pub platform_dir: Utf8PathBuf,

    // Overrides; `None` means discover from the project.
    pub project_name: Option<String>,
    pub sdk_version: Option<String>,

    // Apply behaviour
    pub dry_run: bool,
    pub strict_anchors: bool,

    // Backups
    pub backup_enabled: bool,
    pub backup_suffix: String,
}

impl Default for PatchSettings {
    fn default() -> Self {
        Self {
            project_root: Utf8PathBuf::from("."),
            platform_dir: Utf8PathBuf::from("ios"),
            project_name: None,
            sdk_version: None,
            dry_run: true,
            strict_anchors: false,
            backup_enabled: true,
            backup_suffix: DEFAULT_BACKUP_SUFFIX.to_string(),
        }
    }
}
