//! Resolve the engine's inputs from an app project on disk.

use crate::ports::ProjectView;
use camino::{Utf8Path, Utf8PathBuf};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

pub const PODFILE_NAME: &str = "Podfile";

const XCODEPROJ_EXT: &str = ".xcodeproj";
const PODS_PROJECT: &str = "Pods.xcodeproj";

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("no Podfile at {0}")]
    MissingPodfile(Utf8PathBuf),

    #[error("no .xcodeproj found in {0}")]
    NoXcodeProject(Utf8PathBuf),

    #[error("failed to parse {path}: {source}")]
    InvalidJson {
        path: Utf8PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Io(#[from] anyhow::Error),
}

/// `<platform_dir>/Podfile`, erroring when it does not exist.
pub fn podfile_path(
    project: &dyn ProjectView,
    platform_dir: &Utf8Path,
) -> Result<Utf8PathBuf, ProjectError> {
    let path = platform_dir.join(PODFILE_NAME);
    if !project.exists(&path) {
        return Err(ProjectError::MissingPodfile(path));
    }
    Ok(path)
}

/// Name of the app's Xcode project: the first `*.xcodeproj` in the platform directory,
/// ignoring the generated `Pods.xcodeproj`.
pub fn discover_project_name(
    project: &dyn ProjectView,
    platform_dir: &Utf8Path,
) -> Result<String, ProjectError> {
    let mut candidates: Vec<String> = project
        .list_dir(platform_dir)?
        .into_iter()
        .filter(|name| name.ends_with(XCODEPROJ_EXT) && name != PODS_PROJECT)
        .collect();
    candidates.sort();

    let Some(first) = candidates.first() else {
        return Err(ProjectError::NoXcodeProject(platform_dir.to_path_buf()));
    };
    let name = first.strip_suffix(XCODEPROJ_EXT).unwrap_or(first).to_string();
    debug!(project_name = %name, candidates = candidates.len(), "discovered project name");
    Ok(name)
}

/// SDK version declared by the app: `expo.sdkVersion` (or a top-level `sdkVersion`) in
/// `app.json`, else `<major>.0.0` of the installed `expo` package.
pub fn discover_sdk_version(project: &dyn ProjectView) -> Result<Option<String>, ProjectError> {
    let app_json = Utf8Path::new("app.json");
    if project.exists(app_json) {
        let json = read_json(project, app_json)?;
        let declared = json
            .get("expo")
            .and_then(|expo| expo.get("sdkVersion"))
            .or_else(|| json.get("sdkVersion"))
            .and_then(Value::as_str);
        if let Some(v) = declared {
            debug!(sdk_version = v, "sdk version from app.json");
            return Ok(Some(v.to_string()));
        }
    }

    let expo_pkg = Utf8Path::new("node_modules/expo/package.json");
    if project.exists(expo_pkg) {
        let json = read_json(project, expo_pkg)?;
        if let Some(v) = json.get("version").and_then(Value::as_str) {
            let sdk = sdk_version_of_package(v);
            debug!(package_version = v, sdk_version = %sdk, "sdk version from installed expo package");
            return Ok(Some(sdk));
        }
    }

    Ok(None)
}

/// Package releases map onto the SDK by major version, so `52.0.0-preview.3` and
/// `52.0.7` both mean SDK `52.0.0`. Unparseable versions are passed through as-is.
fn sdk_version_of_package(version: &str) -> String {
    match semver::Version::parse(version.trim()) {
        Ok(v) => format!("{}.0.0", v.major),
        Err(_) => version.to_string(),
    }
}

fn read_json(project: &dyn ProjectView, rel: &Utf8Path) -> Result<Value, ProjectError> {
    let contents = project.read_to_string(rel)?;
    serde_json::from_str(&contents).map_err(|source| ProjectError::InvalidJson {
        path: rel.to_path_buf(),
        source,
    })
}
