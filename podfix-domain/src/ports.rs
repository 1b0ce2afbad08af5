use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;

/// Read-only access to an app project (the directory holding `app.json` and `ios/`).
///
/// Discovery goes through this trait so it can be tested against an in-memory project.
pub trait ProjectView {
    fn root(&self) -> &Utf8Path;

    fn read_to_string(&self, rel: &Utf8Path) -> anyhow::Result<String>;

    fn exists(&self, rel: &Utf8Path) -> bool;

    /// Names of the entries directly under `rel`, in no particular order.
    fn list_dir(&self, rel: &Utf8Path) -> anyhow::Result<Vec<String>>;
}

/// File-system backed `ProjectView`.
#[derive(Debug, Clone)]
pub struct FsProjectView {
    root: Utf8PathBuf,
}

impl FsProjectView {
    pub fn new(root: Utf8PathBuf) -> Self {
        Self { root }
    }

    fn abs(&self, rel: &Utf8Path) -> Utf8PathBuf {
        if rel.is_absolute() {
            rel.to_path_buf()
        } else {
            self.root.join(rel)
        }
    }
}

impl ProjectView for FsProjectView {
    fn root(&self) -> &Utf8Path {
        &self.root
    }

    fn read_to_string(&self, rel: &Utf8Path) -> anyhow::Result<String> {
        let abs = self.abs(rel);
        fs::read_to_string(&abs).with_context(|| format!("read {}", abs))
    }

    fn exists(&self, rel: &Utf8Path) -> bool {
        self.abs(rel).exists()
    }

    fn list_dir(&self, rel: &Utf8Path) -> anyhow::Result<Vec<String>> {
        let abs = self.abs(rel);
        let mut names = Vec::new();
        for entry in fs::read_dir(&abs).with_context(|| format!("list {}", abs))? {
            let entry = entry.with_context(|| format!("list {}", abs))?;
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }
        Ok(names)
    }
}
