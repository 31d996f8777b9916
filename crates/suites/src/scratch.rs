//! Per-run scratch directory.
//!
//! Every suite run gets a fresh directory named `<suite>_XXXXXX` (random
//! suffix from `tempfile`) under the configured work directory. All race
//! targets live inside it, so teardown is one recursive removal no matter
//! which targets the race left behind.

use mtfs_core::{Error, Result};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Uniquely named directory removed on `close` (or on drop).
#[derive(Debug)]
pub struct Scratch {
    dir: TempDir,
}

impl Scratch {
    /// Create `<prefix>_XXXXXX` inside `parent`.
    pub fn create(parent: &Path, prefix: &str) -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix(&format!("{}_", prefix))
            .tempdir_in(parent)
            .map_err(|e| {
                Error::io(
                    format!("creating scratch directory in {}", parent.display()),
                    e,
                )
            })?;
        Ok(Self { dir })
    }

    /// The scratch directory.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// A path inside the scratch directory.
    pub fn join(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Remove the directory and everything in it.
    pub fn close(self) -> Result<()> {
        let path = self.dir.path().to_path_buf();
        self.dir
            .close()
            .map_err(|e| Error::io(format!("removing {}", path.display()), e))
    }
}
