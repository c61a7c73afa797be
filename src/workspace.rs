//! Simulation workspace
//!
//! One scratch directory per run. It is wiped and recreated at the start of
//! every run, so leftovers from a previous (possibly crashed) simulation
//! never leak into the next one. Nothing guards against two harness
//! processes sharing the same path.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{HarnessError, Result};

#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    /// Delete `root` if it exists, then create it empty.
    pub fn reset(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        if root.is_dir() {
            fs::remove_dir_all(&root).map_err(|e| HarnessError::io(&root, e))?;
        }
        fs::create_dir_all(&root).map_err(|e| HarnessError::io(&root, e))?;
        tracing::debug!(path = %root.display(), "Workspace reset");
        Ok(Self { root })
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    pub fn join(&self, name: impl AsRef<Path>) -> PathBuf {
        self.root.join(name)
    }

    /// Copy every regular file in `src_dir` whose extension is one of
    /// `extensions` into the workspace. Returns the copied file names,
    /// sorted.
    pub fn stage_sources(&self, src_dir: &Path, extensions: &[String]) -> Result<Vec<PathBuf>> {
        if !src_dir.is_dir() {
            return Err(HarnessError::SourceDirMissing(src_dir.to_path_buf()));
        }

        let entries = fs::read_dir(src_dir).map_err(|e| HarnessError::io(src_dir, e))?;
        let mut sources = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| HarnessError::io(src_dir, e))?;
            let path = entry.path();
            if path.is_file() && has_extension(&path, extensions) {
                sources.push(path);
            }
        }
        sources.sort();

        let mut staged = Vec::with_capacity(sources.len());
        for source in sources {
            // read_dir only yields entries with a final component
            let Some(name) = source.file_name() else {
                continue;
            };
            let dest = self.root.join(name);
            fs::copy(&source, &dest).map_err(|e| HarnessError::io(&source, e))?;
            staged.push(PathBuf::from(name));
        }

        if staged.is_empty() {
            tracing::warn!(
                src = %src_dir.display(),
                "No HDL sources found to stage"
            );
        } else {
            tracing::info!(count = staged.len(), "Staged HDL sources");
        }
        Ok(staged)
    }
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|e| e == ext))
}
