//! Harness Error Types
//!
//! Filesystem and process failures that abort a run. A simulation that runs
//! to completion but reports mismatches is not an error: it is a `false`
//! result from [`crate::harness::TestHarness::run_test`].

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("Array size must be at least 1 PE, got {0}")]
    InvalidSize(usize),

    #[error("HDL source directory not found: {}", .0.display())]
    SourceDirMissing(PathBuf),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to launch simulator runner {}: {source}", runner.display())]
    RunnerSpawn {
        runner: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed data file {} at line {line}: {reason}", path.display())]
    DataFormat {
        path: PathBuf,
        line: usize,
        reason: String,
    },
}

impl HarnessError {
    /// Wrap an `io::Error` with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, HarnessError>;
