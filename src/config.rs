use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::tcl::{DEFAULT_PART, DEFAULT_TOP};

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    pub log_level: String,
    /// Empty disables the log file.
    pub log_dir: String,
    pub log_file: String,
    pub use_json: bool,
    pub rotation: String,
    pub harness: HarnessConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_dir: String::new(),
            log_file: "harness.log".to_string(),
            use_json: false,
            rotation: "never".to_string(),
            harness: HarnessConfig::default(),
        }
    }
}

/// Paths and simulator settings for one harness run
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct HarnessConfig {
    /// Directory holding the array RTL and testbench
    pub src_dir: PathBuf,
    /// Scratch directory, wiped on every run
    pub workspace_dir: PathBuf,
    /// Wrapper script that launches the simulator
    pub runner: PathBuf,
    pub part: String,
    pub top: String,
    pub hdl_extensions: Vec<String>,
    /// Treat a non-zero runner exit status as a failed simulation
    pub fail_on_nonzero_exit: bool,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            src_dir: PathBuf::from("src"),
            workspace_dir: PathBuf::from("sim"),
            runner: PathBuf::from("./run_vivado.sh"),
            part: DEFAULT_PART.to_string(),
            top: DEFAULT_TOP.to_string(),
            hdl_extensions: vec!["sv".to_string(), "v".to_string()],
            fail_on_nonzero_exit: true,
        }
    }
}

impl AppConfig {
    /// Load `config/<env>.yaml`, falling back to defaults when the file does
    /// not exist.
    pub fn load(env: &str) -> Result<Self> {
        Self::load_from(Path::new(&format!("config/{}.yaml", env)))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config yaml: {}", path.display()))
    }
}
