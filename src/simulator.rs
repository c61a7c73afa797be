//! Simulator invocation and log classification
//!
//! The simulator is a closed tool reached through a wrapper script. Everything
//! the harness knows about the outcome comes from scraping its stdout:
//!
//! - any line containing `Error` fails the run
//! - lines containing `expected` are the testbench's mismatch diagnostics
//!
//! [`SimulationRunner`] keeps the process plumbing behind one call so the
//! classifier can be tested on canned logs.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::error::{HarnessError, Result};
use crate::workspace::Workspace;

/// Substring that marks a failed simulation.
pub const ERROR_MARKER: &str = "Error";

/// Substring that marks a testbench diagnostic line.
pub const DIAGNOSTIC_MARKER: &str = "expected";

// ============================================================
// Runner
// ============================================================

/// Raw result of one simulator process.
#[derive(Debug, Clone, Default)]
pub struct RunOutput {
    pub stdout: String,
    pub stderr: String,
    /// `None` when the process was killed by a signal.
    pub exit_code: Option<i32>,
}

impl RunOutput {
    pub fn exited_cleanly(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Runs the simulation described by `script` inside `ws`.
pub trait SimulationRunner {
    fn run(&self, ws: &Workspace, script: &str) -> Result<RunOutput>;
}

/// Invokes `<runner> <workspace> <script>` and blocks until it exits.
#[derive(Debug, Clone)]
pub struct ShellRunner {
    runner: PathBuf,
}

impl ShellRunner {
    pub fn new(runner: impl Into<PathBuf>) -> Self {
        Self {
            runner: runner.into(),
        }
    }

    pub fn runner(&self) -> &Path {
        &self.runner
    }
}

impl SimulationRunner for ShellRunner {
    fn run(&self, ws: &Workspace, script: &str) -> Result<RunOutput> {
        tracing::info!(
            runner = %self.runner.display(),
            workspace = %ws.path().display(),
            script,
            "Launching simulation"
        );

        let output = Command::new(&self.runner)
            .arg(ws.path())
            .arg(script)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|source| HarnessError::RunnerSpawn {
                runner: self.runner.clone(),
                source,
            })?;

        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        for line in stderr.lines() {
            tracing::warn!("{}", line);
        }

        Ok(RunOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr,
            exit_code: output.status.code(),
        })
    }
}

// ============================================================
// Report
// ============================================================

/// Classified simulator log.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimReport {
    /// Lines containing [`ERROR_MARKER`].
    pub error_lines: Vec<String>,
    /// Lines containing [`DIAGNOSTIC_MARKER`], shown when the run fails.
    pub diagnostics: Vec<String>,
    /// Set when the runner exit status alone fails the run.
    pub exit_failure: Option<String>,
    pub line_count: usize,
}

impl SimReport {
    /// Classify a captured log. Every line is echoed at info level.
    pub fn parse(output: &str) -> Self {
        let mut report = Self::default();
        for line in output.lines() {
            tracing::info!("{}", line);
            report.line_count += 1;
            if line.contains(ERROR_MARKER) {
                report.error_lines.push(line.to_string());
            }
            if line.contains(DIAGNOSTIC_MARKER) {
                report.diagnostics.push(line.to_string());
            }
        }
        report
    }

    /// Classify a runner result. When `check_exit` is set a non-zero or
    /// missing exit code fails the run even if the log looks clean.
    pub fn from_run(run: &RunOutput, check_exit: bool) -> Self {
        let mut report = Self::parse(&run.stdout);
        if check_exit && !run.exited_cleanly() {
            report.exit_failure = Some(match run.exit_code {
                Some(code) => format!("simulator runner exited with status {}", code),
                None => "simulator runner terminated by signal".to_string(),
            });
        }
        report
    }

    pub fn passed(&self) -> bool {
        self.error_lines.is_empty() && self.exit_failure.is_none()
    }

    /// Text printed for the run: the verdict, then diagnostics on failure.
    pub fn summary(&self) -> String {
        if self.passed() {
            return "Simulation Passed".to_string();
        }
        let mut out = String::from("Simulation Failed");
        if let Some(reason) = &self.exit_failure {
            out.push('\n');
            out.push_str(reason);
        }
        for line in &self.diagnostics {
            out.push('\n');
            out.push_str(line);
        }
        out
    }
}
