//! Test orchestration
//!
//! ```text
//! ┌───────────┐   ┌───────────┐   ┌───────────┐   ┌───────────┐   ┌───────────┐
//! │ Workspace │──▶│ Operands  │──▶│ Data +    │──▶│ Simulator │──▶│ SimReport │
//! │ reset+HDL │   │ A, B, C   │   │ Tcl files │   │ (runner)  │   │ pass/fail │
//! └───────────┘   └───────────┘   └───────────┘   └───────────┘   └───────────┘
//! ```
//!
//! Strictly linear, single attempt. Filesystem and spawn failures abort the
//! run as errors; a simulation that reports mismatches is a `false` verdict.

use std::path::PathBuf;
use std::time::Instant;

use crate::config::HarnessConfig;
use crate::data_io::write_operands;
use crate::error::{HarnessError, Result};
use crate::perf::RunTimings;
use crate::simulator::{ShellRunner, SimReport, SimulationRunner};
use crate::stimulus::matrix_gen::GemmOperands;
use crate::tcl::{CONTROL_SCRIPT, ControlScript};
use crate::workspace::Workspace;

/// Workspace state after everything but the simulation has run.
#[derive(Debug)]
pub struct Prepared {
    pub workspace: Workspace,
    pub operands: GemmOperands,
    /// HDL file names copied into the workspace
    pub staged: Vec<PathBuf>,
    pub data_files: Vec<PathBuf>,
    pub script: PathBuf,
    pub timings: RunTimings,
}

pub struct TestHarness<R = ShellRunner> {
    config: HarnessConfig,
    runner: R,
}

impl TestHarness<ShellRunner> {
    /// Harness that launches the configured runner script.
    pub fn new(config: HarnessConfig) -> Self {
        let runner = ShellRunner::new(config.runner.clone());
        Self { config, runner }
    }
}

impl<R: SimulationRunner> TestHarness<R> {
    pub fn with_runner(config: HarnessConfig, runner: R) -> Self {
        Self { config, runner }
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Reset the workspace, stage HDL, write operand files and the control
    /// script. Does not touch the simulator.
    pub fn prepare(&self, num_pes: usize, seed: i64) -> Result<Prepared> {
        if num_pes == 0 {
            return Err(HarnessError::InvalidSize(num_pes));
        }
        let mut timings = RunTimings::default();

        let start = Instant::now();
        let workspace = Workspace::reset(&self.config.workspace_dir)?;
        let staged = workspace.stage_sources(&self.config.src_dir, &self.config.hdl_extensions)?;
        timings.add_staging_time(start.elapsed());

        let start = Instant::now();
        let operands = GemmOperands::generate(num_pes, seed)?;
        tracing::info!("A = \n{}", operands.a);
        tracing::info!("B = \n{}", operands.b);
        tracing::info!("C = \n{}", operands.c);

        let data_files = write_operands(workspace.path(), &operands)?;
        let script =
            ControlScript::new(&self.config.part, &self.config.top, num_pes).write_to(&workspace)?;
        timings.add_generation_time(start.elapsed());

        Ok(Prepared {
            workspace,
            operands,
            staged,
            data_files,
            script,
            timings,
        })
    }

    /// Run the simulator on a prepared workspace and classify its log.
    pub fn simulate(&self, prepared: &mut Prepared) -> Result<SimReport> {
        let start = Instant::now();
        let output = self.runner.run(&prepared.workspace, CONTROL_SCRIPT)?;
        let report = SimReport::from_run(&output, self.config.fail_on_nonzero_exit);
        prepared.timings.add_simulation_time(start.elapsed());

        if let Some(reason) = &report.exit_failure {
            tracing::warn!("{}", reason);
        }
        Ok(report)
    }

    /// Full run without printing: prepare, simulate, classify.
    pub fn run_report(&self, num_pes: usize, seed: i64) -> Result<SimReport> {
        let mut prepared = self.prepare(num_pes, seed)?;
        let report = self.simulate(&mut prepared)?;
        prepared.timings.log();
        Ok(report)
    }

    /// Full run. Prints `Simulation Passed` or `Simulation Failed` plus the
    /// testbench diagnostics, and returns the verdict.
    pub fn run_test(&self, num_pes: usize, seed: i64) -> Result<bool> {
        let report = self.run_report(num_pes, seed)?;
        println!("{}", report.summary());
        Ok(report.passed())
    }
}

/// Run with default paths (`./src`, `./sim`, `./run_vivado.sh`).
pub fn run_test(num_pes: usize, seed: i64) -> Result<bool> {
    TestHarness::new(HarnessConfig::default()).run_test(num_pes, seed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_io::{A_DATA, load_operands};
    use crate::simulator::RunOutput;
    use std::cell::RefCell;
    use std::fs;
    use std::path::Path;

    /// Replays a canned log and records what it was asked to run.
    struct CannedRunner {
        stdout: String,
        exit_code: Option<i32>,
        calls: RefCell<Vec<(PathBuf, String)>>,
    }

    impl CannedRunner {
        fn new(stdout: &str) -> Self {
            Self {
                stdout: stdout.to_string(),
                exit_code: Some(0),
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl SimulationRunner for CannedRunner {
        fn run(&self, ws: &Workspace, script: &str) -> Result<RunOutput> {
            assert!(ws.join(script).is_file(), "control script not written");
            self.calls
                .borrow_mut()
                .push((ws.path().to_path_buf(), script.to_string()));
            Ok(RunOutput {
                stdout: self.stdout.clone(),
                stderr: String::new(),
                exit_code: self.exit_code,
            })
        }
    }

    fn config_in(root: &Path) -> HarnessConfig {
        let src = root.join("src");
        fs::create_dir_all(&src).unwrap();
        fs::write(src.join("systolic_array.sv"), "module systolic_array; endmodule").unwrap();
        fs::write(src.join("tb.sv"), "module tb; endmodule").unwrap();
        HarnessConfig {
            src_dir: src,
            workspace_dir: root.join("sim"),
            ..HarnessConfig::default()
        }
    }

    #[test]
    fn test_prepare_populates_workspace() {
        let tmp = tempfile::tempdir().unwrap();
        let harness = TestHarness::with_runner(config_in(tmp.path()), CannedRunner::new(""));

        let prepared = harness.prepare(2, 0).unwrap();
        let ws = prepared.workspace.path();

        assert_eq!(prepared.staged.len(), 2);
        assert!(ws.join("tb.sv").is_file());
        assert_eq!(fs::read_to_string(ws.join(A_DATA)).unwrap(), "d9\nc3\n63\ne4\n");
        assert_eq!(prepared.script, ws.join(CONTROL_SCRIPT));
        assert!(
            fs::read_to_string(&prepared.script)
                .unwrap()
                .contains("generic {N=2}")
        );
        assert_eq!(load_operands(ws, 2).unwrap(), prepared.operands);
    }

    #[test]
    fn test_run_passes_on_clean_log() {
        let tmp = tempfile::tempdir().unwrap();
        let config = config_in(tmp.path());
        let runner = CannedRunner::new("Test complete\n");
        let harness = TestHarness::with_runner(config.clone(), runner);

        assert!(harness.run_test(3, 1).unwrap());
        let calls = harness.runner.calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, config.workspace_dir);
        assert_eq!(calls[0].1, CONTROL_SCRIPT);
    }

    #[test]
    fn test_run_fails_on_error_line() {
        let tmp = tempfile::tempdir().unwrap();
        let runner = CannedRunner::new("C[0][0] = 0x0, expected 0x7575\nError: mismatch\n");
        let harness = TestHarness::with_runner(config_in(tmp.path()), runner);

        let report = harness.run_report(2, 0).unwrap();
        assert!(!report.passed());
        assert_eq!(report.diagnostics, vec!["C[0][0] = 0x0, expected 0x7575"]);
    }

    #[test]
    fn test_exit_status_policy() {
        let tmp = tempfile::tempdir().unwrap();
        let mut runner = CannedRunner::new("all good\n");
        runner.exit_code = Some(2);

        let harness = TestHarness::with_runner(config_in(tmp.path()), runner);
        assert!(!harness.run_test(2, 0).unwrap());

        let TestHarness { mut config, runner } = harness;
        config.fail_on_nonzero_exit = false;
        let harness = TestHarness::with_runner(config, runner);
        assert!(harness.run_test(2, 0).unwrap());
    }

    #[test]
    fn test_rerun_reproduces_identical_files() {
        let tmp = tempfile::tempdir().unwrap();
        let harness = TestHarness::with_runner(config_in(tmp.path()), CannedRunner::new(""));

        let first = harness.prepare(4, 17).unwrap();
        let snapshot: Vec<Vec<u8>> = first
            .data_files
            .iter()
            .map(|p| fs::read(p).unwrap())
            .collect();
        fs::write(first.workspace.join("leftover.log"), "stale").unwrap();

        let second = harness.prepare(4, 17).unwrap();
        let again: Vec<Vec<u8>> = second
            .data_files
            .iter()
            .map(|p| fs::read(p).unwrap())
            .collect();
        assert_eq!(snapshot, again);
        assert!(!second.workspace.join("leftover.log").exists());
    }

    #[test]
    fn test_missing_source_dir_is_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        let config = HarnessConfig {
            src_dir: tmp.path().join("missing"),
            workspace_dir: tmp.path().join("sim"),
            ..HarnessConfig::default()
        };
        let harness = TestHarness::with_runner(config, CannedRunner::new(""));

        let err = harness.run_test(2, 0).unwrap_err();
        assert!(matches!(err, HarnessError::SourceDirMissing(_)));
        assert!(harness.runner.calls.borrow().is_empty());
    }

    #[test]
    fn test_zero_pes_leaves_workspace_alone() {
        let tmp = tempfile::tempdir().unwrap();
        let config = config_in(tmp.path());
        fs::create_dir_all(&config.workspace_dir).unwrap();
        fs::write(config.workspace_dir.join("keep.txt"), "x").unwrap();

        let harness = TestHarness::with_runner(config.clone(), CannedRunner::new(""));
        assert!(matches!(
            harness.prepare(0, 0),
            Err(HarnessError::InvalidSize(0))
        ));
        assert!(config.workspace_dir.join("keep.txt").exists());
    }
}
