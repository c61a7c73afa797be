//! Systolic GEMM Harness - command line entry point
//!
//! ```text
//! systolic_gemm_harness <N> [--seed S] [--verbose] [--env ENV] [--dry-run]
//! ```
//!
//! Exits 0 whether the simulation passes or fails; the verdict is printed.
//! Only setup failures (missing sources, unlaunchable runner, filesystem
//! errors) produce a non-zero exit.

use anyhow::{Context, Result};
use clap::Parser;

use systolic_gemm_harness::config::AppConfig;
use systolic_gemm_harness::data_io::{load_operands, verify_operands};
use systolic_gemm_harness::harness::TestHarness;
use systolic_gemm_harness::logging::init_logging;

const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("GIT_HASH"), ")");

/// Simulate N-PE GEMM Array
#[derive(Parser)]
#[command(author, version = VERSION, about, long_about = None)]
struct Cli {
    /// Number of elements in the PE array (side length of A, B and C)
    #[arg(value_name = "N")]
    num_pes: usize,

    /// Seed for matrix generation
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    seed: i64,

    /// Enable verbose output (echo operands and simulator log)
    #[arg(short, long)]
    verbose: bool,

    /// Configuration environment, read from config/<ENV>.yaml
    #[arg(short, long, default_value = "dev")]
    env: String,

    /// Prepare the workspace and check the data files, but skip simulation
    #[arg(long)]
    dry_run: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let app_config = AppConfig::load(&cli.env)?;
    let _log_guard = init_logging(&app_config, cli.verbose);

    tracing::info!(
        num_pes = cli.num_pes,
        seed = cli.seed,
        env = %cli.env,
        "Starting {}-PE GEMM array simulation",
        cli.num_pes
    );

    let harness = TestHarness::new(app_config.harness);

    if cli.dry_run {
        let prepared = harness
            .prepare(cli.num_pes, cli.seed)
            .context("Failed to prepare simulation workspace")?;
        let on_disk = load_operands(prepared.workspace.path(), cli.num_pes)?;
        verify_operands(&on_disk)
            .map_err(anyhow::Error::msg)
            .context("Data file self-check failed")?;
        println!(
            "Workspace ready: {} ({} HDL sources, {} data files, {})",
            prepared.workspace.path().display(),
            prepared.staged.len(),
            prepared.data_files.len(),
            prepared.script.display()
        );
        return Ok(());
    }

    harness
        .run_test(cli.num_pes, cli.seed)
        .context("Simulation run aborted")?;
    Ok(())
}
