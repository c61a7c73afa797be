//! Systolic GEMM Harness - simulation test driver for an N-PE GEMM array
//!
//! Generates reproducible operand matrices, writes them where the testbench
//! expects them, drives a Vivado behavioural simulation and classifies the
//! log as pass or fail.
//!
//! # Modules
//!
//! - [`config`] - YAML configuration (paths, part, top entity, logging)
//! - [`logging`] - tracing subscriber setup
//! - [`error`] - Harness error types
//! - [`stimulus`] - Seeded operand generation and reference product
//! - [`data_io`] - Hex data files (`Adata`, `Bdata`, `Cdata`)
//! - [`workspace`] - Scratch directory reset and HDL staging
//! - [`tcl`] - Vivado control script
//! - [`simulator`] - Runner process and log classification
//! - [`harness`] - End-to-end orchestration
//! - [`perf`] - Per-phase timings

pub mod config;
pub mod data_io;
pub mod error;
pub mod harness;
pub mod logging;
pub mod perf;
pub mod simulator;
pub mod stimulus;
pub mod tcl;
pub mod workspace;

// Convenient re-exports at crate root
pub use config::{AppConfig, HarnessConfig};
pub use error::{HarnessError, Result};
pub use harness::{Prepared, TestHarness, run_test};
pub use simulator::{RunOutput, ShellRunner, SimReport, SimulationRunner};
pub use stimulus::matrix_gen::GemmOperands;
pub use stimulus::py_random::PyRandom;
pub use workspace::Workspace;
