//! Run Timings - Per-phase wall clock breakdown of one harness run
//!
//! Simulation dominates by orders of magnitude; the breakdown mostly exists
//! to spot slow staging on network filesystems.

use std::time::Duration;

/// Wall clock spent in each phase of a run (nanoseconds)
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunTimings {
    pub staging_ns: u64,    // Workspace reset + HDL copy
    pub generation_ns: u64, // Operands + data files + control script
    pub simulation_ns: u64, // Runner process + log classification
}

impl RunTimings {
    #[inline]
    pub fn add_staging_time(&mut self, elapsed: Duration) {
        self.staging_ns += elapsed.as_nanos() as u64;
    }

    #[inline]
    pub fn add_generation_time(&mut self, elapsed: Duration) {
        self.generation_ns += elapsed.as_nanos() as u64;
    }

    #[inline]
    pub fn add_simulation_time(&mut self, elapsed: Duration) {
        self.simulation_ns += elapsed.as_nanos() as u64;
    }

    pub fn total_ns(&self) -> u64 {
        self.staging_ns + self.generation_ns + self.simulation_ns
    }

    /// Percentage breakdown (staging, generation, simulation)
    pub fn breakdown_pct(&self) -> (f64, f64, f64) {
        let total = self.total_ns() as f64;
        if total == 0.0 {
            return (0.0, 0.0, 0.0);
        }
        (
            self.staging_ns as f64 / total * 100.0,
            self.generation_ns as f64 / total * 100.0,
            self.simulation_ns as f64 / total * 100.0,
        )
    }

    pub fn log(&self) {
        let (stage, generate, simulate) = self.breakdown_pct();
        tracing::debug!(
            total_ms = self.total_ns() / 1_000_000,
            staging_pct = stage,
            generation_pct = generate,
            simulation_pct = simulate,
            "Run timing breakdown"
        );
    }
}
