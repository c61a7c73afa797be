//! Stimulus Generation Module
//!
//! Deterministic operand generation for the systolic GEMM testbench.
//!
//! # Components
//!
//! - [`py_random`] - CPython-compatible MT19937 PRNG
//! - [`matrix_gen`] - A/B operand generator and reference product

pub mod matrix_gen;
pub mod py_random;
