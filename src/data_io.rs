//! Data File I/O - Hex operand files consumed by the testbench
//!
//! The testbench `$readmemh`s three files from the simulation directory, one
//! value per line, lowercase hex, no prefix:
//!
//! - `Adata` - A transposed (column-major read of A)
//! - `Bdata` - B row-major, NOT transposed
//! - `Cdata` - C transposed
//!
//! The A/C vs B asymmetry matches how the array streams operands: A enters
//! column by column, B row by row, and results drain column by column.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use ndarray::Array2;

use crate::error::{HarnessError, Result};
use crate::stimulus::matrix_gen::{ELEMENT_END, ELEMENT_MIN, GemmOperands};

// ============================================================
// File names
// ============================================================

pub const A_DATA: &str = "Adata";
pub const B_DATA: &str = "Bdata";
pub const C_DATA: &str = "Cdata";

/// All data files, in the order they are written and imported.
pub const DATA_FILES: [&str; 3] = [A_DATA, B_DATA, C_DATA];

// ============================================================
// Writing
// ============================================================

/// Write one lowercase hex value per line.
pub fn write_hex_column<I>(path: &Path, values: I) -> Result<()>
where
    I: IntoIterator<Item = u64>,
{
    let file = File::create(path).map_err(|e| HarnessError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    for value in values {
        writeln!(writer, "{:x}", value).map_err(|e| HarnessError::io(path, e))?;
    }
    writer.flush().map_err(|e| HarnessError::io(path, e))
}

/// Write `Adata`, `Bdata` and `Cdata` into `dir`.
///
/// Returns the written paths in [`DATA_FILES`] order.
pub fn write_operands(dir: &Path, ops: &GemmOperands) -> Result<Vec<PathBuf>> {
    let a_path = dir.join(A_DATA);
    let b_path = dir.join(B_DATA);
    let c_path = dir.join(C_DATA);

    write_hex_column(&a_path, ops.a.t().iter().copied())?;
    write_hex_column(&b_path, ops.b.iter().copied())?;
    write_hex_column(&c_path, ops.c.t().iter().copied())?;

    tracing::debug!(
        num_pes = ops.num_pes(),
        dir = %dir.display(),
        "Wrote operand data files"
    );

    Ok(vec![a_path, b_path, c_path])
}

// ============================================================
// Reading back
// ============================================================

/// Parse a hex data file. Blank lines, `0x` prefixes and uppercase digits
/// are rejected since the writer never produces them.
pub fn read_hex_column(path: &Path) -> Result<Vec<u64>> {
    let file = File::open(path).map_err(|e| HarnessError::io(path, e))?;
    let reader = BufReader::new(file);
    let mut values = Vec::new();

    for (line_num, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| HarnessError::io(path, e))?;
        let bad = |reason: &str| HarnessError::DataFormat {
            path: path.to_path_buf(),
            line: line_num + 1,
            reason: reason.to_string(),
        };

        if line.is_empty() {
            return Err(bad("empty line"));
        }
        if !line.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')) {
            return Err(bad(&format!("not a lowercase hex value: {:?}", line)));
        }
        let value = u64::from_str_radix(&line, 16).map_err(|e| bad(&e.to_string()))?;
        values.push(value);
    }

    Ok(values)
}

/// Read all three data files from `dir` and undo the transposes.
pub fn load_operands(dir: &Path, num_pes: usize) -> Result<GemmOperands> {
    let a = load_matrix(&dir.join(A_DATA), num_pes)?.reversed_axes();
    let b = load_matrix(&dir.join(B_DATA), num_pes)?;
    let c = load_matrix(&dir.join(C_DATA), num_pes)?.reversed_axes();
    Ok(GemmOperands { a, b, c })
}

fn load_matrix(path: &Path, n: usize) -> Result<Array2<u64>> {
    let values = read_hex_column(path)?;
    let count = values.len();
    if count != n * n {
        return Err(HarnessError::DataFormat {
            path: path.to_path_buf(),
            line: count,
            reason: format!("expected {} values for N={}, found {}", n * n, n, count),
        });
    }
    Array2::from_shape_vec((n, n), values).map_err(|e| HarnessError::DataFormat {
        path: path.to_path_buf(),
        line: count,
        reason: e.to_string(),
    })
}

// ============================================================
// Verification
// ============================================================

/// Check operand ranges and that C is exactly A x B.
pub fn verify_operands(ops: &GemmOperands) -> std::result::Result<(), String> {
    let n = ops.num_pes();
    for (name, m) in [("A", &ops.a), ("B", &ops.b), ("C", &ops.c)] {
        if m.dim() != (n, n) {
            return Err(format!("{} has shape {:?}, expected ({}, {})", name, m.dim(), n, n));
        }
    }

    let range = ELEMENT_MIN as u64..ELEMENT_END as u64;
    for (name, m) in [("A", &ops.a), ("B", &ops.b)] {
        if let Some(((row, col), v)) = m.indexed_iter().find(|(_, v)| !range.contains(*v)) {
            return Err(format!(
                "{}[{}][{}] = {} outside [{}, {})",
                name, row, col, v, ELEMENT_MIN, ELEMENT_END
            ));
        }
    }

    let expected = ops.a.dot(&ops.b);
    if let Some(((row, col), v)) = ops
        .c
        .indexed_iter()
        .find(|&((row, col), v)| expected[[row, col]] != *v)
    {
        return Err(format!(
            "C[{}][{}] = {}, expected {}",
            row,
            col,
            v,
            expected[[row, col]]
        ));
    }

    Ok(())
}
