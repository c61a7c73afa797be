//! Vivado control script generation
//!
//! Builds the batch-mode Tcl that creates a throwaway project in the
//! workspace, imports the operand files and HDL sources into `sim_1`, binds
//! the array size generic and runs behavioural simulation to completion.

use std::fs;
use std::path::PathBuf;

use crate::data_io::DATA_FILES;
use crate::error::{HarnessError, Result};
use crate::workspace::Workspace;

/// Script file name inside the workspace.
pub const CONTROL_SCRIPT: &str = "run_script.tcl";

/// Default target part (Virtex-7 690T).
pub const DEFAULT_PART: &str = "xc7vx690tffg1157-1";

/// Default simulation top entity.
pub const DEFAULT_TOP: &str = "tb";

#[derive(Debug, Clone)]
pub struct ControlScript {
    pub part: String,
    pub top: String,
    pub num_pes: usize,
}

impl ControlScript {
    pub fn new(part: &str, top: &str, num_pes: usize) -> Self {
        Self {
            part: part.to_string(),
            top: top.to_string(),
            num_pes,
        }
    }

    pub fn render(&self) -> String {
        let mut tcl = String::new();
        tcl.push_str(&format!(
            "create_project sim_project ./sim_project -part {} -force\n",
            self.part
        ));
        for data in DATA_FILES {
            tcl.push_str(&format!(
                "import_files -fileset sim_1 -norecurse ./{}\n",
                data
            ));
        }
        tcl.push_str("import_files -fileset sim_1 -norecurse ./\n");
        tcl.push_str("update_compile_order -fileset sim_1\n");
        tcl.push_str(&format!(
            "set_property top {} [get_filesets sim_1]\n",
            self.top
        ));
        tcl.push_str("set_property XELAB.MT_LEVEL off [get_filesets sim_1]\n");
        tcl.push_str(
            "set_property -name {xsim.simulate.runtime} -value {-all} -objects [get_filesets sim_1]\n",
        );
        tcl.push_str(&format!(
            "set_property generic {{N={}}} [get_filesets sim_1]\n",
            self.num_pes
        ));
        tcl.push_str("launch_simulation\n");
        tcl.push_str("close_sim\n");
        tcl.push_str("exit\n");
        tcl
    }

    /// Write the rendered script into the workspace.
    pub fn write_to(&self, ws: &Workspace) -> Result<PathBuf> {
        let path = ws.join(CONTROL_SCRIPT);
        fs::write(&path, self.render()).map_err(|e| HarnessError::io(&path, e))?;
        Ok(path)
    }
}
