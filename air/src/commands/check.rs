use std::path::PathBuf;

use clap::Args;
use eyre::{Context, Result};

use super::UnwrapOrExit;
use crate::ops::check::check;
use crate::reports::{Report, TerminalOutput};

#[derive(Args)]
pub struct CheckCommand {
    /// Path to the AIR source document
    pub file: PathBuf,
}

impl CheckCommand {
    /// Run the check command
    pub fn run(&self) -> Result<()> {
        let source = std::fs::read_to_string(&self.file)
            .wrap_err_with(|| format!("Failed to read {}", self.file.display()))?;
        let filename = self.file.display().to_string();
        let ast = air_parser::parse_named(&source, &filename).unwrap_or_exit();

        let report = check(&ast, &filename);
        report.render(&mut TerminalOutput::new());
        Ok(())
    }
}
