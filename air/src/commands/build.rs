use std::path::PathBuf;

use air_codegen::Target;
use clap::Args;
use eyre::{Context, Result, bail};

use super::UnwrapOrExit;
use crate::ops::build::{BuildOptions, build};
use crate::reports::{Report, TerminalOutput};

#[derive(Args)]
pub struct BuildCommand {
    /// Path to the AIR source document
    pub file: PathBuf,

    /// Output directory for the generated bundle
    #[arg(short, long, default_value = "dist")]
    pub out: PathBuf,

    /// Bundle target to generate
    #[arg(short, long, default_value = "all")]
    pub target: String,

    /// Preview generated files without writing to disk
    #[arg(long)]
    pub dry_run: bool,
}

impl BuildCommand {
    /// Run the build command
    pub fn run(&self) -> Result<()> {
        let source = std::fs::read_to_string(&self.file)
            .wrap_err_with(|| format!("Failed to read {}", self.file.display()))?;
        let filename = self.file.display().to_string();
        let ast = air_parser::parse_named(&source, &filename).unwrap_or_exit();

        let Some(target) = Target::parse(&self.target) else {
            bail!(
                "invalid target '{}', expected all|client|server|docs",
                self.target
            );
        };

        let report = build(
            &ast,
            BuildOptions {
                out_dir: &self.out,
                target,
                source_lines: source.lines().count(),
                dry_run: self.dry_run,
            },
        )?;

        report.render(&mut TerminalOutput::new());
        Ok(())
    }
}
