//! Build operation: transpile a parsed document and write (or
//! preview) the bundle.

use std::path::Path;

use air_ast::AirAst;
use air_codegen::{Target, TranspileOptions, transpile};
use air_core::write_bundle;
use eyre::{Context, Result};

use crate::reports::{BuildReport, BuildResult, PreviewFile, WrittenResult};

/// Options for the build operation.
pub struct BuildOptions<'a> {
    /// Output directory for the generated bundle.
    pub out_dir: &'a Path,
    /// Bundle target selection.
    pub target: Target,
    /// Line count of the source document, for statistics.
    pub source_lines: usize,
    /// Whether to preview without writing files.
    pub dry_run: bool,
}

/// Execute the build operation.
pub fn build(ast: &AirAst, opts: BuildOptions) -> Result<BuildReport> {
    let output = transpile(
        ast,
        &TranspileOptions {
            target: opts.target,
            source_lines: Some(opts.source_lines),
        },
    )
    .wrap_err("Transpile failed")?;

    let result = if opts.dry_run {
        BuildResult::Preview(
            output
                .files
                .iter()
                .map(|f| PreviewFile {
                    path: f.path.clone(),
                    content: f.content.clone(),
                })
                .collect(),
        )
    } else {
        let report = write_bundle(opts.out_dir, &output.files)
            .wrap_err_with(|| format!("Failed to write bundle to {}", opts.out_dir.display()))?;
        BuildResult::Written(WrittenResult {
            out_dir: opts.out_dir.to_path_buf(),
            files: report.files,
            bytes: report.bytes,
        })
    };

    Ok(BuildReport {
        app_name: ast.app.name.clone(),
        stats: output.stats,
        result,
    })
}
