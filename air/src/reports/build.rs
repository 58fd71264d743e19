//! Build command report data structures.

use std::path::PathBuf;

use air_codegen::TranspileStats;

use super::output::{Output, Report};

/// Report data from a build.
#[derive(Debug)]
pub struct BuildReport {
    /// Application name from the document.
    pub app_name: String,

    /// Bundle statistics.
    pub stats: TranspileStats,

    /// Build result (files written or preview).
    pub result: BuildResult,
}

/// Result of a build.
#[derive(Debug)]
pub enum BuildResult {
    /// Files were written to disk.
    Written(WrittenResult),
    /// Dry-run preview.
    Preview(Vec<PreviewFile>),
}

/// Result when files were written to disk.
#[derive(Debug)]
pub struct WrittenResult {
    /// Output directory.
    pub out_dir: PathBuf,
    /// Number of files written.
    pub files: usize,
    /// Total bytes written.
    pub bytes: usize,
}

/// A file in preview mode.
#[derive(Debug)]
pub struct PreviewFile {
    pub path: String,
    pub content: String,
}

impl Report for BuildReport {
    fn render(&self, out: &mut dyn Output) {
        match &self.result {
            BuildResult::Written(written) => self.render_written(out, written),
            BuildResult::Preview(files) => self.render_preview(out, files),
        }
    }
}

impl BuildReport {
    fn render_written(&self, out: &mut dyn Output, written: &WrittenResult) {
        out.preformatted(&format!("{} compiled", self.app_name));
        out.newline();

        out.key_value("Output", &written.out_dir.display().to_string());
        out.key_value(
            "Files",
            &format!("{} ({} bytes)", written.files, written.bytes),
        );
        self.render_stats(out);
    }

    fn render_stats(&self, out: &mut dyn Output) {
        let stats = &self.stats;
        out.key_value(
            "Lines",
            &format!("{} in, {} out", stats.input_lines, stats.output_lines),
        );
        if stats.compression_ratio > 0.0 {
            out.key_value("Expansion", &format!("{:.1}x", stats.compression_ratio));
        }
        out.key_value(
            "Shape",
            &format!(
                "{} pages, {} components, {} hooks",
                stats.pages, stats.components, stats.hooks
            ),
        );
        if stats.dead_lines > 0 {
            out.warning(&format!("{} dead lines in generated output", stats.dead_lines));
        }
        out.key_value("Took", &format!("{:?}", stats.timings.total));
    }

    fn render_preview(&self, out: &mut dyn Output, files: &[PreviewFile]) {
        for file in files {
            out.divider(&file.path);
            out.preformatted(&file.content);
        }

        out.divider("Summary");
        out.preformatted(&format!("{} files would be generated", files.len()));
    }
}
