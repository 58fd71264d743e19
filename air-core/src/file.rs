use std::path::{Path, PathBuf};

use eyre::Result;
use serde::{Deserialize, Serialize};

/// A file produced by the transpiler, addressed relative to the
/// bundle's output directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputFile {
    /// Forward-slash relative path inside the bundle.
    pub path: String,
    pub content: String,
}

impl OutputFile {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }

    /// File extension, without the dot.
    pub fn extension(&self) -> &str {
        Path::new(&self.path)
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("")
    }

    pub fn line_count(&self) -> usize {
        self.content.lines().count()
    }

    /// Prefix the relative path with a directory.
    pub fn under(mut self, dir: &str) -> Self {
        self.path = format!("{}/{}", dir.trim_end_matches('/'), self.path);
        self
    }

    /// Write the file below `base`, creating parent directories.
    pub fn write(&self, base: &Path) -> Result<PathBuf> {
        let path = base.join(&self.path);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, &self.content)?;
        Ok(path)
    }
}

/// Outcome of writing a bundle to disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WriteReport {
    pub files: usize,
    pub bytes: usize,
}

/// Write every file below `base`. Existing files are overwritten; the
/// whole bundle is regenerated on every run.
pub fn write_bundle(base: &Path, files: &[OutputFile]) -> Result<WriteReport> {
    let mut report = WriteReport::default();
    for file in files {
        file.write(base)?;
        report.files += 1;
        report.bytes += file.content.len();
    }
    Ok(report)
}
