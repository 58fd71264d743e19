mod build;
mod check;
mod output;

pub use build::{BuildReport, BuildResult, PreviewFile, WrittenResult};
pub use check::CheckReport;
pub use output::{Report, TerminalOutput};
