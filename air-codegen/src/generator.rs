//! The generator seam between the orchestrator and its collaborators.

use air_core::OutputFile;
use eyre::Result;

use crate::analyze::UiAnalysis;
use crate::context::TranspileContext;

/// Which part of the bundle a transpile call produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Target {
    #[default]
    All,
    Client,
    Server,
    Docs,
}

impl Target {
    /// Whether a generator registered for `generator_target` runs under
    /// this selection.
    pub fn includes(&self, generator_target: Target) -> bool {
        matches!(self, Target::All) || *self == generator_target
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "all" => Some(Target::All),
            "client" => Some(Target::Client),
            "server" => Some(Target::Server),
            "docs" => Some(Target::Docs),
            _ => None,
        }
    }
}

/// A code generator for one bundle target.
///
/// Generators read the context and UI analysis but never mutate them;
/// output paths are relative and later namespaced by the orchestrator.
/// A failed generator fails the whole transpile call.
pub trait Generator {
    /// Name recorded in the manifest's provenance map.
    fn name(&self) -> &'static str;

    /// Which target selection this generator runs under.
    fn target(&self) -> Target;

    /// Produce this generator's files.
    fn generate(&self, ctx: &TranspileContext, ui: &UiAnalysis) -> Result<Vec<OutputFile>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_inclusion() {
        assert!(Target::All.includes(Target::Client));
        assert!(Target::All.includes(Target::Docs));
        assert!(Target::Client.includes(Target::Client));
        assert!(!Target::Client.includes(Target::Server));
        assert!(!Target::Docs.includes(Target::Client));
    }

    #[test]
    fn test_target_parse() {
        assert_eq!(Target::parse("all"), Some(Target::All));
        assert_eq!(Target::parse("server"), Some(Target::Server));
        assert_eq!(Target::parse("everything"), None);
    }
}
