//! Docs target: a README describing the generated bundle.

use air_core::OutputFile;
use eyre::Result;

use crate::analyze::UiAnalysis;
use crate::context::TranspileContext;
use crate::generator::{Generator, Target};

pub struct DocsGenerator;

impl Generator for DocsGenerator {
    fn name(&self) -> &'static str {
        "docs"
    }

    fn target(&self) -> Target {
        Target::Docs
    }

    fn generate(&self, ctx: &TranspileContext, ui: &UiAnalysis) -> Result<Vec<OutputFile>> {
        let mut out = String::new();
        out.push_str(&format!("# {}\n\n", ctx.app_name));
        out.push_str("Generated application bundle.\n\n");

        if !ui.pages.is_empty() {
            out.push_str("## Pages\n\n");
            for page in &ui.pages {
                out.push_str(&format!("- {page}\n"));
            }
            out.push('\n');
        }

        if !ctx.routes.is_empty() {
            out.push_str("## API\n\n");
            out.push_str("| Method | Path | Handler |\n|---|---|---|\n");
            for route in &ctx.routes {
                out.push_str(&format!(
                    "| {} | {} | {} |\n",
                    route.method.as_str(),
                    route.path,
                    route.handler
                ));
            }
            out.push('\n');
        }

        if let Some(db) = &ctx.db {
            out.push_str("## Models\n\n");
            for model in &db.models {
                out.push_str(&format!("### {}\n\n", model.name));
                for field in &model.fields {
                    out.push_str(&format!("- `{}`", field.name));
                    if field.primary {
                        out.push_str(" (primary)");
                    }
                    if field.required {
                        out.push_str(" (required)");
                    }
                    out.push('\n');
                }
                out.push('\n');
            }
        }

        if ctx.has_backend {
            out.push_str("## Running\n\n```\nnode server/index.js\n```\n");
        }

        Ok(vec![OutputFile::new("README.md", out)])
    }
}
