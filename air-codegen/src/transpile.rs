//! The transpile orchestrator: context extraction, UI analysis,
//! generator invocation, and bundle post-processing.

use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use air_ast::AirAst;
use air_core::{OutputFile, generated_by};
use eyre::Result;

use crate::analyze::analyze_ui;
use crate::context::TranspileContext;
use crate::deadcode::dead_lines;
use crate::generator::{Generator, Target};
use crate::generators::builtin_generators;
use crate::manifest::BundleManifest;

/// Options for one transpile call.
#[derive(Debug, Clone, Default)]
pub struct TranspileOptions {
    pub target: Target,
    /// Source line count, used only for the compression-ratio
    /// statistic. Never affects generated content.
    pub source_lines: Option<usize>,
}

/// Wall-clock phase durations. Observational only.
#[derive(Debug, Clone, Copy, Default)]
pub struct PhaseTimings {
    pub extract: Duration,
    pub analyze: Duration,
    pub client: Duration,
    pub server: Duration,
    pub total: Duration,
}

/// Bundle statistics, computed from the final file list.
#[derive(Debug, Clone, Default)]
pub struct TranspileStats {
    pub input_lines: usize,
    pub output_lines: usize,
    /// Output lines per input line; zero when the input count is
    /// unknown.
    pub compression_ratio: f64,
    pub components: usize,
    pub pages: usize,
    pub hooks: usize,
    pub dead_lines: usize,
    pub timings: PhaseTimings,
}

/// A generated bundle: ordered files (manifest last) plus statistics.
#[derive(Debug, Clone)]
pub struct TranspileOutput {
    pub files: Vec<OutputFile>,
    pub stats: TranspileStats,
}

/// Compile a parsed document into an application bundle.
///
/// Deterministic: for a fixed AST and options, every file's content is
/// byte-identical across calls except the manifest's timestamp. A
/// single failed generator fails the whole call; no partial file list
/// escapes.
pub fn transpile(ast: &AirAst, options: &TranspileOptions) -> Result<TranspileOutput> {
    let started = Instant::now();
    let mut timings = PhaseTimings::default();

    let phase = Instant::now();
    let ctx = TranspileContext::extract(ast);
    timings.extract = phase.elapsed();

    let phase = Instant::now();
    let ui = analyze_ui(&ctx.ui);
    timings.analyze = phase.elapsed();

    let mut entries: Vec<(OutputFile, &'static str)> = Vec::new();
    for generator in builtin_generators() {
        if !options.target.includes(generator.target()) {
            continue;
        }
        let phase = Instant::now();
        let files = generator.generate(&ctx, &ui)?;
        let elapsed = phase.elapsed();
        match generator.target() {
            Target::Client => timings.client += elapsed,
            Target::Server => timings.server += elapsed,
            _ => {}
        }
        for file in files {
            let file = namespace(file, generator.as_ref(), &ctx);
            entries.push((file, generator.name()));
        }
    }

    let files_only: Vec<OutputFile> = entries.iter().map(|(f, _)| f.clone()).collect();
    let dead = dead_lines(&files_only);

    for (file, _) in &mut entries {
        stamp_provenance(file);
    }

    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    let manifest = BundleManifest::build(ast, &entries, timestamp)?;

    let mut files: Vec<OutputFile> = entries.into_iter().map(|(f, _)| f).collect();
    files.push(manifest.to_output_file()?);

    timings.total = started.elapsed();
    let output_lines: usize = files.iter().map(|f| f.line_count()).sum();
    let input_lines = options.source_lines.unwrap_or(0);
    let stats = TranspileStats {
        input_lines,
        output_lines,
        compression_ratio: if input_lines > 0 {
            output_lines as f64 / input_lines as f64
        } else {
            0.0
        },
        components: ui.components.len(),
        pages: ui.pages.len(),
        hooks: ctx.hooks.len(),
        dead_lines: dead,
        timings,
    };

    Ok(TranspileOutput { files, stats })
}

/// Rewrite a generator's logical path for its place in the bundle:
/// client files move under `client/` when the app has a backend.
fn namespace(file: OutputFile, generator: &dyn Generator, ctx: &TranspileContext) -> OutputFile {
    if generator.target() == Target::Client && ctx.has_backend {
        file.under("client")
    } else {
        file
    }
}

/// Prepend the generator stamp, comment syntax by extension. Markup
/// and data files are left untouched.
fn stamp_provenance(file: &mut OutputFile) {
    let stamp = generated_by();
    let comment = match file.extension() {
        "js" | "jsx" => format!("// generated by {stamp}\n"),
        "css" => format!("/* generated by {stamp} */\n"),
        _ => return,
    };
    file.content.insert_str(0, &comment);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::MANIFEST_PATH;
    use air_core::content_digest;
    use air_parser::parse;

    const SHOP: &str = "\
@app:shop
@state{cart:[int], filter:enum(all|sale)}
@ui(@page:shop(grid(*product_card)), @page:cart(list))
@api(crud:/products > products)
@db{ Product{id:int:primary:auto, name:str:required} \n Category{id:int:primary} }
@nav(/shop, /cart)
";

    fn run(source: &str) -> TranspileOutput {
        transpile(&parse(source).unwrap(), &TranspileOptions::default()).unwrap()
    }

    #[test]
    fn test_manifest_is_last_and_excludes_itself() {
        let out = run(SHOP);
        let last = out.files.last().unwrap();
        assert_eq!(last.path, MANIFEST_PATH);
        let manifest: BundleManifest = serde_json::from_str(&last.content).unwrap();
        assert_eq!(manifest.files.len(), out.files.len() - 1);
        assert!(manifest.files.iter().all(|f| f.path != MANIFEST_PATH));
    }

    #[test]
    fn test_manifest_hashes_agree_with_content() {
        let out = run(SHOP);
        let manifest: BundleManifest =
            serde_json::from_str(&out.files.last().unwrap().content).unwrap();
        for entry in &manifest.files {
            let file = out.files.iter().find(|f| f.path == entry.path).unwrap();
            assert_eq!(entry.hash, content_digest(&file.content));
            assert_eq!(entry.lines, file.line_count());
        }
    }

    #[test]
    fn test_deterministic_except_timestamp() {
        let ast = parse(SHOP).unwrap();
        let a = transpile(&ast, &TranspileOptions::default()).unwrap();
        let b = transpile(&ast, &TranspileOptions::default()).unwrap();

        assert_eq!(a.files.len(), b.files.len());
        for (fa, fb) in a.files.iter().zip(&b.files).take(a.files.len() - 1) {
            assert_eq!(fa, fb);
        }
        let mut ma: BundleManifest =
            serde_json::from_str(&a.files.last().unwrap().content).unwrap();
        let mut mb: BundleManifest =
            serde_json::from_str(&b.files.last().unwrap().content).unwrap();
        ma.timestamp = 0;
        mb.timestamp = 0;
        assert_eq!(ma, mb);
    }

    #[test]
    fn test_client_namespacing_under_backend() {
        let out = run(SHOP);
        assert!(out.files.iter().any(|f| f.path == "client/src/App.jsx"));
        assert!(out.files.iter().any(|f| f.path == "server/index.js"));
        assert!(out.files.iter().any(|f| f.path == "README.md"));

        let frontend_only = run("@app:t\n@ui(header)");
        assert!(frontend_only.files.iter().any(|f| f.path == "src/App.jsx"));
    }

    #[test]
    fn test_provenance_stamp_by_extension() {
        let out = run(SHOP);
        let app = out
            .files
            .iter()
            .find(|f| f.path == "client/src/App.jsx")
            .unwrap();
        assert!(app.content.starts_with("// generated by air v"));
        let css = out
            .files
            .iter()
            .find(|f| f.path == "client/src/styles.css")
            .unwrap();
        assert!(css.content.starts_with("/* generated by air v"));
        let html = out
            .files
            .iter()
            .find(|f| f.path == "client/index.html")
            .unwrap();
        assert!(html.content.starts_with("<!doctype html>"));
    }

    #[test]
    fn test_target_gating() {
        let ast = parse(SHOP).unwrap();
        let docs_only = transpile(
            &ast,
            &TranspileOptions {
                target: Target::Docs,
                source_lines: None,
            },
        )
        .unwrap();
        let paths: Vec<_> = docs_only.files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, vec!["README.md", MANIFEST_PATH]);
    }

    #[test]
    fn test_stats_counts() {
        let ast = parse(SHOP).unwrap();
        let out = transpile(
            &ast,
            &TranspileOptions {
                target: Target::All,
                source_lines: Some(7),
            },
        )
        .unwrap();
        assert_eq!(out.stats.pages, 2);
        assert!(out.stats.components >= 1);
        assert_eq!(out.stats.input_lines, 7);
        assert!(out.stats.output_lines > 0);
        assert!(out.stats.compression_ratio > 0.0);
    }

    #[test]
    fn test_ecommerce_context_flows_through() {
        let ast = parse(SHOP).unwrap();
        let ctx = TranspileContext::extract(&ast);
        assert!(ctx.is_ecommerce);
    }
}
