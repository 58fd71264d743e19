//! Dead-file detection over the generated bundle's import graph.

use std::collections::HashSet;
use std::path::{Component, Path};

use air_core::OutputFile;

/// Extensions that participate in the import graph.
const SOURCE_EXTENSIONS: &[&str] = &["js", "jsx"];

/// Paths consumed by the runtime rather than by static imports.
const ENTRY_PATTERNS: &[&str] = &["main.jsx", "index.html", "server/index.js", "seed.js"];

/// Relative paths of source files that no other file imports and that
/// match no entry-point pattern.
pub fn dead_files(files: &[OutputFile]) -> Vec<String> {
    let imported = imported_paths(files);
    files
        .iter()
        .filter(|f| SOURCE_EXTENSIONS.contains(&f.extension()))
        .filter(|f| !is_entry_point(&f.path))
        .filter(|f| !imported.contains(&f.path))
        .map(|f| f.path.clone())
        .collect()
}

/// Total line count of dead files.
pub fn dead_lines(files: &[OutputFile]) -> usize {
    let dead = dead_files(files);
    files
        .iter()
        .filter(|f| dead.contains(&f.path))
        .map(|f| f.line_count())
        .sum()
}

fn is_entry_point(path: &str) -> bool {
    ENTRY_PATTERNS.iter().any(|p| path.ends_with(p)) || path.contains("config")
}

/// Every bundle-relative path referenced by an import somewhere in the
/// bundle, resolved against the importing file's directory.
fn imported_paths(files: &[OutputFile]) -> HashSet<String> {
    let known: HashSet<&str> = files.iter().map(|f| f.path.as_str()).collect();
    let mut resolved = HashSet::new();
    for file in files {
        let dir = Path::new(&file.path).parent().unwrap_or(Path::new(""));
        for target in import_targets(&file.content) {
            if !target.starts_with('.') {
                continue;
            }
            if let Some(path) = resolve(dir, &target, &known) {
                resolved.insert(path);
            }
        }
    }
    resolved
}

/// Import specifiers in a file: static `from '...'` and dynamic
/// `import('...')`, either quote style.
fn import_targets(content: &str) -> Vec<String> {
    let mut targets = Vec::new();
    for line in content.lines() {
        for marker in ["from '", "from \"", "import('", "import(\""] {
            let mut rest = line;
            while let Some(start) = rest.find(marker) {
                let after = &rest[start + marker.len()..];
                let quote = marker.chars().last().unwrap_or('\'');
                if let Some(end) = after.find(quote) {
                    targets.push(after[..end].to_string());
                    rest = &after[end..];
                } else {
                    break;
                }
            }
        }
    }
    targets
}

/// Resolve a relative specifier against `dir`, trying the exact path
/// and the conventional suffix candidates.
fn resolve(dir: &Path, specifier: &str, known: &HashSet<&str>) -> Option<String> {
    let base = normalize(&dir.join(specifier));
    let candidates = [
        base.clone(),
        format!("{base}.js"),
        format!("{base}.jsx"),
        format!("{base}/index.js"),
    ];
    candidates
        .into_iter()
        .find(|c| known.contains(c.as_str()))
}

/// Collapse `.` and `..` components into a clean forward-slash path.
fn normalize(path: &Path) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_str().unwrap_or_default()),
            Component::ParentDir => {
                parts.pop();
            }
            _ => {}
        }
    }
    parts.join("/")
}
