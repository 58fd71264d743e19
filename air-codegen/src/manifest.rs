//! The content-addressed bundle manifest.

use air_ast::AirAst;
use air_core::{OutputFile, content_digest, generated_by};
use eyre::Result;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// The manifest's own path; always the last file in the bundle.
pub const MANIFEST_PATH: &str = "air.manifest.json";

/// Index of every generated file plus provenance metadata.
///
/// `timestamp` is the only field allowed to differ between two
/// transpile calls on the same AST.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleManifest {
    pub generated_by: String,
    pub version: String,
    /// Digest of the canonical JSON form of the whole AST.
    pub source_hash: String,
    /// Path to the generator that produced it.
    pub provenance: IndexMap<String, Provenance>,
    pub files: Vec<ManifestFile>,
    /// Unix seconds at manifest construction.
    pub timestamp: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Provenance {
    pub generator: String,
    pub source: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestFile {
    pub path: String,
    pub hash: String,
    pub lines: usize,
}

impl BundleManifest {
    /// Build a manifest over the final file list. `entries` pairs each
    /// output file with the name of the generator that produced it;
    /// the manifest itself is not an entry.
    pub fn build(ast: &AirAst, entries: &[(OutputFile, &str)], timestamp: u64) -> Result<Self> {
        let canonical = serde_json::to_string(ast)?;
        let mut provenance = IndexMap::new();
        let mut files = Vec::with_capacity(entries.len());
        for (file, generator) in entries {
            provenance.insert(
                file.path.clone(),
                Provenance {
                    generator: generator.to_string(),
                    source: ast.app.name.clone(),
                },
            );
            files.push(ManifestFile {
                path: file.path.clone(),
                hash: content_digest(&file.content),
                lines: file.line_count(),
            });
        }
        Ok(Self {
            generated_by: generated_by(),
            version: ast.version.clone(),
            source_hash: content_digest(&canonical),
            provenance,
            files,
            timestamp,
        })
    }

    /// Render the manifest as the bundle's final output file.
    pub fn to_output_file(&self) -> Result<OutputFile> {
        let mut content = serde_json::to_string_pretty(self)?;
        content.push('\n');
        Ok(OutputFile::new(MANIFEST_PATH, content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use air_parser::parse;

    fn manifest(timestamp: u64) -> BundleManifest {
        let ast = parse("@app:t\n@state{x:int}").unwrap();
        let entries = vec![
            (OutputFile::new("src/main.jsx", "import App from './App.jsx';"), "client"),
            (OutputFile::new("src/App.jsx", "export default 1;\n// two\n"), "client"),
        ];
        BundleManifest::build(&ast, &entries, timestamp).unwrap()
    }

    #[test]
    fn test_hashes_match_content() {
        let m = manifest(0);
        assert_eq!(m.files.len(), 2);
        assert_eq!(
            m.files[0].hash,
            content_digest("import App from './App.jsx';")
        );
        assert_eq!(m.files[1].lines, 2);
    }

    #[test]
    fn test_stable_except_timestamp() {
        let a = manifest(1);
        let b = manifest(2);
        assert_eq!(a.source_hash, b.source_hash);
        assert_eq!(a.files, b.files);
        assert_eq!(a.provenance, b.provenance);
        assert_ne!(a.timestamp, b.timestamp);
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_string(&manifest(0)).unwrap();
        assert!(json.contains("\"generatedBy\""));
        assert!(json.contains("\"sourceHash\""));
        assert!(json.contains("\"timestamp\""));
    }

    #[test]
    fn test_manifest_excludes_itself() {
        let m = manifest(0);
        assert!(m.files.iter().all(|f| f.path != MANIFEST_PATH));
    }
}
