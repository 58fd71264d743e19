/// Name stamped into provenance comments and the bundle manifest.
pub const GENERATOR_NAME: &str = "air";

/// Version of the generator, taken from the workspace at build time.
pub const GENERATOR_VERSION: &str = env!("CARGO_PKG_VERSION");

/// The `generatedBy` string: name and version, space-separated.
pub fn generated_by() -> String {
    format!("{GENERATOR_NAME} v{GENERATOR_VERSION}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_by_shape() {
        let stamp = generated_by();
        assert!(stamp.starts_with("air v"));
        assert!(stamp.contains(GENERATOR_VERSION));
    }
}
