use sha2::{Digest, Sha256};

/// Hex characters kept from the full SHA-256 digest. Sixteen is plenty
/// for change detection inside a single bundle.
pub const DIGEST_LEN: usize = 16;

/// Truncated SHA-256 hex digest of a file's content.
pub fn content_digest(content: &str) -> String {
    let digest = Sha256::digest(content.as_bytes());
    let mut out = String::with_capacity(DIGEST_LEN);
    for byte in digest.iter().take(DIGEST_LEN / 2) {
        out.push_str(&format!("{byte:02x}"));
    }
    out
}
