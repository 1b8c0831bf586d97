//! Content fingerprints for change detection.

use std::hash::{DefaultHasher, Hash, Hasher};

/// Fingerprint note content so identical re-deliveries can be skipped.
///
/// Non-cryptographic and process-local; the index is never persisted, so the
/// value only has to be stable within one run. Returns 16 hex digits.
pub fn content_hash_str(content: &str) -> String {
    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    format!("{:016x}", hasher.finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_hash_str_consistent() {
        let content = "# Hello\n\nThis is a test.";
        assert_eq!(content_hash_str(content), content_hash_str(content));
    }

    #[test]
    fn test_content_hash_str_different_content() {
        assert_ne!(content_hash_str("# Hello"), content_hash_str("# World"));
    }

    #[test]
    fn test_trailing_newline_matters() {
        assert_ne!(content_hash_str("[[a]]"), content_hash_str("[[a]]\n"));
    }

    #[test]
    fn test_hash_width() {
        assert_eq!(content_hash_str("").len(), 16);
    }
}
