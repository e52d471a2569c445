//! SHA-256 content digests.
//!
//! Used twice per run: over the canvas artifact and over the canonical
//! record. Unsalted and unkeyed.

use sha2::{Digest, Sha256};

/// Length of a rendered digest.
pub const DIGEST_HEX_LEN: usize = 64;

/// Compute the SHA-256 of `input`'s UTF-8 bytes as lowercase hex.
pub fn sha256_hex(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

/// True for exactly 64 lowercase hex characters.
pub fn is_digest(value: &str) -> bool {
    value.len() == DIGEST_HEX_LEN
        && value
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_vector() {
        assert_eq!(
            sha256_hex("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_canvas_artifact_digest() {
        let artifact = "data:image/png;base64,AAAA";
        let expected = hex::encode(Sha256::digest(artifact.as_bytes()));
        assert_eq!(sha256_hex(artifact), expected);
        assert!(is_digest(&sha256_hex(artifact)));
    }

    #[test]
    fn test_digest_format() {
        for input in ["a", "—", "Fingerprint ✨", &"x".repeat(10_000)] {
            let digest = sha256_hex(input);
            assert_eq!(digest.len(), DIGEST_HEX_LEN);
            assert!(is_digest(&digest), "bad digest for {:?}: {}", input, digest);
        }
    }

    #[test]
    fn test_is_digest_rejects() {
        assert!(!is_digest("ABC"));
        assert!(!is_digest(&"A".repeat(64)));
        assert!(!is_digest(&"g".repeat(64)));
    }
}
