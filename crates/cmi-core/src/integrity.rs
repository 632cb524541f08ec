//! SHA-256 verification of downloaded archives.

use crate::error::{Error, Result};
use sha2::{Digest, Sha256};

/// Compute SHA-256 of content and return as lowercase hex string
pub fn sha256_hex(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    hex::encode(hasher.finalize())
}

/// Normalize a declared digest, rejecting anything that is not 64 hex digits
pub fn parse_digest(declared: &str) -> Result<String> {
    let trimmed = declared.trim();
    match hex::decode(trimmed) {
        Ok(bytes) if bytes.len() == 32 => Ok(trimmed.to_ascii_lowercase()),
        _ => Err(Error::configuration(format!(
            "invalid sha256 checksum '{}'",
            declared
        ))),
    }
}

/// Check fetched bytes against the declared digest.
///
/// Returns the verified digest. Must run before anything is unpacked.
pub fn verify(url: &str, content: &[u8], declared: &str) -> Result<String> {
    let expected = parse_digest(declared)?;
    let actual = sha256_hex(content);
    if actual != expected {
        return Err(Error::Integrity {
            url: url.to_string(),
            expected,
            actual,
        });
    }
    Ok(actual)
}

#[cfg(test)]
mod tests {
    use super::*;

    // sha256("abc")
    const ABC: &str = "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad";

    #[test]
    fn test_sha256_hex() {
        assert_eq!(sha256_hex(b"abc"), ABC);
    }

    #[test]
    fn test_verify_accepts_uppercase_declared() {
        let digest = verify("file:///abc", b"abc", &ABC.to_uppercase()).unwrap();
        assert_eq!(digest, ABC);
    }

    #[test]
    fn test_verify_mismatch() {
        let err = verify("file:///abc", b"abd", ABC).unwrap_err();
        assert!(err.is_integrity());
        assert!(err.to_string().contains(ABC));
    }

    #[test]
    fn test_parse_digest_rejects_short_values() {
        assert!(parse_digest("abcd").unwrap_err().is_configuration());
        assert!(parse_digest(&"z".repeat(64)).is_err());
    }
}
