//! `sha256:` digests for layers and image manifests

use crate::error::{ClientError, Result};
use sha2::{Digest, Sha256};

pub const SHA256_PREFIX: &str = "sha256:";

/// Digest of zero bytes
pub const EMPTY_DIGEST: &str =
    "sha256:e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

pub struct DigestUtils;

impl DigestUtils {
    /// Hex SHA-256 of `data`
    pub fn sha256_hex(data: &[u8]) -> String {
        hex::encode(Sha256::digest(data))
    }

    /// `sha256:<hex>` digest of a layer blob or manifest
    pub fn compute(data: &[u8]) -> String {
        format!("{}{}", SHA256_PREFIX, Self::sha256_hex(data))
    }

    pub fn is_valid_hex(hex: &str) -> bool {
        hex.len() == 64 && hex.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
    }

    pub fn is_valid(digest: &str) -> bool {
        digest
            .strip_prefix(SHA256_PREFIX)
            .is_some_and(Self::is_valid_hex)
    }

    /// Accepts `sha256:<hex>` or bare hex (any case), returns `sha256:<hex>`
    pub fn normalize(digest: &str) -> Result<String> {
        let hex = digest
            .strip_prefix(SHA256_PREFIX)
            .unwrap_or(digest)
            .to_ascii_lowercase();

        if !Self::is_valid_hex(&hex) {
            return Err(ClientError::Validation(format!(
                "Invalid sha256 digest '{}': expected 64 hex characters",
                digest
            )));
        }
        Ok(format!("{}{}", SHA256_PREFIX, hex))
    }

    /// Check that `data` hashes to `expected`
    pub fn verify(data: &[u8], expected: &str) -> Result<()> {
        let expected = Self::normalize(expected)?;
        let computed = Self::compute(data);
        if computed != expected {
            return Err(ClientError::Validation(format!(
                "Digest mismatch: expected {}, computed {}",
                expected, computed
            )));
        }
        Ok(())
    }

    /// First twelve hex characters, as shown by `docker images`
    pub fn short(digest: &str) -> &str {
        let hex = digest.strip_prefix(SHA256_PREFIX).unwrap_or(digest);
        hex.get(..12).unwrap_or(hex)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HELLO_WORLD: &str =
        "sha256:b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9";

    #[test]
    fn test_compute() {
        assert_eq!(DigestUtils::compute(b"hello world"), HELLO_WORLD);
        assert_eq!(DigestUtils::compute(b""), EMPTY_DIGEST);
    }

    #[test]
    fn test_is_valid() {
        assert!(DigestUtils::is_valid(HELLO_WORLD));
        assert!(!DigestUtils::is_valid("sha256:invalid"));
        assert!(!DigestUtils::is_valid(&HELLO_WORLD[7..]));
    }

    #[test]
    fn test_normalize() {
        assert_eq!(DigestUtils::normalize(&HELLO_WORLD[7..]).unwrap(), HELLO_WORLD);
        assert_eq!(
            DigestUtils::normalize(&HELLO_WORLD.to_ascii_uppercase().replace("SHA256:", "sha256:"))
                .unwrap(),
            HELLO_WORLD
        );
        assert!(DigestUtils::normalize("sha256:1234").is_err());
    }

    #[test]
    fn test_verify() {
        assert!(DigestUtils::verify(b"hello world", HELLO_WORLD).is_ok());
        assert!(DigestUtils::verify(b"hello world", EMPTY_DIGEST).is_err());
    }

    #[test]
    fn test_short() {
        assert_eq!(DigestUtils::short(HELLO_WORLD), "b94d27b9934d");
        assert_eq!(DigestUtils::short("abc"), "abc");
    }
}
