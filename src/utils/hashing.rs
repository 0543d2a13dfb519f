//! Keyed hashing for secrets stored at rest.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Hashes `input` with HMAC-SHA256 keyed by `secret`.
///
/// Returns a 64-character lowercase hex-encoded MAC. Used for API tokens and
/// link passphrases so that a read-only database leak cannot be verified or
/// forged without the server-side secret.
pub fn hmac_sha256_hex(secret: &str, input: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(input.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_stable_hex() {
        let a = hmac_sha256_hex("secret", "value");
        let b = hmac_sha256_hex("secret", "value");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_secret_matters() {
        assert_ne!(hmac_sha256_hex("a", "value"), hmac_sha256_hex("b", "value"));
    }

    #[test]
    fn test_input_matters() {
        assert_ne!(hmac_sha256_hex("s", "one"), hmac_sha256_hex("s", "two"));
    }

    #[test]
    fn test_known_vector() {
        // RFC 4231 test case 2
        assert_eq!(
            hmac_sha256_hex("Jefe", "what do ya want for nothing?"),
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }
}
