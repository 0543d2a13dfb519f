//! Short key generation.
//!
//! Keys are drawn uniformly from a 64-symbol URL-safe alphabet. Uniqueness is
//! not guaranteed here; the link store rejects duplicates on insert and the
//! link service widens the key and retries.

use rand::Rng;

/// URL-safe alphabet used for generated keys (`A-Z a-z 0-9 _ -`).
pub const KEY_ALPHABET: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789_-";

/// Source of random short keys.
///
/// The production implementation is [`RandomKeyGenerator`]; tests swap in
/// deterministic generators to force collisions.
#[cfg_attr(test, mockall::automock)]
pub trait KeyGenerator: Send + Sync {
    /// Returns a key of exactly `length` characters from [`KEY_ALPHABET`].
    fn generate(&self, length: usize) -> String;
}

/// Key generator backed by the thread-local CSPRNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomKeyGenerator;

impl KeyGenerator for RandomKeyGenerator {
    fn generate(&self, length: usize) -> String {
        generate_key(length)
    }
}

/// Generates a random URL-safe key of the requested length.
///
/// # Examples
///
/// ```ignore
/// let key = generate_key(7);
/// assert_eq!(key.len(), 7);
/// assert!(key.bytes().all(|b| KEY_ALPHABET.contains(&b)));
/// ```
pub fn generate_key(length: usize) -> String {
    let mut rng = rand::rng();

    (0..length)
        .map(|_| {
            let idx = rng.random_range(0..KEY_ALPHABET.len());
            KEY_ALPHABET[idx] as char
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generate_key_has_requested_length() {
        for length in [1, 5, 6, 12, 32] {
            assert_eq!(generate_key(length).len(), length);
        }
    }

    #[test]
    fn test_generate_key_zero_length_is_empty() {
        assert!(generate_key(0).is_empty());
    }

    #[test]
    fn test_generate_key_url_safe_characters() {
        let key = generate_key(256);
        assert!(
            key.chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
    }

    #[test]
    fn test_generate_key_produces_distinct_keys() {
        let keys: HashSet<String> = (0..1000).map(|_| generate_key(12)).collect();
        assert_eq!(keys.len(), 1000);
    }

    #[test]
    fn test_random_generator_delegates() {
        let key = RandomKeyGenerator.generate(9);
        assert_eq!(key.len(), 9);
    }

    #[test]
    fn test_alphabet_has_no_duplicates() {
        let symbols: HashSet<u8> = KEY_ALPHABET.iter().copied().collect();
        assert_eq!(symbols.len(), KEY_ALPHABET.len());
    }
}
