//! Opaque admission token generation.
//!
//! Admission tokens are the credential encoded in a guest's QR code. They are
//! random, url-safe and carry no embedded claims; all meaning comes from the
//! database row they resolve to.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rand::Rng;

/// Admission token prefix.
pub const TOKEN_PREFIX: &str = "adm_";

/// Length of random bytes for token generation.
const TOKEN_RANDOM_BYTES: usize = 32;

/// Generate a new admission token.
pub fn generate_admission_token() -> String {
    let mut rng = rand::thread_rng();
    let random_bytes: Vec<u8> = (0..TOKEN_RANDOM_BYTES).map(|_| rng.gen()).collect();
    let encoded = URL_SAFE_NO_PAD.encode(&random_bytes);
    format!("{}{}", TOKEN_PREFIX, encoded)
}

/// Check whether a scanned string even looks like an admission token.
///
/// This is a cheap pre-filter for obviously bogus scans; an unknown but
/// well-formed token is still rejected by the database lookup.
pub fn has_token_shape(raw: &str) -> bool {
    !raw.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_admission_token_prefix() {
        let token = generate_admission_token();
        assert!(token.starts_with(TOKEN_PREFIX));
        assert!(token.len() > 20);
    }

    #[test]
    fn test_generate_admission_token_uniqueness() {
        let a = generate_admission_token();
        let b = generate_admission_token();
        assert_ne!(a, b);
    }

    #[test]
    fn test_token_is_url_safe() {
        let token = generate_admission_token();
        assert!(!token.contains('+'));
        assert!(!token.contains('/'));
        assert!(!token.contains('='));
    }

    #[test]
    fn test_has_token_shape() {
        assert!(has_token_shape("adm_abc"));
        assert!(has_token_shape("anything-goes"));
        assert!(!has_token_shape(""));
        assert!(!has_token_shape("   "));
    }
}
