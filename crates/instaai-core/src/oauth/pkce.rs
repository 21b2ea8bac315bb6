use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::RngCore;
use sha2::{Digest, Sha256};

/// Challenge method sent with every PKCE authorization request
pub const CHALLENGE_METHOD: &str = "S256";

/// A code verifier and the challenge derived from it. Never reused across
/// attempts.
#[derive(Debug, Clone)]
pub struct PkcePair {
    pub verifier: String,
    pub challenge: String,
}

impl PkcePair {
    pub fn generate() -> Self {
        let verifier = generate_code_verifier();
        let challenge = code_challenge(&verifier);
        Self {
            verifier,
            challenge,
        }
    }
}

fn random_urlsafe(len: usize) -> String {
    let mut bytes = vec![0u8; len];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// 64-character URL-safe verifier (48 random bytes, RFC 7636 allows 43-128).
pub fn generate_code_verifier() -> String {
    random_urlsafe(48)
}

/// `BASE64URL(SHA256(verifier))`
pub fn code_challenge(verifier: &str) -> String {
    URL_SAFE_NO_PAD.encode(Sha256::digest(verifier.as_bytes()))
}

/// 22-character CSRF state value (16 random bytes).
pub fn generate_state() -> String {
    random_urlsafe(16)
}
