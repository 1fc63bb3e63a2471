use sha2::{Digest, Sha256};

/// Generate a session token. Returns `(raw_token, sha256_hash)`.
/// The raw token goes into the cookie; the hash keys the session store.
/// Format: `ct_` + 32 random bytes as hex (67 chars total).
pub fn generate_session_token() -> (String, String) {
    let mut bytes = [0u8; 32];
    rand::fill(&mut bytes);
    let raw = format!("ct_{}", hex::encode(bytes));
    let hash = hash_token(&raw);
    (raw, hash)
}

/// SHA-256 hash of a token string, returned as lowercase hex.
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}
