use sha2::{Digest, Sha256};

/// A random opaque refresh token (64 hex chars).
pub fn generate_refresh_token() -> String {
    let bytes: [u8; 32] = rand::random();
    hex::encode(bytes)
}

/// Refresh tokens are stored hashed; only the client holds the raw value.
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}
