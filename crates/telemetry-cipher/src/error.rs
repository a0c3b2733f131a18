//! Error types for the payload cipher.

use thiserror::Error;

/// Errors produced by the cipher layer.
///
/// Variants group into the three failure classes callers must distinguish:
/// - configuration: [`CipherError::InvalidKeyLength`], [`CipherError::InvalidRounds`]
/// - wire format: [`CipherError::Truncated`], [`CipherError::InvalidHex`]
/// - document: [`CipherError::SerializeDocument`], [`CipherError::ParseDocument`]
#[derive(Debug, Error)]
pub enum CipherError {
    /// The key is the wrong length (must be 16 or 32 bytes).
    #[error("invalid key length {0}: expected 16 or 32 bytes")]
    InvalidKeyLength(usize),

    /// The round count is unsupported (must be 8, 12, or 20).
    #[error("invalid round count {0}: expected 8, 12, or 20")]
    InvalidRounds(u8),

    /// The hex payload is shorter than the 32-character nonce/counter header.
    #[error("payload too short: {0} hex chars, header alone is 32")]
    Truncated(usize),

    /// The payload contains non-hex characters or has an odd length.
    #[error("payload is not valid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    /// The document could not be serialised to its canonical JSON text.
    #[error("failed to serialise document: {0}")]
    SerializeDocument(#[source] serde_json::Error),

    /// The decrypted text is not a valid JSON document. Decryption itself
    /// succeeded; a wrong key or corrupted ciphertext lands here.
    #[error("decrypted payload is not a valid document: {0}")]
    ParseDocument(#[source] serde_json::Error),
}
