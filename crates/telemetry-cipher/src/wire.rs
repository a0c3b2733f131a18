//! Self-describing wire format for encrypted payloads.
//!
//! Every payload carries the nonce and counter that produced its keystream so
//! the receiving side can reconstruct it without shared session state:
//!
//! ```text
//! [nonce: 16 hex][counter: 16 hex][ciphertext: 2×N hex]
//! ```
//!
//! Hex is produced uppercase and accepted case-insensitively. There is no
//! integrity tag: a bit flip in transit decrypts to garbage rather than being
//! rejected here.

use tracing::warn;

use crate::error::CipherError;

/// Byte length of a session nonce.
pub const NONCE_LEN: usize = 8;

/// Byte length of a message counter.
pub const COUNTER_LEN: usize = 8;

/// Byte length of the nonce ‖ counter header.
pub const HEADER_LEN: usize = NONCE_LEN + COUNTER_LEN;

/// Minimum hex length of a well-formed payload: the header alone.
const MIN_HEX_LEN: usize = HEADER_LEN * 2;

/// The nonce/counter pair carried in front of every ciphertext.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Session nonce the keystream was derived from.
    pub nonce: [u8; NONCE_LEN],
    /// Message counter the keystream started at.
    pub counter: [u8; COUNTER_LEN],
}

impl Header {
    /// Serialises the header as nonce followed by counter.
    pub fn to_bytes(&self) -> [u8; HEADER_LEN] {
        let mut out = [0u8; HEADER_LEN];
        out[..NONCE_LEN].copy_from_slice(&self.nonce);
        out[NONCE_LEN..].copy_from_slice(&self.counter);
        out
    }

    /// Splits a 16-byte header into its nonce and counter fields.
    pub fn from_bytes(bytes: &[u8; HEADER_LEN]) -> Self {
        let mut nonce = [0u8; NONCE_LEN];
        let mut counter = [0u8; COUNTER_LEN];
        nonce.copy_from_slice(&bytes[..NONCE_LEN]);
        counter.copy_from_slice(&bytes[NONCE_LEN..]);
        Self { nonce, counter }
    }
}

/// A parsed encrypted payload: header plus raw ciphertext bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    /// Keystream parameters for this payload.
    pub header: Header,
    /// Ciphertext bytes (same length as the plaintext).
    pub ciphertext: Vec<u8>,
}

impl Envelope {
    /// Encodes this payload to its uppercase hex wire form.
    ///
    /// Output length is `32 + 2 × ciphertext.len()` characters.
    pub fn to_hex(&self) -> String {
        let mut out = String::with_capacity(MIN_HEX_LEN + self.ciphertext.len() * 2);
        out.push_str(&hex::encode_upper(self.header.to_bytes()));
        out.push_str(&hex::encode_upper(&self.ciphertext));
        out
    }

    /// Parses a hex wire payload back into an [`Envelope`].
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::Truncated`] if the input is shorter than the
    /// 32-character header, and [`CipherError::InvalidHex`] on non-hex
    /// characters or an odd number of them. Both are logged; neither is
    /// recoverable by retrying with the same input.
    pub fn from_hex(input: &str) -> Result<Self, CipherError> {
        if input.len() < MIN_HEX_LEN {
            warn!(
                len = input.len(),
                "rejecting payload shorter than the nonce/counter header"
            );
            return Err(CipherError::Truncated(input.len()));
        }

        let bytes = hex::decode(input).map_err(|e| {
            warn!(error = %e, "rejecting payload with malformed hex");
            CipherError::from(e)
        })?;

        let mut header = [0u8; HEADER_LEN];
        header.copy_from_slice(&bytes[..HEADER_LEN]);
        Ok(Self {
            header: Header::from_bytes(&header),
            ciphertext: bytes[HEADER_LEN..].to_vec(),
        })
    }
}
