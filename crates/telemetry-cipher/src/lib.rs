//! Telemetry payload cipher.
//!
//! Symmetric ChaCha stream cipher used to obscure tracker telemetry before it
//! is handed to the publishing transport. Each payload is self-describing:
//! the nonce and counter that produced its keystream travel in front of the
//! ciphertext, so the receiving side needs only the pre-shared key.
//!
//! # Wire format
//!
//! ```text
//! [nonce: 16 hex][counter: 16 hex][ciphertext: 2×N hex]
//! ```
//!
//! Uppercase hex on output, case-insensitive on input. See [`wire`].
//!
//! # Sessions
//!
//! A session pins one random nonce while the per-message counter advances.
//! [`PayloadCipher`] owns that state and decides, per encrypt call, whether
//! to mint a fresh session or continue the current one. Decryption always
//! uses the nonce/counter carried by the payload and never disturbs the
//! session in progress.
//!
//! # Example
//!
//! ```
//! use telemetry_cipher::PayloadCipher;
//!
//! let mut cipher = PayloadCipher::new();
//! let sealed = cipher.encrypt_text("hello", true);
//! assert_eq!(sealed.len(), 42);
//! assert_eq!(cipher.decrypt_text(&sealed).unwrap(), "hello");
//! ```
//!
//! There is no integrity tag: a corrupted payload decrypts to garbage rather
//! than being rejected, and the JSON layer is usually where that garbage
//! becomes visible (see [`CipherError::ParseDocument`]).

pub mod error;
pub mod wire;

mod block;
mod document;
mod entropy;
mod session;

pub use entropy::EntropySource;
pub use error::CipherError;
pub use session::{increment_counter, CipherConfig, PayloadCipher};
pub use wire::{Envelope, Header, COUNTER_LEN, HEADER_LEN, NONCE_LEN};
