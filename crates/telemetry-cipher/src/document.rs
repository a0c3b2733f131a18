//! Structured-document wrappers.
//!
//! The publish path hands this module a telemetry record, not raw text: the
//! record is rendered to canonical JSON, encrypted, and shipped as a hex
//! payload. Decryption re-parses the recovered text, and a parse failure is
//! reported distinctly from the cipher layer succeeding — a wrong key or a
//! corrupted ciphertext typically surfaces here, as garbage that is not JSON.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use crate::entropy::EntropySource;
use crate::error::CipherError;
use crate::session::PayloadCipher;

impl<E: EntropySource> PayloadCipher<E> {
    /// Serialises `document` to its canonical JSON text and encrypts it.
    ///
    /// `new_session` has the same meaning as in
    /// [`encrypt_text`](Self::encrypt_text).
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::SerializeDocument`] if the document cannot be
    /// rendered to JSON; the session state is left unchanged in that case.
    pub fn encrypt_document<T: Serialize>(
        &mut self,
        document: &T,
        new_session: bool,
    ) -> Result<String, CipherError> {
        let text = serde_json::to_string(document).map_err(CipherError::SerializeDocument)?;
        Ok(self.encrypt_text(&text, new_session))
    }

    /// Decrypts a hex wire payload and parses the recovered text as a
    /// document.
    ///
    /// # Errors
    ///
    /// Format errors propagate from [`decrypt_text`](Self::decrypt_text).
    /// [`CipherError::ParseDocument`] means decryption itself succeeded but
    /// the plaintext is not a valid document.
    pub fn decrypt_document<T: DeserializeOwned>(&self, input: &str) -> Result<T, CipherError> {
        let text = self.decrypt_text(input)?;
        serde_json::from_str(&text).map_err(|e| {
            warn!(error = %e, "decrypted payload did not parse as a document");
            CipherError::ParseDocument(e)
        })
    }
}
