//! Cipher context and session lifecycle.
//!
//! One [`PayloadCipher`] holds what the wire format calls a session: a key,
//! a round count, the nonce currently in force, and the per-message counter.
//! The device firmware kept this state in a process-wide singleton; here it
//! is an explicit caller-constructed value, and the one-operation-at-a-time
//! assumption of the original becomes `&mut self`.
//!
//! # Session state machine
//!
//! Every encrypt call first settles the keystream position:
//! - pending-new-session set (the initial state, or requested by the caller)
//!   → mint a fresh nonce, reset the counter, clear the flag;
//! - otherwise → increment the counter.
//!
//! Decryption never drives this machine. Ambient decryption reads the current
//! nonce/counter without touching them; [`PayloadCipher::decrypt_detached`]
//! takes the pair from the caller and has no side effect at all.

use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::block::{apply_keystream, KeySchedule};
use crate::entropy::EntropySource;
use crate::error::CipherError;
use crate::wire::{Envelope, Header, COUNTER_LEN, NONCE_LEN};

/// Built-in development key. Deployments must supply their own via
/// [`CipherConfig`].
const DEFAULT_KEY: [u8; 32] = [
    0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0A, 0x0B, 0x0C, 0x0D, 0x0E, 0x0F,
    0x10, 0xC9, 0xCA, 0xCB, 0xCC, 0xCD, 0xCE, 0xCF, 0xD0, 0xD1, 0xD2, 0xD3, 0xD4, 0xD5, 0xD6,
    0xD7, 0xD8,
];

/// Nonce in force until the first fresh session is minted.
const DEFAULT_NONCE: [u8; NONCE_LEN] = [0x65, 0x66, 0x67, 0x68, 0x69, 0x6A, 0x6B, 0x6C];

/// Counter value every new session starts from.
const INITIAL_COUNTER: [u8; COUNTER_LEN] = [0x6D, 0x6E, 0x6F, 0x70, 0x71, 0x72, 0x73, 0x74];

/// Default round count.
const DEFAULT_ROUNDS: u8 = 20;

/// Initialisation parameters for a [`PayloadCipher`].
///
/// `nonce` and `counter` override the starting values the cipher holds before
/// any session is minted; both default to the built-in constants. Supplying
/// them matters on the decrypt side, where ambient decryption must match a
/// known sender state.
#[derive(Debug, Clone)]
pub struct CipherConfig<'a> {
    /// Symmetric key, 16 or 32 bytes.
    pub key: &'a [u8],
    /// Starting nonce; `None` selects the built-in default.
    pub nonce: Option<[u8; NONCE_LEN]>,
    /// Starting counter; `None` selects the built-in default.
    pub counter: Option<[u8; COUNTER_LEN]>,
    /// Round count: 8, 12, or 20.
    pub rounds: u8,
}

impl Default for CipherConfig<'static> {
    fn default() -> Self {
        Self {
            key: &DEFAULT_KEY,
            nonce: None,
            counter: None,
            rounds: DEFAULT_ROUNDS,
        }
    }
}

/// Increments an 8-byte little-endian counter in place.
///
/// The carry propagates byte to byte and wraps silently once all bytes
/// overflow.
pub fn increment_counter(counter: &mut [u8; COUNTER_LEN]) {
    for byte in counter.iter_mut() {
        *byte = byte.wrapping_add(1);
        if *byte != 0 {
            break;
        }
    }
}

/// Symmetric payload cipher with session nonce/counter management.
///
/// Encryption mutates the session state as a side effect; see the module
/// documentation for the state machine. The type is generic over its
/// [`EntropySource`] so tests can pin the nonce sequence.
pub struct PayloadCipher<E: EntropySource = SmallRng> {
    schedule: KeySchedule,
    rounds: u8,
    nonce: [u8; NONCE_LEN],
    counter: [u8; COUNTER_LEN],
    needs_new_session: bool,
    entropy: E,
}

impl PayloadCipher<SmallRng> {
    /// Creates a cipher with the built-in development parameters and an
    /// OS-seeded nonce generator.
    pub fn new() -> Self {
        Self::with_config(&CipherConfig::default())
            .expect("built-in cipher parameters are valid")
    }

    /// Creates a cipher from caller-supplied parameters.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::InvalidKeyLength`] or
    /// [`CipherError::InvalidRounds`] without constructing anything; an
    /// existing cipher held by the caller is unaffected.
    pub fn with_config(config: &CipherConfig<'_>) -> Result<Self, CipherError> {
        Self::with_config_and_entropy(config, SmallRng::from_os_rng())
    }
}

impl Default for PayloadCipher<SmallRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: EntropySource> PayloadCipher<E> {
    /// Creates a cipher with an explicit entropy source for nonce generation.
    ///
    /// # Errors
    ///
    /// Same validation as [`PayloadCipher::with_config`].
    pub fn with_config_and_entropy(
        config: &CipherConfig<'_>,
        entropy: E,
    ) -> Result<Self, CipherError> {
        if !matches!(config.rounds, 8 | 12 | 20) {
            return Err(CipherError::InvalidRounds(config.rounds));
        }
        let schedule = KeySchedule::new(config.key)?;

        Ok(Self {
            schedule,
            rounds: config.rounds,
            nonce: config.nonce.unwrap_or(DEFAULT_NONCE),
            counter: config.counter.unwrap_or(INITIAL_COUNTER),
            needs_new_session: true,
            entropy,
        })
    }

    /// Starts a fresh session: new random nonce, counter back to its initial
    /// value, pending flag cleared.
    pub fn new_session(&mut self) {
        self.entropy.fill(&mut self.nonce);
        self.reset_counter();
        self.needs_new_session = false;
    }

    /// Puts the counter back to the value every session starts from.
    pub fn reset_counter(&mut self) {
        self.counter = INITIAL_COUNTER;
    }

    /// Advances the counter for the next message in the current session.
    pub fn next_message(&mut self) {
        increment_counter(&mut self.counter);
    }

    /// Requests that the next encrypt operation mint a fresh session instead
    /// of advancing the counter.
    pub fn request_new_session(&mut self) {
        self.needs_new_session = true;
    }

    /// Encrypts `buf` in place, advancing the session state first.
    ///
    /// If a new session is pending (initial state, or after
    /// [`request_new_session`](Self::request_new_session)) a fresh nonce is
    /// minted and the counter reset; otherwise the counter increments. The
    /// nonce/counter consumed are readable afterwards via
    /// [`header`](Self::header).
    pub fn encrypt_in_place(&mut self, buf: &mut [u8]) {
        if self.needs_new_session {
            self.new_session();
        } else {
            self.next_message();
        }
        apply_keystream(&self.schedule, self.rounds, &self.nonce, &self.counter, buf);
    }

    /// Decrypts `buf` in place using the current session nonce/counter.
    ///
    /// Does not advance the session.
    pub fn decrypt_in_place(&self, buf: &mut [u8]) {
        apply_keystream(&self.schedule, self.rounds, &self.nonce, &self.counter, buf);
    }

    /// Decrypts `buf` in place with a caller-supplied nonce and counter,
    /// typically the pair carried in a payload header.
    ///
    /// Pure with respect to session state: the cipher's own nonce/counter are
    /// not read or written, so a one-off decryption never disturbs a session
    /// in progress.
    pub fn decrypt_detached(
        &self,
        nonce: &[u8; NONCE_LEN],
        counter: &[u8; COUNTER_LEN],
        buf: &mut [u8],
    ) {
        apply_keystream(&self.schedule, self.rounds, nonce, counter, buf);
    }

    /// The header describing the current session state: the exact
    /// nonce/counter the most recent encrypt consumed.
    pub fn header(&self) -> Header {
        Header {
            nonce: self.nonce,
            counter: self.counter,
        }
    }

    /// Nonce currently in force.
    pub fn nonce(&self) -> &[u8; NONCE_LEN] {
        &self.nonce
    }

    /// Counter currently in force.
    pub fn counter(&self) -> &[u8; COUNTER_LEN] {
        &self.counter
    }

    /// Encrypts a text payload and returns the self-describing hex wire form.
    ///
    /// `new_session` selects whether this payload opens a fresh session
    /// (`true`, the behaviour senders default to) or continues the current
    /// one (`false`). The returned string is
    /// `nonce ‖ counter ‖ ciphertext`, uppercase hex,
    /// `32 + 2 × input.len()` characters.
    pub fn encrypt_text(&mut self, input: &str, new_session: bool) -> String {
        self.needs_new_session = new_session;

        let mut buf = input.as_bytes().to_vec();
        self.encrypt_in_place(&mut buf);

        Envelope {
            header: self.header(),
            ciphertext: buf,
        }
        .to_hex()
    }

    /// Decrypts a hex wire payload produced by [`encrypt_text`](Self::encrypt_text).
    ///
    /// The nonce and counter are taken from the payload header, so any
    /// session this cipher has in progress is left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::Truncated`] or [`CipherError::InvalidHex`] for
    /// malformed input. A failure never yields partial plaintext.
    pub fn decrypt_text(&self, input: &str) -> Result<String, CipherError> {
        let mut envelope = Envelope::from_hex(input)?;
        self.decrypt_detached(
            &envelope.header.nonce,
            &envelope.header.counter,
            &mut envelope.ciphertext,
        );
        Ok(String::from_utf8_lossy(&envelope.ciphertext).into_owned())
    }
}
