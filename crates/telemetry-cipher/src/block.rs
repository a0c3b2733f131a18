//! ChaCha keystream core.
//!
//! This is djb's original ChaCha layout, not the IETF variant: a 64-bit
//! little-endian block counter in state words 12–13 and a 64-bit nonce in
//! words 14–15. Key material fills words 4–11; a 16-byte key is repeated into
//! both halves under the `"expand 16-byte k"` constants, a 32-byte key uses
//! `"expand 32-byte k"`.
//!
//! The module only produces keystream and XORs it against a buffer. Nonce and
//! counter discipline lives in [`crate::session`].

use crate::error::CipherError;

/// Keystream block size in bytes.
pub(crate) const BLOCK_LEN: usize = 64;

/// `"expand 32-byte k"` as little-endian words.
const SIGMA: [u32; 4] = [0x6170_7865, 0x3320_646e, 0x7962_2d32, 0x6b20_6574];

/// `"expand 16-byte k"` as little-endian words.
const TAU: [u32; 4] = [0x6170_7865, 0x3120_646e, 0x7962_2d36, 0x6b20_6574];

/// Expanded key material: the constant words selected by key size plus the
/// eight key words of the state.
#[derive(Debug, Clone)]
pub(crate) struct KeySchedule {
    constants: [u32; 4],
    words: [u32; 8],
}

impl KeySchedule {
    /// Expands a 16- or 32-byte key into state words.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::InvalidKeyLength`] for any other length.
    pub(crate) fn new(key: &[u8]) -> Result<Self, CipherError> {
        match key.len() {
            16 => {
                let mut words = [0u32; 8];
                for i in 0..4 {
                    let w = u32::from_le_bytes(key[i * 4..i * 4 + 4].try_into().unwrap());
                    words[i] = w;
                    words[i + 4] = w;
                }
                Ok(Self {
                    constants: TAU,
                    words,
                })
            }
            32 => {
                let mut words = [0u32; 8];
                for (w, chunk) in words.iter_mut().zip(key.chunks_exact(4)) {
                    *w = u32::from_le_bytes(chunk.try_into().unwrap());
                }
                Ok(Self {
                    constants: SIGMA,
                    words,
                })
            }
            n => Err(CipherError::InvalidKeyLength(n)),
        }
    }
}

/// One ChaCha quarter round: add, XOR, and fixed left rotations over four
/// state words. Branchless.
#[inline(always)]
fn quarter_round(state: &mut [u32; 16], a: usize, b: usize, c: usize, d: usize) {
    state[a] = state[a].wrapping_add(state[b]);
    state[d] ^= state[a];
    state[d] = state[d].rotate_left(16);

    state[c] = state[c].wrapping_add(state[d]);
    state[b] ^= state[c];
    state[b] = state[b].rotate_left(12);

    state[a] = state[a].wrapping_add(state[b]);
    state[d] ^= state[a];
    state[d] = state[d].rotate_left(8);

    state[c] = state[c].wrapping_add(state[d]);
    state[b] ^= state[c];
    state[b] = state[b].rotate_left(7);
}

/// Generates one 64-byte keystream block for the given block counter.
///
/// `rounds` must already be validated to 8, 12, or 20; each loop iteration is
/// a double round (4 column + 4 diagonal quarter rounds).
fn keystream_block(
    schedule: &KeySchedule,
    rounds: u8,
    nonce: &[u8; 8],
    counter: u64,
    out: &mut [u8; BLOCK_LEN],
) {
    let mut state = [0u32; 16];
    state[..4].copy_from_slice(&schedule.constants);
    state[4..12].copy_from_slice(&schedule.words);
    state[12] = counter as u32;
    state[13] = (counter >> 32) as u32;
    state[14] = u32::from_le_bytes(nonce[..4].try_into().unwrap());
    state[15] = u32::from_le_bytes(nonce[4..].try_into().unwrap());

    let original = state;
    for _ in 0..rounds / 2 {
        // Column rounds
        quarter_round(&mut state, 0, 4, 8, 12);
        quarter_round(&mut state, 1, 5, 9, 13);
        quarter_round(&mut state, 2, 6, 10, 14);
        quarter_round(&mut state, 3, 7, 11, 15);

        // Diagonal rounds
        quarter_round(&mut state, 0, 5, 10, 15);
        quarter_round(&mut state, 1, 6, 11, 12);
        quarter_round(&mut state, 2, 7, 8, 13);
        quarter_round(&mut state, 3, 4, 9, 14);
    }

    for (s, o) in state.iter_mut().zip(&original) {
        *s = s.wrapping_add(*o);
    }
    for (chunk, word) in out.chunks_exact_mut(4).zip(&state) {
        chunk.copy_from_slice(&word.to_le_bytes());
    }
}

/// XORs the keystream into `buf` in place.
///
/// The starting block counter is decoded little-endian from the 8 counter
/// bytes and advances by one per 64-byte block, wrapping at 2^64. Encryption
/// and decryption are the same operation.
pub(crate) fn apply_keystream(
    schedule: &KeySchedule,
    rounds: u8,
    nonce: &[u8; 8],
    counter: &[u8; 8],
    buf: &mut [u8],
) {
    let mut block_counter = u64::from_le_bytes(*counter);
    let mut block = [0u8; BLOCK_LEN];
    let mut offset = 0usize;

    while offset < buf.len() {
        keystream_block(schedule, rounds, nonce, block_counter, &mut block);
        block_counter = block_counter.wrapping_add(1);

        let take = (buf.len() - offset).min(BLOCK_LEN);
        for i in 0..take {
            buf[offset + i] ^= block[i];
        }
        offset += take;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keystream(schedule: &KeySchedule, rounds: u8, nonce: &[u8; 8], counter: u64, len: usize) -> Vec<u8> {
        let mut buf = vec![0u8; len];
        apply_keystream(schedule, rounds, nonce, &counter.to_le_bytes(), &mut buf);
        buf
    }

    #[test]
    fn chacha20_zero_key_known_answer() {
        // djb test vector: all-zero 256-bit key, all-zero nonce and counter.
        let schedule = KeySchedule::new(&[0u8; 32]).unwrap();
        let ks = keystream(&schedule, 20, &[0u8; 8], 0, 32);
        let expected = [
            0x76, 0xb8, 0xe0, 0xad, 0xa0, 0xf1, 0x3d, 0x90, 0x40, 0x5d, 0x6a, 0xe5, 0x53, 0x86,
            0xbd, 0x28, 0xbd, 0xd2, 0x19, 0xb8, 0xa0, 0x8d, 0xed, 0x1a, 0xa8, 0x36, 0xef, 0xcc,
            0x8b, 0x77, 0x0d, 0xc7,
        ];
        assert_eq!(ks, expected);
    }

    #[test]
    fn keystream_is_continuous_across_blocks() {
        let schedule = KeySchedule::new(&[7u8; 32]).unwrap();
        let nonce = [3u8; 8];

        let long = keystream(&schedule, 20, &nonce, 5, 128);
        let first = keystream(&schedule, 20, &nonce, 5, 64);
        let second = keystream(&schedule, 20, &nonce, 6, 64);

        assert_eq!(&long[..64], &first[..]);
        assert_eq!(&long[64..], &second[..]);
    }

    #[test]
    fn xor_is_an_involution() {
        let schedule = KeySchedule::new(&[9u8; 32]).unwrap();
        let nonce = [1u8; 8];
        let counter = [2u8; 8];

        let original: Vec<u8> = (0u8..200).collect();
        let mut buf = original.clone();
        apply_keystream(&schedule, 12, &nonce, &counter, &mut buf);
        assert_ne!(buf, original);
        apply_keystream(&schedule, 12, &nonce, &counter, &mut buf);
        assert_eq!(buf, original);
    }

    #[test]
    fn sixteen_byte_keys_use_their_own_domain() {
        // A 16-byte key repeated manually into 32 bytes must not collide with
        // the native 16-byte expansion: the constants differ.
        let short = KeySchedule::new(&[0xAB; 16]).unwrap();
        let doubled = KeySchedule::new(&[0xAB; 32]).unwrap();
        let nonce = [0u8; 8];
        assert_eq!(short.words, doubled.words);
        assert_ne!(
            keystream(&short, 20, &nonce, 0, 64),
            keystream(&doubled, 20, &nonce, 0, 64)
        );
    }

    #[test]
    fn unsupported_key_lengths_rejected() {
        assert!(matches!(
            KeySchedule::new(&[0u8; 24]),
            Err(CipherError::InvalidKeyLength(24))
        ));
        assert!(KeySchedule::new(&[]).is_err());
    }

    #[test]
    fn round_count_changes_keystream() {
        let schedule = KeySchedule::new(&[5u8; 32]).unwrap();
        let nonce = [0u8; 8];
        let r8 = keystream(&schedule, 8, &nonce, 0, 64);
        let r12 = keystream(&schedule, 12, &nonce, 0, 64);
        let r20 = keystream(&schedule, 20, &nonce, 0, 64);
        assert_ne!(r8, r12);
        assert_ne!(r12, r20);
    }

    #[test]
    fn empty_buffer_is_a_no_op() {
        let schedule = KeySchedule::new(&[1u8; 32]).unwrap();
        let mut buf: [u8; 0] = [];
        apply_keystream(&schedule, 20, &[0u8; 8], &[0u8; 8], &mut buf);
    }
}
