//! Line-oriented seal/open processing.
//!
//! `seal` reads one JSON document per stdin line and writes one hex envelope
//! per stdout line; `open` is the inverse. The first sealed line opens a
//! fresh session and subsequent lines advance the counter, matching the
//! device's publish loop.

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::{info, warn};

use telemetry_cipher::{CipherConfig, PayloadCipher};

use crate::config::Config;

/// Processing direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// JSON documents in, hex envelopes out.
    Seal,
    /// Hex envelopes in, JSON documents out.
    Open,
}

impl Mode {
    /// Parses a command-line mode argument.
    pub fn parse(arg: &str) -> Option<Self> {
        match arg {
            "seal" => Some(Self::Seal),
            "open" => Some(Self::Open),
            _ => None,
        }
    }
}

/// Stream stdin lines through the cipher until EOF.
///
/// Malformed lines are logged and skipped; the run fails only if every line
/// failed.
///
/// # Errors
///
/// Returns an error if the cipher rejects the configuration, on stdin/stdout
/// I/O failure, or if no line could be processed.
pub fn run(cfg: &Config, mode: Mode) -> Result<()> {
    let key = cfg.key_bytes()?;
    let cipher_config = match &key {
        Some(key) => CipherConfig {
            key,
            rounds: cfg.rounds,
            ..CipherConfig::default()
        },
        None => CipherConfig {
            rounds: cfg.rounds,
            ..CipherConfig::default()
        },
    };
    let mut cipher =
        PayloadCipher::with_config(&cipher_config).context("cipher configuration rejected")?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let mut processed = 0usize;
    let mut failed = 0usize;
    let mut first = true;

    for line in stdin.lock().lines() {
        let line = line.context("failed to read stdin")?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let result = match mode {
            Mode::Seal => seal_line(&mut cipher, line, first),
            Mode::Open => open_line(&cipher, line),
        };
        match result {
            Ok(output) => {
                writeln!(out, "{output}").context("failed to write stdout")?;
                processed += 1;
                first = false;
            }
            Err(e) => {
                warn!("skipping line: {e:#}");
                failed += 1;
            }
        }
    }

    info!(processed, failed, mode = ?mode, "payload-tool finished");
    if processed == 0 && failed > 0 {
        anyhow::bail!("no line processed successfully ({failed} failed)");
    }
    Ok(())
}

/// Encrypts one JSON line into its hex wire form.
fn seal_line(cipher: &mut PayloadCipher, line: &str, new_session: bool) -> Result<String> {
    let document: Value = serde_json::from_str(line).context("input line is not valid JSON")?;
    cipher
        .encrypt_document(&document, new_session)
        .context("encryption failed")
}

/// Decrypts one hex envelope line back to compact JSON.
fn open_line(cipher: &PayloadCipher, line: &str) -> Result<String> {
    let document: Value = cipher.decrypt_document(line).context("decryption failed")?;
    serde_json::to_string(&document).context("failed to render document")
}
