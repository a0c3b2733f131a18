//! `payload-tool` — offline seal/open utility for telemetry payloads.
//!
//! Startup sequence:
//! 1. Parse the processing mode from the command line.
//! 2. Load and validate [`Config`] from environment variables.
//! 3. Initialise structured JSON logging on stderr.
//! 4. Stream stdin lines through the cipher.

mod codec;
mod config;
mod telemetry;

use anyhow::Result;

fn main() -> Result<()> {
    // -----------------------------------------------------------------------
    // 1. Mode
    // -----------------------------------------------------------------------
    let mode = match std::env::args().nth(1).as_deref().and_then(codec::Mode::parse) {
        Some(mode) => mode,
        None => {
            eprintln!("usage: payload-tool <seal|open>");
            eprintln!("  seal: JSON documents on stdin -> hex envelopes on stdout");
            eprintln!("  open: hex envelopes on stdin -> JSON documents on stdout");
            std::process::exit(2);
        }
    };

    // -----------------------------------------------------------------------
    // 2. Configuration
    // -----------------------------------------------------------------------
    let cfg = config::Config::from_env().map_err(|e| {
        // Telemetry is not yet up; write to stderr directly.
        eprintln!("ERROR: payload-tool configuration invalid: {e:#}");
        e
    })?;

    // -----------------------------------------------------------------------
    // 3. Telemetry
    // -----------------------------------------------------------------------
    telemetry::init(&cfg.log_level)?;

    // -----------------------------------------------------------------------
    // 4. Process
    // -----------------------------------------------------------------------
    codec::run(&cfg, mode)
}
