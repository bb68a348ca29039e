//! Settlement Engine CLI
//!
//! Reads a round's net balances from CSV and writes the transfers that
//! settle them.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- balances.csv > transfers.csv
//! cargo run -- balances.csv --stats > transfers.csv 2> stats.csv
//! ```
//!
//! Transfers are only written if they pass validation.
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `debug` or `warn` to control logging verbosity

use settlement_engine::{ledger, settle, EngineError, Result};
use std::env;
use std::fs::File;
use std::io::{self, BufReader};
use std::process;

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let mut input_path = None;
    let mut show_stats = false;
    for arg in env::args().skip(1) {
        if arg == "--stats" {
            show_stats = true;
        } else if arg.starts_with("--") || input_path.is_some() {
            return Err(EngineError::UnknownOption(arg));
        } else {
            input_path = Some(arg);
        }
    }
    let input_path = input_path.ok_or(EngineError::MissingArgument)?;

    let file = File::open(&input_path)?;
    let balances = ledger::read_balances(BufReader::new(file))?;

    let round = settle(&balances);

    if show_stats {
        ledger::write_stats(io::stderr().lock(), &round.stats)?;
    }

    if let Some(cause) = round.report.cause {
        return Err(EngineError::ValidationFailed {
            cause,
            mismatches: round.report.mismatches,
        });
    }

    let stdout = io::stdout();
    let handle = stdout.lock();
    ledger::write_transfers(handle, &round.transfers)?;

    Ok(())
}
