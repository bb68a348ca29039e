//! CSV adapter between a ledger snapshot and the engine.
//!
//! Reads `participant,balance` rows and writes `from,to,amount` rows. The
//! snapshot itself is owned by whoever produced the file.

use crate::balance::{Balance, BalanceRecord};
use crate::error::{EngineError, Result};
use crate::stats::SettlementStats;
use crate::transfer::Transfer;
use csv::{ReaderBuilder, Trim};
use log::warn;
use std::collections::HashSet;
use std::io::{Read, Write};

/// Reads a round's balances from CSV, in file order.
///
/// Malformed rows are logged at warn level and skipped. A participant that
/// appears twice fails the whole read, since merging or dropping either row
/// would silently change the round.
pub fn read_balances<R: Read>(reader: R) -> Result<Vec<Balance>> {
    let mut csv_reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut balances = Vec::new();
    let mut seen = HashSet::new();

    for (row_idx, result) in csv_reader.deserialize::<BalanceRecord>().enumerate() {
        let row_num = row_idx + 2; // 1-indexed, accounting for header row

        let record = match result {
            Ok(record) => record,
            Err(e) => {
                warn!("Row {}: CSV parse error: {}", row_num, e);
                continue;
            }
        };

        let Some(balance) = record.parse() else {
            warn!("Row {}: Failed to parse balance record", row_num);
            continue;
        };

        if !seen.insert(balance.participant_id.clone()) {
            return Err(EngineError::DuplicateParticipant {
                participant: balance.participant_id,
                row: row_num,
            });
        }
        balances.push(balance);
    }

    Ok(balances)
}

/// Writes transfers to CSV in the order given.
///
/// Amounts are formatted with exactly 4 decimal places.
pub fn write_transfers<W: Write>(writer: W, transfers: &[Transfer]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer.write_record(["from", "to", "amount"])?;
    for transfer in transfers {
        csv_writer.write_record([
            transfer.from.as_str(),
            transfer.to.as_str(),
            transfer.amount.to_string().as_str(),
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Writes settlement statistics as `metric,value` rows.
pub fn write_stats<W: Write>(writer: W, stats: &SettlementStats) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer.write_record(["metric", "value"])?;
    let rows = [
        ("total_flow", stats.total_flow.to_string()),
        ("balance_check", stats.balance_check.to_string()),
        ("creditors", stats.creditors.to_string()),
        ("debtors", stats.debtors.to_string()),
        ("actual_transactions", stats.actual_transactions.to_string()),
        (
            "max_possible_transactions",
            stats.max_possible_transactions.to_string(),
        ),
        ("efficiency_pct", format!("{:.2}", stats.efficiency_pct)),
        ("reduction_ratio", format!("{:.2}", stats.reduction_ratio)),
    ];
    for (metric, value) in rows {
        csv_writer.write_record([metric, value.as_str()])?;
    }

    csv_writer.flush()?;
    Ok(())
}
