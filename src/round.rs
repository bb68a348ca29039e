//! One full settlement round: match, validate, measure.

use crate::balance::Balance;
use crate::matcher::compute_settlements;
use crate::stats::{compute_stats, SettlementStats};
use crate::transfer::Transfer;
use crate::validate::{validate_settlements, ValidationReport};
use serde::Serialize;

/// The transfers for a round together with their validation and statistics.
///
/// Only apply `transfers` to the real ledger when `report.ok` is true, and
/// apply them all or none.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementRound {
    pub transfers: Vec<Transfer>,
    pub report: ValidationReport,
    pub stats: SettlementStats,
}

impl SettlementRound {
    /// Returns `true` if the transfers may be applied.
    pub fn is_applicable(&self) -> bool {
        self.report.ok
    }
}

/// Computes, validates and measures a settlement for `balances`.
pub fn settle(balances: &[Balance]) -> SettlementRound {
    let transfers = compute_settlements(balances);
    let report = validate_settlements(balances, &transfers);
    let stats = compute_stats(balances, &transfers);

    SettlementRound {
        transfers,
        report,
        stats,
    }
}
