//! Efficiency metrics for a computed settlement.

use crate::amount::Amount;
use crate::balance::Balance;
use crate::partition::partition_balances;
use crate::transfer::Transfer;
use serde::Serialize;

/// Summary of how much a settlement round moved and how compact it is.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementStats {
    /// Sum of all transfer amounts.
    pub total_flow: Amount,

    /// Signed sum of all input balances. Near zero for a well-formed ledger.
    pub balance_check: Amount,

    pub creditors: usize,
    pub debtors: usize,

    pub actual_transactions: usize,

    /// `creditors * debtors`: every debtor paying every creditor.
    pub max_possible_transactions: usize,

    /// `(max - actual) / max * 100`, or 0 when `max` is 0.
    pub efficiency_pct: f64,

    /// `max / actual`, or 0 when `actual` is 0.
    pub reduction_ratio: f64,
}

/// Computes statistics for `transfers` produced from `balances`.
pub fn compute_stats(balances: &[Balance], transfers: &[Transfer]) -> SettlementStats {
    let partition = partition_balances(balances);
    let creditors = partition.creditors.len();
    let debtors = partition.debtors.len();

    let max_possible_transactions = creditors * debtors;
    let actual_transactions = transfers.len();

    let efficiency_pct = if max_possible_transactions > 0 {
        (max_possible_transactions as f64 - actual_transactions as f64)
            / max_possible_transactions as f64
            * 100.0
    } else {
        0.0
    };

    let reduction_ratio = if actual_transactions > 0 {
        max_possible_transactions as f64 / actual_transactions as f64
    } else {
        0.0
    };

    SettlementStats {
        total_flow: transfers.iter().map(|t| t.amount).sum(),
        balance_check: balances.iter().map(|b| b.net_balance).sum(),
        creditors,
        debtors,
        actual_transactions,
        max_possible_transactions,
        efficiency_pct,
        reduction_ratio,
    }
}
