//! Splits a round's balances into sorted creditors and debtors.

use crate::balance::Balance;
use log::debug;

/// Creditors and debtors of one settlement round, each in matching order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partition {
    /// Balances above `+EPSILON`, largest first.
    pub creditors: Vec<Balance>,

    /// Balances below `-EPSILON`, most negative first.
    pub debtors: Vec<Balance>,
}

/// Partitions balances into creditors and debtors.
///
/// Balances within `[-EPSILON, EPSILON]` are dropped as already settled.
/// Both sorts are stable, so equal magnitudes keep their input order and the
/// result is reproducible for identical input. The caller's slice is only
/// read; the returned lists are owned working copies.
pub fn partition_balances(balances: &[Balance]) -> Partition {
    let mut creditors: Vec<Balance> = balances
        .iter()
        .filter(|b| b.net_balance.is_credit())
        .cloned()
        .collect();
    let mut debtors: Vec<Balance> = balances
        .iter()
        .filter(|b| b.net_balance.is_debt())
        .cloned()
        .collect();

    creditors.sort_by(|a, b| b.net_balance.cmp(&a.net_balance));
    debtors.sort_by(|a, b| a.net_balance.cmp(&b.net_balance));

    debug!(
        "Partitioned {} balances into {} creditors and {} debtors ({} settled)",
        balances.len(),
        creditors.len(),
        debtors.len(),
        balances.len() - creditors.len() - debtors.len()
    );

    Partition { creditors, debtors }
}
