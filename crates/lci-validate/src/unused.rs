//! Exchanges that no section of the export consumed.

use std::collections::BTreeSet;

use lci_model::Activity;
use tracing::warn;

#[derive(Debug, Clone, PartialEq)]
pub struct UnusedExchange {
    pub activity: String,
    pub name: String,
    pub kind: String,
    pub unit: String,
    pub amount: f64,
}

/// Non-zero exchanges whose `(activity index, exchange index)` is not in
/// `used`, each listed once.
///
/// Exchanges with the same activity, name, type, unit and amount are
/// reported once even if they appear several times.
pub fn unused_exchanges(
    activities: &[Activity],
    used: &BTreeSet<(usize, usize)>,
) -> Vec<UnusedExchange> {
    let mut seen = BTreeSet::new();
    let mut unused = Vec::new();

    for (activity_idx, activity) in activities.iter().enumerate() {
        for (exchange_idx, exchange) in activity.exchanges.iter().enumerate() {
            if exchange.amount == 0.0 || used.contains(&(activity_idx, exchange_idx)) {
                continue;
            }
            let key = (
                activity.name.clone(),
                exchange.name().to_string(),
                exchange.kind.to_string(),
                exchange.unit().to_string(),
                exchange.amount.to_bits(),
            );
            if !seen.insert(key) {
                continue;
            }
            warn!(
                activity = %activity.name,
                exchange = exchange.name(),
                amount = exchange.amount,
                "exchange not written to any section"
            );
            unused.push(UnusedExchange {
                activity: activity.name.clone(),
                name: exchange.name().to_string(),
                kind: exchange.kind.to_string(),
                unit: exchange.unit().to_string(),
                amount: exchange.amount,
            });
        }
    }

    unused
}
