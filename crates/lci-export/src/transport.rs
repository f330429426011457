//! Distribution transport added to UVEK exports.

use lci_model::{Activity, Exchange, ExchangeKind};
use lci_standards::{TransportDataset, TransportTable};
use tracing::debug;

const KILOGRAM: &str = "kilogram";

fn transport_exchange(dataset: &TransportDataset, tonne_km: f64) -> Exchange {
    Exchange::new(&dataset.name, tonne_km, ExchangeKind::Technosphere)
        .with_product(&dataset.reference_product)
        .with_location(&dataset.location)
        .with_unit(&dataset.unit)
}

/// Copy of `activity` with lorry and rail transport appended for every
/// kilogram technosphere input that has distribution distances.
///
/// Transport is `kg / 1000 × km` tonne-kilometres per mode; modes with a
/// zero distance are skipped.
pub fn add_distribution_transport(activity: &Activity, transport: &TransportTable) -> Activity {
    let mut with_transport = activity.clone();
    for exchange in &activity.exchanges {
        if !exchange.is_technosphere() || exchange.unit() != KILOGRAM {
            continue;
        }
        let Some(distance) = transport.distance(exchange.name()) else {
            continue;
        };
        let tonnes = exchange.amount / 1000.0;
        for (dataset, km) in [
            (&transport.lorry, distance.lorry),
            (&transport.rail, distance.rail),
        ] {
            if km == 0.0 {
                continue;
            }
            debug!(
                activity = %activity.name,
                input = exchange.name(),
                transport = %dataset.name,
                "distribution transport added"
            );
            with_transport
                .exchanges
                .push(transport_exchange(dataset, tonnes * km));
        }
    }
    with_transport
}

#[cfg(test)]
mod tests {
    use super::*;
    use lci_standards::TransportDistance;

    fn table() -> TransportTable {
        let mut table = TransportTable {
            lorry: TransportDataset {
                name: "market for transport, lorry".to_string(),
                reference_product: "transport, lorry".to_string(),
                location: "RER".to_string(),
                unit: "ton kilometer".to_string(),
            },
            rail: TransportDataset {
                name: "market for transport, rail".to_string(),
                reference_product: "transport, rail".to_string(),
                location: "RER".to_string(),
                unit: "ton kilometer".to_string(),
            },
            ..TransportTable::default()
        };
        table.distances.insert(
            "market for steel".to_string(),
            TransportDistance {
                lorry: 100.0,
                rail: 200.0,
            },
        );
        table
    }

    #[test]
    fn kilogram_inputs_get_lorry_and_rail() {
        let activity = Activity::new("widget production", "widget", "CH", "unit").with_exchange(
            Exchange::new("market for steel", 500.0, ExchangeKind::Technosphere)
                .with_unit("kilogram"),
        );
        let extended = add_distribution_transport(&activity, &table());

        assert_eq!(activity.exchanges.len(), 1);
        assert_eq!(extended.exchanges.len(), 3);
        assert!((extended.exchanges[1].amount - 50.0).abs() < 1e-9);
        assert!((extended.exchanges[2].amount - 100.0).abs() < 1e-9);
        assert_eq!(extended.exchanges[2].name(), "market for transport, rail");
    }

    #[test]
    fn other_units_are_skipped() {
        let activity = Activity::new("widget production", "widget", "CH", "unit").with_exchange(
            Exchange::new("market for steel", 2.0, ExchangeKind::Technosphere).with_unit("ton"),
        );
        assert_eq!(add_distribution_transport(&activity, &table()), activity);
    }
}
