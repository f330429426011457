//! Consistency warnings for normalised datasets.

use lci_model::{Activity, IssueKind, ValidationIssue, ValidationReport};
use tracing::warn;

fn dataset_key(activity: &Activity) -> (String, String, String) {
    (
        activity.name.clone(),
        activity.reference_product.clone(),
        activity.location.clone(),
    )
}

/// Flag datasets without exactly one production exchange, exchanges of an
/// unknown type and production exchanges that disagree with their dataset.
///
/// Findings are logged at `warn` and returned; nothing here fails.
pub fn validate_datasets(activities: &[Activity]) -> ValidationReport {
    let mut report = ValidationReport::default();

    for activity in activities {
        let dataset = dataset_key(activity);

        let production_count = activity.production_count();
        if production_count != 1 {
            let message = format!("{production_count} production exchanges, expected exactly one");
            warn!(dataset = %activity.name, location = %activity.location, "{message}");
            report.push(ValidationIssue {
                kind: IssueKind::ProductionCount,
                dataset: dataset.clone(),
                message,
            });
        }

        for exchange in &activity.exchanges {
            if !exchange.kind.is_known() {
                let message = format!(
                    "exchange `{}` has unknown type `{}`",
                    exchange.name(),
                    exchange.kind
                );
                warn!(dataset = %activity.name, "{message}");
                report.push(ValidationIssue {
                    kind: IssueKind::UnknownExchangeType,
                    dataset: dataset.clone(),
                    message,
                });
            }

            if exchange.is_production() {
                let identity = (
                    exchange.name(),
                    exchange.reference_product(),
                    exchange.location.as_deref().unwrap_or(""),
                );
                if identity != activity.identity() {
                    let message = format!(
                        "production exchange `{} | {} | {}` does not match its dataset",
                        identity.0, identity.1, identity.2
                    );
                    warn!(dataset = %activity.name, "{message}");
                    report.push(ValidationIssue {
                        kind: IssueKind::ProductionMismatch,
                        dataset: dataset.clone(),
                        message,
                    });
                }
            }
        }
    }

    report
}
