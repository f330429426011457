//! Non-fatal findings produced by the consistency checks.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// Dataset without exactly one production exchange.
    ProductionCount,
    /// Exchange whose type is not production, technosphere or biosphere.
    UnknownExchangeType,
    /// Production exchange whose identity differs from its dataset.
    ProductionMismatch,
}

impl IssueKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::ProductionCount => "production count",
            Self::UnknownExchangeType => "unknown type",
            Self::ProductionMismatch => "production mismatch",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub kind: IssueKind,
    /// `(name, reference product, location)` of the dataset.
    pub dataset: (String, String, String),
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn push(&mut self, issue: ValidationIssue) {
        self.issues.push(issue);
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn count(&self, kind: IssueKind) -> usize {
        self.issues.iter().filter(|issue| issue.kind == kind).count()
    }
}
