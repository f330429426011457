//! Life-cycle inventory data model.
//!
//! Activities and exchanges keep Brightway's field names on the wire
//! (`reference product`, `uncertainty type`, ...) so inventories exported
//! from Brightway deserialize without a translation layer.

pub mod activity;
pub mod error;
pub mod exchange;
pub mod metadata;
pub mod report;
pub mod target;

pub use activity::{Activity, ActivityKind};
pub use error::{ModelError, Result};
pub use exchange::{Exchange, ExchangeKind};
pub use metadata::{InventoryMetadata, LiteratureReference, SystemDescription};
pub use report::{IssueKind, ValidationIssue, ValidationReport};
pub use target::TargetDatabase;
