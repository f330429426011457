//! Checks run around a conversion.
//!
//! Only the mandatory-field check is fatal. Everything else produces
//! warnings that are logged and returned for display.

mod consistency;
mod error;
mod mandatory;
pub mod render;
mod unused;

pub use consistency::validate_datasets;
pub use error::ValidateError;
pub use mandatory::{MissingFields, check_inventories, find_missing_fields};
pub use unused::{UnusedExchange, unused_exchanges};
