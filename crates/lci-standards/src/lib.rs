#![deny(unsafe_code)]

pub mod biosphere;
pub mod csv_utils;
pub mod error;
pub mod paths;
pub mod tables;
pub mod technosphere;

pub use crate::biosphere::{BiosphereCorrespondence, BiosphereName, KnownFlows, SimaproBiosphere};
pub use crate::error::StandardsError;
pub use crate::paths::{DATA_ENV_VAR, default_data_root};
pub use crate::tables::{
    Blacklist, GenericNameRule, NameForm, NameRules, ReferenceTables, UnitTable, WasteTerms,
    load_default_tables,
};
pub use crate::technosphere::{
    TransportDataset, TransportDistance, TransportTable, UnitConversion, UvekNames,
};
