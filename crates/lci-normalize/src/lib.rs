//! Naming and classification rules shared by both conversion directions.
//!
//! - **technosphere**: parse SimaPro composite names into name, product and location
//! - **naming**: compose target-database process names
//! - **biosphere**: reconcile biosphere flows against the known flow list
//! - **classify**: waste-treatment, blacklist and unit-conversion predicates
//! - **numeric**: SimaPro number formatting and uncertainty mapping
//!
//! Every function is pure apart from [`format_biosphere_exchange`], which
//! rewrites the exchange it is given and reports what it did.

pub mod biosphere;
pub mod classify;
pub mod naming;
pub mod numeric;
pub mod technosphere;

pub use biosphere::{BiosphereResolution, format_biosphere_exchange, get_subcategory};
pub use classify::{
    check_exchanges_for_conversion, convert_exchange_unit, is_a_waste_treatment,
    is_activity_waste_treatment, is_blacklisted,
};
pub use naming::{capitalize_first, format_exchange_name};
pub use numeric::{
    SimaproUncertainty, convert_sd_to_sd2, convert_sd2_to_sd, format_scientific,
    round_floats_in_string,
};
pub use technosphere::{TechnosphereName, format_technosphere_exchange};
