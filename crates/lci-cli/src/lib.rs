//! Command-line front end for converting inventories between Brightway and SimaPro.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod summary;
