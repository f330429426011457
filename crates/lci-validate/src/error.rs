use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidateError {
    /// Rendered table of the offending exchanges is kept for display.
    #[error(
        "{count} exchange(s) lack mandatory fields (marked `None`):\n{table}"
    )]
    MissingMandatoryFields { count: usize, table: String },
}
