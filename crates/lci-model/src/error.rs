use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("unknown target database `{0}` (expected `ecoinvent` or `uvek`)")]
    UnknownTarget(String),
    #[error("the values for key `name` must be unique in `{list}` (duplicate: {name})")]
    DuplicateName { list: &'static str, name: String },
    #[error("`{list}` entry {index} has an empty `{key}`")]
    EmptyField {
        list: &'static str,
        index: usize,
        key: &'static str,
    },
}

pub type Result<T> = std::result::Result<T, ModelError>;
