use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Invalid query parameter `{field}`: {value:?}")]
    Validation { field: &'static str, value: String },

    #[error("Unknown month matching policy: {0}")]
    UnknownPolicy(String),

    #[error("Unknown price band: {0}")]
    UnknownBand(String),
}

pub type Result<T> = std::result::Result<T, Error>;
