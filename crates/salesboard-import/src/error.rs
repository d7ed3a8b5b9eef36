use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Dataset responded with status {0}")]
    Status(u16),

    #[error("Dataset is not a JSON array: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(#[from] salesboard_db::Error),
}

impl Error {
    /// Whether the failure happened while fetching, before anything was stored.
    pub fn is_fetch(&self) -> bool {
        !matches!(self, Error::Store(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
