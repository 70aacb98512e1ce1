pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{entity} index {index} out of range (len {len})")]
    IndexOutOfRange {
        entity: &'static str,
        index: usize,
        len: usize,
    },

    #[error("Question set is not ready to save: {0}")]
    Incomplete(String),

    #[error("A save is already in flight")]
    SaveInFlight,

    #[error("Failed to load from the question bank: {0}")]
    RemoteLoad(String),

    #[error("Failed to save to the question bank: {0}")]
    RemoteSave(String),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl Error {
    pub fn out_of_range(entity: &'static str, index: usize, len: usize) -> Self {
        Error::IndexOutOfRange { entity, index, len }
    }
}
