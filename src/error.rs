use thiserror::Error;

#[derive(Error, Debug)]
pub enum AtriumError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for AtriumError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            AtriumError::Decode(err.to_string())
        } else {
            AtriumError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for AtriumError {
    fn from(err: serde_json::Error) -> Self {
        AtriumError::Decode(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AtriumError>;
