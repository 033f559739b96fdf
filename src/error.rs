use thiserror::Error;

#[derive(Error, Debug)]
pub enum DropInError {
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("Redirect resolution error: {0}")]
    RedirectResolution(String),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Scenario error: {0}")]
    Scenario(String),
}

pub type Result<T> = std::result::Result<T, DropInError>;
