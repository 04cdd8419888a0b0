use thiserror::Error;

/// Errors that can occur during entitag core operations.
#[derive(Debug, Error)]
pub enum EntitagError {
    /// The model artifact could not be read or parsed.
    #[error("failed to load model: {0}")]
    ModelLoad(String),

    /// The model artifact could not be written to disk.
    #[error("failed to persist model: {0}")]
    ModelPersist(String),

    /// A regex pattern failed to compile (should not happen with static patterns).
    #[error("regex compilation error: {0}")]
    Regex(#[from] regex::Error),

    /// A training record references offsets outside its own text.
    #[error("malformed training record: {0}")]
    MalformedRecord(String),
}

/// Result type alias for entitag operations.
pub type Result<T> = std::result::Result<T, EntitagError>;
