use super::StoreError;

/// Errors that abort processing of a file
#[derive(Debug, thiserror::Error)]
pub enum FilterError {
    /// Source bytes could not be read
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Parameter store refused the handoff
    #[error("Store error: {0}")]
    StoreError(#[from] StoreError),
}
