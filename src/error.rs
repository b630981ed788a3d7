//! Error types for anim item operations

/// Result type for anim item operations
pub type AnimResult<T> = Result<T, AnimItemError>;

/// Anim item errors
#[derive(Debug, thiserror::Error)]
pub enum AnimItemError {
    /// `load` was called without a replay option
    #[error("No replay option given")]
    MissingOption,

    /// The create form has no start or end frame
    #[error("Please choose a start frame and an end frame.")]
    MissingFrameRange,

    /// The stored bundle could not be read back
    #[error("Invalid bundle: {0}")]
    InvalidBundle(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Failure raised by the transfer engine or the commit primitive
    #[error(transparent)]
    Engine(#[from] anyhow::Error),
}
