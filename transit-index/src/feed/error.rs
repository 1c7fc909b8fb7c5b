//! Feed decoding error types.

/// Errors that can occur when reading a feed snapshot from outside the
/// process.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    /// Reading the snapshot failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot is not valid JSON or has the wrong shape
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}
