use thiserror::Error;

/// Core error type shared across simforge crates.
#[derive(Debug, Error)]
pub enum Error {
    /// The request cannot be satisfied with the given table or counts.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// The network table violates internal invariants.
    #[error("invalid network table: {0}")]
    InvalidTable(String),
}

/// Convenience alias for results returned by simforge crates.
pub type Result<T> = std::result::Result<T, Error>;
