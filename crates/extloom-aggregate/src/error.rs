//! Error types for archive handling, aggregation and emission.

use extloom_core::CodecError;
use thiserror::Error;

/// Result type for archive operations.
pub type ArchiveResult<T> = std::result::Result<T, ArchiveError>;

/// Result type for emitters.
pub type EmitResult<T> = std::result::Result<T, EmitError>;

/// Result type for aggregator operations.
pub type Result<T> = std::result::Result<T, AggregateError>;

/// Archive container errors.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Zip container error.
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// An entry failed to encode or decode.
    #[error("Entry {entry}: {source}")]
    Codec {
        entry: String,
        #[source]
        source: CodecError,
    },
}

/// Source emitter errors.
#[derive(Debug, Error)]
pub enum EmitError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The job cannot be written to the target.
    #[error("Invalid target: {0}")]
    InvalidTarget(String),
}

/// Aggregator errors.
#[derive(Debug, Error)]
pub enum AggregateError {
    /// Archive could not be ingested.
    #[error("Archive error: {0}")]
    Archive(#[from] ArchiveError),

    /// IO error outside the archive container.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Emitter failed.
    #[error("Emit error: {0}")]
    Emit(#[from] EmitError),
}
