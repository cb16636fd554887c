//! Error types surfaced by the storage engine.

use std::io;

use thiserror::Error;

/// All failures the engine can surface to a caller.
///
/// IO failures are passed through untouched; everything else is a condition
/// the engine detected itself. A [`Error::InvalidRecordCrc`] returned from a
/// read does not poison the engine, but the same condition during startup
/// replay aborts [`crate::Database::open`], since it means the log is
/// corrupted before its clean zero tail.
#[derive(Debug, Error)]
pub enum Error {
    /// The caller passed a zero-length key.
    #[error("key is empty")]
    KeyIsEmpty,

    /// No live entry exists for this key.
    #[error("key not found in database")]
    KeyNotFound,

    /// The index implementation rejected an update.
    #[error("failed to update index")]
    IndexUpdateFailed,

    /// An index entry refers to a file id that is not part of the open
    /// segment set.
    #[error("data file not found in database")]
    DataFileNotFound,

    /// A `.data` file in the directory has a name that does not parse as a
    /// numeric file id.
    #[error("data directory is corrupted: bad data file name {0:?}")]
    DataDirectoryCorrupted(String),

    /// A record's stored CRC does not match the CRC recomputed over its
    /// contents.
    #[error("invalid record crc, log data may be corrupted")]
    InvalidRecordCrc,

    /// The options passed to [`crate::Database::open`] failed validation.
    #[error("invalid database options: {0}")]
    InvalidOptions(&'static str),

    /// An operating-system level IO failure.
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
