//! Error types raised while reading the analytics database.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors raised while opening or querying the analytics database.
#[derive(Debug, Error)]
pub enum FeedbackDbError {
    /// Opening the `SQLite` database failed.
    #[error("failed to open analytics database at {path}")]
    OpenDatabase {
        /// Requested database path.
        path: Utf8PathBuf,
        /// Source error from `rusqlite`.
        #[source]
        source: rusqlite::Error,
    },
    /// Preparing or executing a query failed.
    #[error("failed to query {operation}")]
    Query {
        /// Description of the failed operation.
        operation: &'static str,
        /// Source error from `rusqlite`.
        #[source]
        source: rusqlite::Error,
    },
}

/// Errors raised while building analytics reports.
#[derive(Debug, Error)]
pub enum StatsError {
    /// The database could not be opened or queried.
    #[error(transparent)]
    Database(#[from] FeedbackDbError),
    /// A count read from the database was negative.
    #[error("{what} count {raw} is negative")]
    NegativeCount {
        /// Which count was being read.
        what: &'static str,
        /// Raw value found in the database.
        raw: i64,
    },
}

/// Errors raised while exporting or loading feedback snapshots.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Reading sessions or ratings from the database failed.
    #[error(transparent)]
    Database(#[from] FeedbackDbError),
    /// Creating the parent directory for the snapshot failed.
    #[error("failed to create parent directory for {path}")]
    CreateParent {
        /// Snapshot path whose parent could not be created.
        path: Utf8PathBuf,
        /// Source error from std I/O.
        #[source]
        source: std::io::Error,
    },
    /// Opening, reading or writing the snapshot file failed.
    #[error("failed to access feedback snapshot at {path}")]
    Io {
        /// Snapshot path.
        path: Utf8PathBuf,
        /// Source error from std I/O.
        #[source]
        source: std::io::Error,
    },
    /// Serialising the snapshot with `bincode` failed.
    #[error("failed to encode feedback snapshot into {path}")]
    Encode {
        /// Snapshot path.
        path: Utf8PathBuf,
        /// Source error from `bincode`.
        #[source]
        source: bincode::Error,
    },
    /// Deserialising the snapshot with `bincode` failed.
    #[error("failed to decode feedback snapshot from {path}")]
    Decode {
        /// Snapshot path.
        path: Utf8PathBuf,
        /// Source error from `bincode`.
        #[source]
        source: bincode::Error,
    },
    /// The file does not start with the snapshot magic.
    #[error("invalid feedback snapshot magic: expected {expected:?}, found {found:?}")]
    InvalidMagic {
        /// Expected byte sequence.
        expected: [u8; 4],
        /// Sequence read from the file.
        found: [u8; 4],
    },
    /// The snapshot was written by an unsupported format version.
    #[error("unsupported feedback snapshot version {found}; supported version is {supported}")]
    UnsupportedVersion {
        /// Version present in the file header.
        found: u16,
        /// Version this build reads and writes.
        supported: u16,
    },
}
