//! Error types emitted by the Giftwise CLI.
//!
//! Keep this error type reasonably small, as every command helper returns
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use giftwise_core::CatalogError;
use giftwise_feedback::{FeedbackDbError, SnapshotError, StatsError};
use thiserror::Error;

/// Errors emitted by the Giftwise CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// Installing the log subscriber failed.
    #[error("failed to initialise logging: {0}")]
    InitLogging(#[source] tracing_subscriber::util::TryInitError),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        /// Name of the option.
        field: &'static str,
        /// Environment variable that also sets it.
        env: &'static str,
    },
    /// Both feedback sources were configured.
    #[error("set at most one of --{database} and --{snapshot}")]
    ConflictingFeedbackSources {
        /// Database flag.
        database: &'static str,
        /// Snapshot flag.
        snapshot: &'static str,
    },
    /// A referenced input path does not exist on disk.
    #[error("{field} path {path:?} does not exist")]
    MissingSourceFile {
        /// Name of the option.
        field: &'static str,
        /// Offending path.
        path: Utf8PathBuf,
    },
    /// A referenced input path exists but is not a file.
    #[error("{field} path {path:?} exists but is not a file")]
    SourcePathNotFile {
        /// Name of the option.
        field: &'static str,
        /// Offending path.
        path: Utf8PathBuf,
    },
    /// A referenced input path could not be inspected due to an IO error.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        /// Name of the option.
        field: &'static str,
        /// Offending path.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Opening the quiz answers file failed.
    #[error("failed to read quiz answers at {path:?}: {source}")]
    OpenRequest {
        /// Offending path.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Quiz answers JSON could not be decoded.
    #[error("failed to parse quiz answers JSON at {path:?}: {source}")]
    ParseRequest {
        /// Offending path.
        path: Utf8PathBuf,
        /// Decoder error.
        #[source]
        source: serde_json::Error,
    },
    /// Opening the gift catalog failed.
    #[error(transparent)]
    OpenCatalog(#[from] CatalogError),
    /// Opening the analytics database failed.
    #[error(transparent)]
    OpenFeedback(#[from] FeedbackDbError),
    /// Building an analytics report failed.
    #[error("failed to build feedback report: {0}")]
    Stats(#[from] StatsError),
    /// Exporting or loading a feedback snapshot failed.
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
    /// Serialising command output failed.
    #[error("failed to serialise output: {0}")]
    SerialiseOutput(#[source] serde_json::Error),
    /// Writing command output failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
