//! Command-line interface for Giftwise recommendations and feedback reports.
//!
//! Three subcommands are available:
//! - `recommend` ranks the gift catalog against a JSON file of quiz answers;
//! - `ratings` prints the gift leaderboard, completion funnel and answer
//!   distribution from the analytics database;
//! - `snapshot` exports recorded sessions and ratings to `feedback.bin`.
//!
//! Every option can also come from a configuration file or a `GIFTWISE_*`
//! environment variable, layered by `ortho_config`.
#![forbid(unsafe_code)]

use std::{ffi::OsString, io::Write};

use camino::Utf8Path;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{EnvFilter, util::SubscriberInitExt};

mod error;
mod feedback;
mod recommend;

pub use error::CliError;

use feedback::{RatingsArgs, SnapshotArgs, run_ratings, run_snapshot};
use recommend::{RecommendArgs, run_recommend};

pub(crate) const ARG_REQUEST: &str = "request";
pub(crate) const ARG_CATALOG_DB: &str = "catalog-db";
pub(crate) const ARG_FEEDBACK_DB: &str = "feedback-db";
pub(crate) const ARG_FEEDBACK_SNAPSHOT: &str = "feedback-snapshot";
pub(crate) const ARG_LIMIT: &str = "limit";
pub(crate) const ARG_OUTPUT: &str = "output";
pub(crate) const ENV_RECOMMEND_REQUEST: &str = "GIFTWISE_CMDS_RECOMMEND_REQUEST_PATH";

/// Environment variable holding the log filter directives.
pub const LOG_ENV: &str = "GIFTWISE_LOG";

/// Filter used when [`LOG_ENV`] is unset or invalid.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Install a stderr log subscriber filtered by [`LOG_ENV`].
///
/// Records emitted through the `log` facade by the library crates are
/// forwarded to the same subscriber.
///
/// # Errors
/// Returns [`CliError::InitLogging`] when a global subscriber is already set.
pub fn init_logging() -> Result<(), CliError> {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish()
        .try_init()
        .map_err(CliError::InitLogging)
}

/// Run the Giftwise CLI with the current process arguments, writing command
/// output to stdout.
///
/// # Errors
/// Returns [`CliError`] when argument parsing, configuration or the selected
/// command fails.
pub fn run() -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_from(std::env::args_os(), &mut stdout)
}

/// Run the CLI with explicit arguments and output sink.
///
/// # Errors
/// Returns [`CliError`] when argument parsing, configuration or the selected
/// command fails.
pub fn run_from<I, T>(args: I, writer: &mut dyn Write) -> Result<(), CliError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = Cli::try_parse_from(args)?;
    match cli.command {
        Command::Recommend(args) => run_recommend(args, writer),
        Command::Ratings(args) => run_ratings(args, writer),
        Command::Snapshot(args) => run_snapshot(args, writer),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "giftwise",
    about = "Gift recommendations scored against quiz answers and crowd feedback",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Rank the gift catalog for a completed quiz.
    Recommend(RecommendArgs),
    /// Report likes, funnel and answer statistics.
    Ratings(RatingsArgs),
    /// Export recorded feedback to a snapshot file.
    Snapshot(SnapshotArgs),
}

/// Fail unless `path` names an existing regular file.
pub(crate) fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
    match giftwise_fs::file_is_file(path) {
        Ok(true) => Ok(()),
        Ok(false) => Err(CliError::SourcePathNotFile {
            field,
            path: path.to_path_buf(),
        }),
        Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
            Err(CliError::MissingSourceFile {
                field,
                path: path.to_path_buf(),
            })
        }
        Err(source) => Err(CliError::InspectSourcePath {
            field,
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Write `value` as pretty JSON followed by a newline.
pub(crate) fn write_json<T: Serialize>(writer: &mut dyn Write, value: &T) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(value).map_err(CliError::SerialiseOutput)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}

#[cfg(test)]
mod tests;
