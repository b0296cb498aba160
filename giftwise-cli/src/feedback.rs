//! `ratings` and `snapshot` commands over the analytics database.

use std::io::Write;

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use giftwise_feedback::{FeedbackAnalytics, FeedbackReport, write_snapshot_file};
use log::info;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::{ARG_FEEDBACK_DB, ARG_OUTPUT, CliError, require_existing, write_json};

/// Analytics database path used when none is configured.
pub(crate) const DEFAULT_FEEDBACK_DB: &str = "analytics.db";

/// Snapshot path used when none is configured.
pub(crate) const DEFAULT_SNAPSHOT_OUTPUT: &str = "feedback.bin";

/// CLI arguments for the `ratings` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "ratings",
    long_about = "Summarise recorded feedback: gifts ordered by net likes, \
                 the quiz completion funnel and the distribution of answers.",
    about = "Report recorded feedback"
)]
#[ortho_config(prefix = "GIFTWISE")]
pub(crate) struct RatingsArgs {
    /// Path to the analytics database (`analytics.db`).
    #[arg(long = ARG_FEEDBACK_DB, value_name = "path")]
    #[serde(default)]
    pub(crate) feedback_db: Option<Utf8PathBuf>,
}

impl RatingsArgs {
    pub(crate) fn into_feedback_db(self) -> Result<Utf8PathBuf, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        Ok(feedback_db_or_default(merged.feedback_db))
    }
}

/// CLI arguments for the `snapshot` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "snapshot",
    long_about = "Export recorded session answers and ratings to a versioned \
                 snapshot file that `recommend --feedback-snapshot` can read \
                 without the analytics database.",
    about = "Export a feedback snapshot"
)]
#[ortho_config(prefix = "GIFTWISE")]
pub(crate) struct SnapshotArgs {
    /// Path to the analytics database (`analytics.db`).
    #[arg(long = ARG_FEEDBACK_DB, value_name = "path")]
    #[serde(default)]
    pub(crate) feedback_db: Option<Utf8PathBuf>,
    /// Destination of the snapshot (`feedback.bin`).
    #[arg(long = ARG_OUTPUT, value_name = "path")]
    #[serde(default)]
    pub(crate) output: Option<Utf8PathBuf>,
}

impl SnapshotArgs {
    pub(crate) fn into_config(self) -> Result<SnapshotConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        Ok(SnapshotConfig::from(merged))
    }
}

/// Resolved `snapshot` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SnapshotConfig {
    pub(crate) feedback_db: Utf8PathBuf,
    pub(crate) output: Utf8PathBuf,
}

impl From<SnapshotArgs> for SnapshotConfig {
    fn from(args: SnapshotArgs) -> Self {
        Self {
            feedback_db: feedback_db_or_default(args.feedback_db),
            output: args
                .output
                .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_SNAPSHOT_OUTPUT)),
        }
    }
}

/// Counts written by the `snapshot` command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct SnapshotSummary {
    pub(crate) output: Utf8PathBuf,
    pub(crate) sessions: usize,
    pub(crate) ratings: usize,
}

fn feedback_db_or_default(path: Option<Utf8PathBuf>) -> Utf8PathBuf {
    path.unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_FEEDBACK_DB))
}

pub(crate) fn run_ratings(args: RatingsArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let feedback_db = args.into_feedback_db()?;
    require_existing(&feedback_db, ARG_FEEDBACK_DB)?;
    let report = build_report(&feedback_db)?;
    write_json(writer, &report)
}

pub(crate) fn build_report(feedback_db: &Utf8Path) -> Result<FeedbackReport, CliError> {
    let analytics = FeedbackAnalytics::open(feedback_db)?;
    Ok(analytics.report()?)
}

pub(crate) fn run_snapshot(args: SnapshotArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    require_existing(&config.feedback_db, ARG_FEEDBACK_DB)?;
    let summary = execute_snapshot(&config)?;
    write_json(writer, &summary)
}

pub(crate) fn execute_snapshot(config: &SnapshotConfig) -> Result<SnapshotSummary, CliError> {
    let store = write_snapshot_file(&config.feedback_db, &config.output)?;
    let summary = SnapshotSummary {
        output: config.output.clone(),
        sessions: store.sessions().len(),
        ratings: store.ratings().len(),
    };
    info!(
        "wrote {} sessions and {} ratings to {}",
        summary.sessions, summary.ratings, summary.output
    );
    Ok(summary)
}
