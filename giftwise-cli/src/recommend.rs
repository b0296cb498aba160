//! `recommend` command: rank the catalog for one set of quiz answers.

use std::{io::Write, sync::Arc};

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use giftwise_core::{
    DEFAULT_RESULT_LIMIT, FeedbackStore, QuizAnswers, Ranker, ScoredGift, SqliteGiftCatalog,
};
use giftwise_feedback::{SqliteFeedbackStore, load_snapshot};
use log::{debug, warn};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::{
    ARG_CATALOG_DB, ARG_FEEDBACK_DB, ARG_FEEDBACK_SNAPSHOT, ARG_LIMIT, ARG_REQUEST, CliError,
    ENV_RECOMMEND_REQUEST, require_existing, write_json,
};

/// Catalog path used when none is configured.
pub(crate) const DEFAULT_CATALOG_DB: &str = "gifts.db";

/// CLI arguments for the `recommend` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "recommend",
    long_about = "Rank every gift in the catalog against a JSON file of quiz \
                 answers. Crowd feedback from an analytics database or a \
                 feedback snapshot adjusts the ranking when configured; an \
                 unreadable feedback source is logged and skipped.",
    about = "Rank gifts for a completed quiz"
)]
#[ortho_config(prefix = "GIFTWISE")]
pub(crate) struct RecommendArgs {
    /// Path to a JSON file of quiz answers.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) request_path: Option<Utf8PathBuf>,
    /// Path to the gift catalog (`gifts.db`).
    #[arg(long = ARG_CATALOG_DB, value_name = "path")]
    #[serde(default)]
    pub(crate) catalog_db: Option<Utf8PathBuf>,
    /// Path to the analytics database used for crowd feedback.
    #[arg(long = ARG_FEEDBACK_DB, value_name = "path")]
    #[serde(default)]
    pub(crate) feedback_db: Option<Utf8PathBuf>,
    /// Path to a feedback snapshot used for crowd feedback.
    #[arg(long = ARG_FEEDBACK_SNAPSHOT, value_name = "path")]
    #[serde(default)]
    pub(crate) feedback_snapshot: Option<Utf8PathBuf>,
    /// Maximum number of gifts to return.
    #[arg(long = ARG_LIMIT, value_name = "count")]
    #[serde(default)]
    pub(crate) limit: Option<usize>,
}

impl RecommendArgs {
    pub(crate) fn into_config(self) -> Result<RecommendConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        RecommendConfig::try_from(merged)
    }
}

/// Where crowd feedback is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum FeedbackSource {
    /// Live analytics database.
    Database(Utf8PathBuf),
    /// Snapshot written by the `snapshot` command.
    Snapshot(Utf8PathBuf),
}

impl FeedbackSource {
    fn open(&self) -> Result<Arc<dyn FeedbackStore>, CliError> {
        match self {
            Self::Database(path) => Ok(Arc::new(SqliteFeedbackStore::open(path)?)),
            Self::Snapshot(path) => Ok(Arc::new(load_snapshot(path)?)),
        }
    }
}

/// Resolved `recommend` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RecommendConfig {
    pub(crate) request_path: Utf8PathBuf,
    pub(crate) catalog_db: Utf8PathBuf,
    pub(crate) feedback: Option<FeedbackSource>,
    pub(crate) limit: usize,
}

impl RecommendConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        require_existing(&self.request_path, ARG_REQUEST)?;
        require_existing(&self.catalog_db, ARG_CATALOG_DB)?;
        Ok(())
    }
}

impl TryFrom<RecommendArgs> for RecommendConfig {
    type Error = CliError;

    fn try_from(args: RecommendArgs) -> Result<Self, Self::Error> {
        let request_path = args.request_path.ok_or(CliError::MissingArgument {
            field: ARG_REQUEST,
            env: ENV_RECOMMEND_REQUEST,
        })?;
        let feedback = match (args.feedback_db, args.feedback_snapshot) {
            (Some(_), Some(_)) => {
                return Err(CliError::ConflictingFeedbackSources {
                    database: ARG_FEEDBACK_DB,
                    snapshot: ARG_FEEDBACK_SNAPSHOT,
                });
            }
            (Some(path), None) => Some(FeedbackSource::Database(path)),
            (None, Some(path)) => Some(FeedbackSource::Snapshot(path)),
            (None, None) => None,
        };
        Ok(Self {
            request_path,
            catalog_db: args
                .catalog_db
                .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_CATALOG_DB)),
            feedback,
            limit: args.limit.unwrap_or(DEFAULT_RESULT_LIMIT),
        })
    }
}

pub(crate) fn run_recommend(args: RecommendArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    let ranked = execute_recommend(&config)?;
    write_json(writer, &ranked)
}

pub(crate) fn execute_recommend(config: &RecommendConfig) -> Result<Vec<ScoredGift>, CliError> {
    let answers = load_quiz_answers(&config.request_path)?;
    let catalog = SqliteGiftCatalog::open(config.catalog_db.as_std_path())?;
    let mut ranker = Ranker::new(catalog);
    if let Some(source) = &config.feedback {
        match source.open() {
            Ok(store) => ranker = ranker.with_feedback(store),
            Err(err) => warn!("ranking without crowd feedback: {err}"),
        }
    }
    let ranked = ranker.rank(&answers.to_profile(), config.limit);
    debug!(
        "ranked {} of {} gifts for {} (limit {}, crowd feedback {})",
        ranked.len(),
        ranker.catalog().len(),
        config.request_path,
        config.limit,
        if ranker.has_feedback() { "on" } else { "off" }
    );
    Ok(ranked)
}

/// Load quiz answers from a JSON file.
pub(crate) fn load_quiz_answers(path: &Utf8Path) -> Result<QuizAnswers, CliError> {
    let contents =
        giftwise_fs::read_utf8_to_string(path).map_err(|source| CliError::OpenRequest {
            path: path.to_path_buf(),
            source,
        })?;
    serde_json::from_str(&contents).map_err(|source| CliError::ParseRequest {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<RecommendConfig, CliError> {
    let merged = RecommendArgs::merge_from_layers(layers).map_err(CliError::from)?;
    RecommendConfig::try_from(merged)
}
