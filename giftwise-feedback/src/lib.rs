//! Crowd feedback sources for Giftwise.
//!
//! The quiz service records every session's answers and the likes and
//! dislikes given to recommended gifts in an analytics `SQLite` database.
//! This crate reads that database in three ways:
//! - [`SqliteFeedbackStore`] implements the
//!   [`FeedbackStore`](giftwise_core::FeedbackStore) port so the ranker can
//!   score gifts collaboratively against the live database;
//! - [`FeedbackAnalytics`] builds read-only reports: a gift leaderboard, the
//!   completion funnel and the answer distribution;
//! - [`write_snapshot_file`] exports sessions and ratings to a `bincode`
//!   artefact that [`load_snapshot`] turns back into an in-memory store.
//!
//! The database is never written. Creating its schema is the quiz service's
//! job.
//!
//! # Examples
//!
//! ```no_run
//! use camino::Utf8Path;
//! use giftwise_feedback::{load_snapshot, write_snapshot_file};
//!
//! let db_path = Utf8Path::new("analytics.db");
//! let output = Utf8Path::new("artifacts/feedback.bin");
//! write_snapshot_file(db_path, output).expect("persist feedback snapshot");
//! let store = load_snapshot(output).expect("load feedback snapshot");
//! assert!(!store.sessions().is_empty());
//! ```

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod error;
mod snapshot;
mod stats;
mod store;

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub mod test_support;

pub use error::{FeedbackDbError, SnapshotError, StatsError};
pub use snapshot::{
    SNAPSHOT_MAGIC, SNAPSHOT_VERSION, export_feedback, load_snapshot, write_snapshot,
    write_snapshot_file,
};
pub use stats::{
    AnswerDistribution, FeedbackAnalytics, FeedbackReport, FunnelStats, GiftRatingSummary,
    UNANSWERED,
};
pub use store::SqliteFeedbackStore;

/// Bincode options used for feedback snapshots.
pub(crate) fn bincode_options() -> impl bincode::Options {
    bincode::DefaultOptions::new()
}

/// Public helper exposing the bincode configuration used for snapshots.
#[must_use]
pub fn snapshot_bincode_options() -> impl bincode::Options {
    bincode_options()
}
