//! Facade crate for the Giftwise recommendation engine.
//!
//! This crate re-exports the core scoring types and exposes the SQLite
//! catalog and the analytics-backed feedback sources behind feature flags.

#![forbid(unsafe_code)]

pub use giftwise_core::{
    DEFAULT_RESULT_LIMIT, FeedbackError, FeedbackStore, Gift, GiftCatalog, MemoryCatalog,
    MemoryFeedbackStore, QuizAnswer, QuizAnswers, Ranker, Rating, RatingTally, ScoredGift,
    UserProfile,
};

#[cfg(feature = "store-sqlite")]
pub use giftwise_core::{CatalogError, SqliteGiftCatalog};

#[cfg(feature = "feedback-sqlite")]
pub use giftwise_feedback::{
    FeedbackAnalytics, FeedbackDbError, FeedbackReport, SnapshotError, SqliteFeedbackStore,
    StatsError, load_snapshot, write_snapshot_file,
};
