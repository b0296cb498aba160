//! Core scoring and ranking engine for Giftwise recommendations.
//!
//! A request's quiz answers become a [`UserProfile`]. The [`Ranker`] scans a
//! [`GiftCatalog`], drops items the primary [`filter`] excludes, and scores
//! the rest by summing three components:
//! - [`budget_fit`], which prefers items whose price range tops out near the
//!   user's ceiling;
//! - the [`preference`] score over value dimensions and interest overlap;
//! - the [`collaborative`] bonus from ratings left by similar past sessions.
//!
//! Tag strings stored with catalog rows are decoded once into [`GiftTags`];
//! see [`tags`] for the codec. Crowd feedback is read through the
//! [`FeedbackStore`] port and any failure there degrades to a neutral score.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod answers;
pub mod budget;
pub mod catalog;
pub mod collaborative;
pub mod feedback;
pub mod filter;
mod gift;
pub mod preference;
mod profile;
mod ranker;
pub mod tags;

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub mod test_support;

pub use answers::{
    AnswerValue, DEFAULT_RESULT_LIMIT, QuizAnswer, QuizAnswers, SELECTED_INTEREST_WEIGHT,
};
pub use budget::{BudgetTier, UnknownBudgetTier, budget_fit};
pub use catalog::{GiftCatalog, MemoryCatalog};
#[cfg(feature = "store-sqlite")]
pub use catalog::{CatalogError, SqliteGiftCatalog};
pub use collaborative::{CollaborativePass, collaborative_score};
pub use feedback::{
    FeedbackError, FeedbackStore, InvalidRating, MemoryFeedbackStore, Rating, RatingRecord,
    RatingTally, SessionProfile, SimilarityKey,
};
pub use filter::Exclusion;
pub use gift::{Gift, GiftTags, RawTagColumns, ValueTags};
pub use preference::PreferenceScore;
pub use profile::{
    BudgetFilter, Filters, InterestWeights, NEUTRAL_WEIGHT, Stance, UserProfile,
    UserProfileBuilder, ValueDimension, ValueWeights,
};
pub use ranker::{Ranker, ScoredGift};
