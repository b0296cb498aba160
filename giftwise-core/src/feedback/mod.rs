//! Read-only access to crowd feedback from earlier quiz sessions.
//!
//! The [`FeedbackStore`] trait is the port through which the ranker reads
//! historical likes and dislikes. Stores only answer two questions: which
//! sessions share a recipient profile, and how those sessions rated a gift.
//! Turning the answers into a score is [`collaborative`](crate::collaborative)'s
//! job.

use std::{error::Error as StdError, fmt};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Filters;

mod memory;

pub use memory::MemoryFeedbackStore;

/// A single like or dislike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "i64", into = "i64"))]
pub enum Rating {
    /// Stored as `+1`.
    Like,
    /// Stored as `-1`.
    Dislike,
}

/// Returned when a stored rating is neither `+1` nor `-1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("rating {value} is not +1 or -1")]
pub struct InvalidRating {
    /// The rejected value.
    pub value: i64,
}

impl TryFrom<i64> for Rating {
    type Error = InvalidRating;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Like),
            -1 => Ok(Self::Dislike),
            _ => Err(InvalidRating { value }),
        }
    }
}

impl From<Rating> for i64 {
    fn from(rating: Rating) -> Self {
        match rating {
            Rating::Like => 1,
            Rating::Dislike => -1,
        }
    }
}

/// One user's verdict on one gift within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RatingRecord {
    /// Session that produced the rating.
    pub session_id: u64,
    /// Rated gift.
    pub gift_id: u64,
    /// The verdict.
    pub rating: Rating,
}

/// Categorical answers recorded for a past session.
///
/// Unanswered questions are `None` and never match a similarity key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SessionProfile {
    /// Session identifier.
    pub session_id: u64,
    /// Recorded gender token.
    pub gender: Option<String>,
    /// Recorded age band token.
    pub age: Option<String>,
    /// Recorded occasion token.
    pub occasion: Option<String>,
}

impl SessionProfile {
    /// Report whether this session's answers equal the key exactly.
    #[must_use]
    pub fn matches(&self, key: &SimilarityKey) -> bool {
        self.gender.as_deref() == Some(key.gender.as_str())
            && self.age.as_deref() == Some(key.age.as_str())
            && self.occasion.as_deref() == Some(key.occasion.as_str())
    }
}

/// The (gender, age band, occasion) triple that defines similar sessions.
///
/// # Examples
/// ```
/// use giftwise_core::{SimilarityKey, UserProfile};
///
/// let partial = UserProfile::builder().gender("gender_male").build();
/// assert!(SimilarityKey::from_filters(partial.filters()).is_none());
///
/// let full = UserProfile::builder()
///     .gender("gender_male")
///     .age("age_26_35")
///     .occasion("occasion_birthday")
///     .build();
/// let key = SimilarityKey::from_filters(full.filters()).unwrap();
/// assert_eq!(key.occasion, "occasion_birthday");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SimilarityKey {
    /// Gender token.
    pub gender: String,
    /// Age band token.
    pub age: String,
    /// Occasion token.
    pub occasion: String,
}

impl SimilarityKey {
    /// Construct a key from explicit tokens.
    #[must_use]
    pub fn new(
        gender: impl Into<String>,
        age: impl Into<String>,
        occasion: impl Into<String>,
    ) -> Self {
        Self {
            gender: gender.into(),
            age: age.into(),
            occasion: occasion.into(),
        }
    }

    /// Derive the key from request filters.
    ///
    /// Returns `None` when any of the three answers is missing, since no
    /// recorded session can be equal to an absent answer.
    #[must_use]
    pub fn from_filters(filters: &Filters) -> Option<Self> {
        Some(Self {
            gender: filters.gender.clone()?,
            age: filters.age.clone()?,
            occasion: filters.occasion.clone()?,
        })
    }
}

impl fmt::Display for SimilarityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.gender, self.age, self.occasion)
    }
}

/// Aggregated likes and dislikes for one gift.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RatingTally {
    /// Number of `+1` ratings.
    pub likes: u32,
    /// Number of `-1` ratings.
    pub dislikes: u32,
}

impl RatingTally {
    /// Construct a tally.
    #[must_use]
    pub const fn new(likes: u32, dislikes: u32) -> Self {
        Self { likes, dislikes }
    }

    /// Count one more rating.
    pub const fn record(&mut self, rating: Rating) {
        match rating {
            Rating::Like => self.likes = self.likes.saturating_add(1),
            Rating::Dislike => self.dislikes = self.dislikes.saturating_add(1),
        }
    }

    /// Total number of ratings.
    #[must_use]
    pub const fn total(&self) -> u32 {
        self.likes.saturating_add(self.dislikes)
    }
}

/// Errors reported by a [`FeedbackStore`].
///
/// The ranker never surfaces these to its caller; it logs them and scores
/// the collaborative component as neutral.
#[derive(Debug, Error)]
pub enum FeedbackError {
    /// The backing store failed.
    #[error("feedback store failed to {operation}")]
    Backend {
        /// Description of the failed operation.
        operation: &'static str,
        /// Underlying failure.
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },
    /// A lock guarding the store was poisoned by a panicking thread.
    #[error("feedback store lock poisoned while trying to {operation}")]
    Poisoned {
        /// Description of the interrupted operation.
        operation: &'static str,
    },
}

impl FeedbackError {
    /// Wrap a backend failure.
    pub fn backend<E>(operation: &'static str, source: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::Backend {
            operation,
            source: Box::new(source),
        }
    }
}

/// Read-only port to historical session answers and ratings.
///
/// # Examples
/// ```
/// use giftwise_core::{
///     FeedbackError, FeedbackStore, RatingTally, SimilarityKey,
/// };
///
/// struct Everyone;
///
/// impl FeedbackStore for Everyone {
///     fn similar_sessions(&self, _key: &SimilarityKey) -> Result<Vec<u64>, FeedbackError> {
///         Ok(vec![1, 2])
///     }
///
///     fn rating_tally(&self, sessions: &[u64], _gift_id: u64) -> Result<RatingTally, FeedbackError> {
///         let likes = u32::try_from(sessions.len()).unwrap_or(u32::MAX);
///         Ok(RatingTally::new(likes, 0))
///     }
/// }
///
/// let key = SimilarityKey::new("gender_male", "age_26_35", "occasion_birthday");
/// let sessions = Everyone.similar_sessions(&key).unwrap();
/// assert_eq!(Everyone.rating_tally(&sessions, 7).unwrap().likes, 2);
/// ```
pub trait FeedbackStore: Send + Sync {
    /// Return the identifiers of sessions whose answers equal `key`.
    ///
    /// # Errors
    /// Returns [`FeedbackError`] when the backing store cannot be read.
    fn similar_sessions(&self, key: &SimilarityKey) -> Result<Vec<u64>, FeedbackError>;

    /// Count likes and dislikes for `gift_id` among `sessions`.
    ///
    /// # Errors
    /// Returns [`FeedbackError`] when the backing store cannot be read.
    fn rating_tally(&self, sessions: &[u64], gift_id: u64) -> Result<RatingTally, FeedbackError>;
}
