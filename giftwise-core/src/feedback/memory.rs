//! In-memory feedback store backed by plain vectors.

use std::collections::BTreeSet;

use super::{FeedbackError, FeedbackStore, RatingRecord, RatingTally, SessionProfile, SimilarityKey};

/// [`FeedbackStore`] holding every session and rating in memory.
///
/// Lookups scan linearly. Snapshots exported from the analytics database load
/// into this type.
///
/// # Examples
/// ```
/// use giftwise_core::{
///     FeedbackStore, MemoryFeedbackStore, Rating, RatingRecord, SessionProfile, SimilarityKey,
/// };
///
/// let store = MemoryFeedbackStore::new(
///     vec![SessionProfile {
///         session_id: 1,
///         gender: Some("gender_female".into()),
///         age: Some("age_18_25".into()),
///         occasion: Some("occasion_birthday".into()),
///     }],
///     vec![RatingRecord { session_id: 1, gift_id: 9, rating: Rating::Like }],
/// );
/// let key = SimilarityKey::new("gender_female", "age_18_25", "occasion_birthday");
/// let sessions = store.similar_sessions(&key).unwrap();
/// assert_eq!(sessions, vec![1]);
/// assert_eq!(store.rating_tally(&sessions, 9).unwrap().likes, 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryFeedbackStore {
    sessions: Vec<SessionProfile>,
    ratings: Vec<RatingRecord>,
}

impl MemoryFeedbackStore {
    /// Create a store from recorded sessions and ratings.
    #[must_use]
    pub const fn new(sessions: Vec<SessionProfile>, ratings: Vec<RatingRecord>) -> Self {
        Self { sessions, ratings }
    }

    /// Recorded sessions.
    #[must_use]
    pub fn sessions(&self) -> &[SessionProfile] {
        &self.sessions
    }

    /// Recorded ratings.
    #[must_use]
    pub fn ratings(&self) -> &[RatingRecord] {
        &self.ratings
    }
}

impl FeedbackStore for MemoryFeedbackStore {
    fn similar_sessions(&self, key: &SimilarityKey) -> Result<Vec<u64>, FeedbackError> {
        Ok(self
            .sessions
            .iter()
            .filter(|session| session.matches(key))
            .map(|session| session.session_id)
            .collect())
    }

    fn rating_tally(&self, sessions: &[u64], gift_id: u64) -> Result<RatingTally, FeedbackError> {
        let wanted: BTreeSet<u64> = sessions.iter().copied().collect();
        let mut tally = RatingTally::default();
        for record in &self.ratings {
            if record.gift_id == gift_id && wanted.contains(&record.session_id) {
                tally.record(record.rating);
            }
        }
        Ok(tally)
    }
}
