//! Collaborative adjustment from the ratings of similar past sessions.
//!
//! A gift liked by people who answered the quiz the same way earns a bonus of
//! up to [`MAX_COLLABORATIVE_BONUS`]; a disliked one loses up to the same
//! amount. The bonus grows with the number of ratings until
//! [`CONFIDENCE_SATURATION`] ratings have been seen.

use std::fmt;

use log::{debug, warn};

use crate::{FeedbackStore, Filters, RatingTally, SimilarityKey};

/// Magnitude of the bonus for unanimous, fully confident feedback.
pub const MAX_COLLABORATIVE_BONUS: f64 = 3.0;

/// Number of ratings at which confidence reaches one.
pub const CONFIDENCE_SATURATION: f64 = 10.0;

impl RatingTally {
    /// Convert the tally into a bonus in
    /// `[-MAX_COLLABORATIVE_BONUS, MAX_COLLABORATIVE_BONUS]`.
    ///
    /// # Examples
    /// ```
    /// use giftwise_core::RatingTally;
    ///
    /// assert_eq!(RatingTally::new(0, 0).bonus(), 0.0);
    /// assert_eq!(RatingTally::new(10, 0).bonus(), 3.0);
    /// assert_eq!(RatingTally::new(0, 5).bonus(), -1.5);
    /// ```
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        reason = "the bonus is a confidence-weighted like ratio"
    )]
    pub fn bonus(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        let likes = f64::from(self.likes);
        let dislikes = f64::from(self.dislikes);
        let count = f64::from(total);
        let ratio = (likes - dislikes) / count;
        let confidence = (count / CONFIDENCE_SATURATION).min(1.0);
        ratio * confidence * MAX_COLLABORATIVE_BONUS
    }
}

/// Collaborative scoring state for one ranking pass.
///
/// Similar sessions are resolved once when the pass starts and reused for
/// every gift. Store failures are logged and score as `0.0`.
pub struct CollaborativePass<'a> {
    store: Option<&'a dyn FeedbackStore>,
    sessions: Vec<u64>,
}

impl fmt::Debug for CollaborativePass<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollaborativePass")
            .field("enabled", &self.store.is_some())
            .field("sessions", &self.sessions.len())
            .finish()
    }
}

impl<'a> CollaborativePass<'a> {
    /// A pass that scores every gift as `0.0`.
    #[must_use]
    pub const fn disabled() -> Self {
        Self {
            store: None,
            sessions: Vec::new(),
        }
    }

    /// Resolve the sessions similar to `filters` in `store`.
    ///
    /// The store is not consulted when gender, age or occasion is missing.
    #[must_use]
    pub fn resolve(store: &'a dyn FeedbackStore, filters: &Filters) -> Self {
        let Some(key) = SimilarityKey::from_filters(filters) else {
            debug!("collaborative scoring skipped: incomplete similarity key");
            return Self::disabled();
        };
        let mut sessions = match store.similar_sessions(&key) {
            Ok(sessions) => sessions,
            Err(err) => {
                warn!("collaborative scoring disabled for {key}: {err}");
                return Self::disabled();
            }
        };
        sessions.sort_unstable();
        sessions.dedup();
        debug!("found {} sessions similar to {key}", sessions.len());
        Self {
            store: Some(store),
            sessions,
        }
    }

    /// Sessions that share the request's answers.
    #[must_use]
    pub fn similar_sessions(&self) -> &[u64] {
        &self.sessions
    }

    /// Collaborative bonus for one gift.
    #[must_use]
    pub fn score(&self, gift_id: u64) -> f64 {
        let Some(store) = self.store else {
            return 0.0;
        };
        if self.sessions.is_empty() {
            return 0.0;
        }
        match store.rating_tally(&self.sessions, gift_id) {
            Ok(tally) => tally.bonus(),
            Err(err) => {
                warn!("collaborative score for gift {gift_id} defaulted to 0: {err}");
                0.0
            }
        }
    }
}

/// Collaborative bonus for a single gift, resolving similar sessions afresh.
///
/// Prefer [`CollaborativePass`] when scoring many gifts for one request.
///
/// # Examples
/// ```
/// use giftwise_core::{MemoryFeedbackStore, UserProfile, collaborative_score};
///
/// let store = MemoryFeedbackStore::default();
/// let profile = UserProfile::builder().gender("gender_male").build();
/// assert_eq!(collaborative_score(&store, 1, profile.filters()), 0.0);
/// ```
#[must_use]
pub fn collaborative_score(store: &dyn FeedbackStore, gift_id: u64, filters: &Filters) -> f64 {
    CollaborativePass::resolve(store, filters).score(gift_id)
}

#[cfg(test)]
mod tests {
    #![expect(
        clippy::float_arithmetic,
        reason = "scores are compared within a tolerance"
    )]

    use super::*;
    use crate::{
        MemoryFeedbackStore, Rating, RatingRecord, SessionProfile, UserProfile,
        test_support::{CountingFeedbackStore, FailingFeedbackStore},
    };
    use rstest::{fixture, rstest};

    #[fixture]
    fn filters() -> Filters {
        UserProfile::builder()
            .gender("gender_male")
            .age("age_26_35")
            .occasion("occasion_birthday")
            .build()
            .filters()
            .clone()
    }

    fn store_with(ratings: &[(u64, Rating)]) -> MemoryFeedbackStore {
        MemoryFeedbackStore::new(
            vec![SessionProfile {
                session_id: 1,
                gender: Some("gender_male".into()),
                age: Some("age_26_35".into()),
                occasion: Some("occasion_birthday".into()),
            }],
            ratings
                .iter()
                .map(|&(gift_id, rating)| RatingRecord {
                    session_id: 1,
                    gift_id,
                    rating,
                })
                .collect(),
        )
    }

    #[rstest]
    #[case(RatingTally::new(1, 0), 0.3)]
    #[case(RatingTally::new(3, 1), 0.6)]
    #[case(RatingTally::new(8, 12), -0.6)]
    #[case(RatingTally::new(5, 5), 0.0)]
    fn bonus_weights_ratio_by_confidence(#[case] tally: RatingTally, #[case] expected: f64) {
        assert!((tally.bonus() - expected).abs() < 1e-9, "got {}", tally.bonus());
    }

    #[rstest]
    fn rated_gift_receives_bonus(filters: Filters) {
        let store = store_with(&[(7, Rating::Like), (7, Rating::Like)]);
        assert!((collaborative_score(&store, 7, &filters) - 0.6).abs() < 1e-9);
        assert_eq!(collaborative_score(&store, 8, &filters), 0.0);
    }

    #[rstest]
    fn store_errors_degrade_to_neutral(filters: Filters) {
        assert_eq!(collaborative_score(&FailingFeedbackStore, 7, &filters), 0.0);
    }

    #[rstest]
    fn incomplete_key_skips_store() {
        let store = CountingFeedbackStore::default();
        let filters = UserProfile::builder().gender("gender_male").build();
        assert_eq!(collaborative_score(&store, 7, filters.filters()), 0.0);
        assert_eq!(store.session_lookups(), 0);
        assert_eq!(store.tally_lookups(), 0);
    }

    #[rstest]
    fn pass_resolves_sessions_once(filters: Filters) {
        let store = CountingFeedbackStore::with_sessions(vec![3, 1, 3]);
        let pass = CollaborativePass::resolve(&store, &filters);
        assert_eq!(pass.similar_sessions(), &[1, 3]);
        for gift_id in 0..4 {
            assert_eq!(pass.score(gift_id), 0.0);
        }
        assert_eq!(store.session_lookups(), 1);
        assert_eq!(store.tally_lookups(), 4);
    }

    #[rstest]
    fn no_similar_sessions_skips_tally(filters: Filters) {
        let store = CountingFeedbackStore::default();
        let pass = CollaborativePass::resolve(&store, &filters);
        assert_eq!(pass.score(1), 0.0);
        assert_eq!(store.tally_lookups(), 0);
    }
}
