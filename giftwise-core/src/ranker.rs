//! Request-time ranking of the whole catalog.
//!
//! For each request the [`Ranker`] scans every catalog item, drops the ones
//! the primary filter excludes, scores the survivors and returns the best
//! `limit` of them.

use std::{fmt, sync::Arc};

use log::{debug, trace};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    CollaborativePass, FeedbackStore, Gift, GiftCatalog, UserProfile, budget_fit, filter,
    preference,
};

/// A catalog item with its score for one request.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScoredGift {
    /// Catalog identifier.
    pub id: u64,
    /// Display name.
    pub name: String,
    /// Price in catalog currency.
    pub price: f64,
    /// Free-text description.
    pub description: String,
    /// Total score; higher ranks first.
    pub score: f64,
    /// Number of selected interests the item matched.
    pub interest_matches: u32,
    /// Contribution of crowd feedback to `score`.
    pub collaborative_score: f64,
}

/// Scores the catalog against user profiles.
///
/// The feedback store is optional; without one the collaborative bonus is
/// always `0.0`.
///
/// # Examples
/// ```
/// use giftwise_core::{
///     BudgetTier, Gift, MemoryCatalog, RawTagColumns, Ranker, UserProfile, ValueDimension,
/// };
///
/// let gift = Gift::new(1, "Mechanical keyboard").with_tags(RawTagColumns {
///     budget: "budget_10000, budget_15000",
///     gender: "gender_male",
///     values: "gift_practical:1",
///     interests: "interest_tech:1",
///     ..RawTagColumns::default()
/// });
/// let ranker = Ranker::new(MemoryCatalog::with_gift(gift));
/// let profile = UserProfile::builder()
///     .gender("gender_male")
///     .budget_up_to(BudgetTier::B15K)
///     .value(ValueDimension::Practical, 1.0)
///     .interest("interest_tech", 1.0)
///     .build();
///
/// let ranked = ranker.rank(&profile, 10);
/// assert_eq!(ranked.len(), 1);
/// assert_eq!(ranked[0].score, 7.0);
/// ```
pub struct Ranker<C> {
    catalog: C,
    feedback: Option<Arc<dyn FeedbackStore>>,
}

impl<C: fmt::Debug> fmt::Debug for Ranker<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ranker")
            .field("catalog", &self.catalog)
            .field("feedback", &self.feedback.is_some())
            .finish()
    }
}

impl<C: GiftCatalog> Ranker<C> {
    /// Create a ranker without crowd feedback.
    #[must_use]
    pub const fn new(catalog: C) -> Self {
        Self {
            catalog,
            feedback: None,
        }
    }

    /// Attach a feedback store for collaborative scoring.
    #[must_use]
    pub fn with_feedback(mut self, store: Arc<dyn FeedbackStore>) -> Self {
        self.feedback = Some(store);
        self
    }

    /// The catalog being ranked.
    #[must_use]
    pub const fn catalog(&self) -> &C {
        &self.catalog
    }

    /// Report whether collaborative scoring is enabled.
    #[must_use]
    pub const fn has_feedback(&self) -> bool {
        self.feedback.is_some()
    }

    /// Score every item that survives the primary filter, in scan order.
    #[must_use]
    pub fn score_all(&self, profile: &UserProfile) -> Vec<ScoredGift> {
        let pass = self.feedback.as_deref().map_or_else(CollaborativePass::disabled, |store| {
            CollaborativePass::resolve(store, profile.filters())
        });

        let mut scanned = 0_usize;
        let mut scored = Vec::new();
        for gift in self.catalog.gifts() {
            scanned = scanned.saturating_add(1);
            if let Err(reason) = filter::check(profile, &gift.tags) {
                trace!("gift {} excluded: {reason}", gift.id);
                continue;
            }
            scored.push(score_gift(profile, gift, &pass));
        }
        debug!("{} of {scanned} gifts survived the primary filter", scored.len());
        scored
    }

    /// Return at most `limit` items, best first.
    ///
    /// Items with equal scores keep their catalog scan order. An empty
    /// result is not an error.
    #[must_use]
    pub fn rank(&self, profile: &UserProfile, limit: usize) -> Vec<ScoredGift> {
        let mut scored = self.score_all(profile);
        scored.sort_by(|left, right| right.score.total_cmp(&left.score));
        scored.truncate(limit);
        scored
    }
}

#[expect(clippy::float_arithmetic, reason = "component scores are summed")]
fn score_gift(profile: &UserProfile, gift: &Gift, pass: &CollaborativePass<'_>) -> ScoredGift {
    let budget = profile
        .filters()
        .budget
        .as_ref()
        .map_or(0.0, |filter| budget_fit(filter.ceiling(), &gift.tags.budget));
    let preference = preference::score(profile.values(), profile.interests(), &gift.tags);
    let collaborative = pass.score(gift.id);

    ScoredGift {
        id: gift.id,
        name: gift.name.clone(),
        price: gift.price,
        description: gift.description.clone(),
        score: budget + preference.total + collaborative,
        interest_matches: preference.interest_matches,
        collaborative_score: collaborative,
    }
}
