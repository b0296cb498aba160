//! Per-request user profiles: primary filters, value weights and interests.
//!
//! A [`UserProfile`] is assembled once per request (usually from
//! [`QuizAnswers`](crate::QuizAnswers)) and is read-only afterwards.

use std::{collections::BTreeMap, fmt, str::FromStr};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::BudgetTier;

/// Weight meaning "no preference" on a value dimension.
pub const NEUTRAL_WEIGHT: f64 = 0.5;

/// The five value dimensions shared by gift tags and user weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueDimension {
    /// Useful in everyday life.
    Practical,
    /// Meant to delight rather than serve.
    Emotional,
    /// An experience (tickets, certificates) rather than an object.
    Experience,
    /// Suited to daily use.
    DailyUse,
    /// Looks matter.
    Aesthetic,
}

impl ValueDimension {
    /// Every dimension in declaration order.
    pub const ALL: [Self; 5] = [
        Self::Practical,
        Self::Emotional,
        Self::Experience,
        Self::DailyUse,
        Self::Aesthetic,
    ];

    /// Tag and weight key, e.g. `gift_daily_use`.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Practical => "gift_practical",
            Self::Emotional => "gift_emotional",
            Self::Experience => "gift_experience",
            Self::DailyUse => "gift_daily_use",
            Self::Aesthetic => "gift_aesthetic",
        }
    }
}

impl fmt::Display for ValueDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ValueDimension {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|dimension| dimension.key() == s)
            .ok_or_else(|| format!("unknown value dimension '{s}'"))
    }
}

/// How strongly a user leans on a value dimension.
///
/// Quiz answers encode firm choices as exactly `0.0` or `1.0`; anything else
/// is treated as indifference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stance {
    /// Weight is exactly `0.0`.
    Against,
    /// Weight is strictly between the extremes, or out of range.
    Indifferent,
    /// Weight is exactly `1.0`.
    For,
}

impl Stance {
    /// Classify a raw weight.
    #[expect(
        clippy::float_cmp,
        reason = "firm answers are exact sentinel values, not measurements"
    )]
    #[must_use]
    pub fn of(weight: f64) -> Self {
        if weight == 1.0 {
            Self::For
        } else if weight == 0.0 {
            Self::Against
        } else {
            Self::Indifferent
        }
    }
}

/// User weights for the five value dimensions, each in `[0.0, 1.0]`.
///
/// Every weight defaults to [`NEUTRAL_WEIGHT`].
///
/// # Examples
/// ```
/// use giftwise_core::{Stance, ValueDimension, ValueWeights};
///
/// let weights = ValueWeights::default().with(ValueDimension::Practical, 1.0);
/// assert_eq!(weights.stance(ValueDimension::Practical), Stance::For);
/// assert_eq!(weights.stance(ValueDimension::Aesthetic), Stance::Indifferent);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ValueWeights {
    /// Weight for `gift_practical`.
    #[cfg_attr(feature = "serde", serde(rename = "gift_practical"))]
    pub practical: f64,
    /// Weight for `gift_emotional`.
    #[cfg_attr(feature = "serde", serde(rename = "gift_emotional"))]
    pub emotional: f64,
    /// Weight for `gift_experience`.
    #[cfg_attr(feature = "serde", serde(rename = "gift_experience"))]
    pub experience: f64,
    /// Weight for `gift_daily_use`.
    #[cfg_attr(feature = "serde", serde(rename = "gift_daily_use"))]
    pub daily_use: f64,
    /// Weight for `gift_aesthetic`.
    #[cfg_attr(feature = "serde", serde(rename = "gift_aesthetic"))]
    pub aesthetic: f64,
}

impl Default for ValueWeights {
    fn default() -> Self {
        Self {
            practical: NEUTRAL_WEIGHT,
            emotional: NEUTRAL_WEIGHT,
            experience: NEUTRAL_WEIGHT,
            daily_use: NEUTRAL_WEIGHT,
            aesthetic: NEUTRAL_WEIGHT,
        }
    }
}

impl ValueWeights {
    /// Return the weight for a dimension.
    #[must_use]
    pub const fn get(&self, dimension: ValueDimension) -> f64 {
        match dimension {
            ValueDimension::Practical => self.practical,
            ValueDimension::Emotional => self.emotional,
            ValueDimension::Experience => self.experience,
            ValueDimension::DailyUse => self.daily_use,
            ValueDimension::Aesthetic => self.aesthetic,
        }
    }

    /// Return a copy with one dimension replaced.
    #[must_use]
    pub const fn with(mut self, dimension: ValueDimension, weight: f64) -> Self {
        match dimension {
            ValueDimension::Practical => self.practical = weight,
            ValueDimension::Emotional => self.emotional = weight,
            ValueDimension::Experience => self.experience = weight,
            ValueDimension::DailyUse => self.daily_use = weight,
            ValueDimension::Aesthetic => self.aesthetic = weight,
        }
        self
    }

    /// Classify the weight for a dimension.
    #[must_use]
    pub fn stance(&self, dimension: ValueDimension) -> Stance {
        Stance::of(self.get(dimension))
    }
}

/// Interests the user selected, keyed by interest tag token.
///
/// Tokens that are absent carry an implicit weight of zero.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct InterestWeights(BTreeMap<String, f64>);

impl InterestWeights {
    /// Construct an empty selection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace an interest, returning `self` for chaining.
    #[must_use]
    pub fn with(mut self, token: impl Into<String>, weight: f64) -> Self {
        self.insert(token, weight);
        self
    }

    /// Add or replace an interest.
    pub fn insert(&mut self, token: impl Into<String>, weight: f64) {
        self.0.insert(token.into(), weight);
    }

    /// Return the weight for `token`, or `0.0` when not selected.
    #[must_use]
    pub fn weight(&self, token: &str) -> f64 {
        self.0.get(token).copied().unwrap_or(0.0)
    }

    /// Iterate over tokens with a positive weight.
    pub fn selected(&self) -> impl Iterator<Item = &str> {
        self.0
            .iter()
            .filter(|(_, weight)| **weight > 0.0)
            .map(|(token, _)| token.as_str())
    }

    /// Report whether no interest was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for InterestWeights {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(token, weight)| (token.into(), weight))
                .collect(),
        )
    }
}

/// Accepted budget tiers together with the user's ceiling.
///
/// The ceiling is the last token the caller supplied; when that token is
/// unknown the ceiling is `None` and budget fit scores nothing, while the
/// remaining known tiers still drive the filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BudgetFilter {
    accepted: Vec<BudgetTier>,
    ceiling: Option<BudgetTier>,
}

impl BudgetFilter {
    /// Accept every tier up to and including `ceiling`.
    #[must_use]
    pub fn up_to(ceiling: BudgetTier) -> Self {
        Self {
            accepted: ceiling.up_to().collect(),
            ceiling: Some(ceiling),
        }
    }

    /// Build from an ordered token list whose last entry is the ceiling.
    ///
    /// # Examples
    /// ```
    /// use giftwise_core::{BudgetFilter, BudgetTier};
    ///
    /// let filter = BudgetFilter::from_tokens(["budget_2000", "budget_5000"]);
    /// assert_eq!(filter.ceiling(), Some(BudgetTier::B5K));
    ///
    /// let odd = BudgetFilter::from_tokens(["budget_2000", "budget_lots"]);
    /// assert_eq!(odd.ceiling(), None);
    /// assert_eq!(odd.accepted(), &[BudgetTier::B2K]);
    /// ```
    #[must_use]
    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut accepted = Vec::new();
        let mut ceiling = None;
        for token in tokens {
            ceiling = BudgetTier::from_token(token.as_ref().trim());
            if let Some(tier) = ceiling {
                accepted.push(tier);
            }
        }
        Self { accepted, ceiling }
    }

    /// Tiers an item may carry to pass the filter.
    #[must_use]
    pub fn accepted(&self) -> &[BudgetTier] {
        &self.accepted
    }

    /// The user's maximum budget, if resolvable.
    #[must_use]
    pub const fn ceiling(&self) -> Option<BudgetTier> {
        self.ceiling
    }
}

/// Mandatory attributes an item must carry to be considered.
///
/// `None` leaves an attribute unconstrained.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Filters {
    /// Accepted budget tiers and ceiling.
    pub budget: Option<BudgetFilter>,
    /// Recipient gender token, e.g. `gender_female`.
    pub gender: Option<String>,
    /// Recipient age band token, e.g. `age_26_35`.
    pub age: Option<String>,
    /// Relationship token, e.g. `relationship_friend`.
    pub relationship: Option<String>,
    /// Occasion token, e.g. `occasion_birthday`.
    pub occasion: Option<String>,
}

/// Everything the engine knows about one request's recipient.
///
/// # Examples
/// ```
/// use giftwise_core::{BudgetTier, UserProfile, ValueDimension};
///
/// let profile = UserProfile::builder()
///     .budget_up_to(BudgetTier::B15K)
///     .gender("gender_male")
///     .value(ValueDimension::Practical, 1.0)
///     .interest("interest_tech", 1.0)
///     .build();
/// assert_eq!(profile.filters().gender.as_deref(), Some("gender_male"));
/// assert_eq!(profile.interests().weight("interest_tech"), 1.0);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UserProfile {
    filters: Filters,
    values: ValueWeights,
    interests: InterestWeights,
}

impl UserProfile {
    /// Assemble a profile from its parts.
    #[must_use]
    pub const fn new(filters: Filters, values: ValueWeights, interests: InterestWeights) -> Self {
        Self {
            filters,
            values,
            interests,
        }
    }

    /// Start building a profile with neutral defaults.
    #[must_use]
    pub fn builder() -> UserProfileBuilder {
        UserProfileBuilder::default()
    }

    /// Primary filters.
    #[must_use]
    pub const fn filters(&self) -> &Filters {
        &self.filters
    }

    /// Value weights.
    #[must_use]
    pub const fn values(&self) -> &ValueWeights {
        &self.values
    }

    /// Selected interests.
    #[must_use]
    pub const fn interests(&self) -> &InterestWeights {
        &self.interests
    }
}

/// Incremental construction of a [`UserProfile`].
#[derive(Debug, Clone, Default)]
pub struct UserProfileBuilder {
    filters: Filters,
    values: ValueWeights,
    interests: InterestWeights,
}

impl UserProfileBuilder {
    /// Set the budget filter.
    #[must_use]
    pub fn budget(mut self, budget: BudgetFilter) -> Self {
        self.filters.budget = Some(budget);
        self
    }

    /// Accept every tier up to `ceiling`.
    #[must_use]
    pub fn budget_up_to(self, ceiling: BudgetTier) -> Self {
        self.budget(BudgetFilter::up_to(ceiling))
    }

    /// Require a gender token.
    #[must_use]
    pub fn gender(mut self, token: impl Into<String>) -> Self {
        self.filters.gender = Some(token.into());
        self
    }

    /// Require an age band token.
    #[must_use]
    pub fn age(mut self, token: impl Into<String>) -> Self {
        self.filters.age = Some(token.into());
        self
    }

    /// Require a relationship token.
    #[must_use]
    pub fn relationship(mut self, token: impl Into<String>) -> Self {
        self.filters.relationship = Some(token.into());
        self
    }

    /// Require an occasion token.
    #[must_use]
    pub fn occasion(mut self, token: impl Into<String>) -> Self {
        self.filters.occasion = Some(token.into());
        self
    }

    /// Set a value weight.
    #[must_use]
    pub fn value(mut self, dimension: ValueDimension, weight: f64) -> Self {
        self.values = self.values.with(dimension, weight);
        self
    }

    /// Select an interest.
    #[must_use]
    pub fn interest(mut self, token: impl Into<String>, weight: f64) -> Self {
        self.interests.insert(token, weight);
        self
    }

    /// Finish the profile.
    #[must_use]
    pub fn build(self) -> UserProfile {
        UserProfile::new(self.filters, self.values, self.interests)
    }
}
