//! Catalog items and their decoded tag attributes.

use std::collections::BTreeSet;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    BudgetTier, ValueDimension,
    tags::{TagValues, TokenSet},
};

/// Raw comma-separated tag columns as stored in a catalog row.
///
/// # Examples
/// ```
/// use giftwise_core::{GiftTags, RawTagColumns};
///
/// let tags = GiftTags::from(RawTagColumns {
///     gender: "gender_male",
///     values: "gift_practical:0.9",
///     ..RawTagColumns::default()
/// });
/// assert!(tags.gender.contains("gender_male"));
/// assert_eq!(tags.values.practical, 0.9);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RawTagColumns<'a> {
    /// `budget_tags` column.
    pub budget: &'a str,
    /// `gender_tags` column.
    pub gender: &'a str,
    /// `age_tags` column.
    pub age: &'a str,
    /// `relationship_tags` column.
    pub relationship: &'a str,
    /// `occasion_tags` column.
    pub occasion: &'a str,
    /// `value_tags` column of `gift_*:value` pairs.
    pub values: &'a str,
    /// `interest_tags` column of `interest_*:value` pairs.
    pub interests: &'a str,
}

/// How strongly an item expresses each value dimension.
///
/// Missing or malformed tags decode to `0.0`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ValueTags {
    /// `gift_practical`.
    pub practical: f64,
    /// `gift_emotional`.
    pub emotional: f64,
    /// `gift_experience`.
    pub experience: f64,
    /// `gift_daily_use`.
    pub daily_use: f64,
    /// `gift_aesthetic`.
    pub aesthetic: f64,
}

impl ValueTags {
    /// Decode a raw `value_tags` column.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let values = TagValues::parse(raw);
        let get = |dimension: ValueDimension| values.get(dimension.key());
        Self {
            practical: get(ValueDimension::Practical),
            emotional: get(ValueDimension::Emotional),
            experience: get(ValueDimension::Experience),
            daily_use: get(ValueDimension::DailyUse),
            aesthetic: get(ValueDimension::Aesthetic),
        }
    }
}

/// Structured form of a catalog row's tag columns.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GiftTags {
    /// Budget tiers the item suits.
    pub budget: BTreeSet<BudgetTier>,
    /// Recipient genders.
    pub gender: TokenSet,
    /// Recipient age bands.
    pub age: TokenSet,
    /// Relationships to the recipient.
    pub relationship: TokenSet,
    /// Occasions.
    pub occasion: TokenSet,
    /// Value dimension strengths.
    pub values: ValueTags,
    /// Interest strengths keyed by interest token.
    pub interests: TagValues,
}

impl From<RawTagColumns<'_>> for GiftTags {
    fn from(raw: RawTagColumns<'_>) -> Self {
        Self {
            budget: BudgetTier::parse_set(raw.budget),
            gender: TokenSet::parse(raw.gender),
            age: TokenSet::parse(raw.age),
            relationship: TokenSet::parse(raw.relationship),
            occasion: TokenSet::parse(raw.occasion),
            values: ValueTags::parse(raw.values),
            interests: TagValues::parse(raw.interests),
        }
    }
}

/// A catalog item.
///
/// # Examples
/// ```
/// use giftwise_core::{Gift, RawTagColumns};
///
/// let gift = Gift::new(7, "Espresso maker")
///     .with_price(12_990.0)
///     .with_tags(RawTagColumns {
///         budget: "budget_15000",
///         ..RawTagColumns::default()
///     });
/// assert_eq!(gift.id, 7);
/// assert_eq!(gift.tags.budget.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Gift {
    /// Unique catalog identifier.
    pub id: u64,
    /// Display name.
    pub name: String,
    /// Price in catalog currency.
    pub price: f64,
    /// Free-text description.
    pub description: String,
    /// Decoded tags.
    pub tags: GiftTags,
}

impl Gift {
    /// Construct an untagged, unpriced item.
    #[must_use]
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            price: 0.0,
            description: String::new(),
            tags: GiftTags::default(),
        }
    }

    /// Set the price.
    #[must_use]
    pub const fn with_price(mut self, price: f64) -> Self {
        self.price = price;
        self
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Decode and attach raw tag columns.
    #[must_use]
    pub fn with_tags(mut self, raw: RawTagColumns<'_>) -> Self {
        self.tags = GiftTags::from(raw);
        self
    }
}
