//! Budget tiers and the budget-fit curve.
//!
//! Catalog items declare every budget tier they suit. A user answers with a
//! single ceiling; [`budget_fit`] rewards items whose declared range tops out
//! near that ceiling and penalises items the user would have to stretch for
//! or that are far cheaper than intended.

use std::{collections::BTreeSet, fmt, str::FromStr};

use thiserror::Error;

use crate::tags::segments;

const TOKENS: [&str; 8] = [
    "budget_2000",
    "budget_5000",
    "budget_10000",
    "budget_15000",
    "budget_20000",
    "budget_30000",
    "budget_50000",
    "budget_100000",
];

/// Score for an item priced entirely above the user's ceiling.
pub const ABOVE_CEILING_PENALTY: f64 = -10.0;

/// Score for an exact match with a single-tier item, and for the top bucket
/// of a multi-tier range.
pub const EXACT_FIT: f64 = 2.0;

/// One of the eight canonical budget tiers, ordered from cheapest.
///
/// # Examples
/// ```
/// use giftwise_core::BudgetTier;
///
/// let tier: BudgetTier = "budget_15000".parse().unwrap();
/// assert_eq!(tier, BudgetTier::B15K);
/// assert!(BudgetTier::B2K < tier);
/// assert_eq!(tier.to_string(), "budget_15000");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub struct BudgetTier(u8);

impl BudgetTier {
    /// Up to 2 000.
    pub const B2K: Self = Self(0);
    /// Up to 5 000.
    pub const B5K: Self = Self(1);
    /// Up to 10 000.
    pub const B10K: Self = Self(2);
    /// Up to 15 000.
    pub const B15K: Self = Self(3);
    /// Up to 20 000.
    pub const B20K: Self = Self(4);
    /// Up to 30 000.
    pub const B30K: Self = Self(5);
    /// Up to 50 000.
    pub const B50K: Self = Self(6);
    /// Up to 100 000.
    pub const B100K: Self = Self(7);

    /// Every tier in ascending order.
    pub const ALL: [Self; 8] = [
        Self::B2K,
        Self::B5K,
        Self::B10K,
        Self::B15K,
        Self::B20K,
        Self::B30K,
        Self::B50K,
        Self::B100K,
    ];

    /// Position of the tier in [`BudgetTier::ALL`].
    #[must_use]
    pub const fn ordinal(self) -> u8 {
        self.0
    }

    /// Resolve a catalog token such as `budget_5000`.
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        TOKENS
            .iter()
            .position(|candidate| *candidate == token)
            .and_then(|index| u8::try_from(index).ok())
            .map(Self)
    }

    /// Return the catalog token for this tier.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        TOKENS.get(usize::from(self.0)).copied().unwrap_or_default()
    }

    /// Every tier from the cheapest up to and including `self`.
    pub fn up_to(self) -> impl Iterator<Item = Self> {
        Self::ALL.into_iter().take_while(move |tier| *tier <= self)
    }

    /// Decode the set of known tiers present in a raw tag string.
    ///
    /// Unknown tokens are dropped.
    #[must_use]
    pub fn parse_set(raw: &str) -> BTreeSet<Self> {
        segments(raw).filter_map(Self::from_token).collect()
    }
}

impl fmt::Display for BudgetTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a token is not one of the canonical budget tiers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown budget tier '{token}'")]
pub struct UnknownBudgetTier {
    /// The rejected token.
    pub token: String,
}

impl FromStr for BudgetTier {
    type Err = UnknownBudgetTier;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_token(s.trim()).ok_or_else(|| UnknownBudgetTier {
            token: s.to_owned(),
        })
    }
}

impl TryFrom<String> for BudgetTier {
    type Error = UnknownBudgetTier;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<BudgetTier> for String {
    fn from(tier: BudgetTier) -> Self {
        tier.as_str().to_owned()
    }
}

/// Score how well an item's declared tiers fit the user's ceiling.
///
/// Returns `0.0` when the ceiling is unknown or the item declares no tiers.
/// Otherwise, with `lo`/`hi` the cheapest and dearest declared tiers:
/// - ceiling below `lo`: [`ABOVE_CEILING_PENALTY`];
/// - ceiling above `hi` by one tier: `0.5`, by two: `0.0`, by `n > 2`:
///   `-0.5 * (n - 2)`;
/// - single declared tier equal to the ceiling: [`EXACT_FIT`];
/// - inside a wider range, the relative position maps to
///   `-1.0`/`0.0`/`1.0`/`2.0` at the `0.25`/`0.5`/`0.75` boundaries.
///
/// # Examples
/// ```
/// use std::collections::BTreeSet;
/// use giftwise_core::{BudgetTier, budget_fit};
///
/// let range = BTreeSet::from([BudgetTier::B10K, BudgetTier::B15K]);
/// assert_eq!(budget_fit(Some(BudgetTier::B15K), &range), 2.0);
/// assert_eq!(budget_fit(Some(BudgetTier::B10K), &range), -1.0);
/// assert_eq!(budget_fit(Some(BudgetTier::B5K), &range), -10.0);
/// assert_eq!(budget_fit(None, &range), 0.0);
/// ```
#[must_use]
pub fn budget_fit(ceiling: Option<BudgetTier>, supported: &BTreeSet<BudgetTier>) -> f64 {
    let Some(user) = ceiling else {
        return 0.0;
    };
    let (Some(&lo), Some(&hi)) = (supported.first(), supported.last()) else {
        return 0.0;
    };

    if user < lo {
        return ABOVE_CEILING_PENALTY;
    }
    if user > hi {
        return cheaper_than_ceiling(user.0 - hi.0);
    }
    if lo == hi {
        return EXACT_FIT;
    }
    range_position_score(user.0 - lo.0, hi.0 - lo.0)
}

#[expect(
    clippy::float_arithmetic,
    reason = "the penalty grows linearly with the tier gap"
)]
fn cheaper_than_ceiling(gap: u8) -> f64 {
    match gap {
        1 => 0.5,
        2 => 0.0,
        _ => -0.5 * f64::from(gap - 2),
    }
}

#[expect(
    clippy::float_arithmetic,
    reason = "position within the range is a ratio of tier offsets"
)]
fn range_position_score(offset: u8, span: u8) -> f64 {
    let position = f64::from(offset) / f64::from(span);
    if position <= 0.25 {
        -1.0
    } else if position <= 0.5 {
        0.0
    } else if position <= 0.75 {
        1.0
    } else {
        EXACT_FIT
    }
}
