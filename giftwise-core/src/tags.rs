//! Decoding of the comma-separated tag strings stored in catalog rows.
//!
//! Categorical tags are bare tokens (`gender_male, gender_female`) while
//! numeric tags are `name:value` pairs (`gift_practical:0.8, interest_tech:1`).
//! The engine decodes each row once into [`TokenSet`] and [`TagValues`], which
//! compare tokens exactly. [`tag_value`] keeps the historical lookup that
//! matches tag names by substring.
//!
//! # Examples
//! ```
//! use giftwise_core::tags::{TagValues, TokenSet, tag_value};
//!
//! let genders = TokenSet::parse("gender_male, gender_female");
//! assert!(genders.contains("gender_male"));
//!
//! let values = TagValues::parse("gift_practical:0.8, gift_emotional:oops");
//! assert_eq!(values.get("gift_practical"), 0.8);
//! assert_eq!(values.get("gift_emotional"), 0.0);
//!
//! assert_eq!(tag_value("interest_tech:1, interest_car:0.5", "car"), 0.5);
//! ```

use std::collections::{BTreeMap, BTreeSet};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

const SEGMENT_SEPARATOR: char = ',';
const VALUE_SEPARATOR: char = ':';

/// Split a raw tag string into trimmed, non-empty segments.
pub(crate) fn segments(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(SEGMENT_SEPARATOR)
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
}

/// Parse the number between the first and second colon of a segment.
///
/// Non-finite values are treated as malformed.
fn segment_value(segment: &str) -> Option<f64> {
    let mut parts = segment.split(VALUE_SEPARATOR);
    parts.next()?;
    parts
        .next()?
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Return the token part of a segment, i.e. the text before any colon.
fn segment_token(segment: &str) -> &str {
    segment
        .split(VALUE_SEPARATOR)
        .next()
        .unwrap_or(segment)
        .trim()
}

/// Return the numeric value attached to `name` in `raw`, or `0.0`.
///
/// A segment matches when it contains `name` anywhere and carries a colon.
/// The first matching segment with a parsable number wins; malformed numbers
/// are skipped rather than reported.
///
/// Tag names must not be substrings of one another: `"car"` also matches
/// `"interest_cards:1"`. Prefer [`TagValues`] for exact lookups.
///
/// # Examples
/// ```
/// use giftwise_core::tags::tag_value;
///
/// assert_eq!(tag_value("gift_practical:1, gift_aesthetic:0.4", "gift_aesthetic"), 0.4);
/// assert_eq!(tag_value("gift_practical:high", "gift_practical"), 0.0);
/// assert_eq!(tag_value("", "gift_practical"), 0.0);
/// ```
#[must_use]
pub fn tag_value(raw: &str, name: &str) -> f64 {
    segments(raw)
        .filter(|segment| segment.contains(name) && segment.contains(VALUE_SEPARATOR))
        .find_map(segment_value)
        .unwrap_or(0.0)
}

/// Exact-match set of categorical tag tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TokenSet(BTreeSet<String>);

impl TokenSet {
    /// Decode a comma-separated token list. Any `:value` suffix is ignored.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        segments(raw)
            .map(segment_token)
            .filter(|token| !token.is_empty())
            .collect()
    }

    /// Report whether `token` is present.
    #[must_use]
    pub fn contains(&self, token: &str) -> bool {
        self.0.contains(token)
    }

    /// Number of distinct tokens.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Report whether the set holds no tokens.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over tokens in lexical order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for TokenSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// Exact-match map from tag name to its numeric value.
///
/// Lookups for absent or malformed tags yield `0.0`.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TagValues(BTreeMap<String, f64>);

impl TagValues {
    /// Decode `name:value` pairs. Segments without a parsable number are
    /// dropped; when a name repeats, the first occurrence wins.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let mut values = BTreeMap::new();
        for segment in segments(raw) {
            let Some(value) = segment_value(segment) else {
                continue;
            };
            let name = segment_token(segment);
            if name.is_empty() {
                continue;
            }
            values.entry(name.to_owned()).or_insert(value);
        }
        Self(values)
    }

    /// Return the value for `name`, or `0.0` when absent.
    #[must_use]
    pub fn get(&self, name: &str) -> f64 {
        self.0.get(name).copied().unwrap_or(0.0)
    }

    /// Insert or replace a value, returning `self` for chaining.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: f64) -> Self {
        self.0.insert(name.into(), value);
        self
    }

    /// Number of decoded entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Report whether no entries were decoded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
