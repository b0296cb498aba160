//! Preference scoring: value dimensions plus interest overlap.
//!
//! Interests dominate by construction. Each matched interest is worth up to
//! [`INTEREST_MULTIPLIER`] points and several matches earn stacking bonuses,
//! while the value dimensions contribute at most a few points.

use crate::{GiftTags, InterestWeights, Stance, ValueDimension, ValueWeights, gift::ValueTags};

/// Points per unit of interest strength.
pub const INTEREST_MULTIPLIER: f64 = 3.0;

/// Bonus once two interests match.
pub const TWO_MATCH_BONUS: f64 = 1.0;

/// Additional bonus once three interests match.
pub const THREE_MATCH_BONUS: f64 = 1.5;

/// Items weaker than this on a dimension the user insists on are penalised.
const WEAK_SIGNAL: f64 = 0.3;

/// Items stronger than this on daily use are penalised when the user wants
/// something special.
const EVERYDAY_SIGNAL: f64 = 0.7;

/// Outcome of preference scoring for one item.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PreferenceScore {
    /// Sum of every axis contribution.
    pub total: f64,
    /// Selected interests the item carries with a positive strength.
    pub interest_matches: u32,
}

/// Score an item's tags against the user's weights and interests.
///
/// # Examples
/// ```
/// use giftwise_core::{GiftTags, InterestWeights, RawTagColumns, ValueWeights, preference};
///
/// let tags = GiftTags::from(RawTagColumns {
///     values: "gift_practical:1, gift_emotional:1",
///     interests: "interest_tech:1",
///     ..RawTagColumns::default()
/// });
/// let interests = InterestWeights::new().with("interest_tech", 1.0);
/// let score = preference::score(&ValueWeights::default(), &interests, &tags);
/// assert_eq!(score.total, 4.0);
/// assert_eq!(score.interest_matches, 1);
/// ```
#[must_use]
#[expect(clippy::float_arithmetic, reason = "axis contributions are summed")]
pub fn score(weights: &ValueWeights, interests: &InterestWeights, tags: &GiftTags) -> PreferenceScore {
    let (interest_total, interest_matches) = interest_axis(interests, tags);
    let total = practical_emotional_axis(weights, &tags.values)
        + daily_use_axis(weights.stance(ValueDimension::DailyUse), tags.values.daily_use)
        + aesthetic_axis(weights.stance(ValueDimension::Aesthetic), tags.values.aesthetic)
        + interest_total;
    PreferenceScore {
        total,
        interest_matches,
    }
}

#[expect(
    clippy::float_arithmetic,
    reason = "the practical/emotional balance is a weighted sum"
)]
fn practical_emotional_axis(weights: &ValueWeights, values: &ValueTags) -> f64 {
    let practical = values.practical;
    let emotional = values.emotional;
    if weights.stance(ValueDimension::Practical) == Stance::For {
        2.0 * practical - emotional
    } else if weights.stance(ValueDimension::Emotional) == Stance::For {
        2.0 * emotional - 0.5 * practical
    } else {
        0.5 * practical + 0.5 * emotional
    }
}

#[expect(clippy::float_arithmetic, reason = "daily use contributes a weighted value")]
fn daily_use_axis(stance: Stance, daily_use: f64) -> f64 {
    match stance {
        Stance::For => 1.5 * daily_use - weak_penalty(daily_use),
        Stance::Against if daily_use > EVERYDAY_SIGNAL => -0.3,
        _ => 0.0,
    }
}

#[expect(clippy::float_arithmetic, reason = "aesthetics contribute a weighted value")]
fn aesthetic_axis(stance: Stance, aesthetic: f64) -> f64 {
    match stance {
        Stance::For => 1.5 * aesthetic - weak_penalty(aesthetic),
        _ => 0.0,
    }
}

fn weak_penalty(value: f64) -> f64 {
    if value < WEAK_SIGNAL { 0.5 } else { 0.0 }
}

#[expect(
    clippy::float_arithmetic,
    reason = "interest strengths are scaled and summed"
)]
fn interest_axis(interests: &InterestWeights, tags: &GiftTags) -> (f64, u32) {
    let mut total = 0.0;
    let mut matches = 0_u32;
    for token in interests.selected() {
        let strength = tags.interests.get(token);
        if strength > 0.0 {
            total += INTEREST_MULTIPLIER * strength;
            matches = matches.saturating_add(1);
        }
    }
    (total + match_bonus(matches), matches)
}

/// Stacking bonus for matching several interests.
///
/// # Examples
/// ```
/// use giftwise_core::preference::match_bonus;
///
/// assert_eq!(match_bonus(1), 0.0);
/// assert_eq!(match_bonus(2), 1.0);
/// assert_eq!(match_bonus(3), 2.5);
/// ```
#[must_use]
#[expect(clippy::float_arithmetic, reason = "bonuses accumulate")]
pub fn match_bonus(matches: u32) -> f64 {
    let mut bonus = 0.0;
    if matches >= 2 {
        bonus += TWO_MATCH_BONUS;
    }
    if matches >= 3 {
        bonus += THREE_MATCH_BONUS;
    }
    bonus
}

#[cfg(test)]
mod tests {
    #![expect(
        clippy::float_arithmetic,
        reason = "scores are compared within a tolerance"
    )]

    use super::*;
    use crate::RawTagColumns;
    use rstest::rstest;

    fn tags(values: &str, interests: &str) -> GiftTags {
        GiftTags::from(RawTagColumns {
            values,
            interests,
            ..RawTagColumns::default()
        })
    }

    fn weights(dimension: ValueDimension, weight: f64) -> ValueWeights {
        ValueWeights::default().with(dimension, weight)
    }

    #[rstest]
    #[case(ValueWeights::default(), 0.5)]
    #[case(weights(ValueDimension::Practical, 1.0), 1.4)]
    #[case(weights(ValueDimension::Emotional, 1.0), -0.2)]
    fn practical_emotional_balance(#[case] weights: ValueWeights, #[case] expected: f64) {
        let score = score(
            &weights,
            &InterestWeights::new(),
            &tags("gift_practical:0.8, gift_emotional:0.2", ""),
        );
        assert!((score.total - expected).abs() < 1e-9, "got {}", score.total);
    }

    #[rstest]
    fn practical_wins_when_both_are_firm() {
        let both = weights(ValueDimension::Practical, 1.0).with(ValueDimension::Emotional, 1.0);
        let score = score(&both, &InterestWeights::new(), &tags("gift_practical:1", ""));
        assert_eq!(score.total, 2.0);
    }

    #[rstest]
    #[case(Stance::For, 0.8, 1.2)]
    #[case(Stance::For, 0.2, -0.2)]
    #[case(Stance::Against, 0.8, -0.3)]
    #[case(Stance::Against, 0.7, 0.0)]
    #[case(Stance::Indifferent, 0.9, 0.0)]
    fn daily_use_cases(#[case] stance: Stance, #[case] daily_use: f64, #[case] expected: f64) {
        assert!((daily_use_axis(stance, daily_use) - expected).abs() < 1e-9);
    }

    #[rstest]
    #[case(Stance::For, 0.6, 0.9)]
    #[case(Stance::For, 0.1, -0.35)]
    #[case(Stance::Against, 0.9, 0.0)]
    #[case(Stance::Indifferent, 0.9, 0.0)]
    fn aesthetic_cases(#[case] stance: Stance, #[case] aesthetic: f64, #[case] expected: f64) {
        assert!((aesthetic_axis(stance, aesthetic) - expected).abs() < 1e-9);
    }

    #[rstest]
    #[case(1, 3.0)]
    #[case(2, 7.0)]
    #[case(3, 11.5)]
    fn interest_matches_stack(#[case] selected: usize, #[case] expected: f64) {
        let all = ["interest_tech", "interest_music", "interest_travel"];
        let interests: InterestWeights = all.iter().take(selected).map(|token| (*token, 1.0)).collect();
        let gift = tags("", "interest_tech:1, interest_music:1, interest_travel:1");
        let (total, matches) = interest_axis(&interests, &gift);
        assert_eq!(total, expected);
        assert_eq!(usize::try_from(matches).ok(), Some(selected));
    }

    #[rstest]
    fn unselected_or_absent_interests_do_not_match() {
        let interests = InterestWeights::new()
            .with("interest_tech", 0.0)
            .with("interest_car", 1.0);
        let gift = tags("", "interest_tech:1, interest_car:0");
        assert_eq!(interest_axis(&interests, &gift), (0.0, 0));
    }
}
