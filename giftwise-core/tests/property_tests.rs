#![expect(
    clippy::expect_used,
    reason = "tests should fail fast when setup breaks"
)]

//! Property-based tests for the scoring engine.
//!
//! # Invariants tested
//!
//! - **Over budget:** a ceiling below the cheapest declared tier scores -10.
//! - **Monotonic fit:** within a range, a higher ceiling never scores lower.
//! - **Bounded feedback:** the collaborative bonus stays within [-3, 3].
//! - **Growing confidence:** at a fixed like ratio, more ratings (up to ten)
//!   give a strictly larger bonus.
//! - **Ranking order:** output is sorted descending and never exceeds the
//!   limit or the number of survivors.

use std::collections::BTreeSet;

use giftwise_core::{
    BudgetTier, Gift, GiftTags, MemoryCatalog, Ranker, RatingTally, UserProfile, ValueDimension,
    budget_fit, filter,
};
use proptest::prelude::*;

fn tier() -> impl Strategy<Value = BudgetTier> {
    proptest::sample::select(BudgetTier::ALL.to_vec())
}

fn tier_range() -> impl Strategy<Value = BTreeSet<BudgetTier>> {
    proptest::collection::btree_set(tier(), 1..=8)
}

/// A tier together with a non-empty range that starts above it.
fn tier_below_range() -> impl Strategy<Value = (BudgetTier, BTreeSet<BudgetTier>)> {
    (0_usize..7).prop_flat_map(|user| {
        let tier = BudgetTier::ALL
            .into_iter()
            .nth(user)
            .expect("index within tier list");
        let above: Vec<BudgetTier> = BudgetTier::ALL.into_iter().skip(user + 1).collect();
        let most = above.len();
        (
            Just(tier),
            proptest::collection::btree_set(proptest::sample::select(above), 1..=most),
        )
    })
}

fn tag_list(tokens: &'static [&'static str]) -> impl Strategy<Value = String> {
    proptest::sample::subsequence(tokens.to_vec(), 0..=tokens.len())
        .prop_map(|chosen| chosen.join(", "))
}

fn gift_strategy() -> impl Strategy<Value = Gift> {
    (
        tag_list(&[
            "budget_2000",
            "budget_5000",
            "budget_10000",
            "budget_15000",
            "budget_20000",
            "budget_30000",
            "budget_50000",
            "budget_100000",
        ]),
        tag_list(&["gender_male", "gender_female"]),
        proptest::collection::vec(0.0_f64..=1.0, 5),
        proptest::collection::vec(0.0_f64..=1.0, 3),
    )
        .prop_map(|(budget, gender, values, interests)| {
            let value_tags: Vec<String> = ValueDimension::ALL
                .iter()
                .zip(&values)
                .map(|(dimension, value)| format!("{}:{value}", dimension.key()))
                .collect();
            let interest_tags: Vec<String> = ["interest_tech", "interest_music", "interest_travel"]
                .iter()
                .zip(&interests)
                .map(|(token, value)| format!("{token}:{value}"))
                .collect();
            Gift::new(0, "generated").with_tags(giftwise_core::RawTagColumns {
                budget: &budget,
                gender: &gender,
                values: &value_tags.join(", "),
                interests: &interest_tags.join(", "),
                ..giftwise_core::RawTagColumns::default()
            })
        })
}

fn catalog_strategy() -> impl Strategy<Value = Vec<Gift>> {
    proptest::collection::vec(gift_strategy(), 0..20).prop_map(|gifts| {
        gifts
            .into_iter()
            .zip(1_u64..)
            .map(|(mut gift, id)| {
                gift.id = id;
                gift
            })
            .collect()
    })
}

fn profile_strategy() -> impl Strategy<Value = UserProfile> {
    (
        proptest::option::of(tier()),
        proptest::option::of(proptest::sample::select(vec!["gender_male", "gender_female"])),
        proptest::sample::select(vec![0.0_f64, 0.5, 1.0]),
        proptest::sample::select(vec![0.0_f64, 0.5, 1.0]),
        proptest::sample::subsequence(
            vec!["interest_tech", "interest_music", "interest_travel"],
            0..=3,
        ),
    )
        .prop_map(|(ceiling, gender, experience, practical, interests)| {
            let mut builder = UserProfile::builder()
                .value(ValueDimension::Experience, experience)
                .value(ValueDimension::Practical, practical);
            if let Some(ceiling) = ceiling {
                builder = builder.budget_up_to(ceiling);
            }
            if let Some(gender) = gender {
                builder = builder.gender(gender);
            }
            for interest in interests {
                builder = builder.interest(interest, 1.0);
            }
            builder.build()
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Property: a ceiling below the cheapest declared tier is heavily penalised.
    #[test]
    fn below_range_is_penalised((user, range) in tier_below_range()) {
        prop_assert_eq!(budget_fit(Some(user), &range), -10.0);
    }

    /// Property: inside the declared range the fit never decreases as the
    /// ceiling rises.
    #[test]
    fn fit_is_monotonic_within_range(range in tier_range()) {
        let lo = *range.first().expect("non-empty range");
        let hi = *range.last().expect("non-empty range");
        let scores: Vec<f64> = BudgetTier::ALL
            .into_iter()
            .filter(|tier| (lo..=hi).contains(tier))
            .map(|tier| budget_fit(Some(tier), &range))
            .collect();
        prop_assert!(scores.windows(2).all(|pair| match pair {
            [lower, higher] => lower <= higher,
            _ => true,
        }), "adjacent pair violated ordering");
        prop_assert_eq!(budget_fit(Some(hi), &range), 2.0);
    }

    /// Property: the collaborative bonus is bounded by the maximum bonus.
    #[test]
    fn collaborative_bonus_is_bounded(likes in 0_u32..500, dislikes in 0_u32..500) {
        let bonus = RatingTally::new(likes, dislikes).bonus();
        prop_assert!((-3.0..=3.0).contains(&bonus), "bonus {} out of range", bonus);
    }

    /// Property: at a fixed like ratio the bonus magnitude grows with the
    /// number of ratings until confidence saturates.
    #[test]
    fn confidence_grows_with_ratings(unanimous in any::<bool>()) {
        let magnitudes: Vec<f64> = (1_u32..=10)
            .map(|count| {
                let tally = if unanimous {
                    RatingTally::new(count, 0)
                } else {
                    RatingTally::new(0, count)
                };
                tally.bonus().abs()
            })
            .collect();
        prop_assert!(magnitudes.windows(2).all(|pair| match pair {
            [smaller, larger] => smaller < larger,
            _ => true,
        }), "adjacent pair violated ordering");
        prop_assert_eq!(RatingTally::new(0, 0).bonus(), 0.0);
    }

    /// Property: ranked output is sorted, bounded by the limit and made only
    /// of gifts that pass the primary filter.
    #[test]
    fn ranking_is_sorted_and_truncated(
        gifts in catalog_strategy(),
        profile in profile_strategy(),
        limit in 0_usize..25,
    ) {
        let survivors = gifts
            .iter()
            .filter(|gift| filter::admits(&profile, &gift.tags))
            .count();
        let ranker = Ranker::new(MemoryCatalog::with_gifts(gifts.clone()));
        let ranked = ranker.rank(&profile, limit);

        prop_assert_eq!(ranked.len(), limit.min(survivors));
        prop_assert!(ranked.windows(2).all(|pair| match pair {
            [first, second] => first.score >= second.score,
            _ => true,
        }), "adjacent pair violated ordering");
        for scored in &ranked {
            let tags: &GiftTags = &gifts
                .iter()
                .find(|gift| gift.id == scored.id)
                .expect("ranked gift comes from the catalog")
                .tags;
            prop_assert!(filter::admits(&profile, tags));
        }
    }
}
