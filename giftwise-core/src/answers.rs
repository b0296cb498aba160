//! Conversion of raw quiz answers into a [`UserProfile`].
//!
//! The quiz front end submits one `{tag, value}` pair per answered question
//! plus the list of selected interest tokens:
//!
//! ```json
//! {
//!   "answers": [
//!     {"tag": "gender", "value": "gender_female"},
//!     {"tag": "budget", "value": "budget_15000"},
//!     {"tag": "practical_emotional", "value": "emotional"},
//!     {"tag": "gift_daily_use", "value": "1"}
//!   ],
//!   "interests": ["interest_music", "interest_travel"]
//! }
//! ```

use std::borrow::Cow;

use log::warn;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{BudgetFilter, BudgetTier, UserProfile, UserProfileBuilder, ValueDimension};

/// Number of results returned when the caller does not ask for a limit.
pub const DEFAULT_RESULT_LIMIT: usize = 50;

/// Weight given to every selected interest.
pub const SELECTED_INTEREST_WEIGHT: f64 = 1.0;

/// Value submitted for a quiz question.
///
/// Front ends send option values as strings, but numeric answers may also
/// arrive as JSON numbers.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(untagged))]
pub enum AnswerValue {
    /// Option token or numeric text, e.g. `budget_5000` or `"0.5"`.
    Text(String),
    /// Bare JSON number.
    Number(f64),
}

impl AnswerValue {
    /// The value as an option token.
    #[must_use]
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            Self::Text(text) => Cow::Borrowed(text.as_str()),
            Self::Number(number) => Cow::Owned(number.to_string()),
        }
    }

    /// The value as a finite weight, if it is one.
    #[must_use]
    pub fn as_weight(&self) -> Option<f64> {
        let weight = match self {
            Self::Text(text) => text.trim().parse::<f64>().ok()?,
            Self::Number(number) => *number,
        };
        weight.is_finite().then_some(weight)
    }
}

/// One answered quiz question.
///
/// A missing or malformed `value` decodes as `None` and the question counts
/// as unanswered.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct QuizAnswer {
    /// Question tag, e.g. `budget` or `gift_aesthetic`.
    #[cfg_attr(feature = "serde", serde(default))]
    pub tag: String,
    /// Selected option value.
    #[cfg_attr(
        feature = "serde",
        serde(default, deserialize_with = "lenient_value")
    )]
    pub value: Option<AnswerValue>,
}

impl QuizAnswer {
    /// Construct an answer.
    #[must_use]
    pub fn new(tag: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            value: Some(AnswerValue::Text(value.into())),
        }
    }

    /// Construct an answer without a value.
    #[must_use]
    pub fn unanswered(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            value: None,
        }
    }
}

#[cfg(feature = "serde")]
fn lenient_value<'de, D>(deserializer: D) -> Result<Option<AnswerValue>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Submitted {
        Text(String),
        Number(f64),
        Other(serde::de::IgnoredAny),
    }

    Ok(match Submitted::deserialize(deserializer)? {
        Submitted::Text(text) => Some(AnswerValue::Text(text)),
        Submitted::Number(number) => Some(AnswerValue::Number(number)),
        Submitted::Other(_shape) => None,
    })
}

/// A completed quiz.
///
/// # Examples
/// ```
/// use giftwise_core::{BudgetTier, QuizAnswer, QuizAnswers, ValueDimension};
///
/// let answers = QuizAnswers {
///     answers: vec![
///         QuizAnswer::new("budget", "budget_5000"),
///         QuizAnswer::new("practical_emotional", "practical"),
///     ],
///     interests: vec!["interest_tech".into()],
/// };
/// let profile = answers.to_profile();
/// let budget = profile.filters().budget.as_ref().unwrap();
/// assert_eq!(budget.accepted(), &[BudgetTier::B2K, BudgetTier::B5K]);
/// assert_eq!(profile.values().get(ValueDimension::Practical), 1.0);
/// assert_eq!(profile.interests().weight("interest_tech"), 1.0);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct QuizAnswers {
    /// Answers in submission order; later answers override earlier ones.
    pub answers: Vec<QuizAnswer>,
    /// Selected interest tokens.
    pub interests: Vec<String>,
}

impl QuizAnswers {
    /// Build the request profile.
    ///
    /// Unknown tags and unanswered questions are ignored, except an
    /// unanswered budget, which accepts every tier. Numeric answers that
    /// fail to parse are logged and leave the neutral default in place.
    #[must_use]
    pub fn to_profile(&self) -> UserProfile {
        let mut builder = UserProfile::builder();
        for answer in &self.answers {
            builder = apply_answer(builder, answer);
        }
        for interest in &self.interests {
            builder = builder.interest(interest.as_str(), SELECTED_INTEREST_WEIGHT);
        }
        builder.build()
    }
}

fn apply_answer(builder: UserProfileBuilder, answer: &QuizAnswer) -> UserProfileBuilder {
    let Some(submitted) = &answer.value else {
        return match answer.tag.as_str() {
            "budget" => builder.budget(BudgetFilter::up_to(BudgetTier::B100K)),
            _ => builder,
        };
    };
    let text = submitted.as_text();
    let value = text.as_ref();
    match answer.tag.as_str() {
        "budget" => builder.budget(budget_selection(value)),
        "gender" => builder.gender(value),
        "age" => builder.age(value),
        "relationship" => builder.relationship(value),
        "occasion" => builder.occasion(value),
        "practical_emotional" => match value {
            "practical" => builder
                .value(ValueDimension::Practical, 1.0)
                .value(ValueDimension::Emotional, 0.0),
            "emotional" => builder
                .value(ValueDimension::Practical, 0.0)
                .value(ValueDimension::Emotional, 1.0),
            _ => builder,
        },
        tag => match numeric_dimension(tag) {
            Some(dimension) => numeric_weight(builder, dimension, submitted),
            None => builder,
        },
    }
}

/// Accept every tier up to the selected one. An unknown selection accepts
/// every tier, which also makes the dearest tier the ceiling.
fn budget_selection(value: &str) -> BudgetFilter {
    let ceiling = BudgetTier::from_token(value.trim()).unwrap_or_else(|| {
        warn!("unknown budget selection '{value}'; accepting every tier");
        BudgetTier::B100K
    });
    BudgetFilter::up_to(ceiling)
}

fn numeric_dimension(tag: &str) -> Option<ValueDimension> {
    [
        ValueDimension::Experience,
        ValueDimension::DailyUse,
        ValueDimension::Aesthetic,
    ]
    .into_iter()
    .find(|dimension| dimension.key() == tag)
}

fn numeric_weight(
    builder: UserProfileBuilder,
    dimension: ValueDimension,
    value: &AnswerValue,
) -> UserProfileBuilder {
    match value.as_weight() {
        Some(weight) => builder.value(dimension, weight),
        None => {
            warn!(
                "ignoring non-numeric answer '{}' for {dimension}",
                value.as_text()
            );
            builder
        }
    }
}
