//! Primary filter: hard exclusion of items that miss mandatory attributes.

use std::fmt;

use crate::{GiftTags, Stance, UserProfile, ValueDimension, tags::TokenSet};

/// Items above this experience strength are too experiential for a user who
/// wants an object.
pub const MATERIAL_EXPERIENCE_CEILING: f64 = 0.7;

/// Items below this experience strength are too material for a user who
/// wants an experience.
pub const EXPERIENTIAL_EXPERIENCE_FLOOR: f64 = 0.3;

/// Why an item was excluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exclusion {
    /// None of the accepted budget tiers is declared.
    Budget,
    /// Required gender token is missing.
    Gender,
    /// Required age band token is missing.
    Age,
    /// Required relationship token is missing.
    Relationship,
    /// Required occasion token is missing.
    Occasion,
    /// User wants an object; the item is an experience.
    TooExperiential,
    /// User wants an experience; the item is an object.
    TooMaterial,
}

impl fmt::Display for Exclusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Self::Budget => "no accepted budget tier",
            Self::Gender => "gender mismatch",
            Self::Age => "age band mismatch",
            Self::Relationship => "relationship mismatch",
            Self::Occasion => "occasion mismatch",
            Self::TooExperiential => "too experiential",
            Self::TooMaterial => "too material",
        };
        f.write_str(reason)
    }
}

/// Check an item against the profile's primary filters.
///
/// Absent constraints are permissive. The experience gate only applies when
/// the user's experience weight is exactly `0.0` or `1.0`.
///
/// # Errors
/// Returns the first [`Exclusion`] the item triggers.
///
/// # Examples
/// ```
/// use giftwise_core::{Exclusion, GiftTags, RawTagColumns, UserProfile, filter};
///
/// let tags = GiftTags::from(RawTagColumns {
///     gender: "gender_female",
///     ..RawTagColumns::default()
/// });
/// let profile = UserProfile::builder().gender("gender_male").build();
/// assert_eq!(filter::check(&profile, &tags), Err(Exclusion::Gender));
/// assert!(filter::admits(&UserProfile::default(), &tags));
/// ```
pub fn check(profile: &UserProfile, tags: &GiftTags) -> Result<(), Exclusion> {
    let filters = profile.filters();

    if let Some(budget) = &filters.budget
        && !budget
            .accepted()
            .iter()
            .any(|tier| tags.budget.contains(tier))
    {
        return Err(Exclusion::Budget);
    }

    require(filters.gender.as_deref(), &tags.gender, Exclusion::Gender)?;
    require(filters.age.as_deref(), &tags.age, Exclusion::Age)?;
    require(
        filters.relationship.as_deref(),
        &tags.relationship,
        Exclusion::Relationship,
    )?;
    require(
        filters.occasion.as_deref(),
        &tags.occasion,
        Exclusion::Occasion,
    )?;

    experience_gate(
        profile.values().stance(ValueDimension::Experience),
        tags.values.experience,
    )
}

/// Report whether an item survives [`check`].
#[must_use]
pub fn admits(profile: &UserProfile, tags: &GiftTags) -> bool {
    check(profile, tags).is_ok()
}

fn require(required: Option<&str>, present: &TokenSet, exclusion: Exclusion) -> Result<(), Exclusion> {
    match required {
        Some(token) if !present.contains(token) => Err(exclusion),
        _ => Ok(()),
    }
}

fn experience_gate(stance: Stance, experience: f64) -> Result<(), Exclusion> {
    match stance {
        Stance::Against if experience > MATERIAL_EXPERIENCE_CEILING => {
            Err(Exclusion::TooExperiential)
        }
        Stance::For if experience < EXPERIENTIAL_EXPERIENCE_FLOOR => Err(Exclusion::TooMaterial),
        _ => Ok(()),
    }
}
