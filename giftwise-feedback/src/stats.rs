//! Read-only reports over the analytics database.
//!
//! Three views are available: a gift leaderboard ordered by net likes, the
//! quiz completion funnel, and the distribution of recorded answers.

use std::collections::BTreeMap;

use camino::Utf8Path;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{FeedbackDbError, StatsError, store::open_read_only};

/// Key used in [`AnswerDistribution`] for questions left unanswered.
pub const UNANSWERED: &str = "unanswered";

/// Likes and dislikes collected by one gift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GiftRatingSummary {
    /// Rated gift.
    pub gift_id: u64,
    /// Gift name recorded with the ratings, if any.
    pub gift_name: Option<String>,
    /// Number of `+1` ratings.
    pub likes: u64,
    /// Number of `-1` ratings.
    pub dislikes: u64,
    /// Number of ratings of any value.
    pub total: u64,
    /// `likes - dislikes`.
    pub net: i64,
}

/// Quiz completion funnel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FunnelStats {
    /// Sessions started.
    pub total_sessions: u64,
    /// Sessions that reached the results page.
    pub completed_sessions: u64,
    /// Completed share in percent, rounded to one decimal place.
    pub completion_rate: f64,
    /// Sessions that rated at least one gift.
    pub sessions_with_ratings: u64,
}

/// Counts of recorded answers per question.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerDistribution {
    /// Answer counts for the gender question.
    pub gender: BTreeMap<String, u64>,
    /// Answer counts for the age band question.
    pub age: BTreeMap<String, u64>,
    /// Answer counts for the relationship question.
    pub relationship: BTreeMap<String, u64>,
    /// Answer counts for the occasion question.
    pub occasion: BTreeMap<String, u64>,
}

/// Every report in one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackReport {
    /// Gifts ordered by net likes.
    pub leaderboard: Vec<GiftRatingSummary>,
    /// Completion funnel.
    pub funnel: FunnelStats,
    /// Answer distribution.
    pub answers: AnswerDistribution,
}

/// Report builder bound to one analytics database.
#[derive(Debug)]
pub struct FeedbackAnalytics {
    connection: Connection,
}

impl FeedbackAnalytics {
    /// Open the analytics database read-only.
    ///
    /// # Errors
    /// Returns [`FeedbackDbError::OpenDatabase`] when the database cannot be
    /// opened.
    pub fn open(path: &Utf8Path) -> Result<Self, FeedbackDbError> {
        Ok(Self {
            connection: open_read_only(path)?,
        })
    }

    /// Gifts ordered by `likes - dislikes`, best first. Ties are broken by
    /// gift id.
    ///
    /// # Errors
    /// Returns [`StatsError`] when the `ratings` table cannot be read.
    pub fn leaderboard(&self) -> Result<Vec<GiftRatingSummary>, StatsError> {
        let mut statement = self
            .connection
            .prepare(
                "SELECT
                    gift_id,
                    gift_name,
                    SUM(CASE WHEN rating = 1 THEN 1 ELSE 0 END) AS likes,
                    SUM(CASE WHEN rating = -1 THEN 1 ELSE 0 END) AS dislikes,
                    COUNT(*) AS total
                 FROM ratings
                 GROUP BY gift_id, gift_name
                 ORDER BY likes - dislikes DESC, gift_id",
            )
            .map_err(|source| FeedbackDbError::Query {
                operation: "prepare gift leaderboard",
                source,
            })?;
        let rows = statement
            .query_map([], |row| {
                Ok((
                    row.get::<_, u64>(0)?,
                    row.get::<_, Option<String>>(1)?,
                    row.get::<_, i64>(2)?,
                    row.get::<_, i64>(3)?,
                    row.get::<_, i64>(4)?,
                ))
            })
            .map_err(|source| FeedbackDbError::Query {
                operation: "gift leaderboard",
                source,
            })?;

        let mut leaderboard = Vec::new();
        for row in rows {
            let (gift_id, gift_name, likes, dislikes, total) =
                row.map_err(|source| FeedbackDbError::Query {
                    operation: "read leaderboard row",
                    source,
                })?;
            leaderboard.push(GiftRatingSummary {
                gift_id,
                gift_name,
                likes: non_negative("likes", likes)?,
                dislikes: non_negative("dislikes", dislikes)?,
                total: non_negative("total ratings", total)?,
                net: likes.saturating_sub(dislikes),
            });
        }
        Ok(leaderboard)
    }

    /// Session totals and completion rate.
    ///
    /// # Errors
    /// Returns [`StatsError`] when the `sessions` or `ratings` table cannot
    /// be read.
    pub fn funnel(&self) -> Result<FunnelStats, StatsError> {
        let total_sessions = self.count("sessions", "SELECT COUNT(*) FROM sessions")?;
        let completed_sessions = self.count(
            "completed sessions",
            "SELECT COUNT(*) FROM sessions WHERE completed = 1",
        )?;
        let sessions_with_ratings = self.count(
            "rated sessions",
            "SELECT COUNT(DISTINCT session_id) FROM ratings",
        )?;
        Ok(FunnelStats {
            total_sessions,
            completed_sessions,
            completion_rate: completion_rate(completed_sessions, total_sessions),
            sessions_with_ratings,
        })
    }

    /// Answer counts for the categorical questions.
    ///
    /// # Errors
    /// Returns [`StatsError`] when the `answers` table cannot be read.
    pub fn answer_distribution(&self) -> Result<AnswerDistribution, StatsError> {
        Ok(AnswerDistribution {
            gender: self.distribution(
                "gender distribution",
                "SELECT gender, COUNT(*) FROM answers GROUP BY gender",
            )?,
            age: self.distribution(
                "age distribution",
                "SELECT age, COUNT(*) FROM answers GROUP BY age",
            )?,
            relationship: self.distribution(
                "relationship distribution",
                "SELECT relationship, COUNT(*) FROM answers GROUP BY relationship",
            )?,
            occasion: self.distribution(
                "occasion distribution",
                "SELECT occasion, COUNT(*) FROM answers GROUP BY occasion",
            )?,
        })
    }

    /// Build every report.
    ///
    /// # Errors
    /// Propagates the first [`StatsError`] raised by an individual report.
    pub fn report(&self) -> Result<FeedbackReport, StatsError> {
        Ok(FeedbackReport {
            leaderboard: self.leaderboard()?,
            funnel: self.funnel()?,
            answers: self.answer_distribution()?,
        })
    }

    fn count(&self, what: &'static str, sql: &str) -> Result<u64, StatsError> {
        let raw: i64 = self
            .connection
            .query_row(sql, [], |row| row.get(0))
            .map_err(|source| FeedbackDbError::Query {
                operation: what,
                source,
            })?;
        non_negative(what, raw)
    }

    fn distribution(
        &self,
        operation: &'static str,
        sql: &str,
    ) -> Result<BTreeMap<String, u64>, StatsError> {
        let mut statement =
            self.connection
                .prepare(sql)
                .map_err(|source| FeedbackDbError::Query { operation, source })?;
        let rows = statement
            .query_map([], |row| {
                Ok((row.get::<_, Option<String>>(0)?, row.get::<_, i64>(1)?))
            })
            .map_err(|source| FeedbackDbError::Query { operation, source })?;

        let mut counts = BTreeMap::new();
        for row in rows {
            let (answer, count) =
                row.map_err(|source| FeedbackDbError::Query { operation, source })?;
            let key = answer.unwrap_or_else(|| UNANSWERED.to_owned());
            let entry = counts.entry(key).or_insert(0_u64);
            *entry = entry.saturating_add(non_negative(operation, count)?);
        }
        Ok(counts)
    }
}

fn non_negative(what: &'static str, raw: i64) -> Result<u64, StatsError> {
    u64::try_from(raw).map_err(|_| StatsError::NegativeCount { what, raw })
}

/// Percentage of completed sessions rounded to one decimal place.
#[expect(
    clippy::float_arithmetic,
    clippy::cast_precision_loss,
    reason = "session counts stay far below the f64 mantissa limit"
)]
fn completion_rate(completed: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let percent = completed as f64 / total as f64 * 100.0;
    (percent * 10.0).round() / 10.0
}
