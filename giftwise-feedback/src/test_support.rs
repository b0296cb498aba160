//! Helpers for seeding analytics databases in tests.

use std::path::Path;

use rusqlite::{Connection, params};

/// Schema written by the quiz service, reduced to the columns read here.
const ANALYTICS_SCHEMA: &str = "
    CREATE TABLE sessions (
        id INTEGER PRIMARY KEY,
        source TEXT NOT NULL,
        user_id TEXT,
        created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
        completed INTEGER DEFAULT 0
    );
    CREATE TABLE answers (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        session_id INTEGER NOT NULL,
        gender TEXT,
        age TEXT,
        relationship TEXT,
        occasion TEXT,
        budget TEXT,
        experience REAL,
        practical_emotional TEXT,
        daily_use REAL,
        aesthetic REAL,
        interests TEXT
    );
    CREATE TABLE ratings (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        session_id INTEGER NOT NULL,
        gift_id INTEGER NOT NULL,
        gift_name TEXT,
        rating INTEGER NOT NULL
    );
";

/// Categorical answers recorded for a seeded session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedAnswers {
    gender: Option<String>,
    age: Option<String>,
    relationship: Option<String>,
    occasion: Option<String>,
}

impl SeedAnswers {
    /// Answers with the three similarity fields set.
    #[must_use]
    pub fn new(gender: &str, age: &str, occasion: &str) -> Self {
        Self {
            gender: Some(gender.to_owned()),
            age: Some(age.to_owned()),
            relationship: None,
            occasion: Some(occasion.to_owned()),
        }
    }

    /// Record a relationship answer as well.
    #[must_use]
    pub fn relationship(mut self, relationship: &str) -> Self {
        self.relationship = Some(relationship.to_owned());
        self
    }
}

#[derive(Debug, Clone)]
struct SeedSession {
    id: i64,
    completed: bool,
    answers: Option<SeedAnswers>,
}

#[derive(Debug, Clone)]
struct SeedRating {
    session_id: i64,
    gift_id: i64,
    gift_name: String,
    rating: i64,
}

/// Builder for an analytics database fixture.
///
/// # Examples
/// ```
/// use giftwise_feedback::test_support::{AnalyticsSeed, SeedAnswers};
///
/// let dir = tempfile::tempdir().unwrap();
/// let path = dir.path().join("analytics.db");
/// AnalyticsSeed::new()
///     .answered(1, true, SeedAnswers::new("gender_male", "age_26_35", "occasion_birthday"))
///     .rating(1, 42, "Keyboard", 1)
///     .write(&path)
///     .unwrap();
/// ```
#[derive(Debug, Clone, Default)]
pub struct AnalyticsSeed {
    sessions: Vec<SeedSession>,
    ratings: Vec<SeedRating>,
}

impl AnalyticsSeed {
    /// Start an empty database.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a session that never reached the questions.
    #[must_use]
    pub fn session(mut self, id: i64, completed: bool) -> Self {
        self.sessions.push(SeedSession {
            id,
            completed,
            answers: None,
        });
        self
    }

    /// Add a session together with its recorded answers.
    #[must_use]
    pub fn answered(mut self, id: i64, completed: bool, answers: SeedAnswers) -> Self {
        self.sessions.push(SeedSession {
            id,
            completed,
            answers: Some(answers),
        });
        self
    }

    /// Add a raw rating. Values other than `+1` and `-1` are stored as given.
    #[must_use]
    pub fn rating(mut self, session_id: i64, gift_id: i64, gift_name: &str, rating: i64) -> Self {
        self.ratings.push(SeedRating {
            session_id,
            gift_id,
            gift_name: gift_name.to_owned(),
            rating,
        });
        self
    }

    /// Write the fixture to a fresh database at `path`.
    ///
    /// # Errors
    /// Returns the underlying `rusqlite` error when the database cannot be
    /// written.
    pub fn write(&self, path: &Path) -> Result<(), rusqlite::Error> {
        let mut connection = Connection::open(path)?;
        connection.execute_batch(ANALYTICS_SCHEMA)?;
        let tx = connection.transaction()?;
        for session in &self.sessions {
            tx.execute(
                "INSERT INTO sessions (id, source, completed) VALUES (?1, 'web', ?2)",
                params![session.id, session.completed],
            )?;
            if let Some(answers) = &session.answers {
                tx.execute(
                    "INSERT INTO answers (session_id, gender, age, relationship, occasion)
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                    params![
                        session.id,
                        answers.gender,
                        answers.age,
                        answers.relationship,
                        answers.occasion,
                    ],
                )?;
            }
        }
        for rating in &self.ratings {
            tx.execute(
                "INSERT INTO ratings (session_id, gift_id, gift_name, rating)
                 VALUES (?1, ?2, ?3, ?4)",
                params![rating.session_id, rating.gift_id, rating.gift_name, rating.rating],
            )?;
        }
        tx.commit()
    }
}
