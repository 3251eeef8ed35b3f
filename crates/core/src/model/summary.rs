use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

/// Numerator of the accuracy score. The score is `1000 / total_guesses`,
/// a points metric rather than a percentage.
pub const ACCURACY_NUMERATOR: f64 = 1000.0;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RoundSummaryError {
    #[error("completed_at is before started_at")]
    InvalidTimeRange,

    #[error("a completed round needs at least one guess")]
    NoGuesses,

    #[error("score ({score}) exceeds total guesses ({total})")]
    ScoreExceedsGuesses { score: u32, total: u32 },
}

/// Final tally for a completed round.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundSummary {
    score: u32,
    total_guesses: u32,
    round_length: usize,
    started_at: DateTime<Utc>,
    completed_at: DateTime<Utc>,
}

impl RoundSummary {
    /// Build a summary for a finished round.
    ///
    /// # Errors
    ///
    /// Returns `RoundSummaryError` if the timestamps are reversed, no guess was
    /// made, or the score is larger than the number of guesses.
    pub fn new(
        score: u32,
        total_guesses: u32,
        round_length: usize,
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
    ) -> Result<Self, RoundSummaryError> {
        if completed_at < started_at {
            return Err(RoundSummaryError::InvalidTimeRange);
        }
        if total_guesses == 0 {
            return Err(RoundSummaryError::NoGuesses);
        }
        if score > total_guesses {
            return Err(RoundSummaryError::ScoreExceedsGuesses {
                score,
                total: total_guesses,
            });
        }

        Ok(Self {
            score,
            total_guesses,
            round_length,
            started_at,
            completed_at,
        })
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn total_guesses(&self) -> u32 {
        self.total_guesses
    }

    #[must_use]
    pub fn round_length(&self) -> usize {
        self.round_length
    }

    /// `1000 / total_guesses`. A flawless ten-question round scores 100.
    #[must_use]
    pub fn accuracy(&self) -> f64 {
        ACCURACY_NUMERATOR / f64::from(self.total_guesses)
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }

    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.completed_at - self.started_at
    }
}
