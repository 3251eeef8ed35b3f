use std::collections::BTreeSet;

use thiserror::Error;

use crate::model::ids::RegionTag;

/// Questions per round when the caller does not say otherwise.
pub const DEFAULT_ROUND_LENGTH: usize = 10;

/// Choices per question when the caller does not say otherwise.
pub const DEFAULT_CHOICE_COUNT: usize = 4;

/// Choice counts a front end can lay out as rows of two.
pub const ALLOWED_CHOICE_COUNTS: [usize; 4] = [2, 4, 6, 8];

/// Columns per row when choices are shown as a grid.
pub const GRID_COLUMNS: usize = 2;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RoundConfigError {
    #[error("at least one region must be enabled")]
    NoRegions,

    #[error("choice count must be one of 2, 4, 6 or 8 (got {0})")]
    InvalidChoiceCount(usize),

    #[error("round length must be > 0")]
    InvalidRoundLength,
}

/// Unvalidated round settings as supplied by a caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundConfigDraft {
    pub enabled_regions: BTreeSet<RegionTag>,
    pub choice_count: usize,
    pub round_length: usize,
}

impl Default for RoundConfigDraft {
    fn default() -> Self {
        Self {
            enabled_regions: BTreeSet::new(),
            choice_count: DEFAULT_CHOICE_COUNT,
            round_length: DEFAULT_ROUND_LENGTH,
        }
    }
}

impl RoundConfigDraft {
    #[must_use]
    pub fn new(regions: impl IntoIterator<Item = RegionTag>) -> Self {
        Self {
            enabled_regions: regions.into_iter().collect(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_choice_count(mut self, choice_count: usize) -> Self {
        self.choice_count = choice_count;
        self
    }

    #[must_use]
    pub fn with_round_length(mut self, round_length: usize) -> Self {
        self.round_length = round_length;
        self
    }

    /// Validate the draft into a usable round configuration.
    ///
    /// # Errors
    ///
    /// Returns `RoundConfigError` if no region is enabled, the choice count is
    /// not an allowed grid size, or the round length is zero.
    pub fn validate(&self) -> Result<RoundConfig, RoundConfigError> {
        if self.enabled_regions.is_empty() {
            return Err(RoundConfigError::NoRegions);
        }
        if !ALLOWED_CHOICE_COUNTS.contains(&self.choice_count) {
            return Err(RoundConfigError::InvalidChoiceCount(self.choice_count));
        }
        if self.round_length == 0 {
            return Err(RoundConfigError::InvalidRoundLength);
        }

        Ok(RoundConfig {
            enabled_regions: self.enabled_regions.clone(),
            choice_count: self.choice_count,
            round_length: self.round_length,
        })
    }
}

/// Validated settings for one round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundConfig {
    enabled_regions: BTreeSet<RegionTag>,
    choice_count: usize,
    round_length: usize,
}

impl RoundConfig {
    #[must_use]
    pub fn enabled_regions(&self) -> &BTreeSet<RegionTag> {
        &self.enabled_regions
    }

    #[must_use]
    pub fn choice_count(&self) -> usize {
        self.choice_count
    }

    #[must_use]
    pub fn round_length(&self) -> usize {
        self.round_length
    }

    /// Number of two-column rows needed to show every choice.
    #[must_use]
    pub fn grid_rows(&self) -> usize {
        self.choice_count / GRID_COLUMNS
    }

    /// Smallest pool that can fill both the round and one question's choices.
    #[must_use]
    pub fn required_pool_size(&self) -> usize {
        self.round_length.max(self.choice_count)
    }
}
