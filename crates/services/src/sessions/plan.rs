use std::collections::HashSet;
use std::sync::Arc;

use rand::Rng;

use quiz_core::model::{ItemId, RoundConfig};

use crate::error::SessionError;

/// Items selected for one round, plus the pool decoys are drawn from.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundPlan {
    pub questions: Vec<ItemId>,
    pub pool: Arc<[ItemId]>,
}

impl RoundPlan {
    /// Pick `round_length` distinct items from `pool` by rejection sampling.
    ///
    /// Indices are drawn uniformly and an item is accepted only if it has not
    /// been chosen yet. The size checks below are what make the loop finish:
    /// the pool must hold `required_pool_size` distinct items and at least
    /// `choice_count` distinct display names.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InsufficientPool` when the pool is too small for
    /// the round or for a full set of choices.
    pub fn build<R: Rng + ?Sized>(
        pool: Vec<ItemId>,
        config: &RoundConfig,
        rng: &mut R,
    ) -> Result<Self, SessionError> {
        let distinct_items: HashSet<&ItemId> = pool.iter().collect();
        let required = config.required_pool_size();
        if distinct_items.len() < required {
            return Err(SessionError::InsufficientPool {
                available: distinct_items.len(),
                required,
            });
        }

        let distinct_names: HashSet<String> = pool.iter().map(ItemId::display_name).collect();
        if distinct_names.len() < config.choice_count() {
            return Err(SessionError::InsufficientPool {
                available: distinct_names.len(),
                required: config.choice_count(),
            });
        }

        let round_length = config.round_length();
        let mut chosen = HashSet::with_capacity(round_length);
        let mut questions = Vec::with_capacity(round_length);
        while questions.len() < round_length {
            let candidate = &pool[rng.random_range(0..pool.len())];
            if chosen.insert(candidate) {
                questions.push(candidate.clone());
            }
        }

        Ok(Self {
            questions,
            pool: pool.into(),
        })
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.questions.len()
    }
}
