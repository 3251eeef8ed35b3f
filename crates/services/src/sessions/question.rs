use std::collections::HashSet;

use rand::Rng;
use rand::seq::SliceRandom;

use quiz_core::model::{GRID_COLUMNS, ItemId, RoundConfig, RoundSummary};

/// One selectable answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub item: ItemId,
    pub display_name: String,
}

impl Choice {
    #[must_use]
    pub fn new(item: ItemId) -> Self {
        let display_name = item.display_name();
        Self { item, display_name }
    }
}

/// The question currently on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    /// 1-based position in the round.
    pub number: usize,
    pub total: usize,
    answer: ItemId,
    choices: Vec<Choice>,
}

impl Question {
    pub(crate) fn new<R: Rng + ?Sized>(
        number: usize,
        answer: ItemId,
        pool: &[ItemId],
        config: &RoundConfig,
        rng: &mut R,
    ) -> Self {
        let choices = build_choices(pool, &answer, config, rng);
        Self {
            number,
            total: config.round_length(),
            answer,
            choices,
        }
    }

    /// Identifier of the item being asked about, e.g. to look up its image.
    #[must_use]
    pub fn answer(&self) -> &ItemId {
        &self.answer
    }

    #[must_use]
    pub fn choices(&self) -> &[Choice] {
        &self.choices
    }

    /// Choices laid out as rows of two.
    pub fn rows(&self) -> impl Iterator<Item = &[Choice]> {
        self.choices.chunks(GRID_COLUMNS)
    }

    /// Case-sensitive match against the answer's display name.
    #[must_use]
    pub fn is_correct(&self, display_name: &str) -> bool {
        self.answer.display_name() == display_name
    }
}

/// Result of a single guess.
#[derive(Debug, Clone, PartialEq)]
pub enum GuessOutcome {
    /// Right answer; the next question is ready.
    Correct,
    /// Wrong answer; the same question stays active.
    Incorrect,
    /// Right answer to the last question.
    RoundComplete(RoundSummary),
}

impl GuessOutcome {
    #[must_use]
    pub fn is_correct(&self) -> bool {
        !matches!(self, GuessOutcome::Incorrect)
    }
}

/// Build `choice_count` choices with the answer present exactly once.
///
/// The pool is shuffled and walked for decoys, skipping the answer and any
/// display name already taken so no two buttons read the same. The answer then
/// goes into a uniformly random grid cell (row, column).
fn build_choices<R: Rng + ?Sized>(
    pool: &[ItemId],
    answer: &ItemId,
    config: &RoundConfig,
    rng: &mut R,
) -> Vec<Choice> {
    let choice_count = config.choice_count();
    let mut shuffled = pool.to_vec();
    shuffled.shuffle(rng);

    let decoys_needed = choice_count.saturating_sub(1);
    let mut taken = HashSet::with_capacity(choice_count);
    taken.insert(answer.display_name());

    let mut choices = Vec::with_capacity(choice_count);
    for item in shuffled {
        if choices.len() == decoys_needed {
            break;
        }
        let choice = Choice::new(item);
        if taken.insert(choice.display_name.clone()) {
            choices.push(choice);
        }
    }

    let rows = config.grid_rows().max(1);
    let row = rng.random_range(0..rows);
    let column = rng.random_range(0..GRID_COLUMNS);
    let slot = (row * GRID_COLUMNS + column).min(choices.len());
    choices.insert(slot, Choice::new(answer.clone()));
    choices
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use quiz_core::model::{RegionTag, RoundConfigDraft};
    use rand::rngs::StdRng;

    fn config(round_length: usize, choice_count: usize) -> RoundConfig {
        RoundConfigDraft::new([RegionTag::new("Europe").unwrap()])
            .with_round_length(round_length)
            .with_choice_count(choice_count)
            .validate()
            .unwrap()
    }

    fn pool(names: &[&str]) -> Vec<ItemId> {
        names
            .iter()
            .map(|n| ItemId::new(format!("Europe-{n}")).unwrap())
            .collect()
    }

    #[test]
    fn answer_appears_exactly_once() {
        let pool = pool(&[
            "France", "Spain", "Italy", "Malta", "Greece", "Latvia", "Poland", "Ireland",
        ]);
        let mut rng = StdRng::seed_from_u64(3);
        for answer in &pool {
            for count in [2, 4, 6, 8] {
                let question =
                    Question::new(1, answer.clone(), &pool, &config(10, count), &mut rng);
                assert_eq!(question.choices().len(), count);
                let hits = question
                    .choices()
                    .iter()
                    .filter(|c| c.item == *answer)
                    .count();
                assert_eq!(hits, 1);
                let names: HashSet<_> =
                    question.choices().iter().map(|c| &c.display_name).collect();
                assert_eq!(names.len(), count);
            }
        }
    }

    #[test]
    fn answer_lands_in_every_slot_eventually() {
        let pool = pool(&["France", "Spain", "Italy", "Malta", "Greece", "Latvia"]);
        let answer = pool[0].clone();
        let mut rng = StdRng::seed_from_u64(11);
        let mut slots = HashSet::new();
        for _ in 0..400 {
            let question = Question::new(1, answer.clone(), &pool, &config(10, 6), &mut rng);
            let slot = question
                .choices()
                .iter()
                .position(|c| c.item == answer)
                .unwrap();
            slots.insert(slot);
        }
        assert_eq!(slots, (0..6).collect());
    }

    #[test]
    fn rows_are_pairs() {
        let pool = pool(&["France", "Spain", "Italy", "Malta"]);
        let mut rng = StdRng::seed_from_u64(5);
        let question = Question::new(1, pool[1].clone(), &pool, &config(10, 4), &mut rng);
        assert_eq!(question.total, 10);
        let rows: Vec<_> = question.rows().collect();
        assert_eq!(rows.len(), config(10, 4).grid_rows());
        assert!(rows.iter().all(|row| row.len() == 2));
    }

    #[test]
    fn correctness_uses_display_name() {
        let pool = pool(&["Czech_Republic", "Spain"]);
        let mut rng = StdRng::seed_from_u64(5);
        let question = Question::new(1, pool[0].clone(), &pool, &config(1, 2), &mut rng);
        assert!(question.is_correct("Czech Republic"));
        assert!(!question.is_correct("Czech_Republic"));
        assert!(!question.is_correct("czech republic"));
        assert!(!question.is_correct("Europe-Czech_Republic"));
    }

    #[test]
    fn colliding_display_names_are_not_offered_twice() {
        let mut items = pool(&["Georgia", "Spain", "Italy"]);
        items.push(ItemId::new("North_America-Georgia").unwrap());
        let answer = items[0].clone();
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..50 {
            let question = Question::new(1, answer.clone(), &items, &config(1, 4), &mut rng);
            let georgias = question
                .choices()
                .iter()
                .filter(|c| c.display_name == "Georgia")
                .count();
            assert_eq!(georgias, 1);
            assert_eq!(question.choices().len(), 3);
        }
    }
}
