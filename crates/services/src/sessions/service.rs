use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info};

use quiz_core::Clock;
use quiz_core::model::{ItemId, RoundConfig, RoundConfigDraft, RoundSummary};

use super::plan::RoundPlan;
use super::progress::{RoundProgress, SessionState};
use super::question::{GuessOutcome, Question};
use crate::catalog::CatalogIndex;
use crate::error::SessionError;

//
// ─── SCORE ─────────────────────────────────────────────────────────────────────
//

/// Running tally for the active round.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Score {
    pub correct_guesses: u32,
    pub total_guesses: u32,
}

//
// ─── ROUND ─────────────────────────────────────────────────────────────────────
//

struct Round {
    config: RoundConfig,
    pool: Arc<[ItemId]>,
    pending: VecDeque<ItemId>,
    question: Question,
    score: Score,
    started_at: DateTime<Utc>,
    summary: Option<RoundSummary>,
}

impl Round {
    fn begin(
        config: RoundConfig,
        plan: RoundPlan,
        started_at: DateTime<Utc>,
        rng: &mut StdRng,
    ) -> Result<Self, SessionError> {
        let mut pending: VecDeque<ItemId> = plan.questions.into();
        let first = pending.pop_front().ok_or(SessionError::InsufficientPool {
            available: 0,
            required: config.round_length(),
        })?;
        let question = Question::new(1, first, &plan.pool, &config, rng);

        Ok(Self {
            config,
            pool: plan.pool,
            pending,
            question,
            score: Score::default(),
            started_at,
            summary: None,
        })
    }

    /// Pop the next pending item and build its choices.
    ///
    /// Callers check `pending` first; an empty queue leaves the round untouched.
    fn advance(&mut self, rng: &mut StdRng) {
        let Some(next) = self.pending.pop_front() else {
            return;
        };
        let number = usize::try_from(self.score.correct_guesses).unwrap_or(usize::MAX) + 1;
        self.question = Question::new(number, next, &self.pool, &self.config, rng);
        debug!(
            question = self.question.number,
            total = self.question.total,
            "advanced to next question"
        );
    }
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// Quiz session engine for a single player.
///
/// Idle until `start`; then one question at a time is active until the last
/// one is answered correctly. A completed session keeps its summary until the
/// next `start`.
pub struct QuizSession {
    rng: StdRng,
    clock: Clock,
    round: Option<Round>,
}

impl Default for QuizSession {
    fn default() -> Self {
        Self::new()
    }
}

impl QuizSession {
    /// Create an idle session seeded from the operating system.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
            clock: Clock::default(),
            round: None,
        }
    }

    /// Create an idle session with a reproducible random sequence.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            clock: Clock::default(),
            round: None,
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Start a fresh round, discarding any previous one.
    ///
    /// The pool is snapshotted from `catalog`; a later catalog refresh does not
    /// affect this round. On error the previous round, if any, is untouched.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidConfig` for a malformed draft,
    /// `SessionError::Catalog` if a region is unknown, or
    /// `SessionError::InsufficientPool` if the regions hold too few items.
    pub fn start(
        &mut self,
        draft: &RoundConfigDraft,
        catalog: &CatalogIndex,
    ) -> Result<&Question, SessionError> {
        let config = draft.validate()?;
        let pool = catalog.identifiers(config.enabled_regions())?;
        let plan = RoundPlan::build(pool, &config, &mut self.rng)?;
        let pool_size = plan.pool.len();
        let round = Round::begin(config, plan, self.clock.now(), &mut self.rng)?;

        info!(
            regions = round.config.enabled_regions().len(),
            pool = pool_size,
            questions = round.config.round_length(),
            choices = round.config.choice_count(),
            "round started"
        );
        Ok(&self.round.insert(round).question)
    }

    /// Submit the display name the player picked.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotStarted` before the first `start`, or
    /// `SessionError::Completed` once the round is over.
    pub fn submit_guess(&mut self, display_name: &str) -> Result<GuessOutcome, SessionError> {
        let round = self.round.as_mut().ok_or(SessionError::NotStarted)?;
        if round.summary.is_some() {
            return Err(SessionError::Completed);
        }

        if !round.question.is_correct(display_name) {
            round.score.total_guesses = round.score.total_guesses.saturating_add(1);
            debug!(guess = display_name, "incorrect guess");
            return Ok(GuessOutcome::Incorrect);
        }

        let score = Score {
            correct_guesses: round.score.correct_guesses.saturating_add(1),
            total_guesses: round.score.total_guesses.saturating_add(1),
        };
        if round.pending.is_empty() {
            // A wall clock stepped backwards must not keep the round open.
            let completed_at = self.clock.now().max(round.started_at);
            let summary = RoundSummary::new(
                score.correct_guesses,
                score.total_guesses,
                round.config.round_length(),
                round.started_at,
                completed_at,
            )?;
            round.score = score;
            info!(
                score = summary.score(),
                guesses = summary.total_guesses(),
                accuracy = summary.accuracy(),
                "round complete"
            );
            round.summary = Some(summary.clone());
            return Ok(GuessOutcome::RoundComplete(summary));
        }

        round.score = score;
        round.advance(&mut self.rng);
        Ok(GuessOutcome::Correct)
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        match &self.round {
            None => SessionState::Idle,
            Some(round) if round.summary.is_some() => SessionState::RoundComplete,
            Some(_) => SessionState::AwaitingGuess,
        }
    }

    #[must_use]
    pub fn is_round_complete(&self) -> bool {
        self.state() == SessionState::RoundComplete
    }

    /// Question awaiting a guess, if a round is in progress.
    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.round
            .as_ref()
            .filter(|round| round.summary.is_none())
            .map(|round| &round.question)
    }

    /// Tally of the current or just-completed round; zero when idle.
    #[must_use]
    pub fn score(&self) -> Score {
        self.round
            .as_ref()
            .map(|round| round.score)
            .unwrap_or_default()
    }

    #[must_use]
    pub fn summary(&self) -> Option<&RoundSummary> {
        self.round.as_ref().and_then(|round| round.summary.as_ref())
    }

    #[must_use]
    pub fn config(&self) -> Option<&RoundConfig> {
        self.round.as_ref().map(|round| &round.config)
    }

    /// Items still queued after the current question.
    #[must_use]
    pub fn pending(&self) -> Vec<ItemId> {
        self.round
            .as_ref()
            .map(|round| round.pending.iter().cloned().collect())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn progress(&self) -> Option<RoundProgress> {
        let round = self.round.as_ref()?;
        let total = round.config.round_length();
        let answered = usize::try_from(round.score.correct_guesses).unwrap_or(usize::MAX);
        let is_complete = round.summary.is_some();
        Some(RoundProgress {
            question_number: if is_complete { total } else { answered + 1 },
            total,
            answered,
            remaining: total.saturating_sub(answered),
            is_complete,
        })
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut dbg = f.debug_struct("QuizSession");
        dbg.field("state", &self.state()).field("score", &self.score());
        if let Some(round) = &self.round {
            dbg.field("pool_len", &round.pool.len())
                .field("pending_len", &round.pending.len())
                .field("started_at", &round.started_at);
        }
        dbg.finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use quiz_core::model::RegionTag;
    use quiz_core::time::{fixed_clock, fixed_now};
    use std::collections::HashSet;
    use storage::repository::InMemoryCatalog;

    const NA: &[&str] = &["Canada", "Mexico", "Cuba", "Haiti", "Panama"];
    const EU: &[&str] = &["France", "Spain", "Italy", "Malta", "Greece"];

    async fn catalog() -> CatalogIndex {
        let provider =
            InMemoryCatalog::from_regions([("North_America", NA), ("Europe", EU)]).unwrap();
        CatalogIndex::load(Arc::new(provider)).await.unwrap()
    }

    fn draft(regions: &[&str]) -> RoundConfigDraft {
        RoundConfigDraft::new(regions.iter().map(|r| RegionTag::new(*r).unwrap()))
    }

    fn answer_name(session: &QuizSession) -> String {
        session.current_question().unwrap().answer().display_name()
    }

    #[tokio::test]
    async fn idle_session_rejects_guesses() {
        let mut session = QuizSession::with_seed(1);
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(session.score(), Score::default());
        assert!(session.progress().is_none());
        assert!(matches!(
            session.submit_guess("Canada"),
            Err(SessionError::NotStarted)
        ));
    }

    #[tokio::test]
    async fn round_uses_every_item_once_when_pool_is_exact() {
        let index = catalog().await;
        let mut session = QuizSession::with_seed(42);
        session
            .start(&draft(&["North_America", "Europe"]), &index)
            .unwrap();

        let mut asked = HashSet::new();
        loop {
            let name = answer_name(&session);
            let question = session.current_question().unwrap();
            assert_eq!(question.choices().len(), 4);
            assert!(asked.insert(question.answer().clone()));
            match session.submit_guess(&name).unwrap() {
                GuessOutcome::Correct => {}
                GuessOutcome::RoundComplete(_) => break,
                GuessOutcome::Incorrect => panic!("answer was rejected"),
            }
        }
        assert_eq!(asked.len(), 10);
    }

    #[tokio::test]
    async fn wrong_guess_only_counts_the_attempt() {
        let index = catalog().await;
        let mut session = QuizSession::with_seed(3);
        let first = session.start(&draft(&["North_America", "Europe"]), &index).unwrap().clone();
        let pending_before = session.pending();

        let outcome = session.submit_guess("Atlantis").unwrap();
        assert_eq!(outcome, GuessOutcome::Incorrect);
        assert_eq!(
            session.score(),
            Score {
                correct_guesses: 0,
                total_guesses: 1
            }
        );
        assert_eq!(session.current_question(), Some(&first));
        assert_eq!(session.pending(), pending_before);
    }

    #[tokio::test]
    async fn question_numbers_follow_correct_answers() {
        let index = catalog().await;
        let mut session = QuizSession::with_seed(8);
        let first = session.start(&draft(&["Europe"]).with_round_length(3), &index).unwrap();
        assert_eq!((first.number, first.total), (1, 3));

        session.submit_guess("nope").unwrap();
        let name = answer_name(&session);
        assert_eq!(session.submit_guess(&name).unwrap(), GuessOutcome::Correct);

        let progress = session.progress().unwrap();
        assert_eq!(progress.question_number, 2);
        assert_eq!(progress.answered, 1);
        assert_eq!(progress.remaining, 2);
        assert_eq!(session.current_question().unwrap().number, 2);
    }

    #[tokio::test]
    async fn completion_reports_points_score() {
        let index = catalog().await;
        let mut session = QuizSession::with_seed(5).with_clock(fixed_clock());
        session
            .start(&draft(&["North_America", "Europe"]), &index)
            .unwrap();

        let mut wrong_left = 2;
        let summary = loop {
            if wrong_left > 0 {
                wrong_left -= 1;
                assert_eq!(session.submit_guess("wrong").unwrap(), GuessOutcome::Incorrect);
                continue;
            }
            let name = answer_name(&session);
            if let GuessOutcome::RoundComplete(summary) = session.submit_guess(&name).unwrap() {
                break summary;
            }
        };

        assert_eq!(summary.score(), 10);
        assert_eq!(summary.total_guesses(), 12);
        assert!((summary.accuracy() - 1000.0 / 12.0).abs() < 1e-9);
        assert_eq!(summary.started_at(), fixed_now());
        assert!(session.is_round_complete());
        assert!(session.current_question().is_none());
        assert!(matches!(
            session.submit_guess("France"),
            Err(SessionError::Completed)
        ));
    }

    #[tokio::test]
    async fn clock_going_backwards_still_completes_round() {
        let index = catalog().await;
        let mut session = QuizSession::with_seed(6).with_clock(fixed_clock());
        session
            .start(&draft(&["Europe"]).with_round_length(1), &index)
            .unwrap();
        session.clock = Clock::fixed(fixed_now() - Duration::seconds(60));

        let name = answer_name(&session);
        let GuessOutcome::RoundComplete(summary) = session.submit_guess(&name).unwrap() else {
            panic!("single-question round should complete");
        };
        assert_eq!(summary.elapsed(), Duration::zero());
        assert_eq!(summary.completed_at(), fixed_now());
        assert_eq!(
            session.score(),
            Score {
                correct_guesses: 1,
                total_guesses: 1
            }
        );
        assert!(session.is_round_complete());
        assert!(matches!(
            session.submit_guess(&name),
            Err(SessionError::Completed)
        ));
        assert_eq!(session.score().correct_guesses, 1);
    }

    #[tokio::test]
    async fn failed_start_keeps_previous_round() {
        let index = catalog().await;
        let mut session = QuizSession::with_seed(9);
        session.start(&draft(&["Europe"]).with_round_length(3), &index).unwrap();
        session.submit_guess("wrong").unwrap();
        let before = session.current_question().cloned();

        let err = session
            .start(&draft(&["Europe"]).with_choice_count(3), &index)
            .unwrap_err();
        assert!(matches!(err, SessionError::InvalidConfig(_)));

        let err = session.start(&draft(&["Asia"]), &index).unwrap_err();
        assert!(matches!(err, SessionError::Catalog(_)));

        let err = session.start(&draft(&["Europe"]), &index).unwrap_err();
        assert!(matches!(
            err,
            SessionError::InsufficientPool {
                available: 5,
                required: 10
            }
        ));

        assert_eq!(session.current_question().cloned(), before);
        assert_eq!(session.score().total_guesses, 1);
    }

    #[tokio::test]
    async fn restart_resets_counters() {
        let index = catalog().await;
        let mut session = QuizSession::with_seed(13);
        session.start(&draft(&["Europe"]).with_round_length(2), &index).unwrap();
        session.submit_guess("wrong").unwrap();
        let name = answer_name(&session);
        session.submit_guess(&name).unwrap();

        session
            .start(&draft(&["North_America"]).with_round_length(5), &index)
            .unwrap();
        assert_eq!(session.score(), Score::default());
        assert_eq!(session.state(), SessionState::AwaitingGuess);
        assert_eq!(session.pending().len(), 4);
        assert!(
            session
                .pending()
                .iter()
                .all(|item| item.region().as_str() == "North_America")
        );
    }
}
