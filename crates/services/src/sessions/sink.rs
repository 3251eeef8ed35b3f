use quiz_core::model::RoundSummary;

use super::question::{GuessOutcome, Question};

/// Receiver of quiz events, implemented by whatever shows the quiz.
///
/// `on_round_complete` is delivered exactly once per finished round.
pub trait PresentationSink {
    fn on_question(&mut self, question: &Question);

    /// Called after every guess, before the next question or the summary.
    fn on_guess(&mut self, _guess: &str, _outcome: &GuessOutcome) {}

    fn on_round_complete(&mut self, summary: &RoundSummary);
}
