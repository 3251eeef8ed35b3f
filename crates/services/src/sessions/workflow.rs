use std::sync::Arc;

use quiz_core::model::RoundConfigDraft;
use tracing::debug;

use super::question::GuessOutcome;
use super::service::QuizSession;
use super::sink::PresentationSink;
use crate::catalog::CatalogIndex;
use crate::error::{CatalogError, SessionError};

/// Drives a `QuizSession` against a catalog and forwards events to a sink.
///
/// Configuration changes take effect on the next `start_round`; the round in
/// progress keeps the settings and pool it started with.
#[derive(Debug)]
pub struct QuizLoopService {
    catalog: Arc<CatalogIndex>,
    session: QuizSession,
    config: RoundConfigDraft,
}

impl QuizLoopService {
    /// Defaults to every available region and the standard round shape.
    #[must_use]
    pub fn new(catalog: Arc<CatalogIndex>, session: QuizSession) -> Self {
        let config = RoundConfigDraft::new(catalog.regions_available());
        Self {
            catalog,
            session,
            config,
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: RoundConfigDraft) -> Self {
        self.config = config;
        self
    }

    /// Replace the settings used by the next round.
    pub fn set_config(&mut self, config: RoundConfigDraft) {
        self.config = config;
    }

    #[must_use]
    pub fn config(&self) -> &RoundConfigDraft {
        &self.config
    }

    #[must_use]
    pub fn catalog(&self) -> &CatalogIndex {
        &self.catalog
    }

    #[must_use]
    pub fn session(&self) -> &QuizSession {
        &self.session
    }

    /// Start a new round and show its first question.
    ///
    /// # Errors
    ///
    /// Propagates `SessionError` from `QuizSession::start`; the sink is not
    /// called in that case.
    pub fn start_round(&mut self, sink: &mut dyn PresentationSink) -> Result<(), SessionError> {
        let question = self.session.start(&self.config, &self.catalog)?;
        sink.on_question(question);
        Ok(())
    }

    /// Submit a guess and push the resulting events to the sink.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotStarted` or `SessionError::Completed` when no
    /// question is awaiting a guess.
    pub fn answer(
        &mut self,
        display_name: &str,
        sink: &mut dyn PresentationSink,
    ) -> Result<GuessOutcome, SessionError> {
        let outcome = self.session.submit_guess(display_name)?;
        sink.on_guess(display_name, &outcome);

        match &outcome {
            GuessOutcome::Correct => {
                let question = self
                    .session
                    .current_question()
                    .ok_or(SessionError::Completed)?;
                sink.on_question(question);
            }
            GuessOutcome::RoundComplete(summary) => sink.on_round_complete(summary),
            GuessOutcome::Incorrect => {}
        }
        Ok(outcome)
    }

    /// Reload the catalog. The round in progress is unaffected.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Load` if the provider fails; the previous
    /// catalog stays in use.
    pub async fn refresh_catalog(&self) -> Result<(), CatalogError> {
        debug!("refreshing catalog");
        self.catalog.refresh().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{RegionTag, RoundSummary};
    use storage::repository::InMemoryCatalog;

    use crate::sessions::question::Question;

    #[derive(Default)]
    struct Recorder {
        questions: Vec<Question>,
        guesses: Vec<(String, bool)>,
        summaries: Vec<RoundSummary>,
    }

    impl PresentationSink for Recorder {
        fn on_question(&mut self, question: &Question) {
            self.questions.push(question.clone());
        }

        fn on_guess(&mut self, guess: &str, outcome: &GuessOutcome) {
            self.guesses.push((guess.to_string(), outcome.is_correct()));
        }

        fn on_round_complete(&mut self, summary: &RoundSummary) {
            self.summaries.push(summary.clone());
        }
    }

    async fn service() -> QuizLoopService {
        let provider = InMemoryCatalog::from_regions([
            ("Asia", &["Japan", "Nepal", "Laos", "China"][..]),
            ("Oceania", &["Fiji", "Tonga", "Samoa", "Palau"][..]),
        ])
        .unwrap();
        let catalog = CatalogIndex::load(Arc::new(provider)).await.unwrap();
        QuizLoopService::new(Arc::new(catalog), QuizSession::with_seed(21))
    }

    #[tokio::test]
    async fn defaults_to_all_regions() {
        let svc = service().await;
        assert_eq!(svc.config().enabled_regions.len(), 2);
        assert_eq!(svc.config().round_length, 10);
    }

    #[tokio::test]
    async fn sink_sees_every_question_and_one_summary() {
        let mut svc = service().await.with_config(
            RoundConfigDraft::new([RegionTag::new("Asia").unwrap()])
                .with_round_length(4)
                .with_choice_count(2),
        );
        let mut sink = Recorder::default();
        svc.start_round(&mut sink).unwrap();

        while !svc.session().is_round_complete() {
            svc.answer("Atlantis", &mut sink).unwrap();
            let name = sink.questions.last().unwrap().answer().display_name();
            svc.answer(&name, &mut sink).unwrap();
        }

        assert_eq!(sink.questions.len(), 4);
        assert_eq!(sink.guesses.len(), 8);
        assert_eq!(sink.guesses.iter().filter(|(_, ok)| *ok).count(), 4);
        assert_eq!(sink.summaries.len(), 1);
        assert!((sink.summaries[0].accuracy() - 125.0).abs() < 1e-9);

        let numbers: Vec<_> = sink.questions.iter().map(|q| q.number).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn config_change_applies_on_next_round() {
        let mut svc = service().await.with_config(
            RoundConfigDraft::new([RegionTag::new("Asia").unwrap()]).with_round_length(2),
        );
        let mut sink = Recorder::default();
        svc.start_round(&mut sink).unwrap();

        svc.set_config(
            RoundConfigDraft::new([RegionTag::new("Oceania").unwrap()]).with_round_length(3),
        );
        assert_eq!(svc.session().config().unwrap().round_length(), 2);

        svc.start_round(&mut sink).unwrap();
        let question = sink.questions.last().unwrap();
        assert_eq!(question.total, 3);
        assert_eq!(question.answer().region().as_str(), "Oceania");
    }

    #[tokio::test]
    async fn failed_start_does_not_touch_the_sink() {
        let mut svc = service().await.with_config(
            RoundConfigDraft::new([RegionTag::new("Europe").unwrap()]),
        );
        let mut sink = Recorder::default();
        let err = svc.start_round(&mut sink).unwrap_err();
        assert!(matches!(err, SessionError::Catalog(CatalogError::UnknownRegion(_))));
        assert!(sink.questions.is_empty());
    }
}
