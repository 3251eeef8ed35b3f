#![forbid(unsafe_code)]

pub mod catalog;
pub mod error;
pub mod sessions;

pub use quiz_core::Clock;
pub use sessions as session;

pub use catalog::CatalogIndex;
pub use error::{CatalogError, SessionError};

pub use sessions::{
    Choice, GuessOutcome, PresentationSink, Question, QuizLoopService, QuizSession, RoundProgress,
    Score, SessionState,
};
