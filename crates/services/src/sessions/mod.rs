mod plan;
mod progress;
mod question;
mod service;
mod sink;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use plan::RoundPlan;
pub use progress::{RoundProgress, SessionState};
pub use question::{Choice, GuessOutcome, Question};
pub use service::{QuizSession, Score};
pub use sink::PresentationSink;
pub use workflow::QuizLoopService;
