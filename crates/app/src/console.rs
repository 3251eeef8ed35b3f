//! Terminal presentation of the quiz.

use std::collections::HashSet;
use std::io::Write;

use colored::Colorize;
use quiz_core::model::RoundSummary;
use services::{Choice, GuessOutcome, PresentationSink, Question};
use thiserror::Error;

const CELL_WIDTH: usize = 28;

/// Why a typed line could not be turned into a guess.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Rejection {
    #[error("type a choice number or name")]
    Empty,
    #[error("no choice numbered {0}")]
    OutOfRange(usize),
    #[error("{0} was already ruled out")]
    Disabled(String),
    #[error("{0} is not one of the choices")]
    Unknown(String),
}

/// Prints questions as a numbered two-column grid and tracks which choices
/// were already guessed wrong for the current question.
pub struct ConsoleSink<W: Write> {
    out: W,
    choices: Vec<Choice>,
    disabled: HashSet<usize>,
}

impl<W: Write> ConsoleSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            choices: Vec::new(),
            disabled: HashSet::new(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Map a typed line (1-based number or exact display name) to a guess.
    ///
    /// # Errors
    ///
    /// Returns `Rejection` for empty input, unknown choices, or choices that
    /// were already guessed wrong.
    pub fn resolve(&self, input: &str) -> Result<String, Rejection> {
        let input = input.trim();
        if input.is_empty() {
            return Err(Rejection::Empty);
        }

        let index = match input.parse::<usize>() {
            Ok(n) if (1..=self.choices.len()).contains(&n) => n - 1,
            Ok(n) => return Err(Rejection::OutOfRange(n)),
            Err(_) => self
                .choices
                .iter()
                .position(|c| c.display_name == input)
                .ok_or_else(|| Rejection::Unknown(input.to_string()))?,
        };

        let name = self.choices[index].display_name.clone();
        if self.disabled.contains(&index) {
            return Err(Rejection::Disabled(name));
        }
        Ok(name)
    }

    pub fn prompt(&mut self) {
        let _ = write!(self.out, "> ");
        let _ = self.out.flush();
    }

    pub fn reject(&mut self, rejection: &Rejection) {
        let _ = writeln!(self.out, "{}", rejection.to_string().yellow());
    }

    pub fn ask_reset(&mut self) {
        let _ = write!(self.out, "Reset quiz? [Y/n] ");
        let _ = self.out.flush();
    }

    fn render_grid(&mut self) {
        for (row_index, row) in self.choices.chunks(2).enumerate() {
            let mut line = String::new();
            for (column, choice) in row.iter().enumerate() {
                let index = row_index * 2 + column;
                let label = format!("[{}] {}", index + 1, choice.display_name);
                let cell = format!("{label:<CELL_WIDTH$}");
                if self.disabled.contains(&index) {
                    line.push_str(&cell.dimmed().strikethrough().to_string());
                } else {
                    line.push_str(&cell);
                }
            }
            let _ = writeln!(self.out, "  {}", line.trim_end());
        }
    }
}

impl<W: Write> PresentationSink for ConsoleSink<W> {
    fn on_question(&mut self, question: &Question) {
        self.choices = question.choices().to_vec();
        self.disabled.clear();

        let _ = writeln!(self.out);
        let _ = writeln!(
            self.out,
            "{} ({})",
            format!("Question {} of {}", question.number, question.total).bold(),
            question.answer().region().display_name()
        );
        self.render_grid();
    }

    fn on_guess(&mut self, guess: &str, outcome: &GuessOutcome) {
        match outcome {
            GuessOutcome::Incorrect => {
                if let Some(index) = self.choices.iter().position(|c| c.display_name == guess) {
                    self.disabled.insert(index);
                }
                let _ = writeln!(self.out, "{}", "Incorrect!".red().bold());
            }
            GuessOutcome::Correct | GuessOutcome::RoundComplete(_) => {
                let _ = writeln!(self.out, "{}", format!("{guess}!").green().bold());
            }
        }
    }

    fn on_round_complete(&mut self, summary: &RoundSummary) {
        let _ = writeln!(self.out);
        let _ = writeln!(
            self.out,
            "{} {} flags in {} guesses, accuracy score {:.2} ({}s)",
            "Round complete:".bold(),
            summary.score(),
            summary.total_guesses(),
            summary.accuracy(),
            summary.elapsed().num_seconds()
        );
    }
}
