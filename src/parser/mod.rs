//! Free-text income extraction boundary.
//!
//! Implementations turn a sentence like "got 3k from freelance work" into the
//! structured fields of an income record. `Ok(None)` is the contract for "could
//! not parse with confidence": the caller adds no record and keeps the input.

pub mod heuristic;

pub use heuristic::HeuristicParser;

use thiserror::Error;

/// Structured fields extracted from free text.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedIncome {
    pub amount: f64,
    pub source: String,
    pub category: String,
}

/// Failure of the parsing collaborator itself, as opposed to low-confidence
/// input. State must be left untouched either way.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("income parser unavailable: {0}")]
    Unavailable(String),
}

/// Extracts income fields from free text.
pub trait IncomeParser {
    /// Returns `Ok(None)` when the text cannot be parsed confidently.
    fn parse(&self, text: &str) -> Result<Option<ParsedIncome>, ParseError>;
}

/// Scripted test double replaying queued outcomes.
#[derive(Default)]
pub struct ScriptedParser {
    outcomes: std::sync::Mutex<std::collections::VecDeque<ScriptedOutcome>>,
}

#[derive(Debug, Clone)]
pub enum ScriptedOutcome {
    Parsed(ParsedIncome),
    Unparsed,
    Fail(String),
}

impl ScriptedParser {
    pub fn new(outcomes: impl IntoIterator<Item = ScriptedOutcome>) -> Self {
        Self {
            outcomes: std::sync::Mutex::new(outcomes.into_iter().collect()),
        }
    }
}

impl IncomeParser for ScriptedParser {
    fn parse(&self, _text: &str) -> Result<Option<ParsedIncome>, ParseError> {
        let mut outcomes = self
            .outcomes
            .lock()
            .map_err(|_| ParseError::Unavailable("scripted parser poisoned".into()))?;
        match outcomes.pop_front() {
            Some(ScriptedOutcome::Parsed(parsed)) => Ok(Some(parsed)),
            Some(ScriptedOutcome::Unparsed) | None => Ok(None),
            Some(ScriptedOutcome::Fail(reason)) => Err(ParseError::Unavailable(reason)),
        }
    }
}
