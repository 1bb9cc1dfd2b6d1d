//! Emotional-intelligence assessment scoring

pub mod questions;
pub mod scorer;
pub mod types;

pub use questions::{TEIQUE_SF, TEIQUE_SF_QUESTIONS, questions_for_tool};
pub use scorer::{score_answers, validate_answers};
pub use types::{AnswerSet, Assessment, Domain, Question, ScoreRequest};

use crate::error::Result;

/// Validate and score a request against the named tool's question table.
pub fn score_request(request: &ScoreRequest) -> Result<Assessment> {
    let questions = questions_for_tool(&request.tool)?;
    validate_answers(&request.answers)?;
    Ok(score_answers(TEIQUE_SF, questions, &request.answers))
}
