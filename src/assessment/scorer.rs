//! TEIQue-SF style scoring: Likert answers to four 0–100 domain scores.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::Utc;

use super::types::{AnswerSet, Assessment, Domain, Question};
use crate::error::{Result, WellnessError};

/// Score used for a domain with no answered items
pub const NEUTRAL_SCORE: f64 = 50.0;
pub const LIKERT_MIN: u8 = 1;
pub const LIKERT_MAX: u8 = 5;

/// Reject answers outside the 1–5 Likert range.
pub fn validate_answers(answers: &AnswerSet) -> Result<()> {
    let mut bad: Vec<(usize, u8)> = answers
        .iter()
        .filter(|(_, v)| !(LIKERT_MIN..=LIKERT_MAX).contains(*v))
        .map(|(k, v)| (*k, *v))
        .collect();
    if bad.is_empty() {
        return Ok(());
    }
    bad.sort_unstable();
    let detail = bad
        .iter()
        .map(|(pos, v)| format!("{pos}={v}"))
        .collect::<Vec<_>>()
        .join(", ");
    Err(WellnessError::validation(format!(
        "answers must be between {LIKERT_MIN} and {LIKERT_MAX}: {detail}"
    )))
}

/// Apply reverse scoring to a raw Likert value.
pub fn item_value(question: &Question, raw: u8) -> u8 {
    if question.reverse { 6 - raw } else { raw }
}

/// Average each domain's item values onto a 0–100 scale.
///
/// Answers are matched to questions by position in `questions`, not by
/// question id. Positions past the end of the table are skipped.
pub fn domain_scores(questions: &[Question], answers: &AnswerSet) -> BTreeMap<Domain, f64> {
    let mut sums: BTreeMap<Domain, (u32, u32)> = BTreeMap::new();

    for (&position, &raw) in answers {
        let Some(question) = questions.get(position) else {
            tracing::debug!("skipping answer for unknown position {}", position);
            continue;
        };
        if !(LIKERT_MIN..=LIKERT_MAX).contains(&raw) {
            tracing::debug!("skipping out-of-range answer {} at {}", raw, position);
            continue;
        }
        let entry = sums.entry(question.domain).or_insert((0, 0));
        entry.0 += u32::from(item_value(question, raw));
        entry.1 += 1;
    }

    Domain::ALL
        .iter()
        .map(|domain| {
            let score = match sums.get(domain) {
                Some(&(sum, count)) if count > 0 => f64::from(sum) / f64::from(count) * 20.0,
                _ => NEUTRAL_SCORE,
            };
            (*domain, score)
        })
        .collect()
}

/// Mean of the domain scores.
pub fn baseline_score(scores: &BTreeMap<Domain, f64>) -> f64 {
    if scores.is_empty() {
        return NEUTRAL_SCORE;
    }
    scores.values().sum::<f64>() / scores.len() as f64
}

/// Rank domains by score, highest first. Ties keep `Domain::ALL` order.
pub fn rank_domains(scores: &BTreeMap<Domain, f64>) -> Vec<Domain> {
    let mut ranked: Vec<(Domain, f64)> = Domain::ALL
        .iter()
        .map(|d| (*d, scores.get(d).copied().unwrap_or(NEUTRAL_SCORE)))
        .collect();
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    ranked.into_iter().map(|(d, _)| d).collect()
}

/// Score an answer set into a full assessment record.
pub fn score_answers(tool: &str, questions: &[Question], answers: &AnswerSet) -> Assessment {
    let scores = domain_scores(questions, answers);
    let baseline = baseline_score(&scores);
    let ranked = rank_domains(&scores);
    let strengths = ranked[..2].to_vec();
    let gaps = ranked[ranked.len() - 2..].to_vec();
    let now = Utc::now();

    tracing::debug!(
        "scored {} answers for {}: baseline={:.1}",
        answers.len(),
        tool,
        baseline
    );

    Assessment {
        id: uuid::Uuid::new_v4().to_string(),
        tool: tool.to_string(),
        baseline_score: baseline,
        domain_scores: scores,
        strengths,
        gaps,
        assessment_date: now,
        completed_at: now,
    }
}
