//! Prompt templates per request type.
//!
//! Caller text is embedded as JSON string literals so quotes and newlines in
//! a reflection cannot break the instruction layout.

use super::types::{AssessmentProgramRequest, ReflectionQuestRequest, SupportChatRequest};
use crate::assessment::Domain;

/// Most recent chat turns included in a support prompt
const MAX_HISTORY_TURNS: usize = 6;

fn json_str(text: &str) -> String {
    serde_json::to_string(text.trim()).unwrap_or_else(|_| "\"\"".to_string())
}

const DOMAIN_KEYS: &str =
    "\"selfAwareness\", \"selfManagement\", \"socialAwareness\", \"relationshipManagement\"";

pub fn reflection_to_quest(req: &ReflectionQuestRequest) -> String {
    let mut context = format!("Reflection: {}\n", json_str(&req.reflection));
    if let Some(state) = req.emotional_state.as_deref().filter(|s| !s.trim().is_empty()) {
        context.push_str(&format!("Emotional state: {}\n", json_str(state)));
    }
    if let Some(m) = req.motivation_level {
        context.push_str(&format!("Motivation level: {}/5\n", m.min(5)));
    }
    if let Some(domain) = req.focus_domain {
        context.push_str(&format!("Focus domain: {}\n", domain.label()));
    }

    format!(
        "You are a supportive wellness coach for nurses. Based on the nurse's \
shift reflection below, design one small, achievable self-care quest they can \
complete before or during their next shift.\n\n\
{context}\n\
Respond with ONLY a JSON object, no commentary, in this exact shape:\n\
{{\"title\": string, \"description\": string, \"category\": string, \
\"domain\": one of [{DOMAIN_KEYS}], \"difficulty\": \"easy\"|\"medium\"|\"hard\", \
\"xpReward\": integer, \"estimatedMinutes\": integer, \"steps\": [string]}}"
    )
}

pub fn assessment_to_program(req: &AssessmentProgramRequest) -> String {
    let weeks = req.duration_weeks.unwrap_or(4).clamp(1, 12);
    let scores = Domain::ALL
        .iter()
        .map(|d| match req.domain_scores.get(d) {
            Some(s) => format!("- {}: {:.0}/100", d.label(), s),
            None => format!("- {}: not assessed", d.label()),
        })
        .collect::<Vec<_>>()
        .join("\n");
    let list = |domains: &[Domain]| {
        if domains.is_empty() {
            "none identified".to_string()
        } else {
            domains.iter().map(|d| d.label()).collect::<Vec<_>>().join(", ")
        }
    };
    let goals = req
        .goals
        .as_deref()
        .filter(|g| !g.trim().is_empty())
        .map(|g| format!("Personal goals: {}\n", json_str(g)))
        .unwrap_or_default();

    format!(
        "You are an emotional-intelligence coach for nurses. Create a {weeks}-week \
development program from this TEIQue-SF assessment.\n\n\
Baseline score: {baseline:.0}/100\n\
Domain scores:\n{scores}\n\
Strengths: {strengths}\n\
Growth areas: {gaps}\n\
{goals}\n\
Focus most weeks on the growth areas while using the strengths as anchors. \
Activities must fit around 12-hour shifts.\n\n\
Respond with ONLY a JSON object, no commentary, in this exact shape:\n\
{{\"title\": string, \"summary\": string, \"durationWeeks\": {weeks}, \
\"focusDomains\": [one of {DOMAIN_KEYS}], \
\"weeks\": [{{\"week\": integer, \"theme\": string, \"activities\": [string]}}]}}",
        baseline = req.baseline_score,
        strengths = list(&req.strengths),
        gaps = list(&req.gaps),
    )
}

pub fn support_chat(req: &SupportChatRequest) -> String {
    let start = req.history.len().saturating_sub(MAX_HISTORY_TURNS);
    let history = req.history[start..]
        .iter()
        .map(|t| format!("{}: {}", t.role, json_str(&t.content)))
        .collect::<Vec<_>>()
        .join("\n");
    let state = req
        .emotional_state
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .map(|s| format!("Current emotional state: {}\n", json_str(s)))
        .unwrap_or_default();

    format!(
        "You are a warm, non-judgemental peer-support companion for nurses. You \
are not a therapist; encourage professional help when distress is severe.\n\n\
{state}\
Recent conversation:\n{history}\n\
Nurse: {message}\n\n\
Respond with ONLY a JSON object, no commentary, in this exact shape:\n\
{{\"message\": string, \"suggestions\": [string], \"escalate\": boolean}}\n\
Set \"escalate\" to true if the nurse may be at risk of harm or severe burnout.",
        history = if history.is_empty() { "(none)".to_string() } else { history },
        message = json_str(&req.message),
    )
}
