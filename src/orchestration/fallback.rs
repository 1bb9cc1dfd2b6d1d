//! Hand-authored payloads served when generation is unavailable.
//!
//! Everything here is deterministic for a given request.

use super::types::{
    AssessmentProgramRequest, Program, ProgramWeek, Quest, ReflectionQuestRequest,
    SupportChatRequest, SupportReply,
};
use crate::assessment::Domain;
use crate::burnout::matched_keywords;

/// Phrases that always route a support conversation towards professional help
const CRISIS_PHRASES: &[&str] = &[
    "hurt myself",
    "kill myself",
    "end it all",
    "suicid",
    "self-harm",
    "can't go on",
    "cannot go on",
];

const DEFAULT_PROGRAM_FOCUS: [Domain; 2] = [Domain::SelfManagement, Domain::SelfAwareness];

pub fn quest(req: &ReflectionQuestRequest) -> Quest {
    let domain = req.focus_domain.unwrap_or(Domain::SelfManagement);
    Quest {
        title: "Three-Breath Reset".to_string(),
        description: "Take a short, intentional pause to reset between tasks and notice how you are feeling before moving on.".to_string(),
        category: "mindfulness".to_string(),
        domain: Some(domain),
        difficulty: "easy".to_string(),
        xp_reward: 50,
        estimated_minutes: 5,
        steps: vec![
            "Find a quiet spot, even a corner of the med room.".to_string(),
            "Take three slow breaths, exhaling longer than you inhale.".to_string(),
            "Name one feeling you noticed during your last task.".to_string(),
            "Write down one thing that went well this shift.".to_string(),
        ],
    }
}

fn week_plan(domain: Domain) -> (&'static str, [&'static str; 3]) {
    match domain {
        Domain::SelfAwareness => (
            "Noticing your emotions",
            [
                "End each shift by naming your three strongest emotions.",
                "Keep a two-line reflection log after difficult patient interactions.",
                "Notice where stress shows up in your body during handover.",
            ],
        ),
        Domain::SelfManagement => (
            "Staying steady under pressure",
            [
                "Use a three-breath reset before entering a challenging room.",
                "Plan one protected break per shift and take it.",
                "Write a wind-down routine for the hour after your shift.",
            ],
        ),
        Domain::SocialAwareness => (
            "Reading the room",
            [
                "Check in with one colleague each shift about how they are doing.",
                "Observe a family's non-verbal cues before starting a conversation.",
                "Ask one open question during each patient assessment.",
            ],
        ),
        Domain::RelationshipManagement => (
            "Building stronger connections",
            [
                "Offer specific appreciation to a teammate each shift.",
                "Practise a calm script for raising a concern with a colleague.",
                "Lead a two-minute positive moment at handover.",
            ],
        ),
    }
}

pub fn program(req: &AssessmentProgramRequest) -> Program {
    let mut focus: Vec<Domain> = Vec::with_capacity(2);
    for d in req.gaps.iter().chain(DEFAULT_PROGRAM_FOCUS.iter()) {
        if focus.len() == 2 {
            break;
        }
        if !focus.contains(d) {
            focus.push(*d);
        }
    }

    let duration = req.duration_weeks.unwrap_or(4).clamp(1, 12);
    let weeks = (0..duration)
        .map(|i| {
            let domain = focus[usize::from(i) % focus.len()];
            let (theme, activities) = week_plan(domain);
            ProgramWeek {
                week: i + 1,
                theme: theme.to_string(),
                activities: activities.iter().map(|a| a.to_string()).collect(),
            }
        })
        .collect();

    Program {
        title: "Emotional Resilience Foundations".to_string(),
        summary: format!(
            "A {duration}-week plan alternating between {} and {}, built around short practices that fit a nursing shift.",
            focus[0].label(),
            focus[1].label()
        ),
        duration_weeks: duration,
        focus_domains: focus,
        weeks,
    }
}

/// Whether a support message needs a nudge towards professional help.
pub fn needs_escalation(text: &str) -> bool {
    let lower = text.to_lowercase();
    CRISIS_PHRASES.iter().any(|p| lower.contains(p)) || !matched_keywords(text).is_empty()
}

pub fn support(req: &SupportChatRequest) -> SupportReply {
    let state = req.emotional_state.as_deref().unwrap_or_default();
    let escalate = needs_escalation(&req.message) || needs_escalation(state);

    let mut suggestions = vec![
        "Take a few slow breaths and drink some water.".to_string(),
        "Write down what is weighing on you most right now.".to_string(),
        "Reach out to a colleague or friend you trust.".to_string(),
    ];
    let message = if escalate {
        suggestions.insert(
            0,
            "Contact your employee assistance programme or a mental health professional.".to_string(),
        );
        "Thank you for telling me how you're feeling. What you're carrying sounds really heavy, and you don't have to handle it alone. Please consider reaching out to someone who can support you properly, and if you feel unsafe, contact emergency services or a crisis line right away.".to_string()
    } else {
        "Thank you for sharing that with me. Nursing asks a lot of you, and it's completely understandable to feel this way. I'm having trouble giving a fuller reply right now, but here are a few things that may help in the meantime.".to_string()
    };

    SupportReply {
        message,
        suggestions,
        escalate,
    }
}
