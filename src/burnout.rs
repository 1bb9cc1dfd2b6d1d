//! Burnout risk detection
//!
//! A fixed rule cascade over self-reported motivation, free-text emotional
//! state, recent reflection history and shift context. Rules only ever raise
//! the level; nothing here is persisted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::deserializers::{de_option_u8_forgiving, de_or_default, de_vec_skip_invalid};

/// Words in the emotional-state text that suggest burnout
pub const BURNOUT_KEYWORDS: &[&str] = &[
    "exhausted",
    "burnout",
    "depleted",
    "overwhelmed",
    "cynical",
    "detached",
    "ineffective",
    "hopeless",
];

/// Reflections at or below this motivation count as low
pub const LOW_REFLECTION_MOTIVATION: u8 = 3;
/// Number of low-motivation reflections that raises the level to high
pub const LOW_REFLECTION_THRESHOLD: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
    Critical,
}

impl RiskLevel {
    /// Raise to `target` if it is higher; never lowers.
    fn escalate_to(self, target: RiskLevel) -> RiskLevel {
        self.max(target)
    }

    pub fn referral_needed(self) -> bool {
        matches!(self, RiskLevel::High | RiskLevel::Critical)
    }

    pub fn recommendations(self) -> &'static [&'static str] {
        match self {
            RiskLevel::Low => &[
                "Keep up your current self-care routines between shifts.",
                "Take a few minutes after each shift to reflect on what went well.",
                "Stay connected with colleagues you trust.",
            ],
            RiskLevel::Moderate => &[
                "Schedule protected rest time on your next days off.",
                "Try a short breathing or grounding exercise during breaks.",
                "Talk through a difficult moment with a peer or mentor.",
                "Review your workload with your charge nurse if it feels unsustainable.",
            ],
            RiskLevel::High => &[
                "Reach out to your employee assistance programme or occupational health.",
                "Speak with your manager about adjusting your upcoming roster.",
                "Prioritise sleep and limit extra shifts for the next two weeks.",
                "Use peer-support or debrief sessions after difficult shifts.",
            ],
            RiskLevel::Critical => &[
                "Please contact a mental health professional or your employee assistance programme today.",
                "Let your manager or a trusted colleague know you are struggling.",
                "If you have thoughts of harming yourself, contact emergency services or a crisis line now.",
                "Step back from non-essential duties until you have spoken with support.",
            ],
        }
    }
}

/// A past reflection as supplied by the caller
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReflectionRecord {
    #[serde(deserialize_with = "de_option_u8_forgiving")]
    pub motivation_level: Option<u8>,
    #[serde(deserialize_with = "de_or_default")]
    pub emotional_state: Option<String>,
    #[serde(deserialize_with = "de_or_default")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShiftContext {
    #[serde(deserialize_with = "de_or_default")]
    pub shift_type: Option<String>,
    #[serde(deserialize_with = "de_or_default")]
    pub workload_intensity: Option<String>,
    #[serde(deserialize_with = "de_or_default")]
    pub critical_incident_occurred: bool,
}

/// Body of `POST /api/burnout/risk`
///
/// Decoded field by field: a mistyped field is dropped on its own so the
/// remaining signals still reach the rule cascade.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BurnoutRequest {
    #[serde(deserialize_with = "de_or_default")]
    pub emotional_state: String,
    #[serde(deserialize_with = "de_option_u8_forgiving")]
    pub motivation_level: Option<u8>,
    #[serde(deserialize_with = "de_vec_skip_invalid")]
    pub recent_reflections: Vec<ReflectionRecord>,
    #[serde(deserialize_with = "de_or_default")]
    pub shift_context: Option<ShiftContext>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BurnoutRisk {
    pub level: RiskLevel,
    pub indicators: Vec<String>,
    pub recommendations: Vec<String>,
    pub referral_needed: bool,
    pub assessed_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BurnoutRisk {
    fn from_level(level: RiskLevel, indicators: Vec<String>) -> Self {
        let now = Utc::now();
        Self {
            level,
            indicators,
            recommendations: level
                .recommendations()
                .iter()
                .map(|s| s.to_string())
                .collect(),
            referral_needed: level.referral_needed(),
            assessed_at: now,
            updated_at: now,
        }
    }

    /// Response used when the request cannot be evaluated
    pub fn safe_default() -> Self {
        Self::from_level(RiskLevel::Low, Vec::new())
    }
}

/// Burnout keywords found in `text`, case-insensitive, in table order.
pub fn matched_keywords(text: &str) -> Vec<&'static str> {
    let lower = text.to_lowercase();
    BURNOUT_KEYWORDS
        .iter()
        .copied()
        .filter(|kw| lower.contains(kw))
        .collect()
}

/// Evaluate the rule cascade.
pub fn assess_burnout(request: &BurnoutRequest) -> BurnoutRisk {
    let mut level = RiskLevel::Low;
    let mut indicators = Vec::new();

    match request.motivation_level {
        Some(m) if m <= 2 => {
            level = RiskLevel::Critical;
            indicators.push(format!("Critically low motivation ({m}/5)"));
        }
        Some(m @ 3..=4) => {
            level = level.escalate_to(RiskLevel::High);
            indicators.push(format!("Reduced motivation ({m}/5)"));
        }
        _ => {}
    }

    let keywords = matched_keywords(&request.emotional_state);
    if !keywords.is_empty() {
        // Two sequential steps: a single match from low ends at high.
        if level == RiskLevel::Low {
            level = RiskLevel::Moderate;
        }
        if level == RiskLevel::Moderate {
            level = RiskLevel::High;
        }
        indicators.push(format!("Burnout language detected: {}", keywords.join(", ")));
    }

    let low_reflections = request
        .recent_reflections
        .iter()
        .filter(|r| {
            r.motivation_level
                .is_some_and(|m| m <= LOW_REFLECTION_MOTIVATION)
        })
        .count();
    if low_reflections >= LOW_REFLECTION_THRESHOLD {
        level = level.escalate_to(RiskLevel::High);
        indicators.push(format!(
            "{} of {} recent reflections report low motivation",
            low_reflections,
            request.recent_reflections.len()
        ));
    }

    if let Some(shift) = &request.shift_context {
        if shift
            .workload_intensity
            .as_deref()
            .is_some_and(|w| w.eq_ignore_ascii_case("critical"))
        {
            if level == RiskLevel::Low {
                level = RiskLevel::Moderate;
            }
            indicators.push("Critical workload intensity this shift".to_string());
        }
        if shift.critical_incident_occurred {
            if level == RiskLevel::Low {
                level = RiskLevel::Moderate;
            }
            indicators.push("Critical incident occurred during shift".to_string());
        }
    }

    tracing::debug!(
        "burnout assessed: level={:?}, indicators={}",
        level,
        indicators.len()
    );

    BurnoutRisk::from_level(level, indicators)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reflection(m: u8) -> ReflectionRecord {
        ReflectionRecord {
            motivation_level: Some(m),
            ..Default::default()
        }
    }

    #[test]
    fn test_no_signals_is_low() {
        let risk = assess_burnout(&BurnoutRequest {
            emotional_state: "Good shift, felt supported".into(),
            motivation_level: Some(5),
            ..Default::default()
        });
        assert_eq!(risk.level, RiskLevel::Low);
        assert!(risk.indicators.is_empty());
        assert!(!risk.referral_needed);
        assert_eq!(risk.recommendations.len(), 3);
    }

    #[test]
    fn test_motivation_one_is_critical() {
        let risk = assess_burnout(&BurnoutRequest {
            motivation_level: Some(1),
            ..Default::default()
        });
        assert_eq!(risk.level, RiskLevel::Critical);
        assert!(risk.referral_needed);
    }

    #[test]
    fn test_motivation_three_is_high() {
        let risk = assess_burnout(&BurnoutRequest {
            motivation_level: Some(3),
            ..Default::default()
        });
        assert_eq!(risk.level, RiskLevel::High);
    }

    #[test]
    fn test_single_keyword_double_escalates() {
        let risk = assess_burnout(&BurnoutRequest {
            emotional_state: "Honestly I feel OVERWHELMED".into(),
            motivation_level: Some(5),
            ..Default::default()
        });
        assert_eq!(risk.level, RiskLevel::High);
        assert_eq!(
            risk.indicators,
            vec!["Burnout language detected: overwhelmed".to_string()]
        );
    }

    #[test]
    fn test_keywords_never_downgrade_critical() {
        let risk = assess_burnout(&BurnoutRequest {
            emotional_state: "exhausted and hopeless".into(),
            motivation_level: Some(2),
            ..Default::default()
        });
        assert_eq!(risk.level, RiskLevel::Critical);
        assert_eq!(risk.indicators.len(), 2);
    }

    #[test]
    fn test_low_reflection_history() {
        let risk = assess_burnout(&BurnoutRequest {
            motivation_level: Some(5),
            recent_reflections: vec![reflection(2), reflection(3), reflection(5), reflection(1)],
            ..Default::default()
        });
        assert_eq!(risk.level, RiskLevel::High);

        let risk = assess_burnout(&BurnoutRequest {
            motivation_level: Some(5),
            recent_reflections: vec![reflection(2), reflection(4), reflection(5)],
            ..Default::default()
        });
        assert_eq!(risk.level, RiskLevel::Low);
    }

    #[test]
    fn test_shift_context_only_lifts_low() {
        let shift = ShiftContext {
            workload_intensity: Some("critical".into()),
            critical_incident_occurred: true,
            ..Default::default()
        };
        let risk = assess_burnout(&BurnoutRequest {
            motivation_level: Some(5),
            shift_context: Some(shift.clone()),
            ..Default::default()
        });
        assert_eq!(risk.level, RiskLevel::Moderate);
        assert_eq!(risk.indicators.len(), 2);
        assert!(!risk.referral_needed);

        let risk = assess_burnout(&BurnoutRequest {
            motivation_level: Some(4),
            shift_context: Some(shift),
            ..Default::default()
        });
        assert_eq!(risk.level, RiskLevel::High);
    }

    #[test]
    fn test_safe_default() {
        let risk = BurnoutRisk::safe_default();
        assert_eq!(risk.level, RiskLevel::Low);
        assert!(risk.indicators.is_empty());
        assert!(!risk.recommendations.is_empty());
    }
}
