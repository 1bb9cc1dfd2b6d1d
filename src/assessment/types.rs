use std::collections::{BTreeMap, HashMap};
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Emotional-intelligence competency domain.
///
/// Declaration order is the tie-break order when ranking domains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Domain {
    #[serde(alias = "self_awareness", alias = "Self-Awareness")]
    SelfAwareness,
    #[serde(alias = "self_management", alias = "Self-Management")]
    SelfManagement,
    #[serde(alias = "social_awareness", alias = "Social Awareness")]
    SocialAwareness,
    #[serde(alias = "relationship_management", alias = "Relationship Management")]
    RelationshipManagement,
}

impl Domain {
    pub const ALL: [Domain; 4] = [
        Domain::SelfAwareness,
        Domain::SelfManagement,
        Domain::SocialAwareness,
        Domain::RelationshipManagement,
    ];

    /// Match a domain name ignoring case, spaces, hyphens and underscores.
    pub fn from_loose(name: &str) -> Option<Domain> {
        let key: String = name
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match key.as_str() {
            "selfawareness" => Some(Domain::SelfAwareness),
            "selfmanagement" => Some(Domain::SelfManagement),
            "socialawareness" => Some(Domain::SocialAwareness),
            "relationshipmanagement" => Some(Domain::RelationshipManagement),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Domain::SelfAwareness => "Self-Awareness",
            Domain::SelfManagement => "Self-Management",
            Domain::SocialAwareness => "Social Awareness",
            Domain::RelationshipManagement => "Relationship Management",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One questionnaire item. Reference data, never mutated.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: u32,
    pub text: &'static str,
    pub domain: Domain,
    pub reverse: bool,
}

/// Zero-based question position mapped to a Likert value.
pub type AnswerSet = HashMap<usize, u8>;

/// Scored assessment record returned to callers
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assessment {
    pub id: String,
    pub tool: String,
    pub baseline_score: f64,
    pub domain_scores: BTreeMap<Domain, f64>,
    pub strengths: Vec<Domain>,
    pub gaps: Vec<Domain>,
    pub assessment_date: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}

/// Body of `POST /api/assessments/score`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRequest {
    pub tool: String,
    #[serde(default)]
    pub answers: AnswerSet,
}
