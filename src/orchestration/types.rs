use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::assessment::Domain;
use crate::deserializers::{
    de_option_domain_forgiving, de_option_u32_forgiving, de_or_default, de_vec_skip_invalid,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RequestType {
    ReflectionToQuest,
    AssessmentToProgram,
    SupportChat,
}

impl RequestType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestType::ReflectionToQuest => "reflection_to_quest",
            RequestType::AssessmentToProgram => "assessment_to_program",
            RequestType::SupportChat => "support_chat",
        }
    }
}

/// Why degraded content was served instead of a model reply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FallbackReason {
    /// Transient failures used up every attempt
    RetriesExhausted,
    /// Upstream rejected the call in a way retrying cannot fix
    UpstreamRejected,
    /// Reply contained no decodable JSON of the expected shape
    Unparseable,
    /// Reply decoded but required fields were empty
    Incomplete,
}

/// Model replies must pass a shape check before they are served.
pub trait StructuredReply: serde::de::DeserializeOwned {
    fn is_well_formed(&self) -> bool;
}

// ---- reflection -> quest ----

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReflectionQuestRequest {
    pub reflection: String,
    pub emotional_state: Option<String>,
    pub motivation_level: Option<u8>,
    pub focus_domain: Option<Domain>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Quest {
    pub title: String,
    pub description: String,
    #[serde(default, deserialize_with = "de_or_default")]
    pub category: String,
    #[serde(default, deserialize_with = "de_option_domain_forgiving")]
    pub domain: Option<Domain>,
    #[serde(default = "default_difficulty", deserialize_with = "de_difficulty")]
    pub difficulty: String,
    #[serde(default = "default_xp", deserialize_with = "de_xp")]
    pub xp_reward: u32,
    #[serde(default = "default_minutes", deserialize_with = "de_minutes")]
    pub estimated_minutes: u32,
    pub steps: Vec<String>,
}

fn default_difficulty() -> String {
    "easy".to_string()
}

fn default_xp() -> u32 {
    50
}

fn default_minutes() -> u32 {
    10
}

fn de_difficulty<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    let difficulty: String = de_or_default(d)?;
    let difficulty = difficulty.trim().to_lowercase();
    Ok(if difficulty.is_empty() { default_difficulty() } else { difficulty })
}

fn de_xp<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
    Ok(de_option_u32_forgiving(d)?.unwrap_or_else(default_xp))
}

fn de_minutes<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
    Ok(de_option_u32_forgiving(d)?.unwrap_or_else(default_minutes))
}

impl StructuredReply for Quest {
    fn is_well_formed(&self) -> bool {
        !self.title.trim().is_empty()
            && !self.description.trim().is_empty()
            && self.steps.iter().any(|s| !s.trim().is_empty())
    }
}

// ---- assessment -> program ----

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AssessmentProgramRequest {
    pub baseline_score: f64,
    pub domain_scores: BTreeMap<Domain, f64>,
    pub strengths: Vec<Domain>,
    pub gaps: Vec<Domain>,
    pub goals: Option<String>,
    pub duration_weeks: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramWeek {
    pub week: u8,
    pub theme: String,
    pub activities: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Program {
    pub title: String,
    pub summary: String,
    pub duration_weeks: u8,
    #[serde(default, deserialize_with = "de_vec_skip_invalid")]
    pub focus_domains: Vec<Domain>,
    pub weeks: Vec<ProgramWeek>,
}

impl StructuredReply for Program {
    fn is_well_formed(&self) -> bool {
        !self.title.trim().is_empty()
            && !self.weeks.is_empty()
            && self.weeks.iter().all(|w| !w.activities.is_empty())
    }
}

// ---- support chat ----

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatTurn {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SupportChatRequest {
    pub message: String,
    pub history: Vec<ChatTurn>,
    pub emotional_state: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportReply {
    pub message: String,
    #[serde(default)]
    pub suggestions: Vec<String>,
    #[serde(default)]
    pub escalate: bool,
}

impl StructuredReply for SupportReply {
    fn is_well_formed(&self) -> bool {
        !self.message.trim().is_empty()
    }
}

// ---- response envelope ----

/// Uniform envelope for every orchestration endpoint. Parsed and fallback
/// results both carry `data`; only `fallbackUsed` tells them apart.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrchestrationResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub fallback_used: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_reason: Option<FallbackReason>,
    pub request_type: RequestType,
    pub attempts: u32,
    pub processing_time_ms: u64,
}
