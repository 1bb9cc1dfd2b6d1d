//! AI orchestration: prompt, generate with retry, parse, or fall back.
//!
//! Per request: `PENDING -> CALLING(n) -> PARSED | RETRY -> CALLING(n+1) |
//! EXHAUSTED -> FALLBACK`. Both `PARSED` and `FALLBACK` are successful
//! outcomes for the caller. Only missing credentials surface as an error.

pub mod fallback;
pub mod parsing;
pub mod prompts;
pub mod retry;
pub mod types;

use std::sync::Arc;
use std::time::Instant;

pub use parsing::{extract_json_candidates, parse_json_reply, strip_code_fences};
pub use retry::{RetryOutcome, RetryPolicy, retry_with_backoff};
pub use types::{
    AssessmentProgramRequest, ChatTurn, FallbackReason, OrchestrationResponse, Program,
    ProgramWeek, Quest, ReflectionQuestRequest, RequestType, StructuredReply, SupportChatRequest,
    SupportReply,
};

use crate::clients::{GenerationError, TextGenerator};
use crate::error::{Result, WellnessError};

/// Routes typed requests to the injected generator.
#[derive(Clone)]
pub struct Orchestrator {
    generator: Arc<dyn TextGenerator>,
    policy: RetryPolicy,
}

impl Orchestrator {
    pub fn new(generator: Arc<dyn TextGenerator>, policy: RetryPolicy) -> Self {
        Self { generator, policy }
    }

    pub fn model(&self) -> &str {
        self.generator.model()
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub async fn reflection_to_quest(
        &self,
        req: &ReflectionQuestRequest,
    ) -> Result<OrchestrationResponse<Quest>> {
        if req.reflection.trim().is_empty() {
            return Err(WellnessError::validation("reflection is required"));
        }
        let prompt = prompts::reflection_to_quest(req);
        self.run(RequestType::ReflectionToQuest, &prompt, || fallback::quest(req))
            .await
    }

    pub async fn assessment_to_program(
        &self,
        req: &AssessmentProgramRequest,
    ) -> Result<OrchestrationResponse<Program>> {
        if !(0.0..=100.0).contains(&req.baseline_score) {
            return Err(WellnessError::validation(
                "baselineScore must be between 0 and 100",
            ));
        }
        if let Some(bad) = req.domain_scores.values().find(|s| !(0.0..=100.0).contains(*s)) {
            return Err(WellnessError::validation(format!(
                "domain scores must be between 0 and 100, got {bad}"
            )));
        }
        let prompt = prompts::assessment_to_program(req);
        self.run(RequestType::AssessmentToProgram, &prompt, || {
            fallback::program(req)
        })
        .await
    }

    pub async fn support_chat(
        &self,
        req: &SupportChatRequest,
    ) -> Result<OrchestrationResponse<SupportReply>> {
        if req.message.trim().is_empty() {
            return Err(WellnessError::validation("message is required"));
        }
        let prompt = prompts::support_chat(req);
        let mut response = self
            .run(RequestType::SupportChat, &prompt, || fallback::support(req))
            .await?;
        // Crisis language escalates even when the model did not flag it.
        if let Some(reply) = response.data.as_mut()
            && !reply.escalate
            && fallback::needs_escalation(&req.message)
        {
            reply.escalate = true;
        }
        Ok(response)
    }

    async fn run<T, F>(
        &self,
        request_type: RequestType,
        prompt: &str,
        make_fallback: F,
    ) -> Result<OrchestrationResponse<T>>
    where
        T: StructuredReply,
        F: FnOnce() -> T,
    {
        let started = Instant::now();
        let generator = self.generator.as_ref();
        let label = request_type.as_str();

        let RetryOutcome { result, attempts } =
            retry_with_backoff(&self.policy, label, move |_| generator.generate(prompt)).await;

        let reason = match result {
            Ok(text) => match parse_json_reply::<T>(&text) {
                Ok(reply) if reply.is_well_formed() => {
                    let processing_time_ms = started.elapsed().as_millis() as u64;
                    tracing::info!(
                        request_type = label,
                        attempts,
                        processing_time_ms,
                        "generation parsed"
                    );
                    return Ok(OrchestrationResponse {
                        success: true,
                        data: Some(reply),
                        error: None,
                        fallback_used: false,
                        fallback_reason: None,
                        request_type,
                        attempts,
                        processing_time_ms,
                    });
                }
                Ok(_) => FallbackReason::Incomplete,
                Err(e) => {
                    tracing::warn!("{}: {}", label, e);
                    FallbackReason::Unparseable
                }
            },
            Err(GenerationError::MissingCredentials) => {
                tracing::error!("{}: generation credentials missing", label);
                return Err(GenerationError::MissingCredentials.into());
            }
            Err(e) if e.is_retryable() => FallbackReason::RetriesExhausted,
            Err(_) => FallbackReason::UpstreamRejected,
        };

        let data = make_fallback();
        let processing_time_ms = started.elapsed().as_millis() as u64;
        tracing::warn!(
            request_type = label,
            attempts,
            processing_time_ms,
            reason = ?reason,
            "serving fallback content"
        );
        Ok(OrchestrationResponse {
            success: true,
            data: Some(data),
            error: None,
            fallback_used: true,
            fallback_reason: Some(reason),
            request_type,
            attempts,
            processing_time_ms,
        })
    }
}
