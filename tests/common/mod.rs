#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use wellness_core::clients::{GenerationError, TextGenerator};
use wellness_core::orchestration::{Orchestrator, RetryPolicy};

/// Generator that replays a fixed script, repeating the last entry once the
/// script runs out.
pub struct ScriptedGenerator {
    script: Mutex<VecDeque<Result<String, GenerationError>>>,
    last: Mutex<Option<Result<String, GenerationError>>>,
    pub calls: AtomicU32,
}

fn clone_result(r: &Result<String, GenerationError>) -> Result<String, GenerationError> {
    match r {
        Ok(s) => Ok(s.clone()),
        Err(GenerationError::MissingCredentials) => Err(GenerationError::MissingCredentials),
        Err(GenerationError::Timeout { timeout_ms }) => Err(GenerationError::Timeout {
            timeout_ms: *timeout_ms,
        }),
        Err(GenerationError::Transport(m)) => Err(GenerationError::Transport(m.clone())),
        Err(GenerationError::Upstream { status, body }) => Err(GenerationError::Upstream {
            status: *status,
            body: body.clone(),
        }),
        Err(GenerationError::InvalidResponse(m)) => {
            Err(GenerationError::InvalidResponse(m.clone()))
        }
    }
}

impl ScriptedGenerator {
    pub fn new(script: Vec<Result<String, GenerationError>>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            last: Mutex::new(None),
            calls: AtomicU32::new(0),
        })
    }

    pub fn replying(text: &str) -> Arc<Self> {
        Self::new(vec![Ok(text.to_string())])
    }

    pub fn failing(err: GenerationError) -> Arc<Self> {
        Self::new(vec![Err(err)])
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self.script.lock().await.pop_front();
        let mut last = self.last.lock().await;
        match next {
            Some(r) => {
                let out = clone_result(&r);
                *last = Some(r);
                out
            }
            None => match last.as_ref() {
                Some(r) => clone_result(r),
                None => Err(GenerationError::InvalidResponse("empty script".into())),
            },
        }
    }

    fn model(&self) -> &str {
        "scripted"
    }
}

pub fn fast_policy() -> RetryPolicy {
    RetryPolicy {
        max_attempts: 3,
        base_delay: Duration::from_millis(1),
        call_timeout: Duration::from_secs(5),
    }
}

pub fn orchestrator(generator: Arc<ScriptedGenerator>) -> Orchestrator {
    Orchestrator::new(generator, fast_policy())
}

pub const QUEST_JSON: &str = r#"{
  "title": "Gratitude Note",
  "description": "Write one sentence about a patient moment that mattered.",
  "category": "reflection",
  "domain": "selfAwareness",
  "difficulty": "easy",
  "xpReward": 40,
  "estimatedMinutes": 5,
  "steps": ["Grab a sticky note", "Write the moment down"]
}"#;
