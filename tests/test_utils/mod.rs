//! Test utilities for integration tests
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Error, Result, anyhow};
use async_trait::async_trait;

use debate_arena::debate::{DebateConfig, PersonaConfig, ResponseGenerator, Settings, Turn};

/// What the generator saw on one call.
#[derive(Clone, Debug)]
pub struct RecordedCall {
    pub persona: String,
    pub context: Vec<String>,
    pub last_utterance: String,
}

/// A generator that replays scripted replies in order and records
/// every call. `None` entries fail the call. Once the script runs out
/// it answers with "<persona> says something".
#[derive(Default)]
pub struct ScriptedGenerator {
    replies: Mutex<VecDeque<Option<String>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_replies(replies: Vec<Option<&str>>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().map(|r| r.map(String::from)).collect()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ResponseGenerator for ScriptedGenerator {
    async fn generate(
        &self,
        persona: &PersonaConfig,
        context: &[Turn],
        last_utterance: &str,
    ) -> Result<String, Error> {
        self.calls.lock().unwrap().push(RecordedCall {
            persona: persona.name.clone(),
            context: context.iter().map(Turn::render).collect(),
            last_utterance: last_utterance.to_string(),
        });

        let reply = self.replies.lock().unwrap().pop_front();
        match reply {
            Some(Some(text)) => Ok(text),
            Some(None) => Err(anyhow!("scripted failure")),
            None => Ok(format!("{} says something", persona.name)),
        }
    }
}

/// Default personas with no pacing delay.
pub fn test_settings(max_rounds: usize) -> Settings {
    Settings::new(
        "test-model",
        DebateConfig::new(max_rounds, Duration::ZERO).expect("Invalid round count"),
    )
}
