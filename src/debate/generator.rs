use std::time::Duration;

use anyhow::{Error, Result};
use async_trait::async_trait;
use handlebars::Handlebars;

use super::models::Turn;
use super::persona::PersonaConfig;
use super::prompt::{render_debate_turn, templates};
use super::scheduler::render_context;
use crate::openai::{Message, Role, completion_text};

/// Produces the next utterance for a persona. Implementations make a
/// single request and return whatever text comes back; callers are
/// responsible for recovering from errors.
#[async_trait]
pub trait ResponseGenerator {
    async fn generate(
        &self,
        persona: &PersonaConfig,
        context: &[Turn],
        last_utterance: &str,
    ) -> Result<String, Error>;
}

/// Generates turns using an OpenAI compatible chat completions API.
/// The persona's system prompt goes in the system message and the
/// context window plus instructions in a single user message.
pub struct OpenAiGenerator {
    api_hostname: String,
    api_key: String,
    timeout: Duration,
    templates: Handlebars<'static>,
}

impl OpenAiGenerator {
    pub fn new(api_hostname: &str, api_key: &str, timeout: Duration) -> Self {
        Self {
            api_hostname: api_hostname.to_string(),
            api_key: api_key.to_string(),
            timeout,
            templates: templates(),
        }
    }
}

#[async_trait]
impl ResponseGenerator for OpenAiGenerator {
    async fn generate(
        &self,
        persona: &PersonaConfig,
        context: &[Turn],
        last_utterance: &str,
    ) -> Result<String, Error> {
        let prompt = render_debate_turn(&self.templates, render_context(context), last_utterance)?;
        let messages = vec![
            Message::new(Role::System, &persona.system_prompt),
            Message::new(Role::User, &prompt),
        ];

        tracing::debug!(
            "Requesting turn for {} using {}\n{}",
            persona.name,
            persona.model_id,
            prompt
        );

        completion_text(
            &messages,
            &self.api_hostname,
            &self.api_key,
            &persona.model_id,
            self.timeout,
        )
        .await
    }
}
