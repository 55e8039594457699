use std::env;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};

use crate::debate::persona::{DEFAULT_PACING, DEFAULT_ROUNDS, DebateConfig, Settings};

const MISSING_API_KEY: &str = "No API key is configured.

Set DEBATE_API_KEY (or OPENAI_API_KEY) to the key for your
OpenAI compatible API before starting a debate, for example:

    export DEBATE_API_KEY=\"your-api-key\"

When using a local model server that doesn't check keys, set it
to any non-empty value.";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub api_hostname: String,
    pub api_key: String,
    pub default_model: String,
    pub max_rounds: usize,
    pub pacing: Duration,
    pub request_timeout: Duration,
}

impl AppConfig {
    /// Reads the config from environment variables. A missing API
    /// key is an error since no debate can run without one.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_key = var("DEBATE_API_KEY")
            .or_else(|| var("OPENAI_API_KEY"))
            .ok_or(anyhow!(MISSING_API_KEY))?;
        let api_hostname =
            var("DEBATE_LLM_HOST").unwrap_or_else(|| "https://api.openai.com".to_string());
        let default_model =
            var("DEBATE_DEFAULT_MODEL").unwrap_or_else(|| "gpt-4.1-mini".to_string());
        let max_rounds = match var("DEBATE_MAX_ROUNDS") {
            Some(v) => v
                .trim()
                .parse::<usize>()
                .with_context(|| format!("Invalid DEBATE_MAX_ROUNDS: {}", v))?,
            None => DEFAULT_ROUNDS,
        };
        let pacing = match var("DEBATE_PACING_MS") {
            Some(v) => Duration::from_millis(
                v.trim()
                    .parse::<u64>()
                    .with_context(|| format!("Invalid DEBATE_PACING_MS: {}", v))?,
            ),
            None => DEFAULT_PACING,
        };
        let request_timeout = match var("DEBATE_REQUEST_TIMEOUT_SECS") {
            Some(v) => Duration::from_secs(
                v.trim()
                    .parse::<u64>()
                    .with_context(|| format!("Invalid DEBATE_REQUEST_TIMEOUT_SECS: {}", v))?,
            ),
            None => Duration::from_secs(60),
        };

        let config = Self {
            api_hostname,
            api_key,
            default_model,
            max_rounds,
            pacing,
            request_timeout,
        };
        // Surface an out of range round count at startup
        config.debate_config()?;

        Ok(config)
    }

    pub fn debate_config(&self) -> Result<DebateConfig> {
        DebateConfig::new(self.max_rounds, self.pacing)
    }

    /// Default personas and round settings for a new process.
    pub fn settings(&self) -> Result<Settings> {
        Ok(Settings::new(&self.default_model, self.debate_config()?))
    }
}
