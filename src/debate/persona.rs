//! Persona and round configuration. These live for the whole process
//! and are independent of any particular debate.
use std::time::Duration;

use anyhow::{Result, bail};

use super::models::Slot;

pub const MIN_ROUNDS: usize = 1;
pub const MAX_ROUNDS: usize = 10;
pub const DEFAULT_ROUNDS: usize = 3;
pub const DEFAULT_PACING: Duration = Duration::from_secs(1);

/// Known models as (label, model id). Personas can refer to a model
/// by either.
pub const AVAILABLE_MODELS: &[(&str, &str)] = &[
    ("GPT-4.1 mini", "gpt-4.1-mini"),
    ("GPT-4.1", "gpt-4.1"),
    ("GPT-4o mini", "gpt-4o-mini"),
    ("GPT-4o", "gpt-4o"),
];

pub const DEFAULT_NAME_A: &str = "Logician";
pub const DEFAULT_NAME_B: &str = "Elder";

const DEFAULT_PROMPT_A: &str = "You are a cold, rigorous logician.
You set aside emotion and religious notions and argue only from facts, statistics and logical consistency.
Sharply point out your opponent's vague definitions and unscientific claims.
Your tone is assertive and intellectual.";

const DEFAULT_PROMPT_B: &str = "You are a compassionate elder of Theravada Buddhism.
You argue for peace of mind beyond logic, letting go of attachment, impermanence and the ending of suffering (dukkha).
Receive your opponent's aggressive logic gently and guide them toward the truth.
Your tone is calm and composed.";

/// Maps a catalog label to its model id. Anything that isn't a known
/// label is treated as a raw model id.
pub fn resolve_model(label_or_id: &str) -> String {
    let label_or_id = label_or_id.trim();
    AVAILABLE_MODELS
        .iter()
        .find(|(label, _)| label.eq_ignore_ascii_case(label_or_id))
        .map(|(_, id)| id.to_string())
        .unwrap_or_else(|| label_or_id.to_string())
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PersonaConfig {
    pub name: String,
    pub system_prompt: String,
    pub model_id: String,
}

impl PersonaConfig {
    pub fn new(name: &str, system_prompt: &str, model_id: &str) -> Self {
        Self {
            name: name.to_string(),
            system_prompt: system_prompt.to_string(),
            model_id: model_id.to_string(),
        }
    }

    /// The built-in persona for a slot.
    pub fn default_for(slot: Slot, model_id: &str) -> Self {
        match slot {
            Slot::A => Self::new(DEFAULT_NAME_A, DEFAULT_PROMPT_A, model_id),
            Slot::B => Self::new(DEFAULT_NAME_B, DEFAULT_PROMPT_B, model_id),
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.name.trim().is_empty()
            && !self.system_prompt.trim().is_empty()
            && !self.model_id.trim().is_empty()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DebateConfig {
    max_rounds: usize,
    /// Delay before each generation call
    pub pacing: Duration,
}

impl DebateConfig {
    pub fn new(max_rounds: usize, pacing: Duration) -> Result<Self> {
        let mut config = Self {
            max_rounds: DEFAULT_ROUNDS,
            pacing,
        };
        config.set_max_rounds(max_rounds)?;
        Ok(config)
    }

    pub fn max_rounds(&self) -> usize {
        self.max_rounds
    }

    /// Number of assistant turns in a full round.
    pub fn max_turns(&self) -> usize {
        self.max_rounds.saturating_mul(2)
    }

    pub fn set_max_rounds(&mut self, max_rounds: usize) -> Result<()> {
        if !(MIN_ROUNDS..=MAX_ROUNDS).contains(&max_rounds) {
            bail!(
                "Rounds must be between {} and {}, got {}",
                MIN_ROUNDS,
                MAX_ROUNDS,
                max_rounds
            );
        }
        self.max_rounds = max_rounds;
        Ok(())
    }
}

impl Default for DebateConfig {
    fn default() -> Self {
        Self {
            max_rounds: DEFAULT_ROUNDS,
            pacing: DEFAULT_PACING,
        }
    }
}

/// Everything a user can edit between debates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    persona_a: PersonaConfig,
    persona_b: PersonaConfig,
    pub debate: DebateConfig,
    default_model: String,
}

impl Settings {
    pub fn new(default_model: &str, debate: DebateConfig) -> Self {
        Self {
            persona_a: PersonaConfig::default_for(Slot::A, default_model),
            persona_b: PersonaConfig::default_for(Slot::B, default_model),
            debate,
            default_model: default_model.to_string(),
        }
    }

    pub fn persona(&self, slot: Slot) -> &PersonaConfig {
        match slot {
            Slot::A => &self.persona_a,
            Slot::B => &self.persona_b,
        }
    }

    fn persona_mut(&mut self, slot: Slot) -> &mut PersonaConfig {
        match slot {
            Slot::A => &mut self.persona_a,
            Slot::B => &mut self.persona_b,
        }
    }

    pub fn set_persona(&mut self, slot: Slot, persona: PersonaConfig) {
        *self.persona_mut(slot) = persona;
    }

    pub fn set_name(&mut self, slot: Slot, name: &str) {
        self.persona_mut(slot).name = name.trim().to_string();
    }

    pub fn set_system_prompt(&mut self, slot: Slot, system_prompt: &str) {
        self.persona_mut(slot).system_prompt = system_prompt.to_string();
    }

    pub fn set_model(&mut self, slot: Slot, label_or_id: &str) {
        self.persona_mut(slot).model_id = resolve_model(label_or_id);
    }

    /// Restores the built-in persona for the slot.
    pub fn reset_persona(&mut self, slot: Slot) {
        let persona = PersonaConfig::default_for(slot, &self.default_model);
        self.set_persona(slot, persona);
    }

    /// Both personas need a name, prompt, and model before a debate
    /// can start.
    pub fn is_ready(&self) -> bool {
        self.persona_a.is_complete() && self.persona_b.is_complete()
    }

    /// A table of the current settings.
    pub fn summary(&self) -> String {
        format!(
            "| Setting | Value |\n\
             |---|---|\n\
             | Rounds | {} ({} utterances) |\n\
             | AI-A | {} ({}) |\n\
             | AI-B | {} ({}) |",
            self.debate.max_rounds(),
            self.debate.max_turns(),
            self.persona_a.name,
            self.persona_a.model_id,
            self.persona_b.name,
            self.persona_b.model_id,
        )
    }
}
