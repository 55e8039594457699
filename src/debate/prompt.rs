//! Prompt templates using Handlebars. Strict mode makes a missing
//! field an error instead of silently rendering an empty string.

use std::fmt;

use anyhow::Result;
use handlebars::Handlebars;
use serde::Serialize;

#[derive(Debug)]
pub enum Prompt {
    DebateTurn,
}

impl fmt::Display for Prompt {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

const DEBATE_TURN_PROMPT: &str = r"Discussion so far:
{{#each context}}{{this}}
{{/each}}

From your own position, respond to your opponent's previous statement (or the topic) with a short, concise rebuttal or opinion of about 150 characters.
Previous statement: {{last_utterance}}
";

#[derive(Serialize)]
pub struct DebateTurnArgs<'a> {
    pub context: Vec<String>,
    pub last_utterance: &'a str,
}

pub fn templates<'a>() -> Handlebars<'a> {
    let mut registry = Handlebars::new();
    registry.set_strict_mode(true);
    // Prompts are plain text so HTML escaping would mangle quotes
    registry.register_escape_fn(handlebars::no_escape);
    registry
        .register_template_string(&Prompt::DebateTurn.to_string(), DEBATE_TURN_PROMPT)
        .expect("Failed to register template");
    registry
}

pub fn render_debate_turn(
    templates: &Handlebars,
    context: Vec<String>,
    last_utterance: &str,
) -> Result<String> {
    let args = DebateTurnArgs {
        context,
        last_utterance,
    };
    let prompt = templates.render(&Prompt::DebateTurn.to_string(), &args)?;
    Ok(prompt)
}
