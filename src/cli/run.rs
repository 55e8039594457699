use std::io::Write;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use super::commands::{self, HELP, PersonaField, ReplCommand};
use super::models::write_models;
use crate::core::AppConfig;
use crate::debate::{
    Action, DebateSession, LifecycleState, OpenAiGenerator, ResponseGenerator, Settings, Slot,
    StepOutcome, Turn,
};

enum Flow {
    Continue,
    Quit,
}

fn write_turn(out: &mut impl Write, turn: &Turn) -> Result<()> {
    writeln!(out, "[{}]", turn.speaker_name())?;
    writeln!(out, "{}\n", turn.content())?;
    Ok(())
}

fn write_persona(out: &mut impl Write, settings: &Settings, slot: Slot) -> Result<()> {
    let persona = settings.persona(slot);
    writeln!(out, "AI-{}: {} ({})", slot, persona.name, persona.model_id)?;
    writeln!(out, "{}", persona.system_prompt)?;
    Ok(())
}

/// Steps the session until the round is over or `interrupted` is
/// raised. The flag is only checked between turns so a turn that is
/// being generated always completes.
pub async fn drive<G>(
    mut session: DebateSession,
    settings: &Settings,
    generator: &G,
    interrupted: &AtomicBool,
    out: &mut impl Write,
) -> Result<DebateSession>
where
    G: ResponseGenerator + ?Sized,
{
    while session.is_debating() {
        if interrupted.swap(false, Ordering::SeqCst) {
            session = session.apply(Action::Interrupt, settings);
            writeln!(out, "The debate was stopped.")?;
            break;
        }

        if let Some(slot) = session.next_speaker(settings) {
            let persona = settings.persona(slot);
            writeln!(out, "{} is thinking... ({})", persona.name, persona.model_id)?;
            out.flush()?;
        }

        match session.step(settings, generator).await {
            StepOutcome::Spoke { turn, .. } => write_turn(out, &turn)?,
            StepOutcome::Finished => writeln!(out, "The debate has finished.")?,
            StepOutcome::Idle => {}
        }
    }

    Ok(session)
}

/// Applies one line of REPL input while the session is idle or
/// finished.
fn handle_line(
    line: &str,
    session: &mut DebateSession,
    settings: &mut Settings,
    out: &mut impl Write,
) -> Result<Flow> {
    let command = commands::parse(line);

    let is_edit = matches!(
        command,
        ReplCommand::EditPersona { .. } | ReplCommand::ResetPersona(_) | ReplCommand::Rounds(_)
    );
    if is_edit && !session.can_edit() {
        writeln!(out, "Settings can't be changed during a debate.")?;
        return Ok(Flow::Continue);
    }

    match command {
        ReplCommand::Text(text) => {
            let action = match session.state() {
                LifecycleState::Idle => Action::Start(text),
                _ => Action::Resume(text),
            };
            if !settings.is_ready() {
                writeln!(
                    out,
                    "Both personas need a name, prompt, and model. See /persona a and /persona b."
                )?;
            }
            *session = std::mem::take(session).apply(action, settings);
        }
        ReplCommand::ShowPersona(slot) => write_persona(out, settings, slot)?,
        ReplCommand::EditPersona { slot, field, value } => {
            match field {
                PersonaField::Name => settings.set_name(slot, &value),
                PersonaField::Prompt => settings.set_system_prompt(slot, &value),
                PersonaField::Model => settings.set_model(slot, &value),
            }
            let persona = settings.persona(slot);
            writeln!(
                out,
                "Saved \"{}\" (model: {})",
                persona.name, persona.model_id
            )?;
        }
        ReplCommand::ResetPersona(slot) => {
            settings.reset_persona(slot);
            writeln!(out, "Restored the defaults for AI-{}.", slot)?;
        }
        ReplCommand::Rounds(n) => match settings.debate.set_max_rounds(n) {
            Ok(()) => writeln!(
                out,
                "Rounds set to {} ({} utterances).",
                n,
                settings.debate.max_turns()
            )?,
            Err(e) => writeln!(out, "{}", e)?,
        },
        ReplCommand::Settings => writeln!(out, "{}", settings.summary())?,
        ReplCommand::Models => write_models(out)?,
        ReplCommand::New => {
            if session.state() == LifecycleState::Finished {
                *session = std::mem::take(session).apply(Action::Reset, settings);
                writeln!(out, "Enter a new topic.")?;
            }
        }
        ReplCommand::Help => writeln!(out, "{}", HELP)?,
        ReplCommand::Quit => return Ok(Flow::Quit),
        ReplCommand::Empty => {}
        ReplCommand::Invalid(msg) => writeln!(out, "{}", msg)?,
    }

    Ok(Flow::Continue)
}

pub async fn run(config: AppConfig, topic: Option<String>, rounds: Option<usize>) -> Result<()> {
    let mut settings = config.settings()?;
    if let Some(rounds) = rounds {
        settings.debate.set_max_rounds(rounds)?;
    }
    let generator = OpenAiGenerator::new(
        &config.api_hostname,
        &config.api_key,
        config.request_timeout,
    );

    // Ctrl-C while the personas are talking stops the debate after
    // the current turn. At the prompt it's handled by the editor.
    let interrupted = Arc::new(AtomicBool::new(false));
    let flag = interrupted.clone();
    tokio::spawn(async move {
        while tokio::signal::ctrl_c().await.is_ok() {
            flag.store(true, Ordering::SeqCst);
        }
    });

    let mut rl = DefaultEditor::new()?;
    let mut stdout = std::io::stdout();
    let mut session = DebateSession::new();

    writeln!(
        stdout,
        "\"{}\" ({}) vs \"{}\" ({})",
        settings.persona(Slot::A).name,
        settings.persona(Slot::A).model_id,
        settings.persona(Slot::B).name,
        settings.persona(Slot::B).model_id,
    )?;
    writeln!(stdout, "Type /help for commands.\n")?;

    if let Some(topic) = topic {
        session = session.apply(Action::Start(topic), &settings);
    }

    loop {
        if session.is_debating() {
            interrupted.store(false, Ordering::SeqCst);
            for turn in session.transcript().turns()[session.round_start_index()..].iter() {
                write_turn(&mut stdout, turn)?;
            }
            session = drive(session, &settings, &generator, &interrupted, &mut stdout).await?;
            writeln!(
                stdout,
                "Add your opinion to continue the debate, or /new for a new topic."
            )?;
            continue;
        }

        let prompt = match session.state() {
            LifecycleState::Finished => "opinion> ",
            _ => "topic> ",
        };
        match rl.readline(prompt) {
            Ok(line) => {
                rl.add_history_entry(line.as_str())?;
                match handle_line(&line, &mut session, &mut settings, &mut stdout)? {
                    Flow::Continue => {}
                    Flow::Quit => break,
                }
            }
            Err(ReadlineError::Interrupted) => break,
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }

    Ok(())
}
