//! The debate lifecycle. A `DebateSession` is a plain value owned by
//! whoever drives it: user actions are applied with
//! `DebateSession::apply` and the debate advances one turn per call
//! to `DebateSession::step`.
use uuid::Uuid;

use super::generator::ResponseGenerator;
use super::models::{Slot, Transcript, Turn};
use super::persona::Settings;
use super::scheduler::{CONTEXT_WINDOW, build_context, next_speaker};

/// Substituted for a turn when generating it failed.
pub const SENTINEL: &str = "(thought interrupted)";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LifecycleState {
    Idle,
    Debating,
    Finished,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    /// Start a debate on a new topic
    Start(String),
    /// Stop the debate after the current turn
    Interrupt,
    /// Continue a finished debate with the observer's opinion
    Resume(String),
    /// Throw away the transcript and go back to choosing a topic
    Reset,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// A persona spoke. `failed` is set when the turn is the sentinel.
    Spoke { slot: Slot, turn: Turn, failed: bool },
    /// The round budget is used up and the session is now finished.
    Finished,
    /// Nothing to do because the session isn't debating.
    Idle,
}

#[derive(Clone, Debug)]
pub struct DebateSession {
    id: Uuid,
    state: LifecycleState,
    transcript: Transcript,
    topic: Option<String>,
    round_start_index: usize,
}

impl Default for DebateSession {
    fn default() -> Self {
        Self::new()
    }
}

impl DebateSession {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            state: LifecycleState::Idle,
            transcript: Transcript::new(),
            topic: None,
            round_start_index: 0,
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn is_debating(&self) -> bool {
        self.state == LifecycleState::Debating
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn topic(&self) -> Option<&str> {
        self.topic.as_deref()
    }

    pub fn round_start_index(&self) -> usize {
        self.round_start_index
    }

    /// Topics and settings can only change while no turn is being
    /// generated.
    pub fn can_edit(&self) -> bool {
        !self.is_debating()
    }

    pub fn next_speaker(&self, settings: &Settings) -> Option<Slot> {
        next_speaker(
            &self.transcript,
            self.round_start_index,
            settings.debate.max_rounds(),
        )
    }

    /// Applies a user action and returns the resulting session.
    /// Actions that don't make sense in the current state, or that
    /// carry empty text, leave the session unchanged.
    pub fn apply(self, action: Action, settings: &Settings) -> Self {
        match action {
            Action::Start(topic) => self.start(&topic, settings),
            Action::Interrupt => self.interrupt(),
            Action::Resume(opinion) => self.resume(&opinion, settings),
            Action::Reset => self.reset(),
        }
    }

    fn start(mut self, topic: &str, settings: &Settings) -> Self {
        let topic = topic.trim();
        if self.state != LifecycleState::Idle || topic.is_empty() {
            return self;
        }
        if !settings.is_ready() {
            tracing::warn!("Both personas need a name, prompt, and model to start a debate");
            return self;
        }

        self.transcript.clear();
        self.transcript.push(Turn::observer(&format!("Topic: {}", topic)));
        self.topic = Some(topic.to_string());
        self.round_start_index = 0;
        self.state = LifecycleState::Debating;
        tracing::info!("Debate {} started on topic: {}", self.id, topic);
        self
    }

    fn interrupt(mut self) -> Self {
        if self.state == LifecycleState::Debating {
            self.state = LifecycleState::Finished;
            tracing::info!(
                "Debate {} interrupted after {} turns",
                self.id,
                self.transcript.len()
            );
        }
        self
    }

    fn resume(mut self, opinion: &str, settings: &Settings) -> Self {
        let opinion = opinion.trim();
        if self.state != LifecycleState::Finished || opinion.is_empty() {
            return self;
        }
        if !settings.is_ready() {
            tracing::warn!("Both personas need a name, prompt, and model to resume a debate");
            return self;
        }

        self.transcript.push(Turn::observer(opinion));
        self.round_start_index = self.transcript.len() - 1;
        self.state = LifecycleState::Debating;
        tracing::info!(
            "Debate {} resumed at turn {}",
            self.id,
            self.round_start_index
        );
        self
    }

    fn reset(mut self) -> Self {
        self.transcript.clear();
        self.topic = None;
        self.round_start_index = 0;
        self.state = LifecycleState::Idle;
        tracing::debug!("Debate {} reset", self.id);
        self
    }

    /// Generates the next turn, or finishes the session when the
    /// round is complete. Generation errors never escape: the
    /// sentinel is recorded in place of the turn so the round keeps
    /// moving.
    pub async fn step<G>(&mut self, settings: &Settings, generator: &G) -> StepOutcome
    where
        G: ResponseGenerator + ?Sized,
    {
        if self.state != LifecycleState::Debating {
            return StepOutcome::Idle;
        }

        let Some(slot) = self.next_speaker(settings) else {
            self.state = LifecycleState::Finished;
            tracing::info!("Debate {} finished", self.id);
            return StepOutcome::Finished;
        };
        let Some(last_turn) = self.transcript.last() else {
            // Start and resume always seed the transcript
            tracing::warn!("Debate {} has no turns to respond to", self.id);
            self.state = LifecycleState::Finished;
            return StepOutcome::Finished;
        };

        let persona = settings.persona(slot);
        let pacing = settings.debate.pacing;
        if !pacing.is_zero() {
            tokio::time::sleep(pacing).await;
        }

        let context = build_context(&self.transcript, CONTEXT_WINDOW);
        let result = generator
            .generate(persona, context, last_turn.content())
            .await;

        let (content, failed) = match result {
            Ok(content) => (content, false),
            Err(e) => {
                tracing::error!("Generating turn for {} failed: {}", persona.name, e);
                (SENTINEL.to_string(), true)
            }
        };

        let turn = Turn::assistant(&persona.name, &content);
        self.transcript.push(turn.clone());
        tracing::debug!("Debate {} turn {}: {}", self.id, self.transcript.len(), slot);

        StepOutcome::Spoke { slot, turn, failed }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::time::Duration;

    use anyhow::{Error, Result, anyhow};
    use async_trait::async_trait;

    use super::*;
    use crate::debate::models::{OBSERVER, TurnRole};
    use crate::debate::persona::{DebateConfig, PersonaConfig};

    /// Answers with "<name> #<n>" and fails on the listed call numbers.
    struct CountingGenerator {
        calls: Mutex<usize>,
        fail_on: Vec<usize>,
    }

    impl CountingGenerator {
        fn new(fail_on: Vec<usize>) -> Self {
            Self {
                calls: Mutex::new(0),
                fail_on,
            }
        }

        fn calls(&self) -> usize {
            *self.calls.lock().unwrap()
        }
    }

    #[async_trait]
    impl ResponseGenerator for CountingGenerator {
        async fn generate(
            &self,
            persona: &PersonaConfig,
            _context: &[Turn],
            _last_utterance: &str,
        ) -> Result<String, Error> {
            let call = {
                let mut calls = self.calls.lock().unwrap();
                *calls += 1;
                *calls
            };
            if self.fail_on.contains(&call) {
                return Err(anyhow!("quota exceeded"));
            }
            Ok(format!("{} #{}", persona.name, call))
        }
    }

    fn settings(max_rounds: usize) -> Settings {
        Settings::new(
            "gpt-4.1-mini",
            DebateConfig::new(max_rounds, Duration::ZERO).unwrap(),
        )
    }

    #[test]
    fn test_new_session_is_idle() {
        let session = DebateSession::new();
        assert_eq!(session.state(), LifecycleState::Idle);
        assert!(session.transcript().is_empty());
        assert!(session.topic().is_none());
        assert!(session.can_edit());
    }

    #[test]
    fn test_start_seeds_transcript() {
        let session = DebateSession::new().apply(Action::Start("X".to_string()), &settings(1));

        assert_eq!(session.state(), LifecycleState::Debating);
        assert_eq!(session.topic(), Some("X"));
        assert_eq!(session.round_start_index(), 0);
        assert!(!session.can_edit());

        let turns = session.transcript().turns();
        assert_eq!(turns.len(), 1);
        assert_eq!(turns[0].role(), TurnRole::User);
        assert_eq!(turns[0].speaker_name(), OBSERVER);
        assert_eq!(turns[0].content(), "Topic: X");
    }

    #[test]
    fn test_start_ignores_empty_topic() {
        let session = DebateSession::new().apply(Action::Start("   ".to_string()), &settings(1));
        assert_eq!(session.state(), LifecycleState::Idle);
        assert!(session.transcript().is_empty());
    }

    #[test]
    fn test_start_requires_complete_personas() {
        let mut settings = settings(1);
        settings.set_system_prompt(Slot::B, "");
        let session = DebateSession::new().apply(Action::Start("X".to_string()), &settings);
        assert_eq!(session.state(), LifecycleState::Idle);
    }

    #[test]
    fn test_start_while_debating_is_ignored() {
        let settings = settings(1);
        let session = DebateSession::new()
            .apply(Action::Start("X".to_string()), &settings)
            .apply(Action::Start("Y".to_string()), &settings);
        assert_eq!(session.topic(), Some("X"));
        assert_eq!(session.transcript().len(), 1);
    }

    #[test]
    fn test_interrupt_only_when_debating() {
        let settings = settings(1);
        let idle = DebateSession::new().apply(Action::Interrupt, &settings);
        assert_eq!(idle.state(), LifecycleState::Idle);

        let finished = DebateSession::new()
            .apply(Action::Start("X".to_string()), &settings)
            .apply(Action::Interrupt, &settings);
        assert_eq!(finished.state(), LifecycleState::Finished);
        assert_eq!(finished.transcript().len(), 1);
    }

    #[test]
    fn test_resume_requires_finished_and_opinion() {
        let settings = settings(1);
        let debating = DebateSession::new().apply(Action::Start("X".to_string()), &settings);

        let still_debating = debating.apply(Action::Resume("Hmm".to_string()), &settings);
        assert_eq!(still_debating.transcript().len(), 1);

        let finished = still_debating.apply(Action::Interrupt, &settings);
        let unchanged = finished.apply(Action::Resume("".to_string()), &settings);
        assert_eq!(unchanged.state(), LifecycleState::Finished);
        assert_eq!(unchanged.transcript().len(), 1);

        let resumed = unchanged.apply(Action::Resume("But why?".to_string()), &settings);
        assert_eq!(resumed.state(), LifecycleState::Debating);
        assert_eq!(resumed.round_start_index(), 1);
        assert_eq!(resumed.transcript().last().unwrap().content(), "But why?");
        assert_eq!(resumed.transcript().last().unwrap().speaker_name(), OBSERVER);
    }

    #[test]
    fn test_resume_requires_complete_personas() {
        let mut settings = settings(1);
        let finished = DebateSession::new()
            .apply(Action::Start("X".to_string()), &settings)
            .apply(Action::Interrupt, &settings);

        settings.set_system_prompt(Slot::B, "");
        let unchanged = finished.apply(Action::Resume("my opinion".to_string()), &settings);
        assert_eq!(unchanged.state(), LifecycleState::Finished);
        assert_eq!(unchanged.transcript().len(), 1);
    }

    #[test]
    fn test_reset_from_any_state() {
        let settings = settings(1);
        let sessions = vec![
            DebateSession::new(),
            DebateSession::new().apply(Action::Start("X".to_string()), &settings),
            DebateSession::new()
                .apply(Action::Start("X".to_string()), &settings)
                .apply(Action::Interrupt, &settings),
        ];

        for session in sessions {
            let session = session.apply(Action::Reset, &settings);
            assert_eq!(session.state(), LifecycleState::Idle);
            assert!(session.transcript().is_empty());
            assert!(session.topic().is_none());
            assert_eq!(session.round_start_index(), 0);
        }
    }

    #[tokio::test]
    async fn test_step_when_idle_does_nothing() {
        let generator = CountingGenerator::new(vec![]);
        let mut session = DebateSession::new();
        let outcome = session.step(&settings(1), &generator).await;
        assert_eq!(outcome, StepOutcome::Idle);
        assert_eq!(generator.calls(), 0);
    }

    #[tokio::test]
    async fn test_step_runs_one_round() {
        let settings = settings(1);
        let generator = CountingGenerator::new(vec![]);
        let mut session = DebateSession::new().apply(Action::Start("X".to_string()), &settings);

        let first = session.step(&settings, &generator).await;
        assert_eq!(
            first,
            StepOutcome::Spoke {
                slot: Slot::A,
                turn: Turn::assistant("Logician", "Logician #1"),
                failed: false,
            }
        );

        let second = session.step(&settings, &generator).await;
        assert!(matches!(second, StepOutcome::Spoke { slot: Slot::B, .. }));
        assert_eq!(session.state(), LifecycleState::Debating);

        let third = session.step(&settings, &generator).await;
        assert_eq!(third, StepOutcome::Finished);
        assert_eq!(session.state(), LifecycleState::Finished);
        assert_eq!(generator.calls(), 2);
    }

    #[tokio::test]
    async fn test_step_records_sentinel_on_failure() {
        let settings = settings(1);
        let generator = CountingGenerator::new(vec![1]);
        let mut session = DebateSession::new().apply(Action::Start("X".to_string()), &settings);

        let outcome = session.step(&settings, &generator).await;
        match outcome {
            StepOutcome::Spoke { slot, turn, failed } => {
                assert_eq!(slot, Slot::A);
                assert!(failed);
                assert_eq!(turn.content(), SENTINEL);
                assert_eq!(turn.speaker_name(), "Logician");
            }
            other => panic!("Expected a turn, got {:?}", other),
        }

        // The failed turn still counts so B is next
        assert_eq!(session.next_speaker(&settings), Some(Slot::B));
    }

    #[tokio::test]
    async fn test_lowering_rounds_mid_debate_finishes() {
        let mut settings = settings(3);
        let generator = CountingGenerator::new(vec![]);
        let mut session = DebateSession::new().apply(Action::Start("X".to_string()), &settings);
        session.step(&settings, &generator).await;
        session.step(&settings, &generator).await;

        settings.debate.set_max_rounds(1).unwrap();
        assert_eq!(session.step(&settings, &generator).await, StepOutcome::Finished);
    }

    /// Records the paused clock at every call.
    struct ClockGenerator {
        called_at: Mutex<Vec<tokio::time::Instant>>,
    }

    #[async_trait]
    impl ResponseGenerator for ClockGenerator {
        async fn generate(
            &self,
            persona: &PersonaConfig,
            _context: &[Turn],
            _last_utterance: &str,
        ) -> Result<String, Error> {
            self.called_at
                .lock()
                .unwrap()
                .push(tokio::time::Instant::now());
            Ok(persona.name.clone())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_step_waits_for_pacing_before_generating() {
        let pacing = Duration::from_millis(1500);
        let settings = Settings::new("gpt-4.1-mini", DebateConfig::new(1, pacing).unwrap());
        let generator = ClockGenerator {
            called_at: Mutex::new(Vec::new()),
        };
        let mut session = DebateSession::new().apply(Action::Start("X".to_string()), &settings);

        let started = tokio::time::Instant::now();
        session.step(&settings, &generator).await;
        session.step(&settings, &generator).await;

        let called_at = generator.called_at.lock().unwrap().clone();
        assert_eq!(called_at.len(), 2);
        assert!(called_at[0] - started >= pacing);
        assert!(called_at[1] - called_at[0] >= pacing);

        // Finishing doesn't wait
        let before_finish = tokio::time::Instant::now();
        assert_eq!(session.step(&settings, &generator).await, StepOutcome::Finished);
        assert_eq!(tokio::time::Instant::now(), before_finish);
    }
}
