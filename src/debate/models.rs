//! The core models for keeping track of a debate between two personas.
use std::fmt;

/// Speaker name used for turns written by the human watching the
/// debate.
pub const OBSERVER: &str = "observer";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnRole {
    User,
    Assistant,
}

/// One utterance in the debate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Turn {
    role: TurnRole,
    speaker_name: String,
    content: String,
}

impl Turn {
    pub fn new(role: TurnRole, speaker_name: &str, content: &str) -> Self {
        Self {
            role,
            speaker_name: speaker_name.to_string(),
            content: content.to_string(),
        }
    }

    pub fn observer(content: &str) -> Self {
        Self::new(TurnRole::User, OBSERVER, content)
    }

    pub fn assistant(speaker_name: &str, content: &str) -> Self {
        Self::new(TurnRole::Assistant, speaker_name, content)
    }

    pub fn role(&self) -> TurnRole {
        self.role
    }

    pub fn speaker_name(&self) -> &str {
        &self.speaker_name
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn is_assistant(&self) -> bool {
        self.role == TurnRole::Assistant
    }

    /// Renders the turn the way it is shown to the model as context.
    pub fn render(&self) -> String {
        format!("{}: {}", self.speaker_name, self.content)
    }
}

/// Append-only list of turns for a single debate. The only other
/// mutation allowed is clearing it when a new topic starts.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Transcript(Vec<Turn>);

impl Transcript {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, turn: Turn) {
        self.0.push(turn)
    }

    pub fn clear(&mut self) {
        self.0.clear()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn last(&self) -> Option<&Turn> {
        self.0.last()
    }

    pub fn turns(&self) -> &[Turn] {
        &self.0
    }
}

/// Which of the two configured personas is speaking.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Slot {
    A,
    B,
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Slot::A => write!(f, "A"),
            Slot::B => write!(f, "B"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turn_render() {
        let turn = Turn::assistant("Logician", "Define your terms.");
        assert_eq!(turn.render(), "Logician: Define your terms.");
    }

    #[test]
    fn test_observer_turn() {
        let turn = Turn::observer("Topic: free will");
        assert_eq!(turn.role(), TurnRole::User);
        assert_eq!(turn.speaker_name(), OBSERVER);
        assert!(!turn.is_assistant());
    }

    #[test]
    fn test_transcript_push_and_clear() {
        let mut transcript = Transcript::new();
        assert!(transcript.is_empty());

        transcript.push(Turn::observer("Topic: X"));
        transcript.push(Turn::assistant("Elder", "Let go."));
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript.last().unwrap().content(), "Let go.");

        transcript.clear();
        assert!(transcript.is_empty());
        assert!(transcript.last().is_none());
    }

    #[test]
    fn test_slot_display() {
        assert_eq!(Slot::A.to_string(), "A");
        assert_eq!(Slot::B.to_string(), "B");
    }
}
