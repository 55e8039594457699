//! Decides whose turn it is and what part of the transcript the next
//! speaker gets to see.
use super::models::{Slot, Transcript, Turn};

/// Number of most recent turns handed to the model.
pub const CONTEXT_WINDOW: usize = 6;

/// Counts the assistant turns at or after `round_start_index`.
pub fn assistant_turns_since(transcript: &Transcript, round_start_index: usize) -> usize {
    transcript
        .turns()
        .get(round_start_index..)
        .map(|turns| turns.iter().filter(|t| t.is_assistant()).count())
        .unwrap_or(0)
}

/// Returns the next persona to speak or `None` when the round budget
/// of `max_rounds` exchanges has been used up. A always opens a round.
pub fn next_speaker(
    transcript: &Transcript,
    round_start_index: usize,
    max_rounds: usize,
) -> Option<Slot> {
    let turns_since_start = assistant_turns_since(transcript, round_start_index);
    if turns_since_start >= max_rounds.saturating_mul(2) {
        return None;
    }
    if turns_since_start % 2 == 0 {
        Some(Slot::A)
    } else {
        Some(Slot::B)
    }
}

/// The last `window` turns in their original order.
pub fn build_context(transcript: &Transcript, window: usize) -> &[Turn] {
    let turns = transcript.turns();
    &turns[turns.len().saturating_sub(window)..]
}

/// Renders a context window as `"{speaker}: {content}"` lines.
pub fn render_context(context: &[Turn]) -> Vec<String> {
    context.iter().map(Turn::render).collect()
}
