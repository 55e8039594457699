pub mod generator;
pub mod models;
pub mod persona;
pub mod prompt;
pub mod scheduler;
pub mod session;

pub use generator::{OpenAiGenerator, ResponseGenerator};
pub use models::{Slot, Transcript, Turn, TurnRole};
pub use persona::{DebateConfig, PersonaConfig, Settings};
pub use session::{Action, DebateSession, LifecycleState, SENTINEL, StepOutcome};
