//! Companion pet: state machine, speech lines and effect execution.

mod effects;
mod engine;
pub mod lines;
mod state;

pub use effects::{
    Effect, EffectRunner, NoopNotifier, NotificationPermission, Notifier, SpeechSlot, SpeechTimer,
};
pub use engine::{PetMoodEngine, Transition};
pub use state::{PetPolicy, PetSnapshot, PetState, PetStatus};
