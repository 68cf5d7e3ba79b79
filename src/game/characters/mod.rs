// Character system
//
// This module contains everything related to playable characters:
// - Character data structure and the manager running the tick
// - Character stats and tuning
// - Action state machine driving movement and moves

pub mod character;
pub mod state;
pub mod stats;

// Re-export commonly used types
pub use character::{Character, CharacterId, CharacterManager};
pub use state::{ActionState, ActionStateMachine, ControlState, Maneuver, StepReport};
pub use stats::{CharacterStats, BASE_STATS};
