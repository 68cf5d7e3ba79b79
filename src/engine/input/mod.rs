// Input handling system
//
// Turns per-tick input samples into the token chain the action state machine
// reads gestures from.
//
// ## Architecture
//
// - `token`: directional (numpad) and button tokens
// - `buffer`: the time-windowed input chain and gesture lookups
// - `sample`: per-tick samples and held-state to edge conversion
//
// ## Usage Example
//
// ```rust
// use rusted_action::engine::input::{DirectionalToken, Gesture, InputBuffer};
// use rusted_action::engine::game_loop::FIXED_TIMESTEP_DURATION;
// use glam::Vec2;
//
// let mut buffer = InputBuffer::default();
//
// // Once per tick, before recording input
// buffer.advance(FIXED_TIMESTEP_DURATION);
// buffer.record_direction(DirectionalToken::from_input(Vec2::X, 1.0));
//
// if buffer.detect(Gesture::DashForward) {
//     // Forward was tapped twice
// }
// ```

pub mod buffer;
pub mod sample;
pub mod token;

// Re-export commonly used types
pub use buffer::{BufferConfig, ChainEntry, Gesture, InputBuffer};
pub use sample::{HeldInput, InputSample, InputSampler};
pub use token::{Button, DirectionalToken, InputToken};
