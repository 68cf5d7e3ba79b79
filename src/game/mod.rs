// Game layer: characters, combat and the events they emit

pub mod characters;
pub mod combat;
pub mod events;

pub use events::{CharacterEvent, TickReport};
