// Physics seam: the collision backend the action core drives
//
// Characters only need a grounded query, world bounds and a move primitive.
// `StageBody` is a small reference backend for tests and the demo.

pub mod body;
mod collision;
mod world;

pub use body::{KinematicBody, StageBody};
pub use collision::Bounds;
pub use world::Stage;
