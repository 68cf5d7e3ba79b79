// Engine modules: fixed-step timing, input, physics seam

pub mod game_loop;
pub mod input;
pub mod physics;
