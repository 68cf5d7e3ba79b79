// Frame-driven action core for a 2D combat platformer

pub mod core;
pub mod engine;
pub mod game;
