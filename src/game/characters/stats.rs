// Character stats - tuning supplied when a character is spawned
//
// Speeds and accelerations are in world units per tick, durations in ticks,
// except `smooth_time` (seconds) and the input buffer window (simulation time).

use glam::Vec2;

use crate::core::{require_positive, ConfigError};
use crate::engine::input::buffer::{BufferConfig, DEFAULT_BUFFER_LENGTH, DEFAULT_BUFFER_TIME};

/// Per-character locomotion, combat and input tuning
#[derive(Debug, Clone, PartialEq)]
pub struct CharacterStats {
    // Movement
    /// Downward acceleration while airborne (units/tick²)
    pub gravity: f32,
    /// Maximum fall speed (units/tick, positive)
    pub terminal_velocity: f32,
    /// Top running speed (units/tick)
    pub speed: f32,
    /// Time the run takes to settle on its target speed (seconds)
    pub smooth_time: f32,
    /// Upward velocity of a neutral jump
    pub jump_power: f32,
    /// Upward velocity of an up-jump
    pub high_jump_power: f32,
    /// Horizontal burst of the airdash
    pub air_dash_speed: f32,

    // Roll
    /// Horizontal speed held for the whole roll
    pub roll_speed: f32,
    /// Length of the roll, invincible throughout (ticks)
    pub roll_time: u32,
    /// Non-cancelable recovery after the roll; 0 disables it (ticks)
    pub roll_recovery_time: u32,

    // Combat
    /// Starting and maximum health
    pub max_health: f32,

    // Dimensions (for the collision body)
    /// Character width in world units
    pub width: f32,
    /// Character height in world units
    pub height: f32,

    // Input
    pub buffer: BufferConfig,
}

/// Default tuning, balanced for a 2-unit tall character at 60 ticks per second
pub const BASE_STATS: CharacterStats = CharacterStats {
    // Movement
    gravity: 0.013,
    terminal_velocity: 0.28,
    speed: 0.12,
    smooth_time: 0.08,
    jump_power: 0.22,
    high_jump_power: 0.3,
    air_dash_speed: 0.3,

    // Roll
    roll_speed: 0.18,
    roll_time: 20,
    roll_recovery_time: 6,

    // Combat
    max_health: 5000.0,

    // Dimensions
    width: 1.0,
    height: 2.0,

    buffer: BufferConfig {
        buffer_time: DEFAULT_BUFFER_TIME,
        buffer_length: DEFAULT_BUFFER_LENGTH,
    },
};

impl Default for CharacterStats {
    fn default() -> Self {
        BASE_STATS
    }
}

impl CharacterStats {
    /// Collision body size
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Check every value is in range. Called once at spawn; nothing is
    /// re-validated while ticking.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_positive("gravity", self.gravity)?;
        require_positive("terminal_velocity", self.terminal_velocity)?;
        require_positive("speed", self.speed)?;
        require_positive("smooth_time", self.smooth_time)?;
        require_positive("jump_power", self.jump_power)?;
        require_positive("high_jump_power", self.high_jump_power)?;
        require_positive("air_dash_speed", self.air_dash_speed)?;
        require_positive("roll_speed", self.roll_speed)?;
        require_positive("max_health", self.max_health)?;
        require_positive("width", self.width)?;
        require_positive("height", self.height)?;

        if self.roll_time == 0 {
            return Err(ConfigError::ZeroDuration("roll_time"));
        }

        self.buffer.validate()
    }
}
