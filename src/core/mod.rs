// Core utilities shared by the engine and game layers

pub mod math;

/// Configuration rejected when a character or attack is built
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{field} must be positive, got {value}")]
    NonPositive { field: &'static str, value: f32 },

    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: f32 },

    #[error("{0} must last at least one tick")]
    ZeroDuration(&'static str),

    #[error("hitbox activates on frame {frame} but the attack only lasts {length} frames")]
    HitboxOutOfRange { frame: u32, length: u32 },
}

/// Reject zero, negative and NaN values
pub(crate) fn require_positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}
