// Attack and hitbox descriptors
//
// Authored once and shared between every execution of the attack. Offsets are
// relative to the attacker's center, with +X pointing the way it faces.

use glam::Vec2;

use crate::core::{require_positive, ConfigError};
use crate::engine::physics::Bounds;

/// One damaging area of an attack
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hitbox {
    center: Vec2,
    size: Vec2,
    activation_frame: u32,
}

impl Hitbox {
    pub fn new(center: Vec2, size: Vec2, activation_frame: u32) -> Result<Self, ConfigError> {
        require_positive("hitbox width", size.x)?;
        require_positive("hitbox height", size.y)?;

        Ok(Self {
            center,
            size,
            activation_frame,
        })
    }

    /// Offset from the attacker's center when facing right
    pub fn center(&self) -> Vec2 {
        self.center
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    /// Ticks after the attack starts at which the hitbox becomes active
    pub fn activation_frame(&self) -> u32 {
        self.activation_frame
    }

    /// World-space rectangle for an attacker at `origin` facing `facing`
    pub fn world_bounds(&self, origin: Vec2, facing: f32) -> Bounds {
        let mirrored = Vec2::new(self.center.x * facing, self.center.y);
        Bounds::from_center_size(mirrored, self.size).translated(origin)
    }
}

/// Immutable attack description
#[derive(Debug, Clone, PartialEq)]
pub struct Attack {
    name: String,
    damage: f32,
    hitstun: u32,
    knockback: Vec2,
    length: u32,
    hitboxes: Vec<Hitbox>,
}

impl Attack {
    pub fn new(
        name: impl Into<String>,
        damage: f32,
        hitstun: u32,
        knockback: Vec2,
        length: u32,
        hitboxes: Vec<Hitbox>,
    ) -> Result<Self, ConfigError> {
        if damage.is_nan() || damage < 0.0 {
            return Err(ConfigError::Negative {
                field: "damage",
                value: damage,
            });
        }
        if length == 0 {
            return Err(ConfigError::ZeroDuration("attack length"));
        }
        if let Some(late) = hitboxes.iter().find(|h| h.activation_frame >= length) {
            return Err(ConfigError::HitboxOutOfRange {
                frame: late.activation_frame,
                length,
            });
        }

        Ok(Self {
            name: name.into(),
            damage,
            hitstun,
            knockback,
            length,
            hitboxes,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn damage(&self) -> f32 {
        self.damage
    }

    /// Hitstun inflicted, in ticks
    pub fn hitstun(&self) -> u32 {
        self.hitstun
    }

    /// Knockback when the attacker faces right
    pub fn knockback(&self) -> Vec2 {
        self.knockback
    }

    /// Total duration in ticks
    pub fn length(&self) -> u32 {
        self.length
    }

    pub fn hitboxes(&self) -> &[Hitbox] {
        &self.hitboxes
    }
}

/// Ready-made attacks
pub mod presets {
    use super::*;

    /// Quick forward strike with a single hitbox
    pub fn jab() -> Result<Attack, ConfigError> {
        Attack::new(
            "jab",
            500.0,
            10,
            Vec2::new(0.15, 0.1),
            30,
            vec![Hitbox::new(Vec2::new(0.9, 0.2), Vec2::new(0.8, 0.6), 5)?],
        )
    }

    /// Two-hit combo: a short poke followed by a wider swing
    pub fn double_strike() -> Result<Attack, ConfigError> {
        Attack::new(
            "double_strike",
            300.0,
            8,
            Vec2::new(0.1, 0.05),
            40,
            vec![
                Hitbox::new(Vec2::new(0.7, 0.2), Vec2::new(0.6, 0.5), 4)?,
                Hitbox::new(Vec2::new(1.0, 0.4), Vec2::new(1.2, 1.0), 18)?,
            ],
        )
    }
}
