// Hit messages passed from attackers to defenders

use glam::Vec2;

use crate::engine::physics::Bounds;
use crate::game::characters::CharacterId;

/// A resolved hit waiting to be applied to its defender
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitEvent {
    pub attacker: CharacterId,
    pub defender: CharacterId,
    pub damage: f32,
    /// Hitstun in ticks
    pub hitstun: u32,
    /// World-space knockback, already turned to the attacker's facing
    pub knockback: Vec2,
}

impl HitEvent {
    /// Knockback length, handed to the defender as a magnitude
    pub fn knockback_magnitude(&self) -> f32 {
        self.knockback.length()
    }

    /// Knockback direction in radians from +X
    pub fn knockback_angle(&self) -> f32 {
        self.knockback.y.atan2(self.knockback.x)
    }
}

/// Hits collected during the hit-test phase, applied in insertion order
#[derive(Debug, Default)]
pub struct HitQueue {
    events: Vec<HitEvent>,
}

impl HitQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: HitEvent) {
        self.events.push(event);
    }

    /// Take every queued hit, oldest first
    pub fn drain(&mut self) -> std::vec::Drain<'_, HitEvent> {
        self.events.drain(..)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// What the hit test needs to know about a potential defender
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitTarget {
    pub id: CharacterId,
    pub bounds: Bounds,
    pub invincible: bool,
}

/// Read-only view of a character's combat standing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActorCombatState {
    pub health: f32,
    pub max_health: f32,
    pub invincible: bool,
    pub hitstun_remaining: u32,
}

impl ActorCombatState {
    pub fn is_knocked_out(&self) -> bool {
        self.health <= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn hit(defender: CharacterId, knockback: Vec2) -> HitEvent {
        HitEvent {
            attacker: 0,
            defender,
            damage: 100.0,
            hitstun: 5,
            knockback,
        }
    }

    #[test]
    fn test_knockback_polar_form() {
        let event = hit(1, Vec2::new(-2.0, 0.0));
        assert_relative_eq!(event.knockback_magnitude(), 2.0);
        assert_relative_eq!(event.knockback_angle(), std::f32::consts::PI);

        let event = hit(1, Vec2::new(2.0, 1.0));
        assert_relative_eq!(event.knockback_magnitude(), 5.0_f32.sqrt());
        let rebuilt = Vec2::new(event.knockback_angle().cos(), event.knockback_angle().sin())
            * event.knockback_magnitude();
        assert_relative_eq!(rebuilt.x, 2.0, epsilon = 1e-5);
        assert_relative_eq!(rebuilt.y, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_queue_drains_in_order() {
        let mut queue = HitQueue::new();
        queue.push(hit(2, Vec2::X));
        queue.push(hit(1, Vec2::X));
        assert_eq!(queue.len(), 2);

        let order: Vec<_> = queue.drain().map(|e| e.defender).collect();
        assert_eq!(order, vec![2, 1]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_knocked_out() {
        let state = ActorCombatState {
            health: 0.0,
            max_health: 5000.0,
            invincible: false,
            hitstun_remaining: 0,
        };
        assert!(state.is_knocked_out());
    }
}
