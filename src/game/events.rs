// Events generated during a tick, for rendering, audio and logging

use super::characters::{ActionState, CharacterId, Maneuver};
use super::combat::HitEvent;

/// Fire-and-forget signal emitted by the simulation
#[derive(Debug, Clone, PartialEq)]
pub enum CharacterEvent {
    /// The character's action state changed
    StateChanged {
        id: CharacterId,
        from: ActionState,
        to: ActionState,
    },

    /// Jump, roll, airdash, landing and similar one-off moves
    Maneuver { id: CharacterId, maneuver: Maneuver },

    AttackStarted { id: CharacterId, attack: String },

    /// A hitbox of the running attack became active
    HitboxActivated { id: CharacterId, hitbox: usize },

    /// The attack finished, or was cut short by hitstun
    AttackEnded { id: CharacterId, interrupted: bool },

    /// A hit was applied to its defender
    Hit(HitEvent),

    /// Health reached zero
    KnockedOut { id: CharacterId },
}

impl CharacterEvent {
    /// The character this event is about
    pub fn subject(&self) -> CharacterId {
        match self {
            Self::StateChanged { id, .. }
            | Self::Maneuver { id, .. }
            | Self::AttackStarted { id, .. }
            | Self::HitboxActivated { id, .. }
            | Self::AttackEnded { id, .. }
            | Self::KnockedOut { id } => *id,
            Self::Hit(hit) => hit.defender,
        }
    }
}

/// Everything that happened during one simulation tick
#[derive(Debug, Clone, Default)]
pub struct TickReport {
    pub tick: u64,
    pub events: Vec<CharacterEvent>,
}

impl TickReport {
    pub fn hits(&self) -> impl Iterator<Item = &HitEvent> {
        self.events.iter().filter_map(|e| match e {
            CharacterEvent::Hit(hit) => Some(hit),
            _ => None,
        })
    }
}
