// One running instance of an attack

use glam::Vec2;
use std::collections::BTreeSet;
use std::sync::Arc;

use super::attack::Attack;
use super::hit::{HitEvent, HitQueue, HitTarget};
use crate::engine::physics::Bounds;
use crate::game::characters::CharacterId;

/// Result of advancing an execution by one tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionStatus {
    /// Still running; lists hitboxes that became active this tick
    Running { activated: Vec<usize> },
    /// The attack ran its length and every hitbox is gone
    Finished,
}

/// A hitbox that is live, with the opponents it already hit
#[derive(Debug, Clone)]
struct Activation {
    hitbox: usize,
    hit: BTreeSet<CharacterId>,
}

/// Tracks which hitboxes of an attack are live and whom they have hit.
///
/// Created when the owner enters Attacking. Per-activation state lives here
/// so the shared [`Attack`] stays immutable.
#[derive(Debug, Clone)]
pub struct AttackExecution {
    attack: Arc<Attack>,
    started_at: u64,
    elapsed: u32,
    active: Vec<Activation>,
}

impl AttackExecution {
    /// Begin executing `attack` on tick `started_at`
    pub fn start(attack: Arc<Attack>, started_at: u64) -> Self {
        Self {
            attack,
            started_at,
            elapsed: 0,
            active: Vec::new(),
        }
    }

    pub fn attack(&self) -> &Attack {
        &self.attack
    }

    pub fn started_at(&self) -> u64 {
        self.started_at
    }

    /// Ticks since the execution started, as of the last advance
    pub fn elapsed(&self) -> u32 {
        self.elapsed
    }

    /// Indices of the currently active hitboxes
    pub fn active_hitboxes(&self) -> impl Iterator<Item = usize> + '_ {
        self.active.iter().map(|a| a.hitbox)
    }

    /// Move the execution to tick `tick`
    pub fn advance(&mut self, tick: u64) -> ExecutionStatus {
        let elapsed = tick.saturating_sub(self.started_at);
        self.elapsed = u32::try_from(elapsed).unwrap_or(u32::MAX);

        if self.elapsed >= self.attack.length() {
            self.flush();
            return ExecutionStatus::Finished;
        }

        let mut activated = Vec::new();
        for (index, hitbox) in self.attack.hitboxes().iter().enumerate() {
            if hitbox.activation_frame() == self.elapsed {
                self.active.push(Activation {
                    hitbox: index,
                    hit: BTreeSet::new(),
                });
                activated.push(index);
            }
        }

        ExecutionStatus::Running { activated }
    }

    /// Deactivate every hitbox
    pub fn flush(&mut self) {
        self.active.clear();
    }

    /// World rectangles of the active hitboxes
    pub fn hitbox_bounds(&self, origin: Vec2, facing: f32) -> Vec<Bounds> {
        let hitboxes = self.attack.hitboxes();
        self.active
            .iter()
            .map(|a| hitboxes[a.hitbox].world_bounds(origin, facing))
            .collect()
    }

    /// Test every active hitbox against `targets` and queue the hits.
    ///
    /// The attacker itself is never a target. Returns the number of hits
    /// queued.
    pub fn collect_hits(
        &mut self,
        attacker: CharacterId,
        origin: Vec2,
        facing: f32,
        targets: &[HitTarget],
        queue: &mut HitQueue,
    ) -> usize {
        let attack = &self.attack;
        let hitboxes = attack.hitboxes();
        let knockback = Vec2::new(attack.knockback().x * facing, attack.knockback().y);
        let mut hits = 0;

        for activation in &mut self.active {
            let area = hitboxes[activation.hitbox].world_bounds(origin, facing);

            for target in targets {
                if target.id == attacker
                    || target.invincible
                    || activation.hit.contains(&target.id)
                    || !area.overlaps(&target.bounds)
                {
                    continue;
                }

                activation.hit.insert(target.id);
                queue.push(HitEvent {
                    attacker,
                    defender: target.id,
                    damage: attack.damage(),
                    hitstun: attack.hitstun(),
                    knockback,
                });
                hits += 1;
            }
        }

        hits
    }
}
