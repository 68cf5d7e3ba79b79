// Combat system
//
// - Attack and hitbox descriptors, shared and immutable
// - Per-execution activation tracking and hit tests
// - Hit messages queued by attackers and applied to defenders

pub mod attack;
pub mod execution;
pub mod hit;

pub use attack::{presets, Attack, Hitbox};
pub use execution::{AttackExecution, ExecutionStatus};
pub use hit::{ActorCombatState, HitEvent, HitQueue, HitTarget};
