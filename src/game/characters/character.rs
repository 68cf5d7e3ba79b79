// Character entity and management

use glam::Vec2;
use std::collections::BTreeMap;
use std::sync::Arc;

use super::state::{ActionState, ActionStateMachine, Maneuver};
use super::stats::CharacterStats;
use crate::core::ConfigError;
use crate::engine::game_loop::FIXED_TIMESTEP_DURATION;
use crate::engine::input::{InputBuffer, InputSample};
use crate::engine::physics::{Bounds, KinematicBody};
use crate::game::combat::{
    ActorCombatState, Attack, AttackExecution, ExecutionStatus, HitEvent, HitQueue, HitTarget,
};
use crate::game::events::{CharacterEvent, TickReport};

/// Unique identifier for a character
pub type CharacterId = u32;

/// A fighter driven by input samples
#[derive(Debug)]
pub struct Character {
    /// Unique identifier
    pub id: CharacterId,
    /// Character name (for display)
    pub name: String,

    stats: CharacterStats,
    body: Box<dyn KinematicBody>,

    // Input and state
    input: InputBuffer,
    state_machine: ActionStateMachine,

    // Combat
    attack: Arc<Attack>,
    execution: Option<AttackExecution>,
    health: f32,
}

impl Character {
    /// Create a character around an existing physics body.
    ///
    /// Fails if the stats are out of range.
    pub fn new(
        id: CharacterId,
        name: &str,
        stats: CharacterStats,
        body: Box<dyn KinematicBody>,
        attack: Arc<Attack>,
    ) -> Result<Self, ConfigError> {
        stats.validate()?;

        Ok(Self {
            id,
            name: name.to_string(),
            input: InputBuffer::new(stats.buffer),
            health: stats.max_health,
            stats,
            body,
            state_machine: ActionStateMachine::new(),
            attack,
            execution: None,
        })
    }

    /// Run this character's part of a tick: input, state, movement and
    /// attack timing. Hits are resolved afterwards by the manager.
    pub fn update(&mut self, tick: u64, sample: &InputSample) -> Vec<CharacterEvent> {
        let mut events = Vec::new();
        let before = self.state_machine.state();

        self.input.advance(FIXED_TIMESTEP_DURATION);
        let grounded = self.body.is_grounded();
        let report = self
            .state_machine
            .update(sample, grounded, &mut self.input, &self.stats);

        for &maneuver in &report.maneuvers {
            events.push(CharacterEvent::Maneuver {
                id: self.id,
                maneuver,
            });
        }

        if report.contains(Maneuver::AttackStarted) {
            log::debug!("{} starts {}", self.name, self.attack.name());
            self.execution = Some(AttackExecution::start(Arc::clone(&self.attack), tick));
            events.push(CharacterEvent::AttackStarted {
                id: self.id,
                attack: self.attack.name().to_string(),
            });
        }

        match self.execution.as_mut().map(|e| e.advance(tick)) {
            Some(ExecutionStatus::Running { activated }) => {
                events.extend(
                    activated
                        .into_iter()
                        .map(|hitbox| CharacterEvent::HitboxActivated {
                            id: self.id,
                            hitbox,
                        }),
                );
            }
            Some(ExecutionStatus::Finished) => {
                self.execution = None;
                self.state_machine.end_attack(grounded);
                events.push(CharacterEvent::AttackEnded {
                    id: self.id,
                    interrupted: false,
                });
            }
            None => {}
        }

        self.body.move_by(self.state_machine.movement());

        self.push_state_change(before, &mut events);
        events
    }

    /// Test the running attack's active hitboxes against `targets`
    pub fn collect_hits(&mut self, targets: &[HitTarget], queue: &mut HitQueue) -> usize {
        match &mut self.execution {
            Some(execution) => execution.collect_hits(
                self.id,
                self.body.position(),
                self.state_machine.facing(),
                targets,
                queue,
            ),
            None => 0,
        }
    }

    /// Apply a hit landed on this character.
    ///
    /// Damage, then knockback, then hitstun. Ignored while invincible.
    pub fn apply_hit(&mut self, hit: &HitEvent) -> Vec<CharacterEvent> {
        let mut events = Vec::new();
        if self.state_machine.is_invincible() {
            log::trace!("{} ignores hit from {}", self.name, hit.attacker);
            return events;
        }

        let before = self.state_machine.state();
        let was_standing = !self.combat_state().is_knocked_out();

        self.health = (self.health - hit.damage).max(0.0);
        self.state_machine
            .sustain_knockback(hit.knockback_magnitude(), hit.knockback_angle());
        self.state_machine.sustain_hitstun(hit.hitstun);

        log::info!(
            "{} takes {} from {} ({} left)",
            self.name,
            hit.damage,
            hit.attacker,
            self.health
        );
        events.push(CharacterEvent::Hit(*hit));

        if before == ActionState::Attacking && self.state_machine.state() != ActionState::Attacking
        {
            if let Some(mut execution) = self.execution.take() {
                execution.flush();
            }
            events.push(CharacterEvent::AttackEnded {
                id: self.id,
                interrupted: true,
            });
        }

        self.push_state_change(before, &mut events);

        if was_standing && self.combat_state().is_knocked_out() {
            log::info!("{} is knocked out", self.name);
            events.push(CharacterEvent::KnockedOut { id: self.id });
        }

        events
    }

    fn push_state_change(&self, before: ActionState, events: &mut Vec<CharacterEvent>) {
        let after = self.state_machine.state();
        if after != before {
            events.push(CharacterEvent::StateChanged {
                id: self.id,
                from: before,
                to: after,
            });
        }
    }

    /// What an attacker's hit test sees of this character
    pub fn hit_target(&self) -> HitTarget {
        HitTarget {
            id: self.id,
            bounds: self.body.bounds(),
            invincible: self.state_machine.is_invincible(),
        }
    }

    /// Get character's current position
    pub fn position(&self) -> Vec2 {
        self.body.position()
    }

    pub fn bounds(&self) -> Bounds {
        self.body.bounds()
    }

    pub fn is_grounded(&self) -> bool {
        self.body.is_grounded()
    }

    /// Direction character is facing (1 = right, -1 = left)
    pub fn facing(&self) -> f32 {
        self.state_machine.facing()
    }

    /// Get the current state
    pub fn state(&self) -> ActionState {
        self.state_machine.state()
    }

    pub fn state_machine(&self) -> &ActionStateMachine {
        &self.state_machine
    }

    pub fn input(&self) -> &InputBuffer {
        &self.input
    }

    pub fn stats(&self) -> &CharacterStats {
        &self.stats
    }

    pub fn health(&self) -> f32 {
        self.health
    }

    /// World rectangles of the running attack's live hitboxes
    pub fn hitbox_bounds(&self) -> Vec<Bounds> {
        self.execution
            .as_ref()
            .map(|e| e.hitbox_bounds(self.body.position(), self.state_machine.facing()))
            .unwrap_or_default()
    }

    /// The running attack, if any
    pub fn execution(&self) -> Option<&AttackExecution> {
        self.execution.as_ref()
    }

    pub fn combat_state(&self) -> ActorCombatState {
        ActorCombatState {
            health: self.health,
            max_health: self.stats.max_health,
            invincible: self.state_machine.is_invincible(),
            hitstun_remaining: self.state_machine.hitstun_remaining(),
        }
    }
}

/// Owns every character and runs the fixed tick
///
/// Characters are kept in ascending id order, which is also the order they
/// update in and the order hits are tested in.
#[derive(Debug, Default)]
pub struct CharacterManager {
    characters: Vec<Character>,
    next_id: CharacterId,
    tick: u64,
    queue: HitQueue,
}

impl CharacterManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn a new character
    pub fn spawn_character(
        &mut self,
        name: &str,
        stats: CharacterStats,
        body: Box<dyn KinematicBody>,
        attack: Arc<Attack>,
    ) -> Result<CharacterId, ConfigError> {
        let id = self.next_id;
        let character = Character::new(id, name, stats, body, attack)?;
        self.next_id += 1;
        self.characters.push(character);

        log::debug!("Spawned {} as {}", name, id);
        Ok(id)
    }

    /// Run one tick.
    ///
    /// Characters without an entry in `inputs` receive a neutral sample.
    pub fn tick(&mut self, inputs: &BTreeMap<CharacterId, InputSample>) -> TickReport {
        let tick = self.tick;
        let mut events = Vec::new();
        let neutral = InputSample::neutral();

        for character in &mut self.characters {
            let sample = inputs.get(&character.id).unwrap_or(&neutral);
            events.extend(character.update(tick, sample));
        }

        let targets: Vec<HitTarget> = self.characters.iter().map(Character::hit_target).collect();
        for character in &mut self.characters {
            character.collect_hits(&targets, &mut self.queue);
        }

        for hit in self.queue.drain() {
            if let Some(defender) = self.characters.iter_mut().find(|c| c.id == hit.defender) {
                events.extend(defender.apply_hit(&hit));
            }
        }

        self.tick += 1;
        TickReport { tick, events }
    }

    /// The tick the next call to [`CharacterManager::tick`] will run
    pub fn current_tick(&self) -> u64 {
        self.tick
    }

    /// Get a character by ID
    pub fn get(&self, id: CharacterId) -> Option<&Character> {
        self.characters.iter().find(|c| c.id == id)
    }

    /// Get a mutable character by ID
    pub fn get_mut(&mut self, id: CharacterId) -> Option<&mut Character> {
        self.characters.iter_mut().find(|c| c.id == id)
    }

    /// Get all characters
    pub fn all(&self) -> &[Character] {
        &self.characters
    }

    /// Remove a character by ID
    pub fn remove(&mut self, id: CharacterId) -> Option<Character> {
        let pos = self.characters.iter().position(|c| c.id == id)?;
        Some(self.characters.remove(pos))
    }

    /// Get the number of characters
    pub fn count(&self) -> usize {
        self.characters.len()
    }

    /// Characters with health left
    pub fn standing_count(&self) -> usize {
        self.characters
            .iter()
            .filter(|c| !c.combat_state().is_knocked_out())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::physics::Stage;
    use crate::game::combat::Hitbox;
    use approx::assert_relative_eq;

    const ATTACKER: CharacterId = 0;
    const DEFENDER: CharacterId = 1;

    fn attack(
        damage: f32,
        hitstun: u32,
        knockback: Vec2,
        length: u32,
        hitboxes: &[(Vec2, u32)],
    ) -> Arc<Attack> {
        let hitboxes = hitboxes
            .iter()
            .map(|&(size, frame)| Hitbox::new(Vec2::new(1.0, 0.0), size, frame).unwrap())
            .collect();
        Arc::new(Attack::new("test", damage, hitstun, knockback, length, hitboxes).unwrap())
    }

    /// Reference scenario attack: one hitbox reaching 1.5 units ahead
    fn scenario_attack() -> Arc<Attack> {
        attack(500.0, 10, Vec2::new(2.0, 1.0), 30, &[(Vec2::ONE, 5)])
    }

    /// Everything in front of or behind the attacker for a long while
    fn sweeping_attack(hitstun: u32) -> Arc<Attack> {
        attack(100.0, hitstun, Vec2::ZERO, 30, &[(Vec2::splat(100.0), 0)])
    }

    fn spawn(
        manager: &mut CharacterManager,
        name: &str,
        x: f32,
        stats: CharacterStats,
        attack: Arc<Attack>,
    ) -> CharacterId {
        let body = Stage::flat(0.0).spawn_body(x, stats.size());
        manager
            .spawn_character(name, stats, Box::new(body), attack)
            .unwrap()
    }

    fn duel(attack: Arc<Attack>) -> CharacterManager {
        let mut manager = CharacterManager::new();
        spawn(&mut manager, "attacker", 0.0, CharacterStats::default(), attack);
        spawn(&mut manager, "defender", 1.5, CharacterStats::default(), scenario_attack());
        manager
    }

    fn inputs(entries: &[(CharacterId, InputSample)]) -> BTreeMap<CharacterId, InputSample> {
        entries.iter().copied().collect()
    }

    fn attack_input(id: CharacterId) -> BTreeMap<CharacterId, InputSample> {
        inputs(&[(id, InputSample::neutral().with_attack())])
    }

    #[test]
    fn test_character_manager_new() {
        let manager = CharacterManager::new();
        assert_eq!(manager.count(), 0);
        assert_eq!(manager.current_tick(), 0);
    }

    #[test]
    fn test_spawn_assigns_ascending_ids() {
        let manager = duel(scenario_attack());
        let ids: Vec<_> = manager.all().iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![ATTACKER, DEFENDER]);
        assert_eq!(manager.get(DEFENDER).unwrap().health(), 5000.0);
        assert!(manager.get(ATTACKER).unwrap().is_grounded());
    }

    #[test]
    fn test_spawn_rejects_invalid_stats() {
        let mut manager = CharacterManager::new();
        let stats = CharacterStats {
            jump_power: -1.0,
            ..Default::default()
        };
        let body = Stage::flat(0.0).spawn_body(0.0, Vec2::new(1.0, 2.0));
        let result = manager.spawn_character("broken", stats, Box::new(body), scenario_attack());

        assert!(matches!(
            result,
            Err(ConfigError::NonPositive {
                field: "jump_power",
                ..
            })
        ));
        assert_eq!(manager.count(), 0);
    }

    #[test]
    fn test_reference_scenario() {
        let mut manager = duel(scenario_attack());

        let report = manager.tick(&attack_input(ATTACKER));
        assert!(report.events.contains(&CharacterEvent::AttackStarted {
            id: ATTACKER,
            attack: "test".to_string()
        }));

        for tick in 1..5 {
            let report = manager.tick(&BTreeMap::new());
            assert_eq!(report.tick, tick);
            assert_eq!(report.hits().count(), 0);
            assert_eq!(manager.get(DEFENDER).unwrap().health(), 5000.0);
        }

        let report = manager.tick(&BTreeMap::new());
        assert_eq!(report.tick, 5);
        assert_eq!(report.hits().count(), 1);
        let defender = manager.get(DEFENDER).unwrap();
        assert_eq!(defender.health(), 4500.0);
        assert_eq!(defender.state(), ActionState::Hitstun);
        assert_eq!(defender.combat_state().hitstun_remaining, 10);
        let knockback = defender.state_machine().movement();
        assert_relative_eq!(knockback.x, 2.0, epsilon = 1e-5);
        assert_relative_eq!(knockback.y, 1.0, epsilon = 1e-5);

        // Ten ticks of hitstun, released on the eleventh
        for _ in 6..=15 {
            manager.tick(&BTreeMap::new());
            assert_eq!(manager.get(DEFENDER).unwrap().state(), ActionState::Hitstun);
        }
        manager.tick(&BTreeMap::new());
        assert_ne!(manager.get(DEFENDER).unwrap().state(), ActionState::Hitstun);

        for _ in 17..30 {
            manager.tick(&BTreeMap::new());
            assert_eq!(manager.get(ATTACKER).unwrap().state(), ActionState::Attacking);
        }

        let report = manager.tick(&BTreeMap::new());
        assert_eq!(report.tick, 30);
        assert!(report.events.contains(&CharacterEvent::AttackEnded {
            id: ATTACKER,
            interrupted: false
        }));
        let attacker = manager.get(ATTACKER).unwrap();
        assert_eq!(attacker.state(), ActionState::Idle);
        assert!(attacker.execution().is_none());
        assert_eq!(manager.get(DEFENDER).unwrap().health(), 4500.0);
    }

    #[test]
    fn test_hitbox_activation_event() {
        let mut manager = duel(scenario_attack());
        manager.tick(&attack_input(ATTACKER));
        let activated: Vec<_> = (1..=5)
            .flat_map(|_| manager.tick(&BTreeMap::new()).events)
            .filter(|e| matches!(e, CharacterEvent::HitboxActivated { .. }))
            .collect();
        assert_eq!(
            activated,
            vec![CharacterEvent::HitboxActivated {
                id: ATTACKER,
                hitbox: 0
            }]
        );
    }

    #[test]
    fn test_one_hit_per_defender_per_activation() {
        let mut manager = CharacterManager::new();
        spawn(&mut manager, "attacker", 0.0, CharacterStats::default(), sweeping_attack(1));
        spawn(&mut manager, "left", -2.0, CharacterStats::default(), scenario_attack());
        spawn(&mut manager, "right", 2.0, CharacterStats::default(), scenario_attack());

        let mut hits = Vec::new();
        hits.extend(manager.tick(&attack_input(ATTACKER)).hits().copied());
        for _ in 1..30 {
            hits.extend(manager.tick(&BTreeMap::new()).hits().copied());
        }

        let mut defenders: Vec<_> = hits.iter().map(|h| h.defender).collect();
        defenders.sort_unstable();
        assert_eq!(defenders, vec![1, 2]);
        assert_eq!(manager.get(1).unwrap().health(), 4900.0);
        assert_eq!(manager.get(2).unwrap().health(), 4900.0);
    }

    #[test]
    fn test_roll_dodges_until_window_closes() {
        let mut manager = CharacterManager::new();
        spawn(&mut manager, "attacker", 0.0, CharacterStats::default(), sweeping_attack(5));
        let roller = CharacterStats {
            roll_speed: 0.001,
            roll_time: 10,
            ..Default::default()
        };
        spawn(&mut manager, "roller", 1.5, roller, scenario_attack());

        let report = manager.tick(&inputs(&[
            (ATTACKER, InputSample::neutral().with_attack()),
            (DEFENDER, InputSample::moving(0.0, -1.0).with_jump()),
        ]));
        assert_eq!(report.hits().count(), 0);
        assert_eq!(manager.get(DEFENDER).unwrap().state(), ActionState::Rolling);

        for _ in 1..10 {
            let report = manager.tick(&BTreeMap::new());
            assert_eq!(report.hits().count(), 0);
            assert!(manager.get(DEFENDER).unwrap().combat_state().invincible);
        }

        let report = manager.tick(&BTreeMap::new());
        assert_eq!(report.tick, 10);
        assert_eq!(report.hits().count(), 1);
        let roller = manager.get(DEFENDER).unwrap();
        assert_eq!(roller.health(), 4900.0);
        assert_eq!(roller.state(), ActionState::Hitstun);
    }

    #[test]
    fn test_hitstun_interrupts_and_flushes_attack() {
        let mut manager = CharacterManager::new();
        spawn(&mut manager, "attacker", 0.0, CharacterStats::default(), scenario_attack());
        let slow = attack(100.0, 5, Vec2::ZERO, 60, &[(Vec2::ONE, 20)]);
        spawn(&mut manager, "slow", 1.5, CharacterStats::default(), slow);

        manager.tick(&inputs(&[
            (ATTACKER, InputSample::neutral().with_attack()),
            (DEFENDER, InputSample::neutral().with_attack()),
        ]));
        assert_eq!(manager.get(DEFENDER).unwrap().state(), ActionState::Attacking);

        let mut events = Vec::new();
        for _ in 1..=5 {
            events.extend(manager.tick(&BTreeMap::new()).events);
        }
        assert!(events.contains(&CharacterEvent::AttackEnded {
            id: DEFENDER,
            interrupted: true
        }));
        let defender = manager.get(DEFENDER).unwrap();
        assert_eq!(defender.state(), ActionState::Hitstun);
        assert!(defender.execution().is_none());

        // The flushed attack never activates its late hitbox
        for _ in 6..=25 {
            let report = manager.tick(&BTreeMap::new());
            assert!(!report.events.iter().any(|e| matches!(
                e,
                CharacterEvent::HitboxActivated { id: DEFENDER, .. }
            )));
        }
    }

    #[test]
    fn test_health_floors_at_zero_and_knocks_out_once() {
        let mut manager = CharacterManager::new();
        let heavy = attack(
            800.0,
            1,
            Vec2::ZERO,
            40,
            &[(Vec2::splat(100.0), 0), (Vec2::splat(100.0), 20)],
        );
        spawn(&mut manager, "attacker", 0.0, CharacterStats::default(), heavy);
        let fragile = CharacterStats {
            max_health: 1000.0,
            ..Default::default()
        };
        spawn(&mut manager, "fragile", 1.5, fragile, scenario_attack());

        let mut events = manager.tick(&attack_input(ATTACKER)).events;
        let mut last_health = manager.get(DEFENDER).unwrap().health();
        assert_eq!(last_health, 200.0);

        for _ in 1..40 {
            events.extend(manager.tick(&BTreeMap::new()).events);
            let health = manager.get(DEFENDER).unwrap().health();
            assert!(health <= last_health);
            last_health = health;
        }

        assert_eq!(last_health, 0.0);
        let knockouts = events
            .iter()
            .filter(|e| matches!(e, CharacterEvent::KnockedOut { id: DEFENDER }))
            .count();
        assert_eq!(knockouts, 1);
        assert_eq!(manager.standing_count(), 1);
    }

    #[test]
    fn test_live_hitboxes_follow_attacker() {
        let mut manager = duel(scenario_attack());
        manager.tick(&attack_input(ATTACKER));
        assert!(manager.get(ATTACKER).unwrap().hitbox_bounds().is_empty());

        for _ in 1..=5 {
            manager.tick(&BTreeMap::new());
        }
        let attacker = manager.get(ATTACKER).unwrap();
        let hitboxes = attacker.hitbox_bounds();
        assert_eq!(hitboxes.len(), 1);
        assert_eq!(hitboxes[0].center, attacker.position() + Vec2::X);
        assert!(manager.get(DEFENDER).unwrap().hitbox_bounds().is_empty());
    }

    #[test]
    fn test_chain_expires_after_twelve_ticks() {
        let mut manager = CharacterManager::new();
        spawn(&mut manager, "runner", 0.0, CharacterStats::default(), scenario_attack());
        let forward = inputs(&[(ATTACKER, InputSample::moving(1.0, 0.0))]);

        // 11 ticks of 16.667 ms stay under the 200 ms window
        for _ in 0..12 {
            manager.tick(&forward);
            assert_eq!(manager.get(ATTACKER).unwrap().input().chain_string(), "6");
        }

        // The 12th tick after the token crosses 200 ms
        manager.tick(&forward);
        assert!(manager.get(ATTACKER).unwrap().input().is_empty());
    }

    #[test]
    fn test_state_change_events() {
        let mut manager = duel(scenario_attack());
        let report = manager.tick(&inputs(&[(DEFENDER, InputSample::neutral().with_jump())]));
        assert!(report.events.contains(&CharacterEvent::StateChanged {
            id: DEFENDER,
            from: ActionState::Idle,
            to: ActionState::Jumping
        }));
        assert!(report.events.contains(&CharacterEvent::Maneuver {
            id: DEFENDER,
            maneuver: Maneuver::Jump
        }));
        assert!(!manager.get(DEFENDER).unwrap().is_grounded());
    }

    #[test]
    fn test_missing_input_is_neutral() {
        let mut manager = duel(scenario_attack());
        for _ in 0..10 {
            manager.tick(&BTreeMap::new());
        }
        for character in manager.all() {
            assert_eq!(character.state(), ActionState::Idle);
            assert!(character.is_grounded());
        }
        assert_eq!(manager.current_tick(), 10);
    }

    #[test]
    fn test_remove() {
        let mut manager = duel(scenario_attack());
        assert!(manager.remove(ATTACKER).is_some());
        assert!(manager.remove(ATTACKER).is_none());
        assert_eq!(manager.count(), 1);
    }
}
