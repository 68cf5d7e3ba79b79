// Character action state machine

use glam::Vec2;

use super::stats::CharacterStats;
use crate::core::math::{sign, smooth_damp, EPSILON};
use crate::engine::game_loop::FIXED_TIMESTEP;
use crate::engine::input::{Gesture, InputBuffer, InputSample};

/// Horizontal speed above which a grounded character counts as running
pub const RUN_THRESHOLD: f32 = 0.01;

/// Share of jump power used for the roll hop
const ROLL_HOP: f32 = 0.1;

/// Share of jump power used for the airdash lift
const AIR_DASH_LIFT: f32 = 0.2;

/// Rising speed kept when jump is released early
const JUMP_CUT_FACTOR: f32 = 0.2;

/// Represents the current action of a character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ActionState {
    /// Standing still on ground
    #[default]
    Idle,
    /// Moving horizontally on ground
    Running,
    /// In the air, moving upward
    Jumping,
    /// In the air, moving downward
    Falling,
    /// Invincible ground roll
    Rolling,
    /// Executing an attack
    Attacking,
    /// Taking a hit
    Hitstun,
    /// Holding down on ground
    Crouching,
    /// Short vulnerable window after a roll
    RollRecovery,
}

/// Which inputs a character currently accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlState {
    /// Stick and buttons
    General,
    /// Stick only
    MovementOnly,
    /// Nothing
    None,
}

impl ControlState {
    pub fn allows_movement(self) -> bool {
        !matches!(self, Self::None)
    }

    pub fn allows_buttons(self) -> bool {
        matches!(self, Self::General)
    }
}

impl ActionState {
    /// States driven purely by input and physics, with no timer attached
    pub fn is_free(&self) -> bool {
        matches!(
            self,
            Self::Idle | Self::Running | Self::Crouching | Self::Jumping | Self::Falling
        )
    }

    /// Grounded states a jump, high jump or roll can start from
    pub fn can_leave_ground(&self) -> bool {
        matches!(self, Self::Idle | Self::Running | Self::Crouching)
    }

    pub fn control_state(&self) -> ControlState {
        match self {
            Self::Attacking => ControlState::MovementOnly,
            Self::Rolling | Self::RollRecovery | Self::Hitstun => ControlState::None,
            _ => ControlState::General,
        }
    }

    /// Get the animation name for this state
    pub fn animation_name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "run",
            Self::Jumping => "jump",
            Self::Falling => "fall",
            Self::Rolling => "roll",
            Self::Attacking => "attack",
            Self::Hitstun => "hit",
            Self::Crouching => "crouch",
            Self::RollRecovery => "roll_recovery",
        }
    }
}

/// Discrete moves the state machine performed during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Maneuver {
    Jump,
    HighJump,
    JumpCut,
    Roll,
    AirDash,
    Landed,
    AttackStarted,
}

/// What happened during one [`ActionStateMachine::update`]
#[derive(Debug, Default)]
pub struct StepReport {
    pub maneuvers: Vec<Maneuver>,
}

impl StepReport {
    pub fn contains(&self, maneuver: Maneuver) -> bool {
        self.maneuvers.contains(&maneuver)
    }
}

/// Owns a character's action state, movement vector and facing
///
/// Advanced once per tick by [`ActionStateMachine::update`]. Other characters
/// never touch it directly: hits reach it through
/// [`ActionStateMachine::sustain_knockback`] and
/// [`ActionStateMachine::sustain_hitstun`] while the hit queue is drained.
#[derive(Debug)]
pub struct ActionStateMachine {
    current_state: ActionState,
    previous_state: ActionState,
    /// Ticks spent in the current state
    state_ticks: u32,
    /// Velocity in units per tick
    movement: Vec2,
    /// Rate of change carried by the horizontal smoothing
    smooth_velocity: f32,
    /// 1 = right, -1 = left
    facing: f32,
    air_dash_used: bool,
    invincible: bool,
    hitstun_remaining: u32,
    was_grounded: bool,
}

impl Default for ActionStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl ActionStateMachine {
    pub fn new() -> Self {
        Self {
            current_state: ActionState::Idle,
            previous_state: ActionState::Idle,
            state_ticks: 0,
            movement: Vec2::ZERO,
            smooth_velocity: 0.0,
            facing: 1.0,
            air_dash_used: false,
            invincible: false,
            hitstun_remaining: 0,
            was_grounded: true,
        }
    }

    /// Get the current state
    pub fn state(&self) -> ActionState {
        self.current_state
    }

    /// Get the previous state
    pub fn previous_state(&self) -> ActionState {
        self.previous_state
    }

    /// Ticks spent in the current state
    pub fn state_ticks(&self) -> u32 {
        self.state_ticks
    }

    pub fn control_state(&self) -> ControlState {
        self.current_state.control_state()
    }

    /// Velocity for this tick, in units per tick
    pub fn movement(&self) -> Vec2 {
        self.movement
    }

    pub fn facing(&self) -> f32 {
        self.facing
    }

    pub fn air_dash_used(&self) -> bool {
        self.air_dash_used
    }

    pub fn is_invincible(&self) -> bool {
        self.invincible
    }

    /// Hitstun ticks still to be served
    pub fn hitstun_remaining(&self) -> u32 {
        self.hitstun_remaining
    }

    /// Transition to a new state
    fn transition(&mut self, new_state: ActionState) {
        if self.current_state != new_state {
            log::debug!("{:?} -> {:?}", self.current_state, new_state);
            self.previous_state = self.current_state;
            self.current_state = new_state;
            self.state_ticks = 0;
        }
    }

    /// Where a character settles when a timed state ends
    fn rest_state(&self, grounded: bool) -> ActionState {
        if grounded {
            if self.movement.x.abs() > RUN_THRESHOLD {
                ActionState::Running
            } else {
                ActionState::Idle
            }
        } else if self.movement.y > EPSILON {
            ActionState::Jumping
        } else {
            ActionState::Falling
        }
    }

    /// Advance one tick.
    ///
    /// `grounded` is the backend's answer for the body at the start of the
    /// tick. Input is recorded into `buffer` here, after timers ran, so the
    /// chain only sees what the character could act on.
    pub fn update(
        &mut self,
        sample: &InputSample,
        grounded: bool,
        buffer: &mut InputBuffer,
        stats: &CharacterStats,
    ) -> StepReport {
        let mut report = StepReport::default();
        self.state_ticks = self.state_ticks.saturating_add(1);

        let landed = grounded && !self.was_grounded;
        if landed {
            self.land(&mut report);
        }
        self.was_grounded = grounded;

        self.run_timers(grounded, stats);

        let control = self.control_state();
        let gesture = if control.allows_movement() {
            buffer.record(sample, self.facing, control.allows_buttons())
        } else {
            None
        };

        // Facing flips on a non-zero horizontal input and is locked mid-attack
        if control.allows_buttons() && sign(sample.horizontal()) != 0 {
            self.facing = f32::from(sign(sample.horizontal()));
        }

        if control.allows_buttons() {
            self.handle_buttons(sample, grounded, stats, &mut report);
        }

        let mut impulse = report.contains(Maneuver::Roll);
        if gesture == Some(Gesture::DashForward) && control.allows_buttons() {
            impulse |= self.air_dash(grounded, stats, &mut report);
        }

        // The landing state holds for the landing tick; the stick takes over next tick
        if grounded && !landed {
            self.update_stance(sample, stats);
        }

        if !impulse {
            self.smooth_horizontal(sample, stats);
        }

        if !grounded && self.current_state.is_free() {
            if self.movement.y < -EPSILON {
                self.transition(ActionState::Falling);
            } else if self.movement.y > EPSILON {
                self.transition(ActionState::Jumping);
            }
        }

        if grounded {
            if self.movement.y < 0.0 {
                self.movement.y = 0.0;
            }
        } else {
            self.movement.y = (self.movement.y - stats.gravity).max(-stats.terminal_velocity);
        }

        report
    }

    fn land(&mut self, report: &mut StepReport) {
        self.air_dash_used = false;
        if self.movement.y < 0.0 {
            self.movement.y = 0.0;
        }
        if matches!(
            self.current_state,
            ActionState::Jumping | ActionState::Falling
        ) {
            let landed = self.rest_state(true);
            self.transition(landed);
        }
        report.maneuvers.push(Maneuver::Landed);
    }

    /// Expire rolls, roll recovery and hitstun
    fn run_timers(&mut self, grounded: bool, stats: &CharacterStats) {
        match self.current_state {
            ActionState::Rolling if self.state_ticks >= stats.roll_time => {
                self.invincible = false;
                if stats.roll_recovery_time > 0 {
                    self.movement.x = 0.0;
                    self.smooth_velocity = 0.0;
                    self.transition(ActionState::RollRecovery);
                } else {
                    let rest = self.rest_state(grounded);
                    self.transition(rest);
                }
            }
            ActionState::RollRecovery if self.state_ticks >= stats.roll_recovery_time => {
                let rest = self.rest_state(grounded);
                self.transition(rest);
            }
            ActionState::Hitstun => {
                if self.hitstun_remaining == 0 {
                    let rest = self.rest_state(grounded);
                    self.transition(rest);
                } else {
                    self.hitstun_remaining -= 1;
                }
            }
            _ => {}
        }
    }

    fn handle_buttons(
        &mut self,
        sample: &InputSample,
        grounded: bool,
        stats: &CharacterStats,
        report: &mut StepReport,
    ) {
        if sample.jump_pressed {
            if grounded && self.current_state.can_leave_ground() {
                let vertical = sample.vertical();
                if vertical > 0.0 {
                    self.movement.y = stats.high_jump_power;
                    self.transition(ActionState::Jumping);
                    report.maneuvers.push(Maneuver::HighJump);
                } else if vertical < 0.0 {
                    self.start_roll(stats);
                    report.maneuvers.push(Maneuver::Roll);
                } else {
                    self.movement.y = stats.jump_power;
                    self.transition(ActionState::Jumping);
                    report.maneuvers.push(Maneuver::Jump);
                }
            } else {
                log::trace!("Jump ignored in {:?}", self.current_state);
            }
        } else if sample.jump_released
            && !grounded
            && self.current_state == ActionState::Jumping
            && self.movement.y > 0.0
        {
            self.movement.y *= JUMP_CUT_FACTOR;
            report.maneuvers.push(Maneuver::JumpCut);
        }

        if sample.attack_pressed {
            if self.current_state.is_free() {
                self.transition(ActionState::Attacking);
                report.maneuvers.push(Maneuver::AttackStarted);
            } else {
                log::trace!("Attack ignored in {:?}", self.current_state);
            }
        }
    }

    fn start_roll(&mut self, stats: &CharacterStats) {
        self.transition(ActionState::Rolling);
        self.invincible = true;
        self.movement.x = stats.roll_speed * self.facing;
        self.movement.y = stats.jump_power * ROLL_HOP;
        self.smooth_velocity = 0.0;
    }

    /// One burst per airborne period; returns true if it fired
    fn air_dash(
        &mut self,
        grounded: bool,
        stats: &CharacterStats,
        report: &mut StepReport,
    ) -> bool {
        if grounded || self.air_dash_used || !self.current_state.is_free() {
            return false;
        }

        self.air_dash_used = true;
        self.movement.x = stats.air_dash_speed * self.facing;
        self.movement.y = stats.jump_power * AIR_DASH_LIFT;
        self.smooth_velocity = 0.0;
        log::debug!("Airdash toward {}", self.facing);
        report.maneuvers.push(Maneuver::AirDash);
        true
    }

    /// Idle, Running and Crouching follow the stick while on the ground
    fn update_stance(&mut self, sample: &InputSample, stats: &CharacterStats) {
        if !self.current_state.can_leave_ground() {
            return;
        }

        if sample.vertical() < 0.0 {
            self.transition(ActionState::Crouching);
        } else if (sample.horizontal() * stats.speed).abs() > RUN_THRESHOLD {
            self.transition(ActionState::Running);
        } else {
            self.transition(ActionState::Idle);
        }
    }

    fn smooth_horizontal(&mut self, sample: &InputSample, stats: &CharacterStats) {
        let target = match self.current_state {
            // The roll holds its burst for its whole length
            ActionState::Rolling => return,
            ActionState::Hitstun | ActionState::RollRecovery | ActionState::Crouching => 0.0,
            _ => sample.horizontal() * stats.speed,
        };

        self.movement.x = smooth_damp(
            self.movement.x,
            target,
            &mut self.smooth_velocity,
            stats.smooth_time,
            FIXED_TIMESTEP,
        );
    }

    /// Leave Attacking once the attack has run its length
    pub fn end_attack(&mut self, grounded: bool) {
        if self.current_state == ActionState::Attacking {
            let rest = self.rest_state(grounded);
            self.transition(rest);
        }
    }

    /// Replace the movement vector with an impulse of `magnitude` at `angle`
    /// radians from +X.
    pub fn sustain_knockback(&mut self, magnitude: f32, angle: f32) {
        self.movement = Vec2::new(angle.cos(), angle.sin()) * magnitude;
        self.smooth_velocity = 0.0;
    }

    /// Lock the character out of input for `frames` ticks.
    ///
    /// A character already in hitstun keeps whichever of the remaining and
    /// the new duration is longer. Rolls and attacks in progress are cut
    /// short. Zero frames changes nothing.
    pub fn sustain_hitstun(&mut self, frames: u32) {
        if frames == 0 {
            return;
        }

        if self.current_state == ActionState::Hitstun {
            self.hitstun_remaining = self.hitstun_remaining.max(frames);
        } else {
            self.invincible = false;
            self.hitstun_remaining = frames;
            self.transition(ActionState::Hitstun);
        }
    }
}
