// Per-tick input samples delivered to a character

use glam::Vec2;

/// Normalized input for one tick
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InputSample {
    /// Stick position, each axis in [-1, 1]
    pub movement: Vec2,
    /// Jump went down this tick
    pub jump_pressed: bool,
    /// Jump went up this tick
    pub jump_released: bool,
    /// Attack went down this tick
    pub attack_pressed: bool,
}

impl InputSample {
    /// Nothing pressed, stick centered
    pub fn neutral() -> Self {
        Self::default()
    }

    /// Stick only
    pub fn moving(x: f32, y: f32) -> Self {
        Self {
            movement: Vec2::new(x, y),
            ..Self::default()
        }
    }

    pub fn with_jump(mut self) -> Self {
        self.jump_pressed = true;
        self
    }

    pub fn with_jump_release(mut self) -> Self {
        self.jump_released = true;
        self
    }

    pub fn with_attack(mut self) -> Self {
        self.attack_pressed = true;
        self
    }

    pub fn horizontal(&self) -> f32 {
        self.movement.x
    }

    pub fn vertical(&self) -> f32 {
        self.movement.y
    }
}

/// Raw held state as read from a device
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HeldInput {
    pub movement: Vec2,
    pub jump: bool,
    pub attack: bool,
}

/// Turns held button states into per-tick press/release edges
#[derive(Debug, Default)]
pub struct InputSampler {
    previous: HeldInput,
}

impl InputSampler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Produce this tick's sample and remember the held state for the next one
    pub fn sample(&mut self, held: HeldInput) -> InputSample {
        let sample = InputSample {
            movement: held.movement.clamp(Vec2::splat(-1.0), Vec2::splat(1.0)),
            jump_pressed: held.jump && !self.previous.jump,
            jump_released: !held.jump && self.previous.jump,
            attack_pressed: held.attack && !self.previous.attack,
        };
        self.previous = held;
        sample
    }

    /// Forget the previous held state
    pub fn reset(&mut self) {
        self.previous = HeldInput::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn held(jump: bool, attack: bool) -> HeldInput {
        HeldInput {
            movement: Vec2::ZERO,
            jump,
            attack,
        }
    }

    #[test]
    fn test_press_is_an_edge() {
        let mut sampler = InputSampler::new();
        assert!(sampler.sample(held(true, false)).jump_pressed);
        // Still held: no new edge
        assert!(!sampler.sample(held(true, false)).jump_pressed);
    }

    #[test]
    fn test_release_edge() {
        let mut sampler = InputSampler::new();
        sampler.sample(held(true, false));
        let sample = sampler.sample(held(false, false));
        assert!(sample.jump_released);
        assert!(!sample.jump_pressed);
    }

    #[test]
    fn test_release_without_press() {
        let mut sampler = InputSampler::new();
        assert!(!sampler.sample(held(false, false)).jump_released);
    }

    #[test]
    fn test_attack_edge() {
        let mut sampler = InputSampler::new();
        assert!(sampler.sample(held(false, true)).attack_pressed);
        assert!(!sampler.sample(held(false, true)).attack_pressed);
        sampler.sample(held(false, false));
        assert!(sampler.sample(held(false, true)).attack_pressed);
    }

    #[test]
    fn test_movement_is_clamped() {
        let mut sampler = InputSampler::new();
        let sample = sampler.sample(HeldInput {
            movement: Vec2::new(3.0, -2.0),
            ..Default::default()
        });
        assert_eq!(sample.movement, Vec2::new(1.0, -1.0));
    }

    #[test]
    fn test_reset() {
        let mut sampler = InputSampler::new();
        sampler.sample(held(true, true));
        sampler.reset();
        let sample = sampler.sample(held(true, true));
        assert!(sample.jump_pressed);
        assert!(sample.attack_pressed);
    }

    #[test]
    fn test_sample_builders() {
        let sample = InputSample::moving(1.0, 0.0).with_jump().with_attack();
        assert_eq!(sample.horizontal(), 1.0);
        assert_eq!(sample.vertical(), 0.0);
        assert!(sample.jump_pressed && sample.attack_pressed);
        assert!(!sample.jump_released);
        assert_eq!(InputSample::neutral().with_jump_release().movement, Vec2::ZERO);
    }
}
