// Input chain buffering for gesture detection

use std::time::Duration;

use super::sample::InputSample;
use super::token::{Button, DirectionalToken, InputToken};
use crate::core::ConfigError;

/// How long the chain survives without a new token
pub const DEFAULT_BUFFER_TIME: Duration = Duration::from_millis(200);

/// Extra tokens a gesture may be spread over
pub const DEFAULT_BUFFER_LENGTH: usize = 2;

/// Tuning for the input chain
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BufferConfig {
    /// Idle time after the last token before the chain is cleared
    pub buffer_time: Duration,
    /// Gestures are read from the last `buffer_length + 1` tokens
    pub buffer_length: usize,
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            buffer_time: DEFAULT_BUFFER_TIME,
            buffer_length: DEFAULT_BUFFER_LENGTH,
        }
    }
}

impl BufferConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.buffer_time.is_zero() {
            return Err(ConfigError::ZeroDuration("buffer_time"));
        }
        if self.buffer_length == 0 {
            return Err(ConfigError::NonPositive {
                field: "buffer_length",
                value: 0.0,
            });
        }
        Ok(())
    }

    /// Number of tokens gestures are matched against
    pub fn window(&self) -> usize {
        self.buffer_length + 1
    }
}

/// Input patterns recognised in the chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    /// Forward tapped twice inside the window (airdash)
    DashForward,
}

/// A token together with the simulation time it was recorded at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainEntry {
    pub token: InputToken,
    pub at: Duration,
}

/// Time-windowed chain of recent inputs for a single character
///
/// The buffer owns a simulation clock that only moves when the tick loop
/// calls [`InputBuffer::advance`]. The clear countdown runs on the same
/// clock, so a chain expires on the same tick every time an input log is
/// replayed.
#[derive(Debug)]
pub struct InputBuffer {
    config: BufferConfig,
    chain: Vec<ChainEntry>,
    /// Simulation time since control was enabled
    clock: Duration,
    /// Time left before the chain clears
    remaining: Duration,
    /// Last direction seen from the stick, kept across clears
    last_direction: Option<DirectionalToken>,
}

impl InputBuffer {
    /// Create a new, empty input buffer
    pub fn new(config: BufferConfig) -> Self {
        Self {
            config,
            chain: Vec::new(),
            clock: Duration::ZERO,
            remaining: Duration::ZERO,
            last_direction: None,
        }
    }

    pub fn config(&self) -> &BufferConfig {
        &self.config
    }

    /// Current simulation time of this buffer
    pub fn clock(&self) -> Duration {
        self.clock
    }

    /// Move the clock forward by one tick and expire the chain if it idled
    /// for `buffer_time`. Call this once per tick, before recording input.
    pub fn advance(&mut self, dt: Duration) {
        self.clock += dt;

        if self.chain.is_empty() {
            return;
        }

        self.remaining = self.remaining.saturating_sub(dt);
        if self.remaining.is_zero() {
            log::trace!("Input chain expired: {}", self.chain_string());
            self.chain.clear();
        }
    }

    /// Append a token and restart the clear countdown.
    ///
    /// Returns false if the same token was already appended this tick.
    pub fn push(&mut self, token: InputToken) -> bool {
        let duplicate = self
            .chain
            .last()
            .is_some_and(|last| last.token == token && last.at == self.clock);
        if duplicate {
            return false;
        }

        self.chain.push(ChainEntry {
            token,
            at: self.clock,
        });
        self.remaining = self.config.buffer_time;
        true
    }

    /// Record the stick direction for this tick.
    ///
    /// Only a change of direction produces a token; holding a direction
    /// leaves the chain alone. Returns true if a token was appended.
    pub fn record_direction(&mut self, direction: DirectionalToken) -> bool {
        if self.last_direction == Some(direction) {
            return false;
        }
        self.last_direction = Some(direction);
        self.push(direction.into())
    }

    /// Record one tick of input and report a gesture completed by it.
    ///
    /// The stick is read relative to `facing`. Button presses are only
    /// recorded when `buttons` is set; the caller passes false while the
    /// character is limited to movement.
    pub fn record(&mut self, sample: &InputSample, facing: f32, buttons: bool) -> Option<Gesture> {
        let direction = DirectionalToken::from_input(sample.movement, facing);
        let moved = self.record_direction(direction);
        let gesture = (moved && self.detect(Gesture::DashForward)).then_some(Gesture::DashForward);

        if buttons {
            if sample.jump_pressed {
                self.push(Button::Jump.into());
            }
            if sample.attack_pressed {
                self.push(Button::Attack.into());
            }
        }

        gesture
    }

    /// The last `buffer_length + 1` entries, oldest first
    pub fn recent(&self) -> &[ChainEntry] {
        let start = self.chain.len().saturating_sub(self.config.window());
        &self.chain[start..]
    }

    /// Check whether the recent window completes a gesture
    pub fn detect(&self, gesture: Gesture) -> bool {
        let recent = self.recent();
        match gesture {
            Gesture::DashForward => {
                let newest_is_forward = recent
                    .last()
                    .is_some_and(|entry| entry.token == InputToken::FORWARD);
                let forwards = recent
                    .iter()
                    .filter(|entry| entry.token == InputToken::FORWARD)
                    .count();
                newest_is_forward && forwards >= 2
            }
        }
    }

    /// Clear the chain immediately
    pub fn flush(&mut self) {
        self.chain.clear();
        self.remaining = Duration::ZERO;
    }

    /// Whole chain, oldest first
    pub fn chain(&self) -> &[ChainEntry] {
        &self.chain
    }

    /// Chain rendered as text, e.g. `"656J"`
    pub fn chain_string(&self) -> String {
        self.chain.iter().map(|entry| entry.token.symbol()).collect()
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }
}

impl Default for InputBuffer {
    fn default() -> Self {
        Self::new(BufferConfig::default())
    }
}
