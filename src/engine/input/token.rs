// Input tokens: the alphabet of the input chain

use glam::Vec2;
use std::fmt;

use crate::core::math::sign;

/// Directional input in numpad notation, relative to facing.
///
/// ```text
/// 7 8 9
/// 4 5 6     6 = toward facing ("forward"), 4 = away ("back")
/// 1 2 3
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DirectionalToken {
    DownBack,
    Down,
    DownForward,
    Back,
    Neutral,
    Forward,
    UpBack,
    Up,
    UpForward,
}

impl DirectionalToken {
    /// Bucket a normalized movement vector into one of nine tokens.
    ///
    /// Horizontal input is read relative to `facing` (+1 right, -1 left), so
    /// the same stick position is "forward" or "back" depending on where the
    /// character looks. A neutral stick is always `Neutral`.
    pub fn from_input(movement: Vec2, facing: f32) -> Self {
        let horizontal = sign(movement.x * facing);
        let vertical = sign(movement.y);

        match (horizontal, vertical) {
            (1, 1) => Self::UpForward,
            (1, -1) => Self::DownForward,
            (1, _) => Self::Forward,
            (-1, 1) => Self::UpBack,
            (-1, -1) => Self::DownBack,
            (-1, _) => Self::Back,
            (_, 1) => Self::Up,
            (_, -1) => Self::Down,
            _ => Self::Neutral,
        }
    }

    /// Numpad digit for this direction
    pub fn numpad(self) -> u8 {
        match self {
            Self::DownBack => 1,
            Self::Down => 2,
            Self::DownForward => 3,
            Self::Back => 4,
            Self::Neutral => 5,
            Self::Forward => 6,
            Self::UpBack => 7,
            Self::Up => 8,
            Self::UpForward => 9,
        }
    }
}

/// Buttons that leave a mark in the input chain when pressed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    Jump,
    Attack,
}

/// A single entry of the input chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputToken {
    Direction(DirectionalToken),
    Button(Button),
}

impl InputToken {
    pub const FORWARD: Self = Self::Direction(DirectionalToken::Forward);

    /// Single character used when printing a chain (`1`-`9`, `J`, `A`)
    pub fn symbol(self) -> char {
        match self {
            Self::Direction(direction) => char::from(b'0' + direction.numpad()),
            Self::Button(Button::Jump) => 'J',
            Self::Button(Button::Attack) => 'A',
        }
    }
}

impl From<DirectionalToken> for InputToken {
    fn from(direction: DirectionalToken) -> Self {
        Self::Direction(direction)
    }
}

impl From<Button> for InputToken {
    fn from(button: Button) -> Self {
        Self::Button(button)
    }
}

impl fmt::Display for InputToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}
