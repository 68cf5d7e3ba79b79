use glam::Vec2;

use super::body::StageBody;

/// Minimal arena geometry: one horizontal floor and optional side walls
///
/// This is the reference collision backend used by the demo and the tests.
/// A real game plugs its own [`super::KinematicBody`] in instead.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stage {
    /// Height of the floor surface
    pub floor_y: f32,
    /// Horizontal extent of the floor; `None` means it never ends
    pub floor_span: Option<(f32, f32)>,
    /// Left and right wall positions
    pub walls: Option<(f32, f32)>,
}

impl Stage {
    /// Endless floor at the given height
    pub fn flat(floor_y: f32) -> Self {
        Self {
            floor_y,
            floor_span: None,
            walls: None,
        }
    }

    /// Limit the floor to a platform between `left` and `right`
    pub fn with_floor_span(mut self, left: f32, right: f32) -> Self {
        self.floor_span = Some((left.min(right), left.max(right)));
        self
    }

    /// Add side walls at `left` and `right`
    pub fn with_walls(mut self, left: f32, right: f32) -> Self {
        self.walls = Some((left.min(right), left.max(right)));
        self
    }

    /// Whether a body spanning `left..right` horizontally has floor under it
    pub fn supports(&self, left: f32, right: f32) -> bool {
        match self.floor_span {
            Some((min, max)) => right > min && left < max,
            None => true,
        }
    }

    /// Create a body standing on the floor at `x`
    pub fn spawn_body(&self, x: f32, size: Vec2) -> StageBody {
        StageBody::new(*self, Vec2::new(x, self.floor_y + size.y * 0.5), size)
    }
}

impl Default for Stage {
    fn default() -> Self {
        Self::flat(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::physics::KinematicBody;

    #[test]
    fn test_flat_stage_supports_everywhere() {
        let stage = Stage::flat(0.0);
        assert!(stage.supports(-1000.0, -999.0));
        assert!(stage.supports(999.0, 1000.0));
    }

    #[test]
    fn test_floor_span() {
        let stage = Stage::flat(0.0).with_floor_span(2.0, -2.0);
        assert_eq!(stage.floor_span, Some((-2.0, 2.0)));
        assert!(stage.supports(1.5, 2.5));
        assert!(!stage.supports(2.5, 3.5));
    }

    #[test]
    fn test_spawn_body_stands_on_floor() {
        let stage = Stage::flat(1.0);
        let body = stage.spawn_body(3.0, Vec2::new(1.0, 2.0));
        assert!(body.is_grounded());
        assert_eq!(body.position(), Vec2::new(3.0, 2.0));
    }
}
