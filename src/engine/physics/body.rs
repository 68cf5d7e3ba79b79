use glam::Vec2;
use std::fmt::Debug;

use super::collision::Bounds;
use super::world::Stage;

/// The movement primitive a character drives once per tick
///
/// The action core never resolves collisions itself. It asks the body whether
/// it stands on something, reads its bounds for hit tests and camera follow,
/// and hands it the tick's movement vector.
pub trait KinematicBody: Debug {
    /// Whether the last move ended resting on ground
    fn is_grounded(&self) -> bool;

    /// Center of the body in world space
    fn position(&self) -> Vec2;

    /// Collision bounds in world space
    fn bounds(&self) -> Bounds;

    /// Move by `delta`, resolving collisions
    fn move_by(&mut self, delta: Vec2);
}

/// Box-shaped body living on a [`Stage`]
#[derive(Debug, Clone)]
pub struct StageBody {
    stage: Stage,
    position: Vec2,
    size: Vec2,
    grounded: bool,
}

impl StageBody {
    /// Place a body on the stage; it snaps to the floor if spawned in it
    pub fn new(stage: Stage, position: Vec2, size: Vec2) -> Self {
        let mut body = Self {
            stage,
            position,
            size,
            grounded: false,
        };
        body.resolve();
        body
    }

    fn half_size(&self) -> Vec2 {
        self.size * 0.5
    }

    /// Push the body out of the walls and floor
    fn resolve(&mut self) {
        let half = self.half_size();

        if let Some((left, right)) = self.stage.walls {
            self.position.x = self.position.x.clamp(left + half.x, right - half.x);
        }

        let feet = self.position.y - half.y;
        let over_floor = self
            .stage
            .supports(self.position.x - half.x, self.position.x + half.x);

        self.grounded = false;
        if over_floor && feet <= self.stage.floor_y {
            self.position.y = self.stage.floor_y + half.y;
            self.grounded = true;
        }
    }
}

impl KinematicBody for StageBody {
    fn is_grounded(&self) -> bool {
        self.grounded
    }

    fn position(&self) -> Vec2 {
        self.position
    }

    fn bounds(&self) -> Bounds {
        Bounds::from_center_size(self.position, self.size)
    }

    fn move_by(&mut self, delta: Vec2) {
        self.position += delta;
        self.resolve();
    }
}
