use serde::{Deserialize, Serialize};

use skyward_core::geometry::{Rect, Vec2};

/// Position, velocity and size of one rectangular actor.
///
/// `pos` is the top-left corner. The body has no collision awareness and
/// clamps nothing; callers enforce speed limits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct KinematicBody {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
}

impl KinematicBody {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            vel: Vec2::ZERO,
            size: Vec2::new(w, h),
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_origin(self.pos, self.size)
    }

    /// Advance x by one tick of horizontal velocity.
    pub fn integrate_horizontal(&mut self) {
        self.pos.x += self.vel.x;
    }

    /// Advance y by one tick of vertical velocity.
    pub fn integrate_vertical(&mut self) {
        self.pos.y += self.vel.y;
    }

    pub fn set_left(&mut self, x: f32) {
        self.pos.x = x;
    }

    pub fn set_right(&mut self, x: f32) {
        self.pos.x = x - self.size.x;
    }

    pub fn set_top(&mut self, y: f32) {
        self.pos.y = y;
    }

    pub fn set_bottom(&mut self, y: f32) {
        self.pos.y = y - self.size.y;
    }

    pub fn center(&self) -> Vec2 {
        self.rect().center()
    }

    /// Move to `pos` and drop all velocity.
    pub fn teleport(&mut self, pos: Vec2) {
        self.pos = pos;
        self.vel = Vec2::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integration_is_axis_separated() {
        let mut body = KinematicBody::new(10.0, 20.0, 32.0, 48.0);
        body.vel = Vec2::new(3.0, -4.0);
        body.integrate_horizontal();
        assert_eq!(body.pos, Vec2::new(13.0, 20.0));
        body.integrate_vertical();
        assert_eq!(body.pos, Vec2::new(13.0, 16.0));
    }

    #[test]
    fn edge_setters_respect_size() {
        let mut body = KinematicBody::new(0.0, 0.0, 32.0, 48.0);
        body.set_right(100.0);
        assert_eq!(body.rect().right(), 100.0);
        body.set_bottom(500.0);
        assert_eq!(body.rect().bottom(), 500.0);
        body.set_left(7.0);
        body.set_top(9.0);
        assert_eq!(body.rect().origin(), Vec2::new(7.0, 9.0));
    }

    #[test]
    fn teleport_clears_velocity() {
        let mut body = KinematicBody::new(0.0, 0.0, 10.0, 10.0);
        body.vel = Vec2::new(5.0, 5.0);
        body.teleport(Vec2::new(100.0, 100.0));
        assert_eq!(body.vel, Vec2::ZERO);
        assert_eq!(body.pos, Vec2::new(100.0, 100.0));
    }
}
