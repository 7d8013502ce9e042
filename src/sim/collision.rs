//! Axis-aligned collision detection and the default elastic bounce
//!
//! Every entity in the level is a box. Overlap is a plain AABB test; the
//! default response reflects the ball along whichever axis it entered on.

use glam::Vec2;

/// Axis-aligned box described by its centre and full size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub const fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    #[inline]
    pub fn half_size(&self) -> Vec2 {
        self.size * 0.5
    }

    #[inline]
    pub fn min(&self) -> Vec2 {
        self.pos - self.half_size()
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.pos + self.half_size()
    }

    /// Strict overlap test (touching edges do not count)
    pub fn overlaps(&self, other: &Aabb) -> bool {
        let delta = (self.pos - other.pos).abs() * 2.0;
        let both = self.size + other.size;
        delta.x < both.x && delta.y < both.y
    }
}

/// Which velocity components the default bounce flipped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BounceAxes {
    pub x: bool,
    pub y: bool,
}

/// Default elastic bounce of a moving box off a static one
///
/// `old_pos` is where the mover was before this tick's integration step. If
/// the mover already overlapped the obstacle's vertical band it came in from
/// the side, so x is reflected; if it overlapped the horizontal band it came
/// in from above or below, so y is reflected. A pure corner entry reflects y.
/// The reflected axis is also restored to its pre-step position.
pub fn elastic_bounce(
    pos: &mut Vec2,
    vel: &mut Vec2,
    old_pos: Vec2,
    size: Vec2,
    obstacle: &Aabb,
    elasticity: f32,
) -> BounceAxes {
    let size_both = size + obstacle.size;
    let blocked_x = (old_pos.y - obstacle.pos.y).abs() * 2.0 < size_both.y;
    let blocked_y = (old_pos.x - obstacle.pos.x).abs() * 2.0 < size_both.x;

    let mut axes = BounceAxes::default();
    if blocked_y || !blocked_x {
        pos.y = old_pos.y;
        vel.y *= -elasticity;
        axes.y = true;
    }
    if blocked_x {
        pos.x = old_pos.x;
        vel.x *= -elasticity;
        axes.x = true;
    }
    axes
}
