//! Builds the per-frame vertex list from game state
//!
//! Everything is emitted in world units; `world_to_ndc` maps it onto the
//! fixed-size canvas around the camera.

use glam::Vec2;

use super::shapes::push_rect;
use super::vertex::{Vertex, colors};
use crate::consts::{CAMERA_POS, CANVAS_SIZE, LEVEL_SIZE};
use crate::sim::{EntityKind, GameState};

/// Pixels per world unit
pub const CAMERA_SCALE: f32 = 32.0;

/// Size of the outer backdrop drawn behind the level
const BACKDROP_SIZE: f32 = 100.0;

/// Default colour for each entity kind (bricks carry their own)
pub fn kind_color(kind: EntityKind) -> [f32; 4] {
    match kind {
        EntityKind::Wall => colors::WALL,
        EntityKind::Brick => colors::BRICK,
        EntityKind::Paddle => colors::PADDLE,
        EntityKind::Ball => colors::BALL,
    }
}

/// Map a world position to normalized device coordinates
pub fn world_to_ndc(pos: Vec2) -> Vec2 {
    let half_view = Vec2::new(CANVAS_SIZE.0 as f32, CANVAS_SIZE.1 as f32) / (2.0 * CAMERA_SCALE);
    (pos - CAMERA_POS) / half_view
}

/// Map a canvas pixel position (origin top-left) back to world coordinates
pub fn screen_to_world(px: f32, py: f32) -> Vec2 {
    let canvas = Vec2::new(CANVAS_SIZE.0 as f32, CANVAS_SIZE.1 as f32);
    let offset = Vec2::new(px - canvas.x / 2.0, canvas.y / 2.0 - py);
    CAMERA_POS + offset / CAMERA_SCALE
}

/// Vertices for one frame, in world coordinates, back to front
pub fn build_scene(state: &GameState) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((state.bricks.len() + state.particles.len() + 4) * 6);

    push_rect(&mut vertices, CAMERA_POS, Vec2::splat(BACKDROP_SIZE), colors::BACKGROUND);
    push_rect(&mut vertices, CAMERA_POS, LEVEL_SIZE, colors::LEVEL);

    for wall in &state.walls {
        push_rect(&mut vertices, wall.body.pos, wall.body.size, kind_color(EntityKind::Wall));
    }
    for brick in &state.bricks {
        push_rect(&mut vertices, brick.body.pos, brick.body.size, brick.color);
    }
    push_rect(
        &mut vertices,
        state.paddle.body.pos,
        state.paddle.body.size,
        kind_color(EntityKind::Paddle),
    );
    if let Some(ball) = &state.ball {
        push_rect(&mut vertices, ball.body.pos, ball.body.size, kind_color(EntityKind::Ball));
    }
    for particle in &state.particles {
        push_rect(&mut vertices, particle.pos, Vec2::splat(particle.size()), particle.color());
    }

    vertices
}
