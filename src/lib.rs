//! Brick Bounce - a minimal Breakout-style arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, collision policy, session lifecycle)
//! - `renderer`: WebGPU rendering pipeline
//! - `audio`: Procedural sound effects
//! - `hud`: Score text
//! - `tuning`: Data-driven collision policy constants
//! - `settings`: Player preferences

pub mod audio;
pub mod hud;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use settings::Settings;
pub use tuning::PolicyTuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    use glam::Vec2;

    /// Fixed simulation timestep (60 Hz, velocities are in units per tick)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Playable level size in world units (y up, origin bottom-left)
    pub const LEVEL_SIZE: Vec2 = Vec2::new(38.0, 20.0);
    /// Camera sits at the level centre; the ball spawns here too
    pub const CAMERA_POS: Vec2 = Vec2::new(LEVEL_SIZE.x * 0.5, LEVEL_SIZE.y * 0.5);
    /// Fixed canvas resolution the view is laid out for
    pub const CANVAS_SIZE: (u32, u32) = (1280, 720);

    /// Paddle defaults
    pub const PADDLE_SIZE: Vec2 = Vec2::new(6.0, 0.5);
    pub const PADDLE_Y: f32 = 1.0;

    /// Ball defaults
    pub const BALL_SIZE: Vec2 = Vec2::new(0.5, 0.5);
    pub const BALL_START_VEL: Vec2 = Vec2::new(-0.1, -0.1);
    /// Ball elasticity used by the default bounce
    pub const BALL_ELASTICITY: f32 = 1.0;
    /// Ball is lost once its y drops below this
    pub const FLOOR_Y: f32 = -1.0;

    /// Brick grid
    pub const BRICK_SIZE: Vec2 = Vec2::new(2.0, 1.0);
    pub const BRICK_ROW_START: f32 = 12.0;
    pub const BRICK_COL_START: f32 = 2.0;
    /// Gap kept between the grid and the side/top walls
    pub const BRICK_MARGIN: f32 = 2.0;

    /// Wall thickness and (generous) length
    pub const WALL_THICKNESS: f32 = 1.0;
    pub const WALL_LENGTH: f32 = 100.0;
}

/// Length of the initial ball velocity, used to normalize sound pitch
#[inline]
pub fn ball_start_speed() -> f32 {
    consts::BALL_START_VEL.length()
}

/// Clamp the paddle centre so the whole paddle stays inside the level
#[inline]
pub fn clamp_paddle_x(x: f32) -> f32 {
    let half = consts::PADDLE_SIZE.x / 2.0;
    x.clamp(half, consts::LEVEL_SIZE.x - half)
}

/// Rotate a vector counter-clockwise by `angle` radians
#[inline]
pub fn rotate(v: Vec2, angle: f32) -> Vec2 {
    Vec2::from_angle(angle).rotate(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_paddle_x() {
        assert_eq!(clamp_paddle_x(-10.0), 3.0);
        assert_eq!(clamp_paddle_x(100.0), 35.0);
        assert_eq!(clamp_paddle_x(12.5), 12.5);
    }

    #[test]
    fn test_rotate_counter_clockwise() {
        let v = rotate(Vec2::X, std::f32::consts::FRAC_PI_2);
        assert!(v.x.abs() < 1e-6);
        assert!((v.y - 1.0).abs() < 1e-6);
    }
}
