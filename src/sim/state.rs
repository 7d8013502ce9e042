//! Game state and core simulation types
//!
//! The session context owns every entity. The ball lives in an `Option`
//! slot, so "at most one ball" holds by construction.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::collision::Aabb;
use super::particles::{
    BurstParams, Particle, ParticleEmitter, update_emitters, update_particles,
};
use crate::consts::*;

/// Stable identifier for destructible entities
pub type EntityId = u32;

/// Entity categories the collision policy dispatches on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Wall,
    Brick,
    Paddle,
    Ball,
}

/// Session lifecycle, derived from the ball slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Waiting for a press to serve a new ball
    NoBall,
    /// A ball is moving
    BallInPlay,
}

/// Invisible static level boundary
#[derive(Debug, Clone, PartialEq)]
pub struct Wall {
    pub body: Aabb,
}

/// A destructible brick
#[derive(Debug, Clone, PartialEq)]
pub struct Brick {
    pub id: EntityId,
    pub body: Aabb,
    /// Purely cosmetic
    pub color: [f32; 4],
}

/// The player's paddle
#[derive(Debug, Clone, PartialEq)]
pub struct Paddle {
    pub body: Aabb,
}

impl Default for Paddle {
    /// Pointer origin clamped into the level, so the left edge touches the wall
    fn default() -> Self {
        Self {
            body: Aabb::new(Vec2::new(crate::clamp_paddle_x(0.0), PADDLE_Y), PADDLE_SIZE),
        }
    }
}

impl Paddle {
    /// Follow the pointer horizontally, keeping the paddle inside the level
    pub fn follow(&mut self, pointer_x: f32) {
        self.body.pos.x = crate::clamp_paddle_x(pointer_x);
    }
}

/// The ball
#[derive(Debug, Clone, PartialEq)]
pub struct Ball {
    pub body: Aabb,
    /// Units per tick
    pub vel: Vec2,
    pub elasticity: f32,
}

impl Ball {
    /// A freshly served ball at `pos` with the fixed launch velocity
    pub fn new(pos: Vec2) -> Self {
        Self {
            body: Aabb::new(pos, BALL_SIZE),
            vel: BALL_START_VEL,
            elasticity: BALL_ELASTICITY,
        }
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.vel.length()
    }

    /// True once the ball has dropped past the paddle
    pub fn is_below_floor(&self) -> bool {
        self.body.pos.y < FLOOR_Y
    }
}

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    /// Ball bounced off anything
    Bounce,
    /// Brick destroyed
    Break,
    /// Ball served
    Start,
}

/// A one-shot sound request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoundCue {
    pub effect: SoundEffect,
    /// World position, `None` for non-positional sounds
    pub pos: Option<Vec2>,
    pub volume: f32,
    /// Frequency multiplier (1.0 = base pitch)
    pub pitch: f32,
}

impl SoundCue {
    pub fn new(effect: SoundEffect) -> Self {
        Self {
            effect,
            pos: None,
            volume: 1.0,
            pitch: 1.0,
        }
    }

    pub fn at(mut self, pos: Vec2) -> Self {
        self.pos = Some(pos);
        self
    }

    pub fn with_pitch(mut self, pitch: f32) -> Self {
        self.pitch = pitch;
        self
    }
}

/// Things that happened during a tick, drained by the front end
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    Sound(SoundCue),
    BallSpawned { pos: Vec2 },
    BallLost { pos: Vec2 },
    BrickBroken { id: EntityId, pos: Vec2 },
    ParticleBurst { pos: Vec2 },
}

/// Complete game session context
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Bricks destroyed this session
    pub score: u64,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub walls: Vec<Wall>,
    /// Remaining bricks (sorted by id)
    pub bricks: Vec<Brick>,
    pub paddle: Paddle,
    pub ball: Option<Ball>,
    /// Visual particles (not gameplay-affecting)
    pub particles: Vec<Particle>,
    /// Bursts still releasing particles
    pub emitters: Vec<ParticleEmitter>,
    /// Spawn particle bursts on brick breaks
    pub particles_enabled: bool,
    /// Events produced since the last drain
    pub events: Vec<GameEvent>,
    rng: Pcg32,
    /// Next entity ID
    next_id: EntityId,
}

impl GameState {
    /// Create a new session with the level laid out
    pub fn new(seed: u64) -> Self {
        let mut state = Self::empty(seed);
        state.build_level();
        state
    }

    /// A session with no walls or bricks, only the paddle
    pub fn empty(seed: u64) -> Self {
        Self {
            seed,
            score: 0,
            time_ticks: 0,
            walls: Vec::new(),
            bricks: Vec::new(),
            paddle: Paddle::default(),
            ball: None,
            particles: Vec::new(),
            emitters: Vec::new(),
            particles_enabled: true,
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn phase(&self) -> SessionPhase {
        if self.ball.is_some() {
            SessionPhase::BallInPlay
        } else {
            SessionPhase::NoBall
        }
    }

    /// Lay out the walls and the brick grid
    fn build_level(&mut self) {
        let level = LEVEL_SIZE;
        let t = WALL_THICKNESS;
        self.walls = vec![
            // left
            Wall {
                body: Aabb::new(Vec2::new(-t / 2.0, level.y / 2.0), Vec2::new(t, WALL_LENGTH)),
            },
            // right
            Wall {
                body: Aabb::new(
                    Vec2::new(level.x + t / 2.0, level.y / 2.0),
                    Vec2::new(t, WALL_LENGTH),
                ),
            },
            // top
            Wall {
                body: Aabb::new(Vec2::new(level.x / 2.0, level.y + t / 2.0), Vec2::new(WALL_LENGTH, t)),
            },
        ];

        let mut x = BRICK_COL_START;
        while x <= level.x - BRICK_MARGIN {
            let mut y = BRICK_ROW_START;
            while y <= level.y - BRICK_MARGIN {
                self.add_brick(Vec2::new(x, y));
                y += BRICK_SIZE.y;
            }
            x += BRICK_SIZE.x;
        }

        log::info!(
            "Level built: {} walls, {} bricks (seed {})",
            self.walls.len(),
            self.bricks.len(),
            self.seed
        );
    }

    /// Add a brick with a random colour
    pub fn add_brick(&mut self, pos: Vec2) -> EntityId {
        let id = self.next_entity_id();
        let color = random_color(&mut self.rng);
        self.bricks.push(Brick {
            id,
            body: Aabb::new(pos, BRICK_SIZE),
            color,
        });
        id
    }

    /// Serve a ball at the camera centre; no-op while one is in play
    pub fn spawn_ball(&mut self) -> bool {
        if self.ball.is_some() {
            return false;
        }
        let ball = Ball::new(CAMERA_POS);
        log::info!("Ball served at ({:.1}, {:.1})", ball.body.pos.x, ball.body.pos.y);
        self.events.push(GameEvent::BallSpawned { pos: ball.body.pos });
        self.events.push(GameEvent::Sound(SoundCue::new(SoundEffect::Start)));
        self.ball = Some(ball);
        true
    }

    /// Remove the ball, returning it if there was one
    pub fn destroy_ball(&mut self) -> Option<Ball> {
        let ball = self.ball.take()?;
        log::info!("Ball lost (score {})", self.score);
        self.events.push(GameEvent::BallLost { pos: ball.body.pos });
        Some(ball)
    }

    /// Destroy a brick and score it
    ///
    /// Returns `None` (and emits nothing) when the brick is already gone.
    pub fn destroy_brick(&mut self, id: EntityId) -> Option<Brick> {
        let idx = self.bricks.iter().position(|b| b.id == id)?;
        let brick = self.bricks.remove(idx);
        let pos = brick.body.pos;
        self.score += 1;

        self.events.push(GameEvent::BrickBroken { id, pos });
        self.events.push(GameEvent::Sound(SoundCue::new(SoundEffect::Break).at(pos)));
        if self.particles_enabled {
            self.emitters.push(ParticleEmitter::new(pos, BurstParams::BRICK_BREAK));
            self.events.push(GameEvent::ParticleBurst { pos });
        }
        Some(brick)
    }

    /// Advance emitters and particles by one tick
    pub fn update_effects(&mut self, dt: f32) {
        update_emitters(&mut self.rng, &mut self.emitters, &mut self.particles, dt);
        update_particles(&mut self.particles, dt);
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

/// Random opaque colour
fn random_color<R: Rng>(rng: &mut R) -> [f32; 4] {
    [rng.random(), rng.random(), rng.random(), 1.0]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_layout() {
        let state = GameState::new(42);
        assert_eq!(state.walls.len(), 3);
        // 18 columns (x = 2..=36) by 7 rows (y = 12..=18)
        assert_eq!(state.bricks.len(), 126);
        assert!(state.bricks.iter().all(|b| b.body.size == BRICK_SIZE));
        assert_eq!(state.phase(), SessionPhase::NoBall);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_brick_colors_are_seeded() {
        let a = GameState::new(7);
        let b = GameState::new(7);
        let c = GameState::new(8);
        assert_eq!(a.bricks[0].color, b.bricks[0].color);
        assert_ne!(a.bricks[0].color, c.bricks[0].color);
    }

    #[test]
    fn test_spawn_ball_only_once() {
        let mut state = GameState::new(1);
        assert!(state.spawn_ball());
        assert!(!state.spawn_ball());
        let ball = state.ball.as_ref().unwrap();
        assert_eq!(ball.body.pos, CAMERA_POS);
        assert_eq!(ball.vel, BALL_START_VEL);
    }

    #[test]
    fn test_destroy_brick_is_idempotent() {
        let mut state = GameState::new(1);
        let id = state.bricks[3].id;
        state.drain_events();

        assert!(state.destroy_brick(id).is_some());
        assert_eq!(state.score, 1);
        let events = state.drain_events();
        assert!(events.iter().any(|e| matches!(e, GameEvent::BrickBroken { .. })));

        assert!(state.destroy_brick(id).is_none());
        assert_eq!(state.score, 1);
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_destroy_ball_without_ball() {
        let mut state = GameState::new(1);
        assert!(state.destroy_ball().is_none());
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_paddle_follow_clamps() {
        let mut paddle = Paddle::default();
        paddle.follow(-5.0);
        assert_eq!(paddle.body.pos.x, PADDLE_SIZE.x / 2.0);
        paddle.follow(50.0);
        assert_eq!(paddle.body.pos.x, LEVEL_SIZE.x - PADDLE_SIZE.x / 2.0);
        assert_eq!(paddle.body.pos.y, PADDLE_Y);
    }
}
