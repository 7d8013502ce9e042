//! Fixed timestep simulation tick
//!
//! Core game loop that advances the session deterministically. Frame order:
//! ball lifecycle, paddle, ball integration, collisions, particles.

use super::collision::{Aabb, elastic_bounce};
use super::policy::{CollisionResponse, Contact, PolicyEffect, resolve_contact};
use super::state::{Ball, EntityId, GameEvent, GameState, SoundCue, SoundEffect};
use crate::tuning::PolicyTuning;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pointer x in world units (paddle target)
    pub pointer_x: Option<f32>,
    /// Click/tap went down since the last tick
    pub pressed: bool,
    /// Idle/demo mode - AI plays the game
    pub idle_mode: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, tuning: &PolicyTuning, dt: f32) {
    state.time_ticks += 1;

    // Idle/demo mode - track the ball and serve automatically
    let mut input = input.clone();
    if input.idle_mode {
        match &state.ball {
            Some(ball) => {
                // Small oscillating offset so the rebound angle varies
                let time_factor = state.time_ticks as f32 * 0.01;
                let offset = time_factor.sin() * 1.5;
                input.pointer_x = Some(ball.body.pos.x + offset);
            }
            None => input.pressed = true,
        }
    }
    let input = &input;

    // Ball lifecycle
    if state.ball.as_ref().is_some_and(Ball::is_below_floor) {
        state.destroy_ball();
    }
    if state.ball.is_none() && input.pressed {
        state.spawn_ball();
    }

    if let Some(x) = input.pointer_x {
        state.paddle.follow(x);
    }

    step_ball(state, tuning);

    state.update_effects(dt);
}

/// Integrate the ball and resolve its contacts
fn step_ball(state: &mut GameState, tuning: &PolicyTuning) {
    let Some(mut ball) = state.ball.take() else {
        return;
    };

    let old_pos = ball.body.pos;
    ball.body.pos += ball.vel;

    // Stable contact order: walls, bricks by id, paddle
    let mut obstacles: Vec<(Aabb, Contact)> =
        Vec::with_capacity(state.walls.len() + state.bricks.len() + 1);
    obstacles.extend(state.walls.iter().map(|w| (w.body, Contact::Wall)));
    obstacles.extend(state.bricks.iter().map(|b| {
        (
            b.body,
            Contact::Brick {
                id: b.id,
                pos: b.body.pos,
            },
        )
    }));
    obstacles.push((
        state.paddle.body,
        Contact::Paddle {
            x: state.paddle.body.pos.x,
        },
    ));

    let mut broken: Vec<EntityId> = Vec::new();
    for (body, contact) in &obstacles {
        if !ball.body.overlaps(body) {
            continue;
        }

        let outcome = resolve_contact(&ball, contact, tuning);
        for effect in &outcome.effects {
            match *effect {
                PolicyEffect::BounceSound { pos, speed } => {
                    let pitch = speed / crate::ball_start_speed();
                    state.events.push(GameEvent::Sound(
                        SoundCue::new(SoundEffect::Bounce).at(pos).with_pitch(pitch),
                    ));
                }
                PolicyEffect::BreakBrick { id, .. } => {
                    if !broken.contains(&id) {
                        broken.push(id);
                    }
                }
            }
        }

        match outcome.response {
            CollisionResponse::AllowDefault(vel) => {
                ball.vel = vel;
                elastic_bounce(
                    &mut ball.body.pos,
                    &mut ball.vel,
                    old_pos,
                    ball.body.size,
                    body,
                    ball.elasticity,
                );
            }
            CollisionResponse::Override(vel) => ball.vel = vel,
            CollisionResponse::Ignore => {}
        }
    }

    state.ball = Some(ball);

    // Already-removed bricks are a no-op
    for id in broken {
        state.destroy_brick(id);
    }
}
