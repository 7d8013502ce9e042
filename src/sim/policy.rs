//! Ball collision response policy
//!
//! Decides what happens when the ball touches a wall, a brick or the paddle:
//! whether the default elastic bounce applies, what the ball's velocity
//! becomes, and which side effects fire. The policy is a pure function; the
//! tick applies its outcome.

use glam::Vec2;

use super::state::{Ball, EntityId, EntityKind};
use crate::rotate;
use crate::tuning::PolicyTuning;

/// What the ball touched this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Contact {
    Wall,
    Brick { id: EntityId, pos: Vec2 },
    Paddle { x: f32 },
}

impl Contact {
    pub fn kind(&self) -> EntityKind {
        match self {
            Contact::Wall => EntityKind::Wall,
            Contact::Brick { .. } => EntityKind::Brick,
            Contact::Paddle { .. } => EntityKind::Paddle,
        }
    }
}

/// How the collision should be resolved
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CollisionResponse {
    /// Set the velocity, then let the default elastic bounce reflect it
    AllowDefault(Vec2),
    /// Replace the velocity and skip the default bounce
    Override(Vec2),
    /// Leave the ball untouched
    Ignore,
}

impl CollisionResponse {
    /// Velocity the ball carries into resolution, if it changes
    pub fn velocity(&self) -> Option<Vec2> {
        match *self {
            CollisionResponse::AllowDefault(v) | CollisionResponse::Override(v) => Some(v),
            CollisionResponse::Ignore => None,
        }
    }
}

/// Side effects requested by the policy
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PolicyEffect {
    /// Bounce sound at the ball position, pitched by the new speed
    BounceSound { pos: Vec2, speed: f32 },
    /// Destroy the brick, score it, burst particles and play the break sound
    BreakBrick { id: EntityId, pos: Vec2 },
}

/// Result of running the policy for one contact
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyOutcome {
    pub response: CollisionResponse,
    pub effects: Vec<PolicyEffect>,
}

impl PolicyOutcome {
    fn ignore() -> Self {
        Self {
            response: CollisionResponse::Ignore,
            effects: Vec::new(),
        }
    }
}

/// Next speed on the ramp: 1% faster per bounce by default, capped
#[inline]
pub fn ramp_speed(speed: f32, tuning: &PolicyTuning) -> f32 {
    (tuning.speed_ramp * speed).min(tuning.cap_speed)
}

/// Decide the response for a single ball contact
pub fn resolve_contact(ball: &Ball, contact: &Contact, tuning: &PolicyTuning) -> PolicyOutcome {
    // Ball is already leaving the paddle
    if let Contact::Paddle { .. } = contact {
        if ball.vel.y > 0.0 {
            return PolicyOutcome::ignore();
        }
    }

    let speed = ramp_speed(ball.speed(), tuning);
    let mut vel = ball.vel.normalize_or_zero() * speed;
    log::debug!("ball speed {:.4} ({:?})", speed, contact.kind());

    let mut effects = vec![PolicyEffect::BounceSound {
        pos: ball.body.pos,
        speed,
    }];

    let response = match *contact {
        Contact::Paddle { x } => {
            let delta_x = ball.body.pos.x - x;
            vel = rotate(vel, tuning.angle_control * delta_x);
            vel.y = (-vel.y).max(tuning.min_up_speed);
            CollisionResponse::Override(vel)
        }
        Contact::Brick { id, pos } => {
            effects.push(PolicyEffect::BreakBrick { id, pos });
            CollisionResponse::AllowDefault(vel)
        }
        Contact::Wall => CollisionResponse::AllowDefault(vel),
    };

    PolicyOutcome { response, effects }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ball_at(pos: Vec2, vel: Vec2) -> Ball {
        let mut ball = Ball::new(pos);
        ball.vel = vel;
        ball
    }

    #[test]
    fn test_paddle_pass_through_when_rising() {
        let ball = ball_at(Vec2::new(10.0, 1.2), Vec2::new(0.05, 0.1));
        let outcome = resolve_contact(&ball, &Contact::Paddle { x: 10.0 }, &PolicyTuning::default());
        assert_eq!(outcome.response, CollisionResponse::Ignore);
        assert!(outcome.effects.is_empty());
    }

    #[test]
    fn test_paddle_guard_is_strict() {
        // Horizontal velocity is not "rising", the bounce applies
        let ball = ball_at(Vec2::new(10.0, 1.2), Vec2::new(0.1, 0.0));
        let tuning = PolicyTuning::default();
        let outcome = resolve_contact(&ball, &Contact::Paddle { x: 10.0 }, &tuning);
        let CollisionResponse::Override(v) = outcome.response else {
            panic!("expected override, got {:?}", outcome.response);
        };
        assert!(v.y >= tuning.min_up_speed);
    }

    #[test]
    fn test_wall_ramps_speed_and_allows_default() {
        let ball = ball_at(Vec2::new(37.0, 5.0), Vec2::new(0.1, -0.1));
        let outcome = resolve_contact(&ball, &Contact::Wall, &PolicyTuning::default());
        let CollisionResponse::AllowDefault(v) = outcome.response else {
            panic!("expected default bounce");
        };
        let expected = 1.01 * Vec2::new(0.1, -0.1).length();
        assert!((v.length() - expected).abs() < 1e-6);
        // Direction preserved
        assert!((v.normalize() - Vec2::new(0.1, -0.1).normalize()).length() < 1e-6);
        assert_eq!(outcome.effects.len(), 1);
        assert!(matches!(outcome.effects[0], PolicyEffect::BounceSound { .. }));
    }

    #[test]
    fn test_speed_is_capped() {
        let tuning = PolicyTuning::default();
        let ball = ball_at(Vec2::new(5.0, 5.0), Vec2::new(0.0, 0.299));
        let outcome = resolve_contact(&ball, &Contact::Wall, &tuning);
        let v = outcome.response.velocity().unwrap();
        assert!((v.length() - tuning.cap_speed).abs() < 1e-6);
    }

    #[test]
    fn test_min_up_speed_can_exceed_cap_until_next_bounce() {
        let tuning = PolicyTuning::default();
        // Shallow, fast approach: the upward pin adds speed beyond the cap
        let ball = ball_at(Vec2::new(10.0, 1.4), Vec2::new(0.28, -0.1));
        let v = resolve_contact(&ball, &Contact::Paddle { x: 10.0 }, &tuning)
            .response
            .velocity()
            .unwrap();
        assert_eq!(v.y, tuning.min_up_speed);
        assert!(v.length() > tuning.cap_speed);

        // The next real bounce settles back on the cap
        let ball = ball_at(Vec2::new(10.0, 5.0), v);
        let v = resolve_contact(&ball, &Contact::Wall, &tuning)
            .response
            .velocity()
            .unwrap();
        assert!((v.length() - tuning.cap_speed).abs() < 1e-6);
    }

    #[test]
    fn test_brick_requests_break() {
        let brick_pos = Vec2::new(8.0, 12.0);
        let ball = ball_at(Vec2::new(8.0, 11.3), Vec2::new(0.1, 0.1));
        let outcome = resolve_contact(
            &ball,
            &Contact::Brick {
                id: 7,
                pos: brick_pos,
            },
            &PolicyTuning::default(),
        );
        assert!(matches!(outcome.response, CollisionResponse::AllowDefault(_)));
        assert!(
            outcome
                .effects
                .contains(&PolicyEffect::BreakBrick { id: 7, pos: brick_pos })
        );
    }

    #[test]
    fn test_paddle_center_hit_rebounds_vertically() {
        let ball = ball_at(Vec2::new(10.0, 1.3), Vec2::new(0.0, -0.25));
        let tuning = PolicyTuning::default();
        let outcome = resolve_contact(&ball, &Contact::Paddle { x: 10.0 }, &tuning);
        let v = outcome.response.velocity().unwrap();
        assert!(v.x.abs() < 1e-6);
        assert!((v.y - 0.25 * 1.01).abs() < 1e-6);
    }

    #[test]
    fn test_paddle_right_hit_deflects_right() {
        let incoming = Vec2::new(0.0, -0.2);
        let tuning = PolicyTuning::default();

        let right = ball_at(Vec2::new(12.0, 1.3), incoming);
        let v_right = resolve_contact(&right, &Contact::Paddle { x: 10.0 }, &tuning)
            .response
            .velocity()
            .unwrap();
        assert!(v_right.x > 0.0);

        let left = ball_at(Vec2::new(8.0, 1.3), incoming);
        let v_left = resolve_contact(&left, &Contact::Paddle { x: 10.0 }, &tuning)
            .response
            .velocity()
            .unwrap();
        assert!(v_left.x < 0.0);
        assert!((v_left.x + v_right.x).abs() < 1e-6);
    }

    #[test]
    fn test_paddle_enforces_min_up_speed() {
        // Shallow incoming angle at the paddle edge would leave almost flat
        let ball = ball_at(Vec2::new(13.0, 1.3), Vec2::new(0.2, -0.01));
        let tuning = PolicyTuning::default();
        let v = resolve_contact(&ball, &Contact::Paddle { x: 10.0 }, &tuning)
            .response
            .velocity()
            .unwrap();
        assert!(v.y >= tuning.min_up_speed);
    }

    proptest! {
        #[test]
        fn prop_wall_and_brick_speed_never_decreases(
            vx in -0.3f32..0.3,
            vy in -0.3f32..0.3,
            bounces in 1usize..40,
        ) {
            prop_assume!(Vec2::new(vx, vy).length() > 1e-3);
            let tuning = PolicyTuning::default();
            let mut ball = ball_at(Vec2::new(10.0, 10.0), Vec2::new(vx, vy));
            for i in 0..bounces {
                let before = ball.vel.length();
                let contact = if i % 2 == 0 {
                    Contact::Wall
                } else {
                    Contact::Brick { id: i as EntityId, pos: Vec2::new(10.0, 12.0) }
                };
                let v = resolve_contact(&ball, &contact, &tuning).response.velocity().unwrap();
                let expected = (before * tuning.speed_ramp).min(tuning.cap_speed);
                prop_assert!((v.length() - expected).abs() < 1e-5);
                prop_assert!(v.length() + 1e-6 >= before.min(tuning.cap_speed));
                ball.vel = v;
            }
        }

        #[test]
        fn prop_paddle_bounce_always_rises(
            offset in -3.0f32..3.0,
            vx in -0.3f32..0.3,
            vy in -0.3f32..=0.0,
        ) {
            let tuning = PolicyTuning::default();
            let ball = ball_at(Vec2::new(10.0 + offset, 1.3), Vec2::new(vx, vy));
            let outcome = resolve_contact(&ball, &Contact::Paddle { x: 10.0 }, &tuning);
            let CollisionResponse::Override(v) = outcome.response else {
                return Err(TestCaseError::fail("paddle contact must override"));
            };
            prop_assert!(v.y >= tuning.min_up_speed);
        }
    }
}
