//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable contact order (walls, bricks by id, paddle)
//! - No rendering or platform dependencies

pub mod collision;
pub mod particles;
pub mod policy;
pub mod state;
pub mod tick;

pub use collision::{Aabb, BounceAxes, elastic_bounce};
pub use particles::{BurstParams, Particle, ParticleEmitter};
pub use policy::{CollisionResponse, Contact, PolicyEffect, PolicyOutcome, resolve_contact};
pub use state::{
    Ball, Brick, EntityId, EntityKind, GameEvent, GameState, Paddle, SessionPhase, SoundCue,
    SoundEffect, Wall,
};
pub use tick::{TickInput, tick};
