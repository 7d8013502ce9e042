//! Cosmetic particle bursts
//!
//! Particles never affect gameplay; they exist only to be drawn.

use glam::Vec2;
use rand::Rng;

/// Emitter parameters for a one-shot burst
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BurstParams {
    /// Seconds the emitter stays active
    pub emit_time: f32,
    /// Particles per second while active
    pub emit_rate: f32,
    /// Half-angle of the emission cone around "up" (radians)
    pub cone_angle: f32,
    /// Initial speed (units per tick)
    pub speed: f32,
    pub size_start: f32,
    pub size_end: f32,
    /// Seconds each particle lives
    pub lifetime: f32,
    pub color_start: [f32; 4],
    pub color_end: [f32; 4],
    /// Relative jitter applied to speed, size and lifetime
    pub randomness: f32,
}

impl BurstParams {
    /// Brick break: brief expanding white puff that fades out
    pub const BRICK_BREAK: Self = Self {
        emit_time: 0.1,
        emit_rate: 100.0,
        cone_angle: std::f32::consts::PI,
        speed: 0.1,
        size_start: 0.1,
        size_end: 1.0,
        lifetime: 0.5,
        color_start: [1.0, 1.0, 1.0, 1.0],
        color_end: [1.0, 1.0, 1.0, 0.0],
        randomness: 0.2,
    };

    /// Number of particles one burst produces
    pub fn count(&self) -> usize {
        (self.emit_time * self.emit_rate).round().max(0.0) as usize
    }
}

/// A particle for visual effects
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub age: f32,
    pub lifetime: f32,
    pub size_start: f32,
    pub size_end: f32,
    pub color_start: [f32; 4],
    pub color_end: [f32; 4],
}

impl Particle {
    /// Normalized age, 0 at birth and 1 at death
    #[inline]
    pub fn progress(&self) -> f32 {
        if self.lifetime <= 0.0 {
            1.0
        } else {
            (self.age / self.lifetime).clamp(0.0, 1.0)
        }
    }

    pub fn size(&self) -> f32 {
        let t = self.progress();
        self.size_start + (self.size_end - self.size_start) * t
    }

    pub fn color(&self) -> [f32; 4] {
        let t = self.progress();
        let mut color = [0.0; 4];
        for (i, c) in color.iter_mut().enumerate() {
            *c = self.color_start[i] + (self.color_end[i] - self.color_start[i]) * t;
        }
        color
    }

    pub fn is_alive(&self) -> bool {
        self.age < self.lifetime
    }
}

/// Maximum particles
pub const MAX_PARTICLES: usize = 256;

fn jitter<R: Rng>(rng: &mut R, value: f32, randomness: f32) -> f32 {
    if randomness <= 0.0 {
        return value;
    }
    value * (1.0 + rng.random_range(-randomness..randomness))
}

/// Spawn one particle at `pos`; dropped once the cap is reached
pub fn emit_particle<R: Rng>(
    rng: &mut R,
    particles: &mut Vec<Particle>,
    pos: Vec2,
    params: &BurstParams,
) {
    if particles.len() >= MAX_PARTICLES {
        return;
    }
    // Half-angle PI covers every direction
    let angle =
        std::f32::consts::FRAC_PI_2 + rng.random_range(-params.cone_angle..=params.cone_angle);
    let speed = jitter(rng, params.speed, params.randomness);
    particles.push(Particle {
        pos,
        vel: Vec2::from_angle(angle) * speed,
        age: 0.0,
        lifetime: jitter(rng, params.lifetime, params.randomness),
        size_start: jitter(rng, params.size_start, params.randomness),
        size_end: jitter(rng, params.size_end, params.randomness),
        color_start: params.color_start,
        color_end: params.color_end,
    });
}

/// A burst in progress, releasing particles at `emit_rate` for `emit_time`
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleEmitter {
    pub pos: Vec2,
    pub params: BurstParams,
    pub age: f32,
    /// Particles released so far
    pub emitted: usize,
}

impl ParticleEmitter {
    pub fn new(pos: Vec2, params: BurstParams) -> Self {
        Self {
            pos,
            params,
            age: 0.0,
            emitted: 0,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.emitted >= self.params.count()
    }

    /// Age the emitter and release the particles now due
    pub fn update<R: Rng>(&mut self, rng: &mut R, particles: &mut Vec<Particle>, dt: f32) {
        self.age += dt;
        let due = if self.age >= self.params.emit_time {
            self.params.count()
        } else {
            ((self.age * self.params.emit_rate).ceil() as usize).min(self.params.count())
        };
        while self.emitted < due {
            emit_particle(rng, particles, self.pos, &self.params);
            self.emitted += 1;
        }
    }
}

/// Run every emitter for one tick and drop the finished ones
pub fn update_emitters<R: Rng>(
    rng: &mut R,
    emitters: &mut Vec<ParticleEmitter>,
    particles: &mut Vec<Particle>,
    dt: f32,
) {
    for emitter in emitters.iter_mut() {
        emitter.update(rng, particles, dt);
    }
    emitters.retain(|e| !e.is_finished());
}

/// Advance particles by one tick and drop the dead ones
pub fn update_particles(particles: &mut Vec<Particle>, dt: f32) {
    for particle in particles.iter_mut() {
        particle.pos += particle.vel;
        particle.age += dt;
    }
    particles.retain(|p| p.is_alive());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_brick_burst_spreads_over_emit_time() {
        assert_eq!(BurstParams::BRICK_BREAK.count(), 10);

        let mut rng = Pcg32::seed_from_u64(1);
        let mut particles = Vec::new();
        let pos = Vec2::new(4.0, 12.0);
        let mut emitters = vec![ParticleEmitter::new(pos, BurstParams::BRICK_BREAK)];

        update_emitters(&mut rng, &mut emitters, &mut particles, SIM_DT);
        let first_tick = particles.len();
        assert!(first_tick > 0 && first_tick < 10);
        assert_eq!(emitters.len(), 1);

        // 0.1 s at 60 Hz
        for _ in 0..6 {
            update_emitters(&mut rng, &mut emitters, &mut particles, SIM_DT);
        }
        assert_eq!(particles.len(), 10);
        assert!(emitters.is_empty());
        assert!(particles.iter().all(|p| p.pos == pos));
    }

    #[test]
    fn test_emission_respects_cap() {
        let mut rng = Pcg32::seed_from_u64(2);
        let mut particles = Vec::new();
        let mut emitters: Vec<_> = (0..40)
            .map(|_| ParticleEmitter::new(Vec2::ZERO, BurstParams::BRICK_BREAK))
            .collect();
        for _ in 0..10 {
            update_emitters(&mut rng, &mut emitters, &mut particles, SIM_DT);
        }
        assert_eq!(particles.len(), MAX_PARTICLES);
        assert!(emitters.is_empty());
    }

    #[test]
    fn test_particles_fade_and_expire() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut particles = Vec::new();
        for _ in 0..10 {
            emit_particle(&mut rng, &mut particles, Vec2::ZERO, &BurstParams::BRICK_BREAK);
        }

        let first = particles[0].clone();
        assert_eq!(first.color()[3], 1.0);

        update_particles(&mut particles, 0.25);
        assert!(particles.iter().all(|p| p.color()[3] < 1.0));
        assert!(particles.iter().all(|p| p.size() > p.size_start));

        // Lifetime is at most 0.5 * 1.2
        update_particles(&mut particles, 0.4);
        assert!(particles.is_empty());
    }
}
