//! Destruction bursts (visual only, no gameplay effect)

use glam::Vec2;
use rand::Rng;
use serde::Serialize;

use super::obstacle::Obstacle;

/// Burst colors (0xRRGGBB)
const PARTICLE_COLORS: [u32; 3] = [0xff0000, 0xff9900, 0xffff00];
const FLASH_COLOR: u32 = 0xffff00;

/// A single spark
#[derive(Debug, Clone, Serialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub color: u32,
    pub alpha: f32,
    /// Alpha lost per frame
    pub decay: f32,
}

/// Expanding flash plus sparks at a destroyed obstacle
#[derive(Debug, Clone, Serialize)]
pub struct Effect {
    pub pos: Vec2,
    pub radius: f32,
    pub max_radius: f32,
    pub alpha: f32,
    pub color: u32,
    pub particles: Vec<Particle>,
}

impl Effect {
    pub fn burst<R: Rng>(obstacle: &Obstacle, rng: &mut R) -> Self {
        let pos = obstacle.rect().center();
        let count = rng.random_range(10..20);
        let particles = (0..count)
            .map(|_| {
                let angle = rng.random::<f32>() * std::f32::consts::TAU;
                let speed: f32 = rng.random_range(1.0..4.0);
                Particle {
                    pos,
                    vel: Vec2::from_angle(angle) * speed,
                    radius: rng.random_range(2.0..6.0),
                    color: PARTICLE_COLORS[rng.random_range(0..PARTICLE_COLORS.len())],
                    alpha: 1.0,
                    decay: rng.random_range(0.01..0.04),
                }
            })
            .collect();

        Self {
            pos,
            radius: 10.0,
            max_radius: 40.0,
            alpha: 1.0,
            color: FLASH_COLOR,
            particles,
        }
    }

    /// One frame of growth and fade. Returns false once fully faded.
    pub fn update(&mut self) -> bool {
        self.radius += 2.0;
        self.alpha -= 0.05;
        for particle in &mut self.particles {
            particle.pos += particle.vel;
            particle.alpha -= particle.decay;
        }
        self.particles.retain(|p| p.alpha > 0.0);
        self.alpha > 0.0
    }
}

pub fn update_effects(effects: &mut Vec<Effect>) {
    effects.retain_mut(Effect::update);
}
