//! Collision detection
//!
//! Two tests only: axis-aligned overlap between the player hitbox and an
//! obstacle, and the wave ring sweeping across obstacle centers.

use glam::Vec2;
use serde::Serialize;

use super::obstacle::Obstacle;

/// Axis-aligned rectangle (top-left origin)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    /// Strict overlap on both axes; touching edges do not count
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.pos.x < other.right()
            && self.right() > other.pos.x
            && self.pos.y < other.bottom()
            && self.bottom() > other.pos.y
    }
}

/// Whether an obstacle center lies on the ring `[radius - half_width, radius + half_width]`
pub fn in_wave_ring(center: Vec2, radius: f32, half_width: f32, point: Vec2) -> bool {
    let distance = point.distance(center);
    distance >= radius - half_width && distance <= radius + half_width
}

/// Split out the obstacles the ring currently covers.
///
/// Survivors stay in `obstacles` in their original order; the hit ones are
/// returned.
pub fn wave_sweep(
    obstacles: &mut Vec<Obstacle>,
    center: Vec2,
    radius: f32,
    half_width: f32,
) -> Vec<Obstacle> {
    let (hit, kept): (Vec<_>, Vec<_>) = obstacles
        .drain(..)
        .partition(|o| in_wave_ring(center, radius, half_width, o.rect().center()));
    *obstacles = kept;
    hit
}

/// Index of the first obstacle overlapping the hitbox
pub fn first_hit(hitbox: &Rect, obstacles: &[Obstacle]) -> Option<usize> {
    obstacles.iter().position(|o| hitbox.overlaps(&o.rect()))
}
