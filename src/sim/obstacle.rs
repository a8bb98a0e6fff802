//! Obstacle field: spawning, gap repair, downward motion and culling

use glam::Vec2;
use rand::Rng;
use rand::seq::index;
use serde::Serialize;

use super::collision::Rect;
use crate::config::GameConfig;

/// A falling obstacle
#[derive(Debug, Clone, Serialize)]
pub struct Obstacle {
    /// Top-left corner (negative y while above the viewport)
    pub pos: Vec2,
    pub size: Vec2,
    /// Downward speed (pixels per frame)
    pub speed: f32,
    /// Sprite variant, cosmetic only
    pub kind: u8,
    /// Tilt amplitude, cosmetic only
    pub rotation: f32,
}

impl Obstacle {
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }
}

/// Outcome of one spawn batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpawnReport {
    pub spawned: usize,
    /// A random obstacle was removed because no passable gap remained
    pub repaired: bool,
}

/// Spawn 1..=`max_spawn_batch` obstacles above the screen.
///
/// Each obstacle takes a distinct screen section. Afterwards, if the whole
/// field has no horizontal gap of at least `min_gap`, one random obstacle is
/// removed. A single removal does not always restore a passable gap.
pub fn spawn_batch<R: Rng>(
    obstacles: &mut Vec<Obstacle>,
    config: &GameConfig,
    rng: &mut R,
) -> SpawnReport {
    let count = rng.random_range(1..=config.max_spawn_batch.min(config.spawn_sections));
    let section_width = config.section_width();

    for section in index::sample(rng, config.spawn_sections, count) {
        let width = rng.random_range(config.obstacle_min_width..config.obstacle_max_width);
        let height = width * config.obstacle_aspect;
        let section_start = section as f32 * section_width;
        let x = section_start + rng.random::<f32>() * (section_width - width);

        obstacles.push(Obstacle {
            pos: Vec2::new(x, -height),
            size: Vec2::new(width, height),
            speed: rng.random_range(config.obstacle_min_speed..config.obstacle_max_speed),
            kind: rng.random_range(0..3),
            rotation: rng.random::<f32>() * 0.1 - 0.05,
        });
    }

    let min_gap = config.min_gap();
    let passable = find_gaps(obstacles, config.width)
        .iter()
        .any(|&gap| gap >= min_gap);

    let repaired = !passable && !obstacles.is_empty();
    if repaired {
        let victim = rng.random_range(0..obstacles.len());
        obstacles.remove(victim);
        log::debug!("No gap >= {min_gap}, removed obstacle {victim}");
    }

    SpawnReport {
        spawned: count,
        repaired,
    }
}

/// Positive horizontal gaps between obstacles, including both screen edges
pub fn find_gaps(obstacles: &[Obstacle], screen_width: f32) -> Vec<f32> {
    if obstacles.is_empty() {
        return vec![screen_width];
    }

    let mut sorted: Vec<&Obstacle> = obstacles.iter().collect();
    sorted.sort_by(|a, b| a.pos.x.total_cmp(&b.pos.x));

    let mut gaps = Vec::with_capacity(sorted.len() + 1);
    if sorted[0].pos.x > 0.0 {
        gaps.push(sorted[0].pos.x);
    }
    for pair in sorted.windows(2) {
        let gap = pair[1].pos.x - pair[0].rect().right();
        if gap > 0.0 {
            gaps.push(gap);
        }
    }
    let last_right = sorted[sorted.len() - 1].rect().right();
    if last_right < screen_width {
        gaps.push(screen_width - last_right);
    }
    gaps
}

/// Move every obstacle down and drop the ones past the bottom edge.
///
/// Returns the score earned: one point per removed obstacle whose index in
/// the pre-removal list is even.
pub fn advance_obstacles(obstacles: &mut Vec<Obstacle>, screen_height: f32) -> u64 {
    let mut earned = 0;
    let mut index = 0;
    obstacles.retain_mut(|obstacle| {
        obstacle.pos.y += obstacle.speed;
        let gone = obstacle.pos.y > screen_height;
        if gone && index % 2 == 0 {
            earned += 1;
        }
        index += 1;
        !gone
    });
    earned
}
