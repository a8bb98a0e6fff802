//! Dash Dodge entry point
//!
//! Native builds run a headless session driven by a simple autopilot and
//! print a JSON summary. The browser/mini-game host uses `dash_dodge::wasm`.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use dash_dodge::platform::MemoryStorage;
    use dash_dodge::sim::GameEvent;
    use dash_dodge::{FrameDriver, FrameOutcome, GameConfig};

    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(42u64);
    let frames = args.next().and_then(|s| s.parse().ok()).unwrap_or(3_600u32);
    let config = match std::env::var("DASH_DODGE_CONFIG") {
        Ok(path) => match std::fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|json| GameConfig::from_json(&json).map_err(|e| e.to_string()))
        {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Ignoring config {path}: {e}");
                GameConfig::default()
            }
        },
        Err(_) => GameConfig::default(),
    };

    log::info!("Dash Dodge (native) starting, seed {seed}, {frames} frames");

    let mut driver = FrameDriver::new(config, seed, Box::new(MemoryStorage::new()), 0.0);
    driver.set_loading_progress(100, 0.0);

    let mut hits = 0u32;
    let mut kills = 0u32;
    let mut now = 0.0;
    for _ in 0..frames {
        now += f64::from(dash_dodge::consts::FRAME_MS);

        if driver.state().flags().is_start_screen {
            driver.state_mut().start_game();
        }
        autopilot::steer(&mut driver);

        if driver.frame(now) == FrameOutcome::Failed {
            log::warn!("Frame failed at {now:.0} ms");
        }

        for event in driver.drain_events() {
            match event {
                GameEvent::PlayerHit { .. } => hits += 1,
                GameEvent::ObstacleDestroyed { .. } => kills += 1,
                GameEvent::Notice(notice) => log::debug!("Notice: {}", notice.text),
                GameEvent::GameOver { score, .. } => log::info!("Game over at {score}"),
                _ => {}
            }
        }
        if driver.state().game_over {
            break;
        }
    }

    let state = driver.state();
    let summary = serde_json::json!({
        "seed": seed,
        "frames": state.frame,
        "score": state.score,
        "high_score": state.records.high_score,
        "lives": state.lives,
        "hits": hits,
        "wave_kills": kills,
        "game_over": state.game_over,
    });
    println!("{summary}");
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is dash_dodge::wasm::start, this is just to satisfy the compiler
}

/// Keeps the player under the widest gap and fires skills when useful
#[cfg(not(target_arch = "wasm32"))]
mod autopilot {
    use dash_dodge::FrameDriver;
    use dash_dodge::sim::{Obstacle, find_gaps};

    /// Obstacles closer than this (vertically) count as a threat
    const LOOKAHEAD: f32 = 250.0;

    pub fn steer(driver: &mut FrameDriver) {
        let state = driver.state();
        let player = &state.player;
        let center_x = player.center().x;
        let threats: Vec<Obstacle> = state
            .obstacles
            .iter()
            .filter(|o| o.rect().bottom() > player.pos.y - LOOKAHEAD && o.pos.y < player.pos.y + player.size.y)
            .cloned()
            .collect();

        let target_x = widest_gap_center(&threats, state.config.width);
        let direction = if (target_x - center_x).abs() < player.speed {
            0
        } else if target_x > center_x {
            1
        } else {
            -1
        };
        let urgent = threats.len() >= 2;
        let can_wave = state.score >= state.config.wave_skill_required_score
            && player.wave.cooldown <= 0.0
            && !player.wave.is_active;
        let can_dash = player.dash.cooldown <= 0.0 && !player.dash.is_dashing;

        driver.set_move_direction(direction);
        if urgent && can_wave {
            driver.press_wave();
        } else if direction != 0 && urgent && can_dash {
            driver.press_dash();
        }
    }

    fn widest_gap_center(obstacles: &[Obstacle], width: f32) -> f32 {
        if obstacles.is_empty() {
            return width / 2.0;
        }
        let mut edges: Vec<(f32, f32)> = obstacles.iter().map(|o| (o.pos.x, o.rect().right())).collect();
        edges.sort_by(|a, b| a.0.total_cmp(&b.0));

        let widest = find_gaps(obstacles, width).into_iter().fold(0.0f32, f32::max);
        let mut left = 0.0;
        for (start, end) in edges {
            if start - left >= widest {
                return (left + start) / 2.0;
            }
            left = f32::max(left, end);
        }
        (left + width) / 2.0
    }
}
