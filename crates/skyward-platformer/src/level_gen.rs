use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use skyward_core::geometry::{Rect, Vec2};

use crate::config::GameConfig;
use crate::enemy::{EnemySpawn, EnemySpawnKind, FlightPattern};
use crate::level::{
    Checkpoint, Collectible, CollectibleKind, Goal, Hazard, HazardKind, Level, SPIKE_HEIGHT,
};
use crate::platforms::{MotionPattern, Platform, SurfaceKind};

/// Width of one procedural section in world units.
const CHUNK_WIDTH: f32 = 600.0;
/// Number of chunks in a generated level, including the flat start chunk.
const NUM_CHUNKS: u32 = 8;
/// Ground thickness.
const GROUND_HEIGHT: f32 = 50.0;
/// Thickness of floating platforms.
const LEDGE_HEIGHT: f32 = 20.0;

/// Generate a deterministic level from a seed.
///
/// The first chunk is flat ground around the spawn; the last holds the goal.
/// A checkpoint sits at the start of the middle chunk.
pub fn generate_level(seed: u64, cfg: &GameConfig) -> Level {
    let width = CHUNK_WIDTH * NUM_CHUNKS as f32;
    let height = cfg.physics.world_bottom;
    let ground_y = height - GROUND_HEIGHT;
    let spawn = Vec2::new(100.0, ground_y - 200.0);
    let mut level = Level::new(width, height, spawn);

    let mut rng = StdRng::seed_from_u64(seed);

    // Spawn chunk
    level.platforms.push(ground(0.0, CHUNK_WIDTH, ground_y, cfg));

    for chunk_idx in 1..NUM_CHUNKS - 1 {
        let base_x = chunk_idx as f32 * CHUNK_WIDTH;
        generate_chunk(&mut level, &mut rng, base_x, ground_y, cfg);
    }

    // Goal chunk
    let last_x = (NUM_CHUNKS - 1) as f32 * CHUNK_WIDTH;
    level.platforms.push(ground(last_x, CHUNK_WIDTH, ground_y, cfg));
    level.goal = Some(Goal {
        rect: Rect::new(width - 150.0, ground_y - 50.0, 50.0, 50.0),
    });

    let cp_x = (NUM_CHUNKS / 2) as f32 * CHUNK_WIDTH + 20.0;
    level.checkpoint = Some(Checkpoint {
        rect: Rect::new(cp_x, ground_y - 260.0, 40.0, 60.0),
        respawn: Vec2::new(cp_x, ground_y - 260.0),
        activated: false,
    });

    level
}

fn ground(x: f32, w: f32, ground_y: f32, cfg: &GameConfig) -> Platform {
    Platform::new(
        Rect::new(x, ground_y, w, GROUND_HEIGHT),
        SurfaceKind::Normal,
        &cfg.platforms,
    )
}

fn ledge(x: f32, y: f32, w: f32, surface: SurfaceKind, cfg: &GameConfig) -> Platform {
    Platform::new(Rect::new(x, y, w, LEDGE_HEIGHT), surface, &cfg.platforms)
}

fn coin_row(level: &mut Level, x: f32, y: f32, count: u32) {
    for i in 0..count {
        level
            .collectibles
            .push(Collectible::new(x + i as f32 * 40.0, y, CollectibleKind::Coin));
    }
}

fn generate_chunk(
    level: &mut Level,
    rng: &mut StdRng,
    base_x: f32,
    ground_y: f32,
    cfg: &GameConfig,
) {
    let pattern = rng.random_range(0u8..5);

    match pattern {
        0 => {
            // Pit bridged by a moving platform
            let pit_start = rng.random_range(150.0..250.0);
            let pit_width = rng.random_range(150.0..250.0);
            level.platforms.push(ground(base_x, pit_start, ground_y, cfg));
            let far = pit_start + pit_width;
            level
                .platforms
                .push(ground(base_x + far, CHUNK_WIDTH - far, ground_y, cfg));
            level.platforms.push(Platform::moving(
                Rect::new(base_x + pit_start + 20.0, ground_y - 120.0, 100.0, LEDGE_HEIGHT),
                SurfaceKind::Normal,
                MotionPattern::Horizontal,
                cfg.platforms.default_speed,
                (pit_width - 120.0).max(20.0) / 2.0,
                &cfg.platforms,
            ));
            coin_row(level, base_x + pit_start + 40.0, ground_y - 200.0, 3);
        },
        1 => {
            // Raised ledges with a power-up and a patrol
            level.platforms.push(ground(base_x, CHUNK_WIDTH, ground_y, cfg));
            let surface = match rng.random_range(0u8..3) {
                0 => SurfaceKind::Ice,
                1 => SurfaceKind::Sticky,
                _ => SurfaceKind::Normal,
            };
            let ledge_y = ground_y - rng.random_range(100.0..180.0);
            let ledge_x = base_x + rng.random_range(50.0..200.0);
            let ledge_w = rng.random_range(150.0..300.0);
            level.platforms.push(ledge(ledge_x, ledge_y, ledge_w, surface, cfg));
            level.collectibles.push(Collectible::new(
                ledge_x + ledge_w / 2.0,
                ledge_y - 40.0,
                CollectibleKind::PowerUp,
            ));
            level.enemy_spawns.push(EnemySpawn {
                pos: Vec2::new(ledge_x + 10.0, ledge_y - 32.0),
                kind: EnemySpawnKind::Patrol {
                    distance: (ledge_w - 50.0).max(0.0),
                },
            });
        },
        2 => {
            // One-way staircase over a bouncy pad
            level.platforms.push(ground(base_x, CHUNK_WIDTH, ground_y, cfg));
            for i in 0..4 {
                let step = i as f32;
                level.platforms.push(ledge(
                    base_x + 80.0 + step * 110.0,
                    ground_y - 90.0 - step * 70.0,
                    100.0,
                    SurfaceKind::OneWay,
                    cfg,
                ));
            }
            level.platforms.push(ledge(
                base_x + 20.0,
                ground_y - LEDGE_HEIGHT,
                60.0,
                SurfaceKind::Bouncy,
                cfg,
            ));
            coin_row(level, base_x + 420.0, ground_y - 400.0, 3);
        },
        3 => {
            // Wall-jump shaft
            level.platforms.push(ground(base_x, CHUNK_WIDTH, ground_y, cfg));
            let gap = rng.random_range(120.0..180.0);
            let wall_h = rng.random_range(300.0..450.0);
            let left_x = base_x + 200.0;
            level.platforms.push(Platform::new(
                Rect::new(left_x, ground_y - wall_h, 30.0, wall_h),
                SurfaceKind::Normal,
                &cfg.platforms,
            ));
            level.platforms.push(Platform::new(
                Rect::new(left_x + gap, ground_y - wall_h - 100.0, 30.0, wall_h),
                SurfaceKind::Normal,
                &cfg.platforms,
            ));
            level.enemy_spawns.push(EnemySpawn {
                pos: Vec2::new(base_x + 450.0, ground_y - 250.0),
                kind: EnemySpawnKind::Flying {
                    pattern: FlightPattern::Vertical,
                },
            });
        },
        _ => {
            // Spike strip crossed on falling platforms
            level.platforms.push(ground(base_x, CHUNK_WIDTH, ground_y, cfg));
            let hz_start = rng.random_range(100.0..200.0);
            let hz_len = rng.random_range(200.0..300.0);
            let kind = if rng.random_bool(0.5) {
                HazardKind::Spike
            } else {
                HazardKind::Lava
            };
            level.hazards.push(Hazard {
                rect: Rect::new(
                    base_x + hz_start,
                    ground_y - SPIKE_HEIGHT,
                    hz_len,
                    SPIKE_HEIGHT,
                ),
                kind,
            });
            let mut x = base_x + hz_start - 40.0;
            while x < base_x + hz_start + hz_len {
                level
                    .platforms
                    .push(ledge(x, ground_y - 130.0, 80.0, SurfaceKind::Falling, cfg));
                x += 100.0;
            }
            if rng.random_bool(0.5) {
                level.enemy_spawns.push(EnemySpawn {
                    pos: Vec2::new(base_x + hz_start + hz_len + 60.0, ground_y - 32.0),
                    kind: EnemySpawnKind::Shooter,
                });
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> GameConfig {
        GameConfig::default()
    }

    #[test]
    fn deterministic_generation() {
        let a = generate_level(42, &cfg());
        let b = generate_level(42, &cfg());
        assert_eq!(a, b, "Same seed must produce the same level");
    }

    #[test]
    fn different_seeds_different_levels() {
        let a = generate_level(42, &cfg());
        let b = generate_level(123, &cfg());
        assert_ne!(a, b, "Different seeds should produce different levels");
    }

    #[test]
    fn spawn_stands_above_ground() {
        let level = generate_level(7, &cfg());
        let spawn = level.spawn;
        let below = level
            .platforms
            .iter()
            .find(|p| p.rect.left() <= spawn.x && p.rect.right() > spawn.x)
            .expect("spawn chunk must have ground");
        assert!(below.rect.top() > spawn.y + cfg().player.height);
    }

    #[test]
    fn goal_sits_on_ground_inside_level() {
        for seed in [1, 42, 999] {
            let level = generate_level(seed, &cfg());
            let goal = level.goal.expect("generated level must have a goal");
            assert!(goal.rect.right() <= level.width);
            assert!(
                level
                    .platforms
                    .iter()
                    .any(|p| p.rect.top() == goal.rect.bottom() && p.rect.left() <= goal.rect.x),
                "Goal should rest on ground (seed {seed})"
            );
        }
    }

    #[test]
    fn geometry_stays_inside_level() {
        for seed in 0..20 {
            let level = generate_level(seed, &cfg());
            for platform in &level.platforms {
                let r = platform.rect;
                assert!(
                    r.left() >= 0.0 && r.right() <= level.width + 1.0,
                    "Platform {r:?} outside level (seed {seed})"
                );
                assert!(r.w > 0.0 && r.h > 0.0, "Platform {r:?} has no area");
            }
        }
    }
}
