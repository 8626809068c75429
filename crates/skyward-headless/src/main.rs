use tracing_subscriber::EnvFilter;

use skyward_core::input::InputSnapshot;
use skyward_core::simulation::Simulation;
use skyward_platformer::Skyward;
use skyward_platformer::config::GameConfig;
use skyward_platformer::level::load_level_or_default;
use skyward_platformer::level_gen::generate_level;

/// Value of a `--name=value` argument, if present.
fn arg_value(name: &str) -> Option<String> {
    let prefix = format!("--{name}=");
    std::env::args()
        .skip(1)
        .find_map(|a| a.strip_prefix(&prefix).map(String::from))
}

/// Run right the whole time, jump for 12 ticks out of every 45 and dash
/// every 2 seconds.
fn scripted_input(tick: u64) -> InputSnapshot {
    InputSnapshot {
        move_left: false,
        move_right: true,
        jump: tick % 45 < 12,
        dash: tick % 120 == 60,
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = GameConfig::load();
    let ticks = arg_value("ticks")
        .and_then(|t| t.parse::<u64>().ok())
        .unwrap_or(1800);

    let level = match arg_value("seed").and_then(|s| s.parse::<u64>().ok()) {
        Some(seed) => {
            tracing::info!("Generating level from seed {seed}");
            generate_level(seed, &config)
        },
        None => {
            let path = arg_value("level").unwrap_or_else(|| "levels/level1.json".to_string());
            tracing::info!("Loading level {path}");
            load_level_or_default(&path, &config)
        },
    };

    let mut sim = Skyward::new(level, config);
    tracing::info!(
        platforms = sim.level().platforms.len(),
        enemies = sim.state().enemies.len(),
        tick_rate = sim.tick_rate(),
        "Simulation ready"
    );

    for tick in 0..ticks {
        for event in sim.update(&scripted_input(tick)) {
            tracing::info!(tick = sim.tick_count(), ?event);
        }
        if sim.is_finished() {
            break;
        }
    }

    let player = sim.player();
    tracing::info!(
        status = ?sim.status(),
        ticks = sim.tick_count(),
        score = sim.state().score,
        coins = sim.state().coins,
        health = player.health,
        x = player.body.pos.x,
        y = player.body.pos.y,
        "Run finished"
    );
}
