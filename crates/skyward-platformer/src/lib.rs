pub mod body;
pub mod collision;
pub mod config;
pub mod enemy;
pub mod events;
pub mod level;
pub mod level_gen;
pub mod platforms;
pub mod player;

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use skyward_core::input::InputSnapshot;
use skyward_core::simulation::Simulation;
use skyward_core::simulation_boilerplate;

use config::{GameConfig, PlayerConfig};
use enemy::{ContactIntent, Enemy};
use events::SimEvent;
use level::{CollectibleKind, Level, default_level};
use player::{DamageOutcome, Player};

/// Where the current run stands. Only `Running` advances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunStatus {
    Running,
    LevelComplete,
    GameOver,
}

/// Everything that changes during a run; snapshotted by
/// `serialize_state`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkywardState {
    pub player: Player,
    pub level: Level,
    pub enemies: Vec<Enemy>,
    pub score: u32,
    pub coins: u32,
    pub tick: u64,
    pub status: RunStatus,
}

/// Single-player platformer run over one level.
pub struct Skyward {
    config: GameConfig,
    state: SkywardState,
    paused: bool,
}

impl Skyward {
    pub fn new(level: Level, config: GameConfig) -> Self {
        let player = Player::new(level.spawn_point(), &config.player);
        let enemies = spawn_enemies(&level, &config);
        Self {
            state: SkywardState {
                player,
                level,
                enemies,
                score: 0,
                coins: 0,
                tick: 0,
                status: RunStatus::Running,
            },
            config,
            paused: false,
        }
    }

    pub fn state(&self) -> &SkywardState {
        &self.state
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn player(&self) -> &Player {
        &self.state.player
    }

    pub fn level(&self) -> &Level {
        &self.state.level
    }

    pub fn status(&self) -> RunStatus {
        self.state.status
    }

    /// Retry the level: platforms, pickups and enemies are rebuilt, and the
    /// player respawns at the level's spawn point (the checkpoint once it is
    /// active) with full health and idle timers.
    pub fn restart(&mut self) {
        let state = &mut self.state;
        state.level.reset();
        state
            .player
            .reset(state.level.spawn_point(), &self.config.player);
        state.enemies = spawn_enemies(&state.level, &self.config);
        state.score = 0;
        state.coins = 0;
        state.tick = 0;
        state.status = RunStatus::Running;
        tracing::debug!(
            x = state.player.body.pos.x,
            y = state.player.body.pos.y,
            "Run restarted"
        );
    }
}

impl Default for Skyward {
    fn default() -> Self {
        let config = GameConfig::default();
        Self::new(default_level(&config), config)
    }
}

impl Simulation for Skyward {
    type Input = InputSnapshot;
    type Event = SimEvent;

    fn update(&mut self, input: &InputSnapshot) -> Vec<SimEvent> {
        if self.paused || self.state.status != RunStatus::Running {
            return Vec::new();
        }

        let cfg = &self.config;
        let state = &mut self.state;
        state.tick += 1;
        let mut events = Vec::new();

        // World, then the player against it
        state.level.update_platforms(cfg);
        let tick = state
            .player
            .update(input, &mut state.level.platforms, cfg);
        if tick.dashed {
            events.push(SimEvent::DashStarted);
        }
        if let Some(kind) = tick.jumped {
            events.push(SimEvent::Jumped { kind });
        }
        if let Some(impact_speed) = tick.landed {
            events.push(SimEvent::Landed { impact_speed });
        }
        if tick.wall_sliding {
            events.push(SimEvent::WallSliding {
                side: state.player.wall,
            });
        }

        // Hazards
        if state.level.hazard_at(&state.player.rect()).is_some() {
            hurt_player(&mut state.player, &cfg.player, &mut events);
        }

        // Collectibles
        for kind in state.level.collect_at(&state.player.rect()) {
            match kind {
                CollectibleKind::Coin => {
                    state.coins += 1;
                    state.score += cfg.scoring.coin_value;
                    events.push(SimEvent::CoinCollected);
                },
                CollectibleKind::PowerUp => {
                    state.player.grant_power_up(&cfg.player);
                    events.push(SimEvent::PowerUpCollected);
                },
            }
        }

        // Enemies
        for enemy in &mut state.enemies {
            enemy.update(&state.player, &state.level.platforms, cfg);
            match enemy.contact(&state.player, &cfg.enemies) {
                Some(ContactIntent::Stomp) => {
                    events.push(SimEvent::EnemyStomped);
                    state.player.bounce(cfg.player.stomp_bounce);
                    if enemy.take_damage(1, &cfg.enemies) {
                        state.score += cfg.scoring.enemy_kill;
                        events.push(SimEvent::EnemyKilled);
                    }
                },
                Some(ContactIntent::DamagePlayer) => {
                    hurt_player(&mut state.player, &cfg.player, &mut events);
                },
                None => {},
            }
            if enemy.take_projectile_hit(&state.player) {
                hurt_player(&mut state.player, &cfg.player, &mut events);
            }
        }
        state.enemies.retain(|e| e.alive);

        // Checkpoint and goal
        if state.player.is_alive() {
            let rect = state.player.rect();
            if state.level.touch_checkpoint(&rect) {
                events.push(SimEvent::CheckpointReached);
            }
            if state.level.reach_goal(&rect) {
                state.status = RunStatus::LevelComplete;
                events.push(SimEvent::LevelComplete);
            }
        }

        // Terminal checks
        if state
            .player
            .kill_if_out_of_bounds(&cfg.physics, &cfg.player)
        {
            events.push(SimEvent::PlayerDied);
        }
        if !state.player.is_alive() {
            state.status = RunStatus::GameOver;
            tracing::debug!(tick = state.tick, score = state.score, "Game over");
        }

        events
    }

    fn tick_count(&self) -> u64 {
        self.state.tick
    }

    fn tick_rate(&self) -> f32 {
        self.config.tick_rate_hz
    }

    simulation_boilerplate!(state_type: SkywardState);

    fn is_finished(&self) -> bool {
        self.state.status != RunStatus::Running
    }
}

/// One point of contact damage, reported as events.
fn hurt_player(player: &mut Player, p: &PlayerConfig, events: &mut Vec<SimEvent>) {
    match player.take_damage(1, p) {
        DamageOutcome::Ignored => {},
        DamageOutcome::Hurt { health } => events.push(SimEvent::PlayerDamaged { health }),
        DamageOutcome::Killed => {
            events.push(SimEvent::PlayerDamaged { health: 0 });
            events.push(SimEvent::PlayerDied);
        },
    }
}

/// Fresh enemies for `level`. Flying phases come from `config.seed`, so a
/// restart reproduces the same opening.
fn spawn_enemies(level: &Level, config: &GameConfig) -> Vec<Enemy> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    level
        .enemy_spawns
        .iter()
        .map(|spawn| Enemy::spawn(spawn, &mut rng, &config.enemies))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use enemy::{EnemySpawn, EnemySpawnKind};
    use level::{Collectible, Goal, Hazard, HazardKind};
    use platforms::{Platform, SurfaceKind};
    use skyward_core::geometry::{Rect, Vec2};
    use skyward_core::test_helpers::{
        assert_state_changed, contract_garbage_state_ignored, contract_pause_stops_updates,
        contract_state_roundtrip_preserves, contract_update_advances_tick, run_ticks,
    };

    const GROUND_Y: f32 = 500.0;

    /// Flat ground across a 2000-wide level, player standing at x = 100.
    fn flat_level(cfg: &GameConfig) -> Level {
        let mut level = Level::new(
            2000.0,
            800.0,
            Vec2::new(100.0, GROUND_Y - cfg.player.height),
        );
        level.platforms.push(Platform::new(
            Rect::new(0.0, GROUND_Y, 2000.0, 50.0),
            SurfaceKind::Normal,
            &cfg.platforms,
        ));
        level
    }

    fn sim_with(level: Level) -> Skyward {
        Skyward::new(level, GameConfig::default())
    }

    // ================================================================
    // Simulation contract
    // ================================================================

    #[test]
    fn contract_update_advances_tick_default_level() {
        let mut sim = Skyward::default();
        contract_update_advances_tick(&mut sim, &InputSnapshot::NONE);
    }

    #[test]
    fn contract_state_roundtrip() {
        let mut sim = Skyward::default();
        run_ticks(&mut sim, 30, &InputSnapshot::NONE);
        contract_state_roundtrip_preserves(&mut sim);
    }

    #[test]
    fn contract_pause() {
        let mut sim = Skyward::default();
        contract_pause_stops_updates(&mut sim, &InputSnapshot::NONE);
    }

    #[test]
    fn contract_garbage_state() {
        let mut sim = Skyward::default();
        contract_garbage_state_ignored(&mut sim);
    }

    #[test]
    fn snapshot_restores_earlier_state() {
        let mut sim = Skyward::default();
        let saved = sim.serialize_state();
        let right = InputSnapshot {
            move_right: true,
            ..InputSnapshot::NONE
        };
        run_ticks(&mut sim, 20, &right);
        assert_state_changed(&sim, &saved);
        sim.apply_state(&saved);
        assert_eq!(sim.tick_count(), 0);
        assert_eq!(sim.serialize_state(), saved);
    }

    #[test]
    fn tick_rate_comes_from_config() {
        let mut config = GameConfig::default();
        config.tick_rate_hz = 120.0;
        let sim = Skyward::new(flat_level(&config), config);
        assert_eq!(sim.tick_rate(), 120.0);
    }

    // ================================================================
    // Damage and hazards
    // ================================================================

    #[test]
    fn damage_then_hazard_same_tick_costs_one_health() {
        let cfg = GameConfig::default();
        let mut level = flat_level(&cfg);
        level.hazards.push(Hazard {
            rect: Rect::new(0.0, GROUND_Y - 20.0, 400.0, 20.0),
            kind: HazardKind::Spike,
        });
        let mut sim = sim_with(level);

        let outcome = sim.state.player.take_damage(1, &cfg.player);
        assert_eq!(outcome, DamageOutcome::Hurt { health: 2 });
        let events = sim.update(&InputSnapshot::NONE);
        assert_eq!(sim.player().health, 2, "Hazard must respect invincibility");
        assert!(sim.player().is_invincible());
        assert!(!events.iter().any(|e| matches!(e, SimEvent::PlayerDamaged { .. })));

        run_ticks(&mut sim, 88, &InputSnapshot::NONE);
        assert_eq!(
            sim.player().health,
            2,
            "Invincibility should last 90 ticks from the hit"
        );

        let events = sim.update(&InputSnapshot::NONE);
        assert_eq!(sim.player().health, 1);
        assert!(events.contains(&SimEvent::PlayerDamaged { health: 1 }));
    }

    #[test]
    fn hazard_kills_last_health_and_ends_run() {
        let cfg = GameConfig::default();
        let mut level = flat_level(&cfg);
        level.hazards.push(Hazard {
            rect: Rect::new(0.0, GROUND_Y - 20.0, 400.0, 20.0),
            kind: HazardKind::Lava,
        });
        let mut sim = sim_with(level);
        sim.state.player.health = 1;

        let events = sim.update(&InputSnapshot::NONE);
        assert!(events.contains(&SimEvent::PlayerDied));
        assert_eq!(sim.status(), RunStatus::GameOver);
        assert!(sim.is_finished());

        let before = sim.tick_count();
        assert!(sim.update(&InputSnapshot::NONE).is_empty());
        assert_eq!(sim.tick_count(), before, "Finished runs must not advance");
    }

    #[test]
    fn falling_out_of_world_is_game_over() {
        let cfg = GameConfig::default();
        let level = Level::new(2000.0, 800.0, Vec2::new(100.0, 700.0));
        let mut sim = sim_with(level);
        let events = run_ticks(&mut sim, 120, &InputSnapshot::NONE);
        assert!(events.contains(&SimEvent::PlayerDied));
        assert_eq!(sim.status(), RunStatus::GameOver);
        assert!(sim.player().rect().top() > cfg.physics.kill_line());
    }

    // ================================================================
    // Pickups, checkpoint and goal
    // ================================================================

    #[test]
    fn coin_and_power_up_pickup() {
        let cfg = GameConfig::default();
        let mut level = flat_level(&cfg);
        level
            .collectibles
            .push(Collectible::new(105.0, GROUND_Y - 30.0, CollectibleKind::Coin));
        level
            .collectibles
            .push(Collectible::new(110.0, GROUND_Y - 40.0, CollectibleKind::PowerUp));
        let mut sim = sim_with(level);

        let events = sim.update(&InputSnapshot::NONE);
        assert!(events.contains(&SimEvent::CoinCollected));
        assert!(events.contains(&SimEvent::PowerUpCollected));
        assert_eq!(sim.state().coins, 1);
        assert_eq!(sim.state().score, 10);
        assert!(sim.player().is_powered_up());

        let events = sim.update(&InputSnapshot::NONE);
        assert!(!events.contains(&SimEvent::CoinCollected), "Coins are collected once");
        assert_eq!(sim.state().score, 10);
    }

    #[test]
    fn reaching_goal_completes_level() {
        let cfg = GameConfig::default();
        let mut level = flat_level(&cfg);
        level.goal = Some(Goal {
            rect: Rect::new(250.0, GROUND_Y - 50.0, 50.0, 50.0),
        });
        let mut sim = sim_with(level);
        let right = InputSnapshot {
            move_right: true,
            ..InputSnapshot::NONE
        };
        let events = run_ticks(&mut sim, 120, &right);
        assert_eq!(
            events
                .iter()
                .filter(|e| **e == SimEvent::LevelComplete)
                .count(),
            1
        );
        assert_eq!(sim.status(), RunStatus::LevelComplete);
        assert!(sim.level().completed);
    }

    #[test]
    fn restart_respawns_at_activated_checkpoint() {
        let cfg = GameConfig::default();
        let mut level = flat_level(&cfg);
        level.checkpoint = Some(level::Checkpoint {
            rect: Rect::new(90.0, GROUND_Y - 60.0, 40.0, 60.0),
            respawn: Vec2::new(600.0, GROUND_Y - cfg.player.height),
            activated: false,
        });
        level
            .collectibles
            .push(Collectible::new(105.0, GROUND_Y - 30.0, CollectibleKind::Coin));
        let mut sim = sim_with(level);

        let events = sim.update(&InputSnapshot::NONE);
        assert!(events.contains(&SimEvent::CheckpointReached));
        sim.state.player.health = 1;
        sim.state.player.body.teleport(Vec2::new(100.0, 2000.0));
        sim.update(&InputSnapshot::NONE);
        assert_eq!(sim.status(), RunStatus::GameOver);

        sim.restart();
        assert_eq!(sim.status(), RunStatus::Running);
        assert_eq!(sim.tick_count(), 0);
        assert_eq!(sim.player().health, cfg.player.max_health);
        assert_eq!(sim.player().body.pos, Vec2::new(600.0, GROUND_Y - 48.0));
        assert_eq!(sim.state().score, 0);
        assert!(sim.level().collectibles.iter().all(|c| !c.collected));
    }

    // ================================================================
    // Enemies
    // ================================================================

    #[test]
    fn stomp_kills_enemy_and_bounces_player() {
        let cfg = GameConfig::default();
        let mut level = flat_level(&cfg);
        level.spawn = Vec2::new(300.0, 400.0);
        level.enemy_spawns.push(EnemySpawn {
            pos: Vec2::new(300.0, GROUND_Y - 32.0),
            kind: EnemySpawnKind::Patrol { distance: 150.0 },
        });
        let mut sim = sim_with(level);

        let events = run_ticks(&mut sim, 15, &InputSnapshot::NONE);
        assert!(events.contains(&SimEvent::EnemyStomped));
        assert!(events.contains(&SimEvent::EnemyKilled));
        assert_eq!(sim.state().score, cfg.scoring.enemy_kill);
        assert_eq!(sim.player().health, cfg.player.max_health, "Stomps never hurt");
        assert!(sim.state().enemies.is_empty(), "Dead enemies are swept");
    }

    #[test]
    fn walking_into_enemy_hurts() {
        let cfg = GameConfig::default();
        let mut level = flat_level(&cfg);
        level.enemy_spawns.push(EnemySpawn {
            pos: Vec2::new(140.0, GROUND_Y - 32.0),
            kind: EnemySpawnKind::Chaser,
        });
        let mut sim = sim_with(level);

        let events = run_ticks(&mut sim, 30, &InputSnapshot::NONE);
        assert!(events.contains(&SimEvent::PlayerDamaged { health: 2 }));
        assert_eq!(sim.player().health, 2, "Invincibility stops repeat hits");
    }

    #[test]
    fn enemy_phases_are_seeded() {
        let a = Skyward::default();
        let b = Skyward::default();
        assert_eq!(a.state().enemies, b.state().enemies);
    }

    // ================================================================
    // Events
    // ================================================================

    #[test]
    fn jump_and_landing_events() {
        let cfg = GameConfig::default();
        let mut sim = sim_with(flat_level(&cfg));
        sim.update(&InputSnapshot::NONE);

        let jump = InputSnapshot {
            jump: true,
            ..InputSnapshot::NONE
        };
        let events = sim.update(&jump);
        assert!(events.contains(&SimEvent::Jumped {
            kind: player::JumpKind::Ground
        }));

        // Held through the arc so the jump is not cut short
        let events = run_ticks(&mut sim, 60, &jump);
        assert!(
            events
                .iter()
                .any(|e| matches!(e, SimEvent::Landed { impact_speed } if *impact_speed > 0.0)),
            "Coming back down should report a landing"
        );
    }

    #[test]
    fn dash_event() {
        let cfg = GameConfig::default();
        let mut sim = sim_with(flat_level(&cfg));
        let dash = InputSnapshot {
            dash: true,
            ..InputSnapshot::NONE
        };
        let events = sim.update(&dash);
        assert!(events.contains(&SimEvent::DashStarted));
        assert!(sim.player().is_dashing());
    }
}
