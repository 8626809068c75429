use serde::{Deserialize, Serialize};

/// World physics shared by every actor.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Downward acceleration added to `vel_y` each tick.
    pub gravity: f32,
    /// Maximum downward speed.
    pub terminal_velocity: f32,
    /// Base horizontal velocity retention, applied in the air with no input
    /// and multiplied by the surface friction on landing.
    pub friction: f32,
    /// Lowest visible y coordinate of the world.
    pub world_bottom: f32,
    /// How far below `world_bottom` an actor or platform may fall before it
    /// is removed from play.
    pub kill_margin: f32,
    /// Landing tolerance for one-way platforms.
    pub one_way_tolerance: f32,
    /// Horizontal speeds below this snap to zero.
    pub rest_speed_epsilon: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: 0.8,
            terminal_velocity: 20.0,
            friction: 0.85,
            world_bottom: 800.0,
            kill_margin: 100.0,
            one_way_tolerance: 10.0,
            rest_speed_epsilon: 0.05,
        }
    }
}

impl PhysicsConfig {
    /// y coordinate past which a top edge is out of play.
    pub fn kill_line(&self) -> f32 {
        self.world_bottom + self.kill_margin
    }
}

/// Player movement and ability tuning. Timers are in ticks.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub width: f32,
    pub height: f32,
    pub acceleration: f32,
    pub max_speed: f32,
    /// Ground/coyote jump impulse (negative is up).
    pub jump_velocity: f32,
    pub double_jump_velocity: f32,
    pub dash_speed: f32,
    pub dash_duration: u32,
    pub dash_cooldown: u32,
    /// Downward speed cap while wall sliding.
    pub wall_slide_speed: f32,
    /// Horizontal kick away from the wall.
    pub wall_jump_x: f32,
    pub wall_jump_y: f32,
    pub wall_jump_lockout: u32,
    pub coyote_ticks: u32,
    pub jump_buffer_ticks: u32,
    pub max_health: u32,
    pub invincibility_ticks: u32,
    pub power_up_ticks: u32,
    /// Upward velocity applied after stomping an enemy.
    pub stomp_bounce: f32,
    pub squash_land: f32,
    pub stretch_jump: f32,
    pub squash_recovery: f32,
    /// Minimum impact speed for a touchdown to count as a landing rather
    /// than a resting contact.
    pub landing_threshold: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            width: 32.0,
            height: 48.0,
            acceleration: 0.8,
            max_speed: 6.0,
            jump_velocity: -16.0,
            double_jump_velocity: -14.0,
            dash_speed: 15.0,
            dash_duration: 12,
            dash_cooldown: 40,
            wall_slide_speed: 2.0,
            wall_jump_x: 10.0,
            wall_jump_y: -14.0,
            wall_jump_lockout: 5,
            coyote_ticks: 6,
            jump_buffer_ticks: 8,
            max_health: 3,
            invincibility_ticks: 90,
            power_up_ticks: 300,
            stomp_bounce: -12.0,
            squash_land: 0.7,
            stretch_jump: 1.3,
            squash_recovery: 0.15,
            landing_threshold: 2.0,
        }
    }
}

/// Per-surface tuning for platforms.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformConfig {
    pub friction_normal: f32,
    pub friction_ice: f32,
    pub friction_sticky: f32,
    pub friction_bouncy: f32,
    pub friction_falling: f32,
    pub friction_one_way: f32,
    /// Vertical velocity given to an actor landing on a bouncy platform.
    pub bounce_strength: f32,
    pub bounce_animation_ticks: u32,
    /// Shake duration between a falling platform's trigger and its drop.
    pub fall_delay_ticks: u32,
    pub shake_offset: f32,
    /// Phase advance per tick per unit of speed for sine/circular motion.
    pub motion_rate: f32,
    pub default_speed: f32,
    pub default_distance: f32,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            friction_normal: 1.0,
            friction_ice: 0.4,
            friction_sticky: 1.5,
            friction_bouncy: 1.0,
            friction_falling: 1.0,
            friction_one_way: 1.0,
            bounce_strength: -20.0,
            bounce_animation_ticks: 10,
            fall_delay_ticks: 20,
            shake_offset: 2.0,
            motion_rate: 0.02,
            default_speed: 2.0,
            default_distance: 200.0,
        }
    }
}

/// Enemy behavior tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyConfig {
    pub patrol_speed: f32,
    pub patrol_distance: f32,
    pub chase_speed: f32,
    pub return_speed: f32,
    /// Detection radius for chasers and shooters.
    pub chase_range: f32,
    pub flying_amplitude: f32,
    /// Vertical bob phase advance per tick.
    pub flying_speed: f32,
    pub flying_sweep: f32,
    /// Horizontal sweep and circle phase advance per tick.
    pub flying_sweep_speed: f32,
    pub flying_radius: f32,
    pub shoot_cooldown: u32,
    pub projectile_speed: f32,
    pub projectile_lifetime: u32,
    pub projectile_radius: f32,
    /// How far below an enemy's top the player's bottom may be for a stomp.
    pub stomp_tolerance: f32,
    pub stun_ticks: u32,
    pub health: u32,
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            patrol_speed: 2.0,
            patrol_distance: 200.0,
            chase_speed: 4.0,
            return_speed: 2.0,
            chase_range: 300.0,
            flying_amplitude: 50.0,
            flying_speed: 0.05,
            flying_sweep: 150.0,
            flying_sweep_speed: 0.03,
            flying_radius: 100.0,
            shoot_cooldown: 90,
            projectile_speed: 7.0,
            projectile_lifetime: 120,
            projectile_radius: 6.0,
            stomp_tolerance: 20.0,
            stun_ticks: 20,
            health: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub coin_value: u32,
    pub enemy_kill: u32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            coin_value: 10,
            enemy_kill: 100,
        }
    }
}

/// Top-level simulation configuration, loadable from TOML.
///
/// Passed by reference into every operation; nothing reads tuning values
/// from globals, so tests can run with overridden numbers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub physics: PhysicsConfig,
    pub player: PlayerConfig,
    pub platforms: PlatformConfig,
    pub enemies: EnemyConfig,
    pub scoring: ScoringConfig,
    pub tick_rate_hz: f32,
    /// Seed for enemy phase randomization and generated levels.
    pub seed: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            physics: PhysicsConfig::default(),
            player: PlayerConfig::default(),
            platforms: PlatformConfig::default(),
            enemies: EnemyConfig::default(),
            scoring: ScoringConfig::default(),
            tick_rate_hz: 60.0,
            seed: 42,
        }
    }
}

impl GameConfig {
    /// Load config from `$SKYWARD_CONFIG` or `config/skyward.toml`. Falls back
    /// to defaults if the file is missing or unparseable.
    pub fn load() -> Self {
        let path =
            std::env::var("SKYWARD_CONFIG").unwrap_or_else(|_| "config/skyward.toml".to_string());
        Self::load_from(&path)
    }

    pub fn load_from(path: &str) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str::<GameConfig>(&content) {
                Ok(cfg) => cfg,
                Err(e) => {
                    tracing::warn!("Failed to parse {path}: {e}, using defaults");
                    GameConfig::default()
                },
            },
            Err(_) => GameConfig::default(),
        }
    }
}
