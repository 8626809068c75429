use std::fmt;

use serde::{Deserialize, Serialize};

use skyward_core::geometry::{Rect, Vec2};

use crate::config::GameConfig;
use crate::enemy::{EnemySpawn, EnemySpawnKind, FlightPattern};
use crate::platforms::{MotionPattern, Platform, SurfaceKind};

/// Edge length of a coin pickup.
pub const COIN_SIZE: f32 = 16.0;
/// Edge length of a power-up pickup.
pub const POWER_UP_SIZE: f32 = 24.0;
/// Height of a spike strip sitting on the ground.
pub const SPIKE_HEIGHT: f32 = 24.0;

const DEFAULT_LEVEL_WIDTH: f32 = 3600.0;
const DEFAULT_LEVEL_HEIGHT: f32 = 800.0;
const DEFAULT_SPAWN: [f32; 2] = [100.0, 100.0];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HazardKind {
    Spike,
    Lava,
}

impl HazardKind {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "spike" | "spikes" => Some(Self::Spike),
            "lava" => Some(Self::Lava),
            _ => None,
        }
    }
}

/// Any overlap with a vulnerable player costs one health.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hazard {
    pub rect: Rect,
    pub kind: HazardKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollectibleKind {
    Coin,
    PowerUp,
}

impl CollectibleKind {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "coin" => Some(Self::Coin),
            "powerup" | "power-up" | "power_up" => Some(Self::PowerUp),
            _ => None,
        }
    }

    pub fn size(self) -> f32 {
        match self {
            Self::Coin => COIN_SIZE,
            Self::PowerUp => POWER_UP_SIZE,
        }
    }
}

/// A pickup. Collected items stay in the level flagged `collected`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Collectible {
    pub rect: Rect,
    pub kind: CollectibleKind,
    pub collected: bool,
}

impl Collectible {
    pub fn new(x: f32, y: f32, kind: CollectibleKind) -> Self {
        let size = kind.size();
        Self {
            rect: Rect::new(x, y, size, size),
            kind,
            collected: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub rect: Rect,
    /// Where the player reappears once this checkpoint is active.
    pub respawn: Vec2,
    pub activated: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub rect: Rect,
}

/// A playable level: static geometry plus everything the player can touch.
///
/// Enemies are stored as spawn records; the orchestrator owns the live
/// enemy list and rebuilds it on restart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    pub width: f32,
    pub height: f32,
    pub spawn: Vec2,
    pub platforms: Vec<Platform>,
    pub hazards: Vec<Hazard>,
    pub collectibles: Vec<Collectible>,
    pub enemy_spawns: Vec<EnemySpawn>,
    pub checkpoint: Option<Checkpoint>,
    pub goal: Option<Goal>,
    pub completed: bool,
}

impl Level {
    /// An empty level of the given size.
    pub fn new(width: f32, height: f32, spawn: Vec2) -> Self {
        Self {
            width,
            height,
            spawn,
            platforms: Vec::new(),
            hazards: Vec::new(),
            collectibles: Vec::new(),
            enemy_spawns: Vec::new(),
            checkpoint: None,
            goal: None,
            completed: false,
        }
    }

    /// Advance every platform by one tick.
    pub fn update_platforms(&mut self, cfg: &GameConfig) {
        for platform in &mut self.platforms {
            platform.update(&cfg.physics, &cfg.platforms);
        }
    }

    /// Checkpoint respawn if one was activated, otherwise the level spawn.
    pub fn spawn_point(&self) -> Vec2 {
        match self.checkpoint {
            Some(cp) if cp.activated => cp.respawn,
            _ => self.spawn,
        }
    }

    /// Restore platforms and pickups for a retry. Checkpoint activation
    /// survives.
    pub fn reset(&mut self) {
        self.completed = false;
        for platform in &mut self.platforms {
            platform.reset();
        }
        for collectible in &mut self.collectibles {
            collectible.collected = false;
        }
    }

    /// First hazard overlapping `rect`, if any.
    pub fn hazard_at(&self, rect: &Rect) -> Option<&Hazard> {
        self.hazards.iter().find(|h| h.rect.overlaps(rect))
    }

    /// Mark every uncollected pickup overlapping `rect` as collected and
    /// return their kinds in level order.
    pub fn collect_at(&mut self, rect: &Rect) -> Vec<CollectibleKind> {
        self.collectibles
            .iter_mut()
            .filter(|c| !c.collected && c.rect.overlaps(rect))
            .map(|c| {
                c.collected = true;
                c.kind
            })
            .collect()
    }

    /// Activate the checkpoint on first overlap. Returns `true` only on the
    /// activating tick.
    pub fn touch_checkpoint(&mut self, rect: &Rect) -> bool {
        match &mut self.checkpoint {
            Some(cp) if !cp.activated && cp.rect.overlaps(rect) => {
                cp.activated = true;
                tracing::debug!(x = cp.respawn.x, y = cp.respawn.y, "Checkpoint activated");
                true
            },
            _ => false,
        }
    }

    /// Complete the level on goal overlap. Returns `true` only on the
    /// completing tick.
    pub fn reach_goal(&mut self, rect: &Rect) -> bool {
        if self.completed {
            return false;
        }
        let reached = self.goal.is_some_and(|g| g.rect.overlaps(rect));
        if reached {
            self.completed = true;
            tracing::debug!("Level complete");
        }
        reached
    }

    /// Build a level from its file representation. Unknown type names fall
    /// back to the most common variant and log a warning.
    pub fn from_file(file: &LevelFile, cfg: &GameConfig) -> Self {
        let mut level = Self::new(file.width, file.height, Vec2::new(file.spawn[0], file.spawn[1]));
        level.platforms = file.platforms.iter().map(|p| p.build(cfg)).collect();
        level.hazards = file.hazards.iter().map(HazardRecord::build).collect();
        level.collectibles = file.collectibles.iter().map(CollectibleRecord::build).collect();
        level.enemy_spawns = file.enemies.iter().map(|e| e.build(cfg)).collect();
        level.goal = file.goal.as_ref().map(|g| Goal {
            rect: Rect::new(g.x, g.y, g.width, g.height),
        });
        level.checkpoint = file.checkpoint.as_ref().map(|c| Checkpoint {
            rect: Rect::new(c.x, c.y, c.width, c.height),
            respawn: Vec2::new(c.x, c.y),
            activated: false,
        });
        level
    }
}

// ================================================================
// Level files
// ================================================================

/// JSON level layout. Every top-level field is optional.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelFile {
    pub width: f32,
    pub height: f32,
    pub spawn: [f32; 2],
    pub platforms: Vec<PlatformRecord>,
    pub hazards: Vec<HazardRecord>,
    pub collectibles: Vec<CollectibleRecord>,
    pub enemies: Vec<EnemyRecord>,
    pub goal: Option<GoalRecord>,
    pub checkpoint: Option<CheckpointRecord>,
}

impl Default for LevelFile {
    fn default() -> Self {
        Self {
            width: DEFAULT_LEVEL_WIDTH,
            height: DEFAULT_LEVEL_HEIGHT,
            spawn: DEFAULT_SPAWN,
            platforms: Vec::new(),
            hazards: Vec::new(),
            collectibles: Vec::new(),
            enemies: Vec::new(),
            goal: None,
            checkpoint: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformRecord {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f32>,
}

impl PlatformRecord {
    fn build(&self, cfg: &GameConfig) -> Platform {
        let rect = Rect::new(self.x, self.y, self.width, self.height);
        let surface = match self.kind.as_deref() {
            None => SurfaceKind::Normal,
            Some(name) => SurfaceKind::parse(name).unwrap_or_else(|| {
                tracing::warn!(
                    kind = name,
                    x = self.x,
                    y = self.y,
                    "Unknown platform type, using normal"
                );
                SurfaceKind::Normal
            }),
        };
        let Some(name) = self.pattern.as_deref() else {
            return Platform::new(rect, surface, &cfg.platforms);
        };
        match MotionPattern::parse(name) {
            Some(pattern) => Platform::moving(
                rect,
                surface,
                pattern,
                self.speed.unwrap_or(cfg.platforms.default_speed),
                self.distance.unwrap_or(cfg.platforms.default_distance),
                &cfg.platforms,
            ),
            None => {
                tracing::warn!(
                    pattern = name,
                    x = self.x,
                    y = self.y,
                    "Unknown motion pattern, platform stays static"
                );
                Platform::new(rect, surface, &cfg.platforms)
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HazardRecord {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl HazardRecord {
    fn build(&self) -> Hazard {
        let kind = match self.kind.as_deref() {
            None => HazardKind::Spike,
            Some(name) => HazardKind::parse(name).unwrap_or_else(|| {
                tracing::warn!(kind = name, "Unknown hazard type, using spike");
                HazardKind::Spike
            }),
        };
        Hazard {
            rect: Rect::new(self.x, self.y, self.width, self.height),
            kind,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectibleRecord {
    pub x: f32,
    pub y: f32,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl CollectibleRecord {
    fn build(&self) -> Collectible {
        let kind = match self.kind.as_deref() {
            None => CollectibleKind::Coin,
            Some(name) => CollectibleKind::parse(name).unwrap_or_else(|| {
                tracing::warn!(kind = name, "Unknown collectible type, using coin");
                CollectibleKind::Coin
            }),
        };
        Collectible::new(self.x, self.y, kind)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyRecord {
    pub x: f32,
    pub y: f32,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

impl EnemyRecord {
    fn build(&self, cfg: &GameConfig) -> EnemySpawn {
        let patrol = EnemySpawnKind::Patrol {
            distance: self.distance.unwrap_or(cfg.enemies.patrol_distance),
        };
        let kind = match self.kind.as_deref() {
            None | Some("patrol") => patrol,
            Some("flying") => {
                let pattern = match self.pattern.as_deref() {
                    None => FlightPattern::Sine,
                    Some(name) => FlightPattern::parse(name).unwrap_or_else(|| {
                        tracing::warn!(pattern = name, "Unknown flight pattern, using sine");
                        FlightPattern::Sine
                    }),
                };
                EnemySpawnKind::Flying { pattern }
            },
            Some("shooter") => EnemySpawnKind::Shooter,
            Some("chaser" | "chasing") => EnemySpawnKind::Chaser,
            Some(name) => {
                tracing::warn!(kind = name, "Unknown enemy type, using patrol");
                patrol
            },
        };
        EnemySpawn {
            pos: Vec2::new(self.x, self.y),
            kind,
        }
    }
}

fn default_goal_size() -> f32 {
    50.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalRecord {
    pub x: f32,
    pub y: f32,
    #[serde(default = "default_goal_size")]
    pub width: f32,
    #[serde(default = "default_goal_size")]
    pub height: f32,
}

fn default_checkpoint_width() -> f32 {
    40.0
}

fn default_checkpoint_height() -> f32 {
    60.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckpointRecord {
    pub x: f32,
    pub y: f32,
    #[serde(default = "default_checkpoint_width")]
    pub width: f32,
    #[serde(default = "default_checkpoint_height")]
    pub height: f32,
}

// ================================================================
// Loading
// ================================================================

/// Failure to read or decode a level file.
#[derive(Debug)]
pub enum LevelError {
    Io(std::io::Error),
    Parse(serde_json::Error),
}

impl fmt::Display for LevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelError::Io(e) => write!(f, "level read error: {e}"),
            LevelError::Parse(e) => write!(f, "level parse error: {e}"),
        }
    }
}

impl std::error::Error for LevelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LevelError::Io(e) => Some(e),
            LevelError::Parse(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for LevelError {
    fn from(e: std::io::Error) -> Self {
        LevelError::Io(e)
    }
}

impl From<serde_json::Error> for LevelError {
    fn from(e: serde_json::Error) -> Self {
        LevelError::Parse(e)
    }
}

/// Parse a level from JSON text.
pub fn parse_level(json: &str, cfg: &GameConfig) -> Result<Level, LevelError> {
    let file: LevelFile = serde_json::from_str(json)?;
    Ok(Level::from_file(&file, cfg))
}

/// Load a level from a JSON file.
pub fn load_level_from_file(path: &str, cfg: &GameConfig) -> Result<Level, LevelError> {
    let content = std::fs::read_to_string(path)?;
    parse_level(&content, cfg)
}

/// Load a level from `path`, falling back to [`default_level`] if the file
/// is missing or invalid.
pub fn load_level_or_default(path: &str, cfg: &GameConfig) -> Level {
    match load_level_from_file(path, cfg) {
        Ok(level) => level,
        Err(LevelError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("Level file {path} not found, using the default level");
            default_level(cfg)
        },
        Err(e) => {
            tracing::warn!("Failed to load {path}: {e}, using the default level");
            default_level(cfg)
        },
    }
}

// ================================================================
// Built-in level
// ================================================================

/// The built-in tutorial level: one of every platform type, a wall-jump
/// shaft, two spike strips, a row of coins, one power-up and five enemies.
pub fn default_level(cfg: &GameConfig) -> Level {
    let pc = &cfg.platforms;
    let width = 4800.0;
    let height = cfg.physics.world_bottom;
    let ground_y = height - 50.0;
    let mut level = Level::new(width, height, Vec2::new(100.0, 100.0));

    let solid = |x, y, w, h| Platform::new(Rect::new(x, y, w, h), SurfaceKind::Normal, pc);
    let of = |x, y, w, h, surface| Platform::new(Rect::new(x, y, w, h), surface, pc);

    level.platforms = vec![
        solid(0.0, ground_y, width, 50.0),
        solid(50.0, 500.0, 200.0, 30.0),
        solid(350.0, 450.0, 150.0, 30.0),
        solid(600.0, 400.0, 150.0, 30.0),
        solid(850.0, 350.0, 150.0, 30.0),
        of(1100.0, 400.0, 200.0, 30.0, SurfaceKind::Ice),
        Platform::moving(
            Rect::new(1400.0, 450.0, 120.0, 20.0),
            SurfaceKind::Normal,
            MotionPattern::Vertical,
            2.0,
            150.0,
            pc,
        ),
        of(1700.0, 550.0, 100.0, 20.0, SurfaceKind::Bouncy),
        of(2000.0, 400.0, 80.0, 20.0, SurfaceKind::Falling),
        of(2100.0, 400.0, 80.0, 20.0, SurfaceKind::Falling),
        of(2200.0, 400.0, 80.0, 20.0, SurfaceKind::Falling),
        of(2400.0, 350.0, 150.0, 15.0, SurfaceKind::OneWay),
        of(2400.0, 500.0, 150.0, 15.0, SurfaceKind::OneWay),
        solid(2700.0, 300.0, 30.0, 400.0),
        solid(2900.0, 200.0, 30.0, 500.0),
        solid(3100.0, 300.0, 400.0, 30.0),
    ];

    level.hazards = [(800.0, 100.0), (1500.0, 150.0)]
        .into_iter()
        .map(|(x, w)| Hazard {
            rect: Rect::new(x, ground_y - SPIKE_HEIGHT, w, SPIKE_HEIGHT),
            kind: HazardKind::Spike,
        })
        .collect();

    level.collectibles = (0..10)
        .map(|i| Collectible::new(400.0 + i as f32 * 300.0, 300.0, CollectibleKind::Coin))
        .collect();
    level
        .collectibles
        .push(Collectible::new(1200.0, 300.0, CollectibleKind::PowerUp));

    level.checkpoint = Some(Checkpoint {
        rect: Rect::new(1600.0, 300.0, 40.0, 60.0),
        respawn: Vec2::new(1600.0, 350.0),
        activated: false,
    });
    level.goal = Some(Goal {
        rect: Rect::new(3300.0, 250.0, 50.0, 50.0),
    });

    let at = |x, y, kind| EnemySpawn {
        pos: Vec2::new(x, y),
        kind,
    };
    level.enemy_spawns = vec![
        at(600.0, 350.0, EnemySpawnKind::Patrol { distance: 150.0 }),
        at(1200.0, 350.0, EnemySpawnKind::Patrol { distance: 200.0 }),
        at(
            1500.0,
            200.0,
            EnemySpawnKind::Flying {
                pattern: FlightPattern::Sine,
            },
        ),
        at(2200.0, 250.0, EnemySpawnKind::Shooter),
        at(2800.0, 200.0, EnemySpawnKind::Chaser),
    ];
    level
}
