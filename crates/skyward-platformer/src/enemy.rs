use rand::Rng;
use serde::{Deserialize, Serialize};

use skyward_core::geometry::{Rect, Vec2};
use skyward_core::timer::Countdown;

use crate::body::KinematicBody;
use crate::config::{EnemyConfig, GameConfig};
use crate::platforms::Platform;
use crate::player::Player;

/// Patrol, shooter and chaser body size.
pub const GROUND_ENEMY_SIZE: Vec2 = Vec2::new(32.0, 32.0);
/// Flying enemy body size.
pub const FLYING_ENEMY_SIZE: Vec2 = Vec2::new(36.0, 28.0);
/// Width and height of the ledge probe ahead of a patrolling enemy.
const LEDGE_PROBE: f32 = 10.0;
/// Chasers closer than this to home stop moving.
const HOME_SNAP: f32 = 5.0;
/// Range of the random initial phase of flying enemies.
const FLYING_PHASE_RANGE: f32 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlightPattern {
    Sine,
    Circle,
    Vertical,
}

impl FlightPattern {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "sine" => Some(Self::Sine),
            "circle" | "circular" => Some(Self::Circle),
            "vertical" => Some(Self::Vertical),
            _ => None,
        }
    }
}

/// Where and what to spawn. Levels keep these so a restart can rebuild the
/// enemy list from scratch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnemySpawn {
    pub pos: Vec2,
    pub kind: EnemySpawnKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EnemySpawnKind {
    Patrol { distance: f32 },
    Flying { pattern: FlightPattern },
    Shooter,
    Chaser,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub lifetime: Countdown,
    /// Hit the player this tick; removed by the next sweep.
    pub spent: bool,
}

impl Projectile {
    pub fn is_expired(&self) -> bool {
        self.spent || !self.lifetime.is_running()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EnemyKind {
    Patrol {
        origin_x: f32,
        distance: f32,
        direction: f32,
    },
    Flying {
        origin: Vec2,
        pattern: FlightPattern,
        phase: f32,
    },
    Shooter {
        cooldown: Countdown,
        projectiles: Vec<Projectile>,
    },
    Chaser {
        home: Vec2,
        chasing: bool,
    },
}

/// What an enemy overlap means for the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactIntent {
    /// Landed on the enemy from above.
    Stomp,
    DamagePlayer,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub body: KinematicBody,
    pub kind: EnemyKind,
    pub alive: bool,
    pub health: u32,
    pub stun: Countdown,
}

impl Enemy {
    /// Build an enemy from its spawn record. Flying enemies draw their
    /// starting phase from `rng`.
    pub fn spawn<R: Rng>(spawn: &EnemySpawn, rng: &mut R, cfg: &EnemyConfig) -> Self {
        let EnemySpawn { pos, kind } = *spawn;
        let (size, kind) = match kind {
            EnemySpawnKind::Patrol { distance } => (
                GROUND_ENEMY_SIZE,
                EnemyKind::Patrol {
                    origin_x: pos.x,
                    distance,
                    direction: 1.0,
                },
            ),
            EnemySpawnKind::Flying { pattern } => (
                FLYING_ENEMY_SIZE,
                EnemyKind::Flying {
                    origin: pos,
                    pattern,
                    phase: rng.random_range(0.0..FLYING_PHASE_RANGE),
                },
            ),
            EnemySpawnKind::Shooter => (
                GROUND_ENEMY_SIZE,
                EnemyKind::Shooter {
                    cooldown: Countdown::IDLE,
                    projectiles: Vec::new(),
                },
            ),
            EnemySpawnKind::Chaser => (
                GROUND_ENEMY_SIZE,
                EnemyKind::Chaser {
                    home: pos,
                    chasing: false,
                },
            ),
        };
        Self {
            body: KinematicBody::new(pos.x, pos.y, size.x, size.y),
            kind,
            alive: true,
            health: cfg.health.max(1),
            stun: Countdown::IDLE,
        }
    }

    pub fn rect(&self) -> Rect {
        self.body.rect()
    }

    pub fn is_stunned(&self) -> bool {
        self.stun.is_running()
    }

    pub fn projectiles(&self) -> &[Projectile] {
        match &self.kind {
            EnemyKind::Shooter { projectiles, .. } => projectiles,
            _ => &[],
        }
    }

    /// One tick of behavior. Reads the player; never mutates it.
    pub fn update(&mut self, player: &Player, platforms: &[Platform], cfg: &GameConfig) {
        self.stun.tick();
        if !self.alive || self.is_stunned() {
            return;
        }

        let e = &cfg.enemies;
        let target = player.rect().center();
        let center = self.body.center();
        match &mut self.kind {
            EnemyKind::Patrol {
                origin_x,
                distance,
                direction,
            } => {
                let physics = &cfg.physics;
                self.body.vel.x = e.patrol_speed * *direction;
                self.body.vel.y =
                    (self.body.vel.y + physics.gravity).min(physics.terminal_velocity);
                self.body.integrate_horizontal();
                self.body.integrate_vertical();

                let mut on_ground = false;
                for platform in platforms.iter().filter(|p| p.is_active()) {
                    if self.body.vel.y > 0.0 && self.body.rect().overlaps(&platform.rect()) {
                        self.body.set_bottom(platform.rect().top());
                        self.body.vel.y = 0.0;
                        on_ground = true;
                    }
                }

                let offset = self.body.pos.x - *origin_x;
                if offset > *distance {
                    *direction = -1.0;
                } else if offset < -*distance {
                    *direction = 1.0;
                }

                if on_ground {
                    let rect = self.body.rect();
                    let probe_x = if *direction > 0.0 {
                        rect.right()
                    } else {
                        rect.left() - LEDGE_PROBE
                    };
                    let probe = Rect::new(probe_x, rect.bottom(), LEDGE_PROBE, LEDGE_PROBE);
                    let has_ground = platforms
                        .iter()
                        .any(|p| p.is_active() && probe.overlaps(&p.rect()));
                    if !has_ground {
                        *direction = -*direction;
                    }
                }
            },
            EnemyKind::Flying {
                origin,
                pattern,
                phase,
            } => {
                *phase += 1.0;
                let sweep = *phase * e.flying_sweep_speed;
                let bob = *phase * e.flying_speed;
                let pos = match pattern {
                    FlightPattern::Sine => Vec2::new(
                        origin.x + sweep.cos() * e.flying_sweep,
                        origin.y + bob.sin() * e.flying_amplitude,
                    ),
                    FlightPattern::Circle => Vec2::new(
                        origin.x + sweep.cos() * e.flying_radius,
                        origin.y + sweep.sin() * e.flying_radius,
                    ),
                    FlightPattern::Vertical => {
                        Vec2::new(origin.x, origin.y + bob.sin() * e.flying_amplitude)
                    },
                };
                self.body.vel = pos - self.body.pos;
                self.body.pos = pos;
            },
            EnemyKind::Shooter {
                cooldown,
                projectiles,
            } => {
                cooldown.tick();
                let to_player = target - center;
                if to_player.length() < e.chase_range
                    && !cooldown.is_running()
                    && let Some(dir) = to_player.normalized()
                {
                    projectiles.push(Projectile {
                        pos: center,
                        vel: dir * e.projectile_speed,
                        radius: e.projectile_radius,
                        lifetime: Countdown::new(e.projectile_lifetime),
                        spent: false,
                    });
                    cooldown.arm(e.shoot_cooldown);
                }
                for projectile in projectiles.iter_mut() {
                    projectile.pos += projectile.vel;
                    projectile.lifetime.tick();
                }
                projectiles.retain(|p| !p.is_expired());
            },
            EnemyKind::Chaser { home, chasing } => {
                let to_player = target - center;
                if to_player.length() < e.chase_range {
                    *chasing = true;
                    self.body.vel = to_player
                        .normalized()
                        .map_or(Vec2::ZERO, |dir| dir * e.chase_speed);
                } else {
                    *chasing = false;
                    let to_home = *home - self.body.pos;
                    self.body.vel = if to_home.length() > HOME_SNAP {
                        to_home
                            .normalized()
                            .map_or(Vec2::ZERO, |dir| dir * e.return_speed)
                    } else {
                        Vec2::ZERO
                    };
                }
                self.body.integrate_horizontal();
                self.body.integrate_vertical();
            },
        }
    }

    /// Classify an overlap with the player. Falling onto the enemy from
    /// above is a stomp; any other overlap hurts unless the player is
    /// dashing. Dead or stunned enemies report nothing.
    pub fn contact(&self, player: &Player, cfg: &EnemyConfig) -> Option<ContactIntent> {
        if !self.alive || self.is_stunned() {
            return None;
        }
        let (pr, er) = (player.rect(), self.rect());
        if !pr.overlaps(&er) {
            return None;
        }
        if player.velocity().y > 0.0 && pr.bottom() <= er.top() + cfg.stomp_tolerance {
            Some(ContactIntent::Stomp)
        } else if !player.is_dashing() {
            Some(ContactIntent::DamagePlayer)
        } else {
            None
        }
    }

    /// Whether one of this enemy's projectiles hit the player. The hitting
    /// projectile is marked spent and swept after the pass.
    pub fn take_projectile_hit(&mut self, player: &Player) -> bool {
        let EnemyKind::Shooter { projectiles, .. } = &mut self.kind else {
            return false;
        };
        if player.is_invincible() {
            return false;
        }
        let center = player.rect().center();
        let reach = player.rect().w / 2.0;
        let hit = projectiles
            .iter_mut()
            .find(|p| !p.is_expired() && (p.pos - center).length() < p.radius + reach);
        let Some(projectile) = hit else {
            return false;
        };
        projectile.spent = true;
        projectiles.retain(|p| !p.is_expired());
        true
    }

    /// Returns `true` if this killed the enemy; otherwise it is stunned.
    pub fn take_damage(&mut self, amount: u32, cfg: &EnemyConfig) -> bool {
        if !self.alive {
            return false;
        }
        self.health = self.health.saturating_sub(amount);
        if self.health == 0 {
            self.alive = false;
            if let EnemyKind::Shooter { projectiles, .. } = &mut self.kind {
                projectiles.clear();
            }
            true
        } else {
            self.stun.arm(cfg.stun_ticks);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platforms::SurfaceKind;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn spawn(x: f32, y: f32, kind: EnemySpawnKind) -> Enemy {
        let mut rng = StdRng::seed_from_u64(1);
        Enemy::spawn(
            &EnemySpawn {
                pos: Vec2::new(x, y),
                kind,
            },
            &mut rng,
            &EnemyConfig::default(),
        )
    }

    fn player_at(x: f32, y: f32) -> Player {
        Player::new(Vec2::new(x, y), &GameConfig::default().player)
    }

    fn floor(x: f32, w: f32) -> Vec<Platform> {
        vec![Platform::new(
            Rect::new(x, 500.0, w, 50.0),
            SurfaceKind::Normal,
            &GameConfig::default().platforms,
        )]
    }

    // ================================================================
    // Contact classification
    // ================================================================

    #[test]
    fn falling_onto_enemy_is_a_stomp() {
        let cfg = EnemyConfig::default();
        let enemy = spawn(100.0, 400.0, EnemySpawnKind::Shooter);
        // Player bottom at 405, 5 units into the enemy.
        let mut player = player_at(100.0, 357.0);
        player.body.vel.y = 6.0;
        assert_eq!(enemy.contact(&player, &cfg), Some(ContactIntent::Stomp));
    }

    #[test]
    fn side_contact_damages_unless_dashing() {
        let cfg = EnemyConfig::default();
        let enemy = spawn(100.0, 400.0, EnemySpawnKind::Shooter);
        let mut player = player_at(80.0, 390.0);
        assert_eq!(
            enemy.contact(&player, &cfg),
            Some(ContactIntent::DamagePlayer)
        );
        player.start_dash(&GameConfig::default().player);
        assert_eq!(enemy.contact(&player, &cfg), None, "Dashing passes through");
    }

    #[test]
    fn stunned_or_dead_enemy_is_harmless() {
        let cfg = EnemyConfig {
            health: 2,
            ..Default::default()
        };
        let mut enemy = spawn(100.0, 400.0, EnemySpawnKind::Chaser);
        enemy.health = 2;
        let player = player_at(100.0, 390.0);

        assert!(!enemy.take_damage(1, &cfg), "First hit only stuns");
        assert!(enemy.is_stunned());
        assert_eq!(enemy.contact(&player, &cfg), None);

        assert!(enemy.take_damage(1, &cfg));
        assert!(!enemy.alive);
        assert_eq!(enemy.contact(&player, &cfg), None);
    }

    // ================================================================
    // Behaviors
    // ================================================================

    #[test]
    fn patrol_turns_at_ledge() {
        let cfg = GameConfig::default();
        let platforms = floor(0.0, 200.0);
        let mut enemy = spawn(100.0, 468.0, EnemySpawnKind::Patrol { distance: 1000.0 });
        let player = player_at(-5000.0, 0.0);

        let mut max_x = enemy.body.pos.x;
        for _ in 0..200 {
            enemy.update(&player, &platforms, &cfg);
            max_x = max_x.max(enemy.body.pos.x);
        }
        assert!(
            enemy.rect().bottom() <= 500.0 + 1e-3,
            "Patrol should stay on the floor"
        );
        assert!(max_x + 32.0 <= 200.0 + cfg.enemies.patrol_speed);
    }

    #[test]
    fn patrol_turns_at_distance_limit() {
        let cfg = GameConfig::default();
        let platforms = floor(-1000.0, 3000.0);
        let mut enemy = spawn(100.0, 468.0, EnemySpawnKind::Patrol { distance: 50.0 });
        let player = player_at(-5000.0, 0.0);
        for _ in 0..300 {
            enemy.update(&player, &platforms, &cfg);
            let offset = enemy.body.pos.x - 100.0;
            assert!(offset.abs() <= 50.0 + 2.0 * cfg.enemies.patrol_speed);
        }
    }

    #[test]
    fn chaser_seeks_player_then_returns_home() {
        let cfg = GameConfig::default();
        let mut enemy = spawn(500.0, 300.0, EnemySpawnKind::Chaser);
        let near = player_at(650.0, 300.0);
        let start_dist = (near.rect().center() - enemy.body.center()).length();
        for _ in 0..10 {
            enemy.update(&near, &[], &cfg);
        }
        assert!(matches!(enemy.kind, EnemyKind::Chaser { chasing: true, .. }));
        assert!((near.rect().center() - enemy.body.center()).length() < start_dist);

        let far = player_at(5000.0, 300.0);
        for _ in 0..200 {
            enemy.update(&far, &[], &cfg);
        }
        assert!(matches!(enemy.kind, EnemyKind::Chaser { chasing: false, .. }));
        assert!((enemy.body.pos - Vec2::new(500.0, 300.0)).length() <= HOME_SNAP);
    }

    #[test]
    fn flying_enemy_stays_near_origin() {
        let cfg = GameConfig::default();
        let mut enemy = spawn(1500.0, 200.0, EnemySpawnKind::Flying {
            pattern: FlightPattern::Sine,
        });
        let player = player_at(0.0, 0.0);
        for _ in 0..500 {
            enemy.update(&player, &[], &cfg);
            assert!((enemy.body.pos.x - 1500.0).abs() <= cfg.enemies.flying_sweep + 1e-3);
            assert!((enemy.body.pos.y - 200.0).abs() <= cfg.enemies.flying_amplitude + 1e-3);
        }
    }

    #[test]
    fn flying_phase_is_seeded() {
        let a = spawn(0.0, 0.0, EnemySpawnKind::Flying {
            pattern: FlightPattern::Circle,
        });
        let b = spawn(0.0, 0.0, EnemySpawnKind::Flying {
            pattern: FlightPattern::Circle,
        });
        assert_eq!(a, b, "Same seed should give the same phase");
    }

    #[test]
    fn shooter_fires_on_cooldown_and_projectiles_expire() {
        let cfg = GameConfig::default();
        let e = &cfg.enemies;
        let mut enemy = spawn(500.0, 300.0, EnemySpawnKind::Shooter);
        let mut player = player_at(700.0, 290.0);
        // Keep projectiles from reaching the player for this test.
        player.invincibility.arm(10_000);

        enemy.update(&player, &[], &cfg);
        assert_eq!(enemy.projectiles().len(), 1, "Fires immediately in range");
        for _ in 1..e.shoot_cooldown {
            enemy.update(&player, &[], &cfg);
        }
        assert_eq!(enemy.projectiles().len(), 1, "Cooldown blocks a second shot");
        enemy.update(&player, &[], &cfg);
        assert_eq!(enemy.projectiles().len(), 2);

        let far = player_at(50_000.0, 0.0);
        for _ in 0..e.projectile_lifetime {
            enemy.update(&far, &[], &cfg);
        }
        assert!(
            enemy.projectiles().is_empty(),
            "Expired projectiles are swept"
        );
    }

    #[test]
    fn projectile_hit_is_consumed() {
        let cfg = GameConfig::default();
        let mut enemy = spawn(500.0, 300.0, EnemySpawnKind::Shooter);
        let player = player_at(560.0, 292.0);
        let mut hit = false;
        for _ in 0..30 {
            enemy.update(&player, &[], &cfg);
            if enemy.take_projectile_hit(&player) {
                hit = true;
                break;
            }
        }
        assert!(hit, "Projectile aimed at a stationary player should hit");
        assert!(enemy.projectiles().is_empty(), "Hitting projectile is removed");
    }

    #[test]
    fn invincible_player_ignores_projectiles() {
        let cfg = GameConfig::default();
        let mut enemy = spawn(500.0, 300.0, EnemySpawnKind::Shooter);
        let mut player = player_at(520.0, 292.0);
        player.invincibility.arm(100);
        enemy.update(&player, &[], &cfg);
        assert!(!enemy.take_projectile_hit(&player));
    }
}
