use serde::{Deserialize, Serialize};

use skyward_core::geometry::{Rect, Vec2};
use skyward_core::input::{ButtonEdge, ButtonState, InputSnapshot};
use skyward_core::timer::Countdown;

use crate::body::KinematicBody;
use crate::collision::{self, Contacts, ResolveContext, WallContact};
use crate::config::{GameConfig, PhysicsConfig, PlayerConfig};
use crate::platforms::Platform;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    pub fn sign(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }
}

/// Which rule a successful jump went through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JumpKind {
    Ground,
    Coyote,
    Double,
    Wall,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DashState {
    pub active: bool,
    pub timer: Countdown,
    pub cooldown: Countdown,
    pub direction: Facing,
}

/// Result of [`Player::take_damage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Invincible or already dead.
    Ignored,
    Hurt { health: u32 },
    Killed,
}

/// What happened to the player during one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlayerTick {
    pub jumped: Option<JumpKind>,
    pub dashed: bool,
    /// Impact speed, when this tick was a landing.
    pub landed: Option<f32>,
    pub wall_sliding: bool,
    pub contacts: Contacts,
}

/// The player character: one body plus ability state.
///
/// All timers count ticks and are decremented at the start of each tick by
/// [`Player::tick_timers`], before input is read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub body: KinematicBody,
    pub facing: Facing,
    pub grounded: bool,
    pub wall: WallContact,
    pub wall_sliding: bool,
    pub double_jump_available: bool,
    pub coyote: Countdown,
    pub jump_buffer: Countdown,
    pub dash: DashState,
    pub wall_jump_lockout: Countdown,
    /// Horizontal wall-jump kick, applied by the next physics step.
    wall_kick: Option<f32>,
    pub health: u32,
    pub invincibility: Countdown,
    pub power_up: Countdown,
    jump_button: ButtonState,
    /// Visual squash (<1) / stretch (>1) scale, eased back toward 1.
    pub squash_stretch: f32,
    /// Index of the platform stood on after the last physics step.
    pub standing_on: Option<usize>,
}

impl Player {
    pub fn new(spawn: Vec2, cfg: &PlayerConfig) -> Self {
        Self {
            body: KinematicBody::new(spawn.x, spawn.y, cfg.width, cfg.height),
            facing: Facing::Right,
            grounded: false,
            wall: WallContact::None,
            wall_sliding: false,
            double_jump_available: true,
            coyote: Countdown::IDLE,
            jump_buffer: Countdown::IDLE,
            dash: DashState::default(),
            wall_jump_lockout: Countdown::IDLE,
            wall_kick: None,
            health: cfg.max_health,
            invincibility: Countdown::IDLE,
            power_up: Countdown::IDLE,
            jump_button: ButtonState::default(),
            squash_stretch: 1.0,
            standing_on: None,
        }
    }

    pub fn rect(&self) -> Rect {
        self.body.rect()
    }

    pub fn velocity(&self) -> Vec2 {
        self.body.vel
    }

    pub fn is_dashing(&self) -> bool {
        self.dash.active
    }

    /// Dashing or inside the post-damage window.
    pub fn is_invincible(&self) -> bool {
        self.dash.active || self.invincibility.is_running()
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    pub fn is_powered_up(&self) -> bool {
        self.power_up.is_running()
    }

    /// Full tick: timers, input, physics and contact reactions.
    pub fn update(
        &mut self,
        input: &InputSnapshot,
        platforms: &mut [Platform],
        cfg: &GameConfig,
    ) -> PlayerTick {
        self.tick_timers();
        let mut tick = self.handle_input(input, cfg);
        let step = self.step_physics(platforms, cfg);
        tick.jumped = tick.jumped.or(step.jumped);
        tick.landed = step.landed;
        tick.wall_sliding = step.wall_sliding;
        tick.contacts = step.contacts;
        tick
    }

    pub fn tick_timers(&mut self) {
        self.coyote.tick();
        self.jump_buffer.tick();
        self.dash.cooldown.tick();
        self.wall_jump_lockout.tick();
        if self.invincibility.tick() {
            tracing::debug!("Player invincibility ended");
        }
        self.power_up.tick();
    }

    /// Apply one tick of input: walk/friction, dash start, jump edges.
    /// Only `jumped` and `dashed` are filled in the returned report.
    pub fn handle_input(&mut self, input: &InputSnapshot, cfg: &GameConfig) -> PlayerTick {
        let p = &cfg.player;
        let mut tick = PlayerTick::default();
        let jump_edge = self.jump_button.update(input.jump);

        if self.dash.active {
            // Dash velocity is reapplied by the physics step.
            self.clamp_walk_speed(p);
            return tick;
        }

        let mut moving = false;
        if input.move_left {
            self.body.vel.x -= p.acceleration;
            self.facing = Facing::Left;
            moving = true;
        }
        if input.move_right {
            self.body.vel.x += p.acceleration;
            self.facing = Facing::Right;
            moving = true;
        }
        if !moving {
            apply_air_friction(&mut self.body, &cfg.physics);
        }
        self.clamp_walk_speed(p);

        if input.dash && !self.dash.cooldown.is_running() {
            self.start_dash(p);
            tick.dashed = true;
            return tick;
        }

        match jump_edge {
            ButtonEdge::Pressed => {
                self.jump_buffer.arm(p.jump_buffer_ticks);
                tick.jumped = self.attempt_jump(p);
            },
            ButtonEdge::Released => {
                if self.body.vel.y < 0.0 {
                    self.body.vel.y *= 0.5;
                }
            },
            ButtonEdge::Held | ButtonEdge::Idle => {},
        }
        tick
    }

    /// Try each jump rule in precedence order: wall, ground/coyote, double.
    /// A successful jump consumes the jump buffer.
    pub fn attempt_jump(&mut self, p: &PlayerConfig) -> Option<JumpKind> {
        let kind = if self.wall.is_touching() && !self.grounded {
            self.body.vel.y = p.wall_jump_y;
            self.wall_kick = Some(-f32::from(self.wall.sign()) * p.wall_jump_x);
            self.double_jump_available = true;
            self.wall_jump_lockout.arm(p.wall_jump_lockout);
            JumpKind::Wall
        } else if self.grounded || self.coyote.is_running() {
            let kind = if self.grounded {
                JumpKind::Ground
            } else {
                JumpKind::Coyote
            };
            self.body.vel.y = p.jump_velocity;
            self.grounded = false;
            self.coyote.clear();
            kind
        } else if self.double_jump_available {
            self.body.vel.y = p.double_jump_velocity;
            self.double_jump_available = false;
            JumpKind::Double
        } else {
            return None;
        };

        self.jump_buffer.clear();
        self.squash_stretch = p.stretch_jump;
        Some(kind)
    }

    pub fn start_dash(&mut self, p: &PlayerConfig) {
        self.dash.active = true;
        self.dash.timer.arm(p.dash_duration.max(1));
        self.dash.cooldown.arm(p.dash_cooldown);
        self.dash.direction = self.facing;
        self.body.vel.y = 0.0;
    }

    /// Dash, gravity, wall slide, collision, then the contact reactions:
    /// landing, coyote arming, double-jump refresh and buffered jumps.
    pub fn step_physics(&mut self, platforms: &mut [Platform], cfg: &GameConfig) -> PlayerTick {
        let p = &cfg.player;
        let physics = &cfg.physics;
        let mut tick = PlayerTick::default();

        if let Some(kick) = self.wall_kick.take() {
            self.body.vel.x = kick;
        }

        let was_dashing = self.dash.active;
        if self.dash.active {
            let ended = self.dash.timer.tick();
            let dir = self.dash.direction.sign();
            self.body.vel = Vec2::new(dir * p.dash_speed, 0.0);
            if ended {
                self.dash.active = false;
                self.body.vel.x = dir * p.max_speed;
            }
        }

        if was_dashing {
            self.wall_sliding = false;
        } else {
            self.body.vel.y += physics.gravity;
            self.wall_sliding = self.wall.is_touching()
                && !self.grounded
                && self.body.vel.y > 0.0
                && !self.wall_jump_lockout.is_running();
            if self.wall_sliding {
                self.body.vel.y = self.body.vel.y.min(p.wall_slide_speed);
            }
            self.body.vel.y = self.body.vel.y.min(physics.terminal_velocity);
        }

        let prev_grounded = self.grounded;
        let ctx = ResolveContext {
            physics,
            platforms: &cfg.platforms,
            grounded: self.grounded,
            wall_lockout: self.wall_jump_lockout.is_running(),
        };
        let contacts = collision::resolve(&mut self.body, platforms, &ctx);
        self.grounded = contacts.grounded;
        self.wall = contacts.wall;
        self.standing_on = contacts.landed_on;

        if !prev_grounded && self.grounded && contacts.impact_speed > p.landing_threshold {
            tick.landed = Some(contacts.impact_speed);
            self.squash_stretch = p.squash_land;
        }

        if prev_grounded && !self.grounded && self.body.vel.y >= 0.0 {
            self.coyote.arm(p.coyote_ticks);
        }

        if self.grounded || self.wall.is_touching() {
            self.double_jump_available = true;
        }

        // A buffered jump replaces any bounce impulse from the landing.
        if self.grounded && self.jump_buffer.is_running() {
            tick.jumped = self.attempt_jump(p);
            self.jump_buffer.clear();
        }

        self.recover_squash(p);
        tick.wall_sliding = self.wall_sliding;
        tick.contacts = contacts;
        tick
    }

    /// Lose `amount` health unless invincible. Surviving arms the
    /// invincibility window.
    pub fn take_damage(&mut self, amount: u32, p: &PlayerConfig) -> DamageOutcome {
        if self.is_invincible() || !self.is_alive() {
            return DamageOutcome::Ignored;
        }
        self.health = self.health.saturating_sub(amount);
        if self.health > 0 {
            self.invincibility.arm(p.invincibility_ticks);
            DamageOutcome::Hurt {
                health: self.health,
            }
        } else {
            tracing::debug!(x = self.body.pos.x, y = self.body.pos.y, "Player died");
            DamageOutcome::Killed
        }
    }

    /// Instant death once the top edge falls past the kill line, regardless
    /// of invincibility. Returns whether the player was killed.
    pub fn kill_if_out_of_bounds(&mut self, physics: &PhysicsConfig, p: &PlayerConfig) -> bool {
        if !self.is_alive() || self.rect().top() <= physics.kill_line() {
            return false;
        }
        self.invincibility.clear();
        self.dash.active = false;
        self.take_damage(self.health.saturating_add(1), p) == DamageOutcome::Killed
    }

    /// Launch upward, e.g. after a stomp.
    pub fn bounce(&mut self, vel_y: f32) {
        self.body.vel.y = vel_y;
        self.grounded = false;
    }

    pub fn grant_power_up(&mut self, p: &PlayerConfig) {
        self.power_up.arm(p.power_up_ticks);
    }

    /// Back to spawn state at `spawn`: full health, all timers idle.
    pub fn reset(&mut self, spawn: Vec2, p: &PlayerConfig) {
        *self = Self::new(spawn, p);
    }

    fn clamp_walk_speed(&mut self, p: &PlayerConfig) {
        self.body.vel.x = self.body.vel.x.clamp(-p.max_speed, p.max_speed);
    }

    fn recover_squash(&mut self, p: &PlayerConfig) {
        if self.squash_stretch < 1.0 {
            self.squash_stretch = (self.squash_stretch + p.squash_recovery).min(1.0);
        } else if self.squash_stretch > 1.0 {
            self.squash_stretch = (self.squash_stretch - p.squash_recovery).max(1.0);
        }
    }
}

fn apply_air_friction(body: &mut KinematicBody, physics: &PhysicsConfig) {
    body.vel.x *= physics.friction;
    if body.vel.x.abs() < physics.rest_speed_epsilon {
        body.vel.x = 0.0;
    }
}
