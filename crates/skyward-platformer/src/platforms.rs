use serde::{Deserialize, Serialize};

use skyward_core::geometry::{Rect, Vec2};
use skyward_core::timer::Countdown;

use crate::config::{PhysicsConfig, PlatformConfig};

/// Surface type named in level files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SurfaceKind {
    Normal,
    Ice,
    Sticky,
    Bouncy,
    Falling,
    OneWay,
}

impl SurfaceKind {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "normal" => Some(Self::Normal),
            "ice" => Some(Self::Ice),
            "sticky" => Some(Self::Sticky),
            "bouncy" => Some(Self::Bouncy),
            "fall" | "falling" => Some(Self::Falling),
            "oneway" | "one-way" => Some(Self::OneWay),
            _ => None,
        }
    }

    pub fn friction(self, cfg: &PlatformConfig) -> f32 {
        match self {
            Self::Normal => cfg.friction_normal,
            Self::Ice => cfg.friction_ice,
            Self::Sticky => cfg.friction_sticky,
            Self::Bouncy => cfg.friction_bouncy,
            Self::Falling => cfg.friction_falling,
            Self::OneWay => cfg.friction_one_way,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MotionPattern {
    Horizontal,
    Vertical,
    Circular,
    Square,
}

impl MotionPattern {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "horizontal" => Some(Self::Horizontal),
            "vertical" => Some(Self::Vertical),
            "circular" | "circle" => Some(Self::Circular),
            "square" => Some(Self::Square),
            _ => None,
        }
    }
}

/// Periodic motion around a platform's home position.
///
/// Position is a pure function of `ticks`, so the next step's displacement
/// can be computed without advancing the platform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Motion {
    pub pattern: MotionPattern,
    pub speed: f32,
    /// Amplitude for sine/circular patterns, leg length for square.
    pub distance: f32,
    /// Phase advance per tick per unit of speed.
    pub rate: f32,
    pub ticks: u32,
}

impl Motion {
    pub fn new(pattern: MotionPattern, speed: f32, distance: f32, rate: f32) -> Self {
        Self {
            pattern,
            speed,
            distance,
            rate,
            ticks: 0,
        }
    }

    /// Offset from home after `ticks` updates.
    pub fn offset_at(&self, ticks: u32) -> Vec2 {
        let angle = ticks as f32 * self.rate * self.speed;
        match self.pattern {
            MotionPattern::Horizontal => Vec2::new(angle.sin() * self.distance, 0.0),
            MotionPattern::Vertical => Vec2::new(0.0, angle.sin() * self.distance),
            MotionPattern::Circular => {
                Vec2::new(angle.cos() * self.distance, angle.sin() * self.distance)
            },
            MotionPattern::Square => {
                let d = self.distance;
                if d <= 0.0 {
                    return Vec2::ZERO;
                }
                let cycle = (ticks as f32 * self.speed).rem_euclid(d * 4.0);
                if cycle < d {
                    Vec2::new(cycle, 0.0)
                } else if cycle < d * 2.0 {
                    Vec2::new(d, cycle - d)
                } else if cycle < d * 3.0 {
                    Vec2::new(d - (cycle - d * 2.0), d)
                } else {
                    Vec2::new(0.0, d - (cycle - d * 3.0))
                }
            },
        }
    }

    pub fn offset(&self) -> Vec2 {
        self.offset_at(self.ticks)
    }
}

/// Lifecycle of a falling platform. Only moves forward; `Platform::reset`
/// is the single way back to `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum FallPhase {
    Idle,
    Shaking { remaining: Countdown },
    Falling { velocity: f32 },
    Gone,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PlatformKind {
    Normal,
    Ice,
    Sticky,
    Bouncy { strength: f32, compression: Countdown },
    Falling { phase: FallPhase },
    OneWay,
}

impl PlatformKind {
    fn fresh(surface: SurfaceKind, cfg: &PlatformConfig) -> Self {
        match surface {
            SurfaceKind::Normal => Self::Normal,
            SurfaceKind::Ice => Self::Ice,
            SurfaceKind::Sticky => Self::Sticky,
            SurfaceKind::Bouncy => Self::Bouncy {
                strength: cfg.bounce_strength,
                compression: Countdown::IDLE,
            },
            SurfaceKind::Falling => Self::Falling {
                phase: FallPhase::Idle,
            },
            SurfaceKind::OneWay => Self::OneWay,
        }
    }

    pub fn surface(&self) -> SurfaceKind {
        match self {
            Self::Normal => SurfaceKind::Normal,
            Self::Ice => SurfaceKind::Ice,
            Self::Sticky => SurfaceKind::Sticky,
            Self::Bouncy { .. } => SurfaceKind::Bouncy,
            Self::Falling { .. } => SurfaceKind::Falling,
            Self::OneWay => SurfaceKind::OneWay,
        }
    }
}

/// Which face of a platform an actor ran into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactSide {
    Left,
    Right,
    Top,
    Bottom,
}

/// How the resolver should treat a contact with a platform face.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ContactResponse {
    /// Pass through.
    Ignore,
    /// Clamp to the face and zero velocity on that axis.
    Block,
    /// Rest on top. `bounce` replaces the zeroed vertical velocity.
    Land { friction: f32, bounce: Option<f32> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub rect: Rect,
    /// Authored top-left corner; motion and reset are relative to it.
    home: Vec2,
    pub kind: PlatformKind,
    pub friction: f32,
    pub active: bool,
    pub motion: Option<Motion>,
}

impl Platform {
    pub fn new(rect: Rect, surface: SurfaceKind, cfg: &PlatformConfig) -> Self {
        Self {
            rect,
            home: rect.origin(),
            kind: PlatformKind::fresh(surface, cfg),
            friction: surface.friction(cfg),
            active: true,
            motion: None,
        }
    }

    /// A platform following `pattern` around its authored position.
    ///
    /// Falling platforms cannot move; a moving falling platform becomes a
    /// moving normal one.
    pub fn moving(
        rect: Rect,
        surface: SurfaceKind,
        pattern: MotionPattern,
        speed: f32,
        distance: f32,
        cfg: &PlatformConfig,
    ) -> Self {
        let surface = if surface == SurfaceKind::Falling {
            tracing::warn!(
                x = rect.x,
                y = rect.y,
                "Falling platforms cannot move, using a moving normal platform"
            );
            SurfaceKind::Normal
        } else {
            surface
        };
        let mut platform = Self::new(rect, surface, cfg);
        let motion = Motion::new(pattern, speed, distance, cfg.motion_rate);
        platform.rect = Rect::from_origin(platform.home + motion.offset(), rect_size(&rect));
        platform.motion = Some(motion);
        platform
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn home(&self) -> Vec2 {
        self.home
    }

    pub fn surface(&self) -> SurfaceKind {
        self.kind.surface()
    }

    /// Advance motion patterns and timers by one tick.
    pub fn update(&mut self, physics: &PhysicsConfig, cfg: &PlatformConfig) {
        if !self.active {
            return;
        }

        if let Some(motion) = &mut self.motion {
            motion.ticks = motion.ticks.wrapping_add(1);
            let origin = self.home + motion.offset();
            self.rect.x = origin.x;
            self.rect.y = origin.y;
        }

        match &mut self.kind {
            PlatformKind::Bouncy { compression, .. } => {
                compression.tick();
            },
            PlatformKind::Falling { phase } => match phase {
                FallPhase::Shaking { remaining } => {
                    if remaining.tick() {
                        self.rect.x = self.home.x;
                        *phase = FallPhase::Falling { velocity: 0.0 };
                    } else if remaining.remaining() % 4 < 2 {
                        self.rect.x = self.home.x + cfg.shake_offset;
                    } else {
                        self.rect.x = self.home.x - cfg.shake_offset;
                    }
                },
                FallPhase::Falling { velocity } => {
                    *velocity += physics.gravity;
                    self.rect.y += *velocity;
                    if self.rect.top() > physics.kill_line() {
                        *phase = FallPhase::Gone;
                        self.active = false;
                        tracing::debug!(x = self.home.x, y = self.home.y, "Falling platform gone");
                    }
                },
                FallPhase::Idle | FallPhase::Gone => {},
            },
            PlatformKind::Normal
            | PlatformKind::Ice
            | PlatformKind::Sticky
            | PlatformKind::OneWay => {},
        }
    }

    pub fn response(&self, side: ContactSide) -> ContactResponse {
        match (&self.kind, side) {
            (PlatformKind::OneWay, ContactSide::Top) => ContactResponse::Land {
                friction: self.friction,
                bounce: None,
            },
            (PlatformKind::OneWay, _) => ContactResponse::Ignore,
            (PlatformKind::Bouncy { strength, .. }, ContactSide::Top) => ContactResponse::Land {
                friction: self.friction,
                bounce: Some(*strength),
            },
            (_, ContactSide::Top) => ContactResponse::Land {
                friction: self.friction,
                bounce: None,
            },
            _ => ContactResponse::Block,
        }
    }

    /// Whether an actor whose bottom edge was at `prev_bottom` before this
    /// tick's motion may land while moving at `vel_y`.
    pub fn admits_landing(&self, prev_bottom: f32, vel_y: f32, tolerance: f32) -> bool {
        match self.kind {
            PlatformKind::OneWay => vel_y > 0.0 && prev_bottom <= self.rect.top() + tolerance,
            _ => vel_y > 0.0,
        }
    }

    /// Landing hook: arms falling and bouncy platforms.
    pub fn on_landed(&mut self, cfg: &PlatformConfig) {
        match self.kind {
            PlatformKind::Falling { .. } => {
                self.trigger(cfg.fall_delay_ticks);
            },
            PlatformKind::Bouncy { .. } => self.trigger_bounce(cfg.bounce_animation_ticks),
            _ => {},
        }
    }

    /// Start the shake countdown. Returns whether anything changed; a
    /// platform already shaking, falling or gone is left alone.
    pub fn trigger(&mut self, delay: u32) -> bool {
        if let PlatformKind::Falling { phase } = &mut self.kind
            && *phase == FallPhase::Idle
        {
            *phase = FallPhase::Shaking {
                remaining: Countdown::new(delay.max(1)),
            };
            tracing::debug!(x = self.home.x, y = self.home.y, "Falling platform triggered");
            return true;
        }
        false
    }

    pub fn trigger_bounce(&mut self, ticks: u32) {
        if let PlatformKind::Bouncy { compression, .. } = &mut self.kind {
            compression.arm(ticks);
        }
    }

    pub fn fall_phase(&self) -> Option<FallPhase> {
        match self.kind {
            PlatformKind::Falling { phase } => Some(phase),
            _ => None,
        }
    }

    /// Remaining ticks of the cosmetic bounce compression.
    pub fn compression_ticks(&self) -> u32 {
        match self.kind {
            PlatformKind::Bouncy { compression, .. } => compression.remaining(),
            _ => 0,
        }
    }

    /// Displacement this platform will make on its next update. Actors
    /// resting on it are moved by this much so they stay aligned with it.
    /// Zero for platforms without motion.
    pub fn displacement(&self) -> Vec2 {
        match &self.motion {
            Some(motion) if self.active => {
                self.home + motion.offset_at(motion.ticks.wrapping_add(1)) - self.rect.origin()
            },
            _ => Vec2::ZERO,
        }
    }

    /// Restore the authored state: home position, motion phase zero, idle
    /// timers, active.
    pub fn reset(&mut self) {
        self.active = true;
        let mut origin = self.home;
        if let Some(motion) = &mut self.motion {
            motion.ticks = 0;
            origin += motion.offset();
        }
        self.rect.x = origin.x;
        self.rect.y = origin.y;
        match &mut self.kind {
            PlatformKind::Bouncy { compression, .. } => compression.clear(),
            PlatformKind::Falling { phase } => *phase = FallPhase::Idle,
            _ => {},
        }
    }
}

fn rect_size(rect: &Rect) -> Vec2 {
    Vec2::new(rect.w, rect.h)
}
