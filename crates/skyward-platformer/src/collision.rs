use serde::{Deserialize, Serialize};

use skyward_core::geometry::Vec2;

use crate::body::KinematicBody;
use crate::config::{PhysicsConfig, PlatformConfig};
use crate::platforms::{ContactResponse, ContactSide, Platform};

/// Side of the actor a wall was found on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WallContact {
    #[default]
    None,
    Left,
    Right,
}

impl WallContact {
    /// -1 for a wall on the left, +1 on the right, 0 for none.
    pub fn sign(self) -> i8 {
        match self {
            WallContact::None => 0,
            WallContact::Left => -1,
            WallContact::Right => 1,
        }
    }

    pub fn is_touching(self) -> bool {
        self != WallContact::None
    }
}

/// Per-tick inputs to [`resolve`] beyond the body and platforms.
#[derive(Debug, Clone, Copy)]
pub struct ResolveContext<'a> {
    pub physics: &'a PhysicsConfig,
    pub platforms: &'a PlatformConfig,
    /// Grounded state from the previous tick; walls only register when
    /// airborne.
    pub grounded: bool,
    /// Wall-jump lockout running; suppresses wall registration.
    pub wall_lockout: bool,
}

/// What the resolver found this tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Contacts {
    pub grounded: bool,
    pub wall: WallContact,
    /// Index of the platform landed on, if any.
    pub landed_on: Option<usize>,
    pub head_bump: bool,
    /// Vertical speed at the moment of landing.
    pub impact_speed: f32,
    /// Displacement inherited from a moving platform.
    pub carried: Vec2,
}

/// How close a falling body's bottom must be to a platform top to count as
/// touching it without overlapping.
const FLUSH_EPSILON: f32 = 0.01;

/// Move `body` by its velocity against `platforms`, one axis at a time.
///
/// Inactive platforms are skipped. A falling body whose bottom ends flush
/// with a platform top lands on it that same tick. Overlaps are processed in list order and
/// the last applicable one wins. Landing invokes the platform's landing hook
/// (bounce, fall trigger) and applies surface friction.
pub fn resolve(
    body: &mut KinematicBody,
    platforms: &mut [Platform],
    ctx: &ResolveContext<'_>,
) -> Contacts {
    let mut contacts = Contacts::default();
    let prev_bottom = body.rect().bottom();

    // Horizontal pass
    let vx = body.vel.x;
    body.integrate_horizontal();
    for platform in platforms.iter().filter(|p| p.is_active()) {
        if !body.rect().overlaps(&platform.rect()) {
            continue;
        }
        let side = if vx > 0.0 {
            ContactSide::Left
        } else if vx < 0.0 {
            ContactSide::Right
        } else {
            continue;
        };
        if platform.response(side) != ContactResponse::Block {
            continue;
        }
        let can_cling = !ctx.grounded && !ctx.wall_lockout;
        if side == ContactSide::Left {
            body.set_right(platform.rect().left());
            if can_cling {
                contacts.wall = WallContact::Right;
            }
        } else {
            body.set_left(platform.rect().right());
            if can_cling {
                contacts.wall = WallContact::Left;
            }
        }
        body.vel.x = 0.0;
    }

    // Vertical pass
    let vy = body.vel.y;
    body.integrate_vertical();
    for (i, platform) in platforms.iter_mut().enumerate() {
        if !platform.is_active() {
            continue;
        }
        let touching = body.rect().overlaps(&platform.rect())
            || (vy > 0.0 && rests_flush_on(body, platform));
        if !touching {
            continue;
        }
        if vy > 0.0 {
            if !platform.admits_landing(prev_bottom, vy, ctx.physics.one_way_tolerance) {
                continue;
            }
            let ContactResponse::Land { friction, bounce } = platform.response(ContactSide::Top)
            else {
                continue;
            };
            body.set_bottom(platform.rect().top());
            contacts.impact_speed = vy;
            body.vel.y = bounce.unwrap_or(0.0);
            contacts.grounded = true;
            contacts.landed_on = Some(i);
            apply_surface_friction(body, friction, ctx.physics);
            platform.on_landed(ctx.platforms);
        } else if vy < 0.0 {
            if platform.response(ContactSide::Bottom) != ContactResponse::Block {
                continue;
            }
            body.set_top(platform.rect().bottom());
            body.vel.y = 0.0;
            contacts.head_bump = true;
        }
    }

    if contacts.grounded
        && let Some(i) = contacts.landed_on
    {
        let carried = platforms[i].displacement();
        body.pos += carried;
        contacts.carried = carried;
    }

    contacts
}

/// Bottom edge within [`FLUSH_EPSILON`] of the platform top, with some
/// horizontal overlap.
fn rests_flush_on(body: &KinematicBody, platform: &Platform) -> bool {
    let (b, p) = (body.rect(), platform.rect());
    (b.bottom() - p.top()).abs() <= FLUSH_EPSILON
        && b.left() < p.right()
        && b.right() > p.left()
}

/// Scale horizontal velocity by the landing retention factor and snap tiny
/// speeds to rest. Retention is clamped to `[0, 1]` so landing never speeds
/// an actor up or flips its direction.
pub fn apply_surface_friction(body: &mut KinematicBody, surface: f32, physics: &PhysicsConfig) {
    let retention = (physics.friction * surface).clamp(0.0, 1.0);
    body.vel.x *= retention;
    if body.vel.x.abs() < physics.rest_speed_epsilon {
        body.vel.x = 0.0;
    }
}
