use serde::{Deserialize, Serialize};

use crate::collision::WallContact;
use crate::player::JumpKind;

/// Something that happened during a tick, for presentation layers
/// (particles, camera shake, sound) to react to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    Jumped { kind: JumpKind },
    /// `impact_speed` is the downward speed just before touching down.
    Landed { impact_speed: f32 },
    DashStarted,
    /// Emitted every tick the player slides down a wall.
    WallSliding { side: WallContact },
    PlayerDamaged { health: u32 },
    PlayerDied,
    EnemyStomped,
    EnemyKilled,
    CoinCollected,
    PowerUpCollected,
    CheckpointReached,
    LevelComplete,
}
