use serde::{Deserialize, Serialize};

/// Boolean intents sampled once per tick by the host.
///
/// `jump` is the *held* state of the jump control; press and release edges
/// are derived by the consumer so a key held across ticks jumps once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputSnapshot {
    pub move_left: bool,
    pub move_right: bool,
    pub jump: bool,
    pub dash: bool,
}

impl InputSnapshot {
    pub const NONE: Self = Self {
        move_left: false,
        move_right: false,
        jump: false,
        dash: false,
    };

    pub fn is_moving(&self) -> bool {
        self.move_left || self.move_right
    }
}

/// Press/release edge detector for a held button.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonState {
    held: bool,
}

/// Transition observed by [`ButtonState::update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonEdge {
    Pressed,
    Held,
    Released,
    Idle,
}

impl ButtonState {
    pub fn update(&mut self, down: bool) -> ButtonEdge {
        let edge = match (self.held, down) {
            (false, true) => ButtonEdge::Pressed,
            (true, true) => ButtonEdge::Held,
            (true, false) => ButtonEdge::Released,
            (false, false) => ButtonEdge::Idle,
        };
        self.held = down;
        edge
    }

    pub fn is_held(&self) -> bool {
        self.held
    }

    pub fn reset(&mut self) {
        self.held = false;
    }
}
