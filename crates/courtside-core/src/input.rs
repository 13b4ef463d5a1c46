use serde::{Deserialize, Serialize};

use crate::team::TeamId;

/// Currently-held flags for one human controller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub shoot: bool,
    pub steal: bool,
    pub pass: bool,
}

impl ControllerInput {
    /// Horizontal and vertical direction in {-1, 0, 1}.
    pub fn direction(&self) -> (f32, f32) {
        let dx = f32::from(self.right as u8) - f32::from(self.left as u8);
        let dy = f32::from(self.down as u8) - f32::from(self.up as u8);
        (dx, dy)
    }

    pub fn is_idle(&self) -> bool {
        *self == Self::default()
    }
}

/// Inputs from both controllers for a single tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerInputs {
    pub one: ControllerInput,
    pub two: ControllerInput,
}

impl ControllerInputs {
    pub fn get(&self, team: TeamId) -> &ControllerInput {
        match team {
            TeamId::One => &self.one,
            TeamId::Two => &self.two,
        }
    }

    pub fn set(&mut self, team: TeamId, input: ControllerInput) {
        match team {
            TeamId::One => self.one = input,
            TeamId::Two => self.two = input,
        }
    }
}
