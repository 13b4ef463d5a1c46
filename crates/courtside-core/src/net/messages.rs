use serde::{Deserialize, Serialize};

use crate::events::GameEvent;
use crate::game_trait::{MatchMode, TeamScore};
use crate::input::ControllerInput;
use crate::snapshot::RenderSnapshot;
use crate::team::{TeamId, Teams};

/// Wire message type discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum MessageType {
    // Controller -> Host
    ControllerInput = 0x01,
    MatchControl = 0x02,

    // Host -> Collaborators
    MatchStart = 0x10,
    Snapshot = 0x11,
    MatchEvent = 0x12,
    MatchEnd = 0x13,
}

impl MessageType {
    pub fn from_byte(b: u8) -> Option<Self> {
        match b {
            0x01 => Some(Self::ControllerInput),
            0x02 => Some(Self::MatchControl),
            0x10 => Some(Self::MatchStart),
            0x11 => Some(Self::Snapshot),
            0x12 => Some(Self::MatchEvent),
            0x13 => Some(Self::MatchEnd),
            _ => None,
        }
    }
}

/// Messages produced by input devices and menus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ClientMessage {
    ControllerInput(ControllerInputMsg),
    MatchControl(MatchControlMsg),
}

/// Messages produced by the host after ticks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ServerMessage {
    MatchStart(MatchStartMsg),
    Snapshot(Box<RenderSnapshot>),
    MatchEvent(MatchEventMsg),
    MatchEnd(MatchEndMsg),
}

/// Held flags of one controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerInputMsg {
    pub team: TeamId,
    pub input: ControllerInput,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchControl {
    Pause,
    Resume,
    Reset,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchControlMsg {
    pub action: MatchControl,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchStartMsg {
    /// `PROTOCOL_VERSION` of the sending host.
    pub protocol_version: u8,
    pub mode: MatchMode,
    pub teams: Teams,
}

/// An event plus its rendered commentary line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchEventMsg {
    pub tick: u64,
    pub event: GameEvent,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchEndMsg {
    pub scores: Vec<TeamScore>,
}
