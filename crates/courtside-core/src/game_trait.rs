use serde::{Deserialize, Serialize};

use crate::events::GameEvent;
use crate::input::ControllerInputs;
use crate::snapshot::RenderSnapshot;
use crate::team::{TeamId, Teams};

/// Core trait the simulation engine implements for its host.
///
/// The host owns scheduling (tick and clock cadence, pausing, input
/// sampling); the game only advances its own state when asked.
pub trait CourtGame: Send + Sync {
    /// Game metadata for menus and logs.
    fn metadata(&self) -> GameMetadata;

    /// (Re)initialize a match: tip-off layout, zero scores, fresh clock.
    fn init(&mut self, config: &MatchConfig);

    /// Advance the simulation by one fixed tick. Returns the events of this tick.
    fn update(&mut self, inputs: &ControllerInputs) -> Vec<GameEvent>;

    /// Advance the match clock by one second.
    fn clock_tick(&mut self) -> Vec<GameEvent>;

    /// Read-only picture of the match for a renderer.
    fn snapshot(&self) -> RenderSnapshot;

    /// Full simulation state as MessagePack, for diagnostics and tests.
    fn serialize_state(&self) -> Vec<u8>;

    /// Simulation tick rate in Hz.
    fn tick_rate(&self) -> f32 {
        60.0
    }

    /// Match clock rate in Hz.
    fn clock_rate(&self) -> f32 {
        1.0
    }

    /// Freeze ticks and the clock and drop transient input state.
    fn pause(&mut self);

    /// Unfreeze after [`CourtGame::pause`].
    fn resume(&mut self);

    fn is_paused(&self) -> bool;

    /// Start a brand new match with the current configuration.
    fn reset(&mut self);

    /// Whether regulation has expired.
    fn is_match_complete(&self) -> bool;

    /// Final (or current) score per team.
    fn final_scores(&self) -> Vec<TeamScore>;
}

/// Game metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameMetadata {
    pub name: String,
    pub description: String,
    pub athletes_per_team: u8,
    pub quarters: u8,
}

/// Which team(s) a human controller drives. Fixed for the match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchMode {
    #[default]
    TwoControlled,
    OneControlledVsAi,
}

impl MatchMode {
    /// Whether `team`'s controlled athlete follows controller input.
    pub fn is_human_driven(self, team: TeamId) -> bool {
        match (self, team) {
            (_, TeamId::One) => true,
            (Self::TwoControlled, TeamId::Two) => true,
            (Self::OneControlledVsAi, TeamId::Two) => false,
        }
    }
}

/// Configuration chosen once before a match starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchConfig {
    pub mode: MatchMode,
    pub teams: Teams,
}

impl MatchConfig {
    pub fn new(mode: MatchMode) -> Self {
        Self::with_teams(mode, Teams::default())
    }

    /// In vs-AI mode the second team is always presented as "Computer".
    pub fn with_teams(mode: MatchMode, mut teams: Teams) -> Self {
        if mode == MatchMode::OneControlledVsAi {
            teams.two.name = "Computer".to_string();
        }
        Self { mode, teams }
    }
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self::new(MatchMode::default())
    }
}

/// Score entry for a team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamScore {
    pub team: TeamId,
    pub name: String,
    pub score: u32,
}

/// Generates the `CourtGame` methods that only read the serialized state:
/// `serialize_state`, `is_paused`, `is_match_complete`.
///
/// Requires the implementing struct to have `state: $StateType` and
/// `paused: bool` fields, and `$StateType` to have a `finished: bool` field.
#[macro_export]
macro_rules! court_game_boilerplate {
    (state_type: $StateType:ty) => {
        fn serialize_state(&self) -> Vec<u8> {
            match rmp_serde::to_vec(&self.state) {
                Ok(bytes) => bytes,
                Err(e) => {
                    tracing::error!(error = %e, "Failed to serialize match state");
                    Vec::new()
                },
            }
        }

        fn is_paused(&self) -> bool {
            self.paused
        }

        fn is_match_complete(&self) -> bool {
            self.state.finished
        }
    };
}
