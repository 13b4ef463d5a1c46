use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::game_trait::MatchMode;
use crate::team::{TeamId, Teams};

/// Number of described events an [`EventLog`] retains.
pub const EVENT_LOG_CAPACITY: usize = 10;

/// Discrete things that happened during a tick, in emission order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    MatchStarted { mode: MatchMode },
    TipOff { team: TeamId },
    BallPickedUp { team: TeamId, took_control: bool },
    Shot { team: TeamId },
    Scored { team: TeamId, points: u32 },
    StealSucceeded { team: TeamId },
    StealFailed { team: TeamId },
    Passed { team: TeamId },
    QuarterEnded { quarter: u8 },
    MatchEnded { team_one: u32, team_two: u32 },
}

impl GameEvent {
    /// Human-readable commentary line for this event.
    pub fn describe(&self, teams: &Teams) -> String {
        match self {
            Self::MatchStarted {
                mode: MatchMode::TwoControlled,
            } => "Game starts! Two players ready!".to_string(),
            Self::MatchStarted {
                mode: MatchMode::OneControlledVsAi,
            } => "Game starts! Player vs Computer!".to_string(),
            Self::TipOff { team } => format!("{} wins the tip-off!", teams.name(*team)),
            Self::BallPickedUp {
                team,
                took_control: false,
            } => format!("{} Player got the ball!", teams.name(*team)),
            Self::BallPickedUp {
                team,
                took_control: true,
            } => format!(
                "{} teammate got the ball - now controlling!",
                teams.name(*team)
            ),
            Self::Shot { team } => format!("{} Player shoots!", teams.name(*team)),
            Self::Scored { team, points } => {
                format!("{} SCORES! +{points} points!", teams.name(*team))
            },
            Self::StealSucceeded { team } => format!("{} STEALS the ball!", teams.name(*team)),
            Self::StealFailed { team } => format!("{} steal attempt failed!", teams.name(*team)),
            Self::Passed { team } => {
                format!("{} passes to player near basket!", teams.name(*team))
            },
            Self::QuarterEnded { quarter } => format!("End of Quarter {quarter}!"),
            Self::MatchEnded { team_one, team_two } => format!(
                "Final: {} {team_one} - {team_two} {}",
                teams.name(TeamId::One),
                teams.name(TeamId::Two)
            ),
        }
    }
}

/// A described event with the match tick it was recorded on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub tick: u64,
    pub message: String,
}

/// Bounded commentary log, newest entry first.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventLog {
    entries: VecDeque<LogEntry>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, tick: u64, event: &GameEvent, teams: &Teams) {
        self.entries.push_front(LogEntry {
            tick,
            message: event.describe(teams),
        });
        self.entries.truncate(EVENT_LOG_CAPACITY);
    }

    pub fn entries(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
