use serde::{Deserialize, Serialize};

use crate::team::{TeamColor, TeamId};

/// Coarse state a renderer needs to pick overlays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchPhase {
    Playing,
    Paused,
    Finished,
}

/// Drawable state of one athlete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AthleteView {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub color: TeamColor,
    pub team: TeamId,
    /// Whether this athlete currently answers to a controller.
    pub controlled: bool,
    /// "P1" / "P2" for controlled athletes, `None` otherwise.
    pub label: Option<String>,
    pub has_ball: bool,
}

/// Drawable state of the ball, including the dribble bobble.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BallView {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub color: TeamColor,
}

/// Read-only picture of the match after a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderSnapshot {
    pub tick: u64,
    pub athletes: Vec<AthleteView>,
    pub ball: BallView,
    pub score_one: u32,
    pub score_two: u32,
    pub quarter: u8,
    pub time_left_secs: u32,
    pub crowd_noise: u8,
    pub phase: MatchPhase,
}

impl RenderSnapshot {
    pub fn score(&self, team: TeamId) -> u32 {
        match team {
            TeamId::One => self.score_one,
            TeamId::Two => self.score_two,
        }
    }

    /// `Q3 1:05` style clock label.
    pub fn clock_label(&self) -> String {
        format!(
            "Q{} {}:{:02}",
            self.quarter,
            self.time_left_secs / 60,
            self.time_left_secs % 60
        )
    }
}
