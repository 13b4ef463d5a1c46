use rand::Rng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use courtside_core::team::TeamId;

use crate::clock::QuarterClock;
use crate::config::BasketballConfig;
use crate::court::{self, AI_PER_TEAM, ATHLETE_RADIUS, BALL_RADIUS};

/// Index of an athlete in [`MatchState::athletes`].
pub type AthleteId = usize;

/// Total athletes on court.
pub const ROSTER_SIZE: usize = 2 + 2 * AI_PER_TEAM;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    /// The designated human-controllable athlete of its team.
    Human,
    Ai,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Athlete {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub speed: f32,
    pub team: TeamId,
    pub role: Role,
    pub has_ball: bool,
    pub target_x: f32,
    pub target_y: f32,
}

impl Athlete {
    fn new(x: f32, y: f32, speed: f32, team: TeamId, role: Role) -> Self {
        Self {
            x,
            y,
            radius: ATHLETE_RADIUS,
            speed,
            team,
            role,
            has_ball: false,
            target_x: x,
            target_y: y,
        }
    }

    pub fn distance_to(&self, x: f32, y: f32) -> f32 {
        court::distance(self.x, self.y, x, y)
    }

    /// Keep the athlete inside `[radius, size - radius]` on both axes.
    pub fn clamp_to_court(&mut self) {
        (self.x, self.y) = court::clamp_to_court(self.x, self.y, self.radius);
    }

    /// Step `step` units toward `(x, y)` if farther than `min_distance`.
    /// Returns the distance before moving.
    pub fn step_toward(&mut self, x: f32, y: f32, step: f32, min_distance: f32) -> f32 {
        let dx = x - self.x;
        let dy = y - self.y;
        let dist = (dx * dx + dy * dy).sqrt();
        if dist > min_distance {
            self.x += dx / dist * step;
            self.y += dy / dist * step;
        }
        dist
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub radius: f32,
    /// Team in possession, `None` while the ball is in free flight.
    pub holder: Option<TeamId>,
    /// Latched after a score until the deferred reset.
    pub has_scored: bool,
    /// Team credited if the current flight goes in.
    pub shot_by: Option<TeamId>,
    /// Dribble bobble phase in radians, cosmetic.
    pub dribble_phase: f32,
}

impl Ball {
    fn new(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            vx: 0.0,
            vy: 0.0,
            radius: BALL_RADIUS,
            holder: None,
            has_scored: false,
            shot_by: None,
            dribble_phase: 0.0,
        }
    }

    pub fn is_free(&self) -> bool {
        self.holder.is_none()
    }
}

/// Which athlete of a team currently answers to its controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControlBinding {
    /// The team's designated human athlete.
    Human,
    Teammate(AthleteId),
}

/// Re-homing scheduled after a basket.
///
/// `at_tick` counts simulated ticks, so a pause freezes the countdown and
/// the reset fires after resuming once the remaining ticks have run. A match
/// reset discards it, so it never applies to the state of a new match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingReset {
    pub at_tick: u64,
    /// Team that gets the ball: the one that conceded.
    pub possession: TeamId,
}

/// All mutable match state. Subsystems borrow it mutably one at a time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchState {
    pub athletes: Vec<Athlete>,
    pub ball: Ball,
    pub bindings: [ControlBinding; 2],
    pub scores: [u32; 2],
    pub tick: u64,
    /// Decision timer of the computer opponent.
    pub ai_timer: u64,
    pub pending_reset: Option<PendingReset>,
    pub clock: QuarterClock,
    pub crowd_noise: u8,
    /// Team that won the opening tip-off.
    pub tip_off: TeamId,
    pub started: bool,
    pub finished: bool,
}

impl MatchState {
    /// Fresh match with the tip-off layout; `possession` starts with the ball.
    pub fn new(config: &BasketballConfig, rng: &mut StdRng, possession: TeamId) -> Self {
        let mut athletes = Vec::with_capacity(ROSTER_SIZE);
        for team in TeamId::ALL {
            let (x, y) = court::tip_off_position(team);
            athletes.push(Athlete::new(
                x,
                y,
                config.actions.human_speed,
                team,
                Role::Human,
            ));
        }
        let teammates = &config.teammates;
        for team in TeamId::ALL {
            for slot in 0..AI_PER_TEAM {
                let (x, y) = court::ai_start_position(team, slot);
                let speed = teammates.base_speed + rng.random::<f32>() * teammates.speed_jitter;
                athletes.push(Athlete::new(x, y, speed, team, Role::Ai));
            }
        }

        let mut state = Self {
            athletes,
            ball: Ball::new(0.0, 0.0),
            bindings: [ControlBinding::Human; 2],
            scores: [0; 2],
            tick: 0,
            ai_timer: 0,
            pending_reset: None,
            clock: QuarterClock::new(&config.clock),
            crowd_noise: config.crowd.initial,
            tip_off: possession,
            started: false,
            finished: false,
        };
        state.rehome(possession);
        state
    }

    /// The designated human athlete of `team`.
    pub fn human_id(team: TeamId) -> AthleteId {
        team.index()
    }

    /// Resolve the team's binding to an athlete.
    pub fn controlled(&self, team: TeamId) -> AthleteId {
        match self.bindings[team.index()] {
            ControlBinding::Human => Self::human_id(team),
            ControlBinding::Teammate(id) => id,
        }
    }

    pub fn is_controlled(&self, id: AthleteId) -> bool {
        TeamId::ALL.iter().any(|&team| self.controlled(team) == id)
    }

    /// Move the team's controller to `id`. Ignored for athletes of another team.
    pub fn bind(&mut self, team: TeamId, id: AthleteId) {
        let Some(athlete) = self.athletes.get(id) else {
            return;
        };
        if athlete.team != team {
            return;
        }
        self.bindings[team.index()] = if athlete.role == Role::Human {
            ControlBinding::Human
        } else {
            ControlBinding::Teammate(id)
        };
    }

    /// The athlete holding the ball, if any.
    pub fn carrier(&self) -> Option<AthleteId> {
        self.athletes.iter().position(|a| a.has_ball)
    }

    /// Hand the ball to `id`, clearing every other holder.
    pub fn give_ball(&mut self, id: AthleteId) {
        for (i, athlete) in self.athletes.iter_mut().enumerate() {
            athlete.has_ball = i == id;
        }
        if let Some(athlete) = self.athletes.get(id) {
            self.ball.holder = Some(athlete.team);
        }
    }

    /// Athletes of `team` in roster order.
    pub fn team_members(&self, team: TeamId) -> impl Iterator<Item = AthleteId> + '_ {
        self.athletes
            .iter()
            .enumerate()
            .filter(move |(_, a)| a.team == team)
            .map(|(i, _)| i)
    }

    /// Formation slots: the team's AI athletes in roster order, then its
    /// human athlete.
    pub fn formation_order(&self, team: TeamId) -> Vec<AthleteId> {
        let mut order: Vec<AthleteId> = self
            .team_members(team)
            .filter(|&i| self.athletes[i].role == Role::Ai)
            .collect();
        order.push(Self::human_id(team));
        order
    }

    pub fn score(&self, team: TeamId) -> u32 {
        self.scores[team.index()]
    }

    pub fn bump_crowd(&mut self, amount: u8, max: u8) {
        self.crowd_noise = self.crowd_noise.saturating_add(amount).min(max);
    }

    /// Put both human athletes on their tip-off spots with control, and
    /// give `possession`'s human the ball at rest.
    pub fn rehome(&mut self, possession: TeamId) {
        self.bindings = [ControlBinding::Human; 2];
        for team in TeamId::ALL {
            let (x, y) = court::tip_off_position(team);
            let human = &mut self.athletes[Self::human_id(team)];
            human.x = x;
            human.y = y;
        }
        let carrier = Self::human_id(possession);
        self.give_ball(carrier);
        let (x, y) = (self.athletes[carrier].x, self.athletes[carrier].y);
        self.ball.x = x;
        self.ball.y = y;
        self.ball.vx = 0.0;
        self.ball.vy = 0.0;
        self.ball.has_scored = false;
        self.ball.shot_by = None;
    }

    /// Number of athletes flagged as holding the ball.
    pub fn holders(&self) -> usize {
        self.athletes.iter().filter(|a| a.has_ball).count()
    }
}
