use courtside_core::events::GameEvent;
use courtside_core::team::TeamId;

use crate::config::BasketballConfig;
use crate::court;
use crate::entity::MatchState;

/// Release the ball toward the team's hoop. No-op unless the team's
/// controlled athlete holds it.
pub fn shoot(
    state: &mut MatchState,
    team: TeamId,
    config: &BasketballConfig,
) -> Option<GameEvent> {
    let shooter = state.controlled(team);
    if !state.athletes[shooter].has_ball || state.ball.holder != Some(team) {
        return None;
    }

    state.athletes[shooter].has_ball = false;
    let ball = &mut state.ball;
    ball.holder = None;
    ball.has_scored = false;
    ball.shot_by = Some(team);

    let angle = if team.attacks_up() {
        -std::f32::consts::FRAC_PI_2
    } else {
        std::f32::consts::FRAC_PI_2
    };
    let power = config.actions.shot_power;
    ball.vx = angle.cos() * power * config.actions.shot_horizontal_factor;
    ball.vy = angle.sin() * power;
    Some(GameEvent::Shot { team })
}

/// Try to strip the ball from the opposing human athlete. Only the two
/// designated humans take part, whoever the controllers are bound to. On
/// success the attacker's controller snaps back to its human. `roll` is a
/// uniform sample in [0, 1); it is only consumed when the attempt is legal.
pub fn steal(
    state: &mut MatchState,
    team: TeamId,
    roll: f32,
    config: &BasketballConfig,
) -> Option<GameEvent> {
    if !steal_in_range(state, team, config) {
        return None;
    }

    if roll < config.actions.steal_chance {
        let thief = MatchState::human_id(team);
        state.give_ball(thief);
        state.bind(team, thief);
        state.bump_crowd(config.crowd.steal_boost, config.crowd.max);
        Some(GameEvent::StealSucceeded { team })
    } else {
        Some(GameEvent::StealFailed { team })
    }
}

/// Whether a steal by `team` would be rolled at all.
pub fn steal_in_range(state: &MatchState, team: TeamId, config: &BasketballConfig) -> bool {
    let (Some(attacker), Some(defender)) = (
        state.athletes.get(MatchState::human_id(team)),
        state.athletes.get(MatchState::human_id(team.opponent())),
    ) else {
        return false;
    };
    attacker.distance_to(defender.x, defender.y) < config.actions.steal_radius
        && defender.has_ball
        && state.ball.holder != Some(team)
}

/// Hand the ball to the teammate nearest the attacked basket, vertically.
/// The receiver becomes the controlled athlete.
pub fn pass(state: &mut MatchState, team: TeamId) -> Option<GameEvent> {
    let passer = state.controlled(team);
    if !state.athletes[passer].has_ball || state.ball.holder != Some(team) {
        return None;
    }

    let target_y = court::attack_target_y(team);
    let mut receiver = None;
    let mut best = f32::INFINITY;
    for id in state.team_members(team).filter(|&i| i != passer) {
        let gap = (state.athletes[id].y - target_y).abs();
        if gap < best {
            best = gap;
            receiver = Some(id);
        }
    }
    let receiver = receiver?;

    state.give_ball(receiver);
    state.bind(team, receiver);
    let (x, y) = (state.athletes[receiver].x, state.athletes[receiver].y);
    let ball = &mut state.ball;
    ball.x = x;
    ball.y = y;
    ball.vx = 0.0;
    ball.vy = 0.0;
    Some(GameEvent::Passed { team })
}
