use courtside_core::events::GameEvent;
use courtside_core::team::TeamId;

use crate::config::BasketballConfig;
use crate::court::{BOTTOM_HOOP_Y, SCORE_MIN_SPEED, TOP_HOOP_Y, in_hoop_opening};
use crate::entity::{MatchState, PendingReset};

/// Team whose hoop the free ball is currently going through, if any.
fn basket_made(state: &MatchState) -> Option<TeamId> {
    let ball = &state.ball;
    if !in_hoop_opening(ball.x) {
        return None;
    }
    let team = if ball.y < TOP_HOOP_Y && ball.vy < -SCORE_MIN_SPEED {
        TeamId::One
    } else if ball.y > BOTTOM_HOOP_Y && ball.vy > SCORE_MIN_SPEED {
        TeamId::Two
    } else {
        return None;
    };
    (ball.shot_by == Some(team)).then_some(team)
}

/// Credit a basket if the ball just went through the right hoop for the
/// team that shot it, and schedule the re-homing.
pub fn check_score(state: &mut MatchState, config: &BasketballConfig) -> Option<GameEvent> {
    if state.ball.has_scored {
        return None;
    }
    let team = basket_made(state)?;
    let points = config.actions.points_per_basket;

    state.ball.has_scored = true;
    state.scores[team.index()] += points;
    state.bump_crowd(config.crowd.score_boost, config.crowd.max);
    state.pending_reset = Some(PendingReset {
        at_tick: state.tick + config.actions.reset_delay_ticks,
        possession: team.opponent(),
    });
    tracing::debug!(%team, tick = state.tick, "Basket scored, reset scheduled");
    Some(GameEvent::Scored { team, points })
}

/// Fire the deferred reset if it is due. Returns whether it fired.
pub fn fire_pending_reset(state: &mut MatchState) -> bool {
    match state.pending_reset {
        Some(reset) if state.tick >= reset.at_tick => {
            state.pending_reset = None;
            state.rehome(reset.possession);
            tracing::debug!(possession = %reset.possession, tick = state.tick, "Ball re-homed");
            true
        },
        _ => false,
    }
}
