use rand::Rng;
use rand::rngs::StdRng;

use courtside_core::events::GameEvent;
use courtside_core::team::TeamId;

use crate::actions;
use crate::config::BasketballConfig;
use crate::court::{self, HOOP_MAX_X, HOOP_MIN_X};
use crate::entity::{AthleteId, MatchState};

/// The computer always plays team two.
pub const COMPUTER_TEAM: TeamId = TeamId::Two;

/// Distance at which the computer stops closing in on the ball.
const CLOSE_ENOUGH: f32 = 5.0;

/// Drive team two's controlled athlete for one tick in vs-AI mode.
/// Slow, jittery and only periodically decisive.
pub fn update_opponent(
    state: &mut MatchState,
    config: &BasketballConfig,
    rng: &mut StdRng,
) -> Vec<GameEvent> {
    state.ai_timer += 1;
    let timer = state.ai_timer;
    let id = state.controlled(COMPUTER_TEAM);
    let mut events = Vec::new();

    match state.ball.holder {
        Some(team) if team == COMPUTER_TEAM => {
            if state.athletes[id].has_ball {
                carry(state, id, timer, config, rng, &mut events);
            }
        },
        Some(_) => defend(state, id, timer, config, rng, &mut events),
        None => {
            let o = &config.opponent;
            let (bx, by) = (state.ball.x, state.ball.y);
            let athlete = &mut state.athletes[id];
            let step = athlete.speed * o.loose_ball_speed;
            athlete.step_toward(bx, by, step, CLOSE_ENOUGH);
        },
    }

    state.athletes[id].clamp_to_court();
    events
}

fn carry(
    state: &mut MatchState,
    id: AthleteId,
    timer: u64,
    config: &BasketballConfig,
    rng: &mut StdRng,
    events: &mut Vec<GameEvent>,
) {
    let o = &config.opponent;
    let athlete = &mut state.athletes[id];
    let speed = athlete.speed;
    if athlete.y < o.carry_stop_y {
        athlete.y += speed * o.carry_speed;
    }
    if rng.random::<f32>() < o.jitter_chance {
        athlete.x += (rng.random::<f32>() - 0.5) * speed * 2.0;
    } else if athlete.x < HOOP_MIN_X {
        athlete.x += speed * o.center_speed;
    } else if athlete.x > HOOP_MAX_X {
        athlete.x -= speed * o.center_speed;
    }

    let (x, y) = (athlete.x, athlete.y);
    let to_basket = (y - court::attack_target_y(COMPUTER_TEAM)).abs();
    if to_basket < o.shoot_range
        && x > o.shoot_min_x
        && x < o.shoot_max_x
        && timer % o.shoot_interval == 0
        && rng.random::<f32>() < o.shoot_chance
    {
        events.extend(actions::shoot(state, COMPUTER_TEAM, config));
    }
    if timer % o.pass_interval == 0 && rng.random::<f32>() < o.pass_chance {
        events.extend(actions::pass(state, COMPUTER_TEAM));
    }
}

fn defend(
    state: &mut MatchState,
    id: AthleteId,
    timer: u64,
    config: &BasketballConfig,
    rng: &mut StdRng,
    events: &mut Vec<GameEvent>,
) {
    let o = &config.opponent;
    let (bx, by) = (state.ball.x, state.ball.y);
    let athlete = &mut state.athletes[id];
    let speed = athlete.speed;
    let dist = athlete.distance_to(bx, by);
    if dist > CLOSE_ENOUGH {
        let (ux, uy) = ((bx - athlete.x) / dist, (by - athlete.y) / dist);
        if rng.random::<f32>() < o.retreat_chance {
            athlete.x -= ux * speed * o.retreat_speed;
            athlete.y -= uy * speed * o.retreat_speed;
        } else {
            athlete.x += ux * speed * o.chase_speed;
            athlete.y += uy * speed * o.chase_speed;
        }
    }

    if dist < o.steal_reach
        && timer % o.steal_interval == 0
        && rng.random::<f32>() < o.steal_chance
    {
        let roll = rng.random::<f32>();
        events.extend(actions::steal(state, COMPUTER_TEAM, roll, config));
    }
}
