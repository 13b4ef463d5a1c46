use courtside_core::events::GameEvent;
use courtside_core::team::TeamId;

use crate::config::PhysicsConfig;
use crate::court::FLOOR_Y;
use crate::entity::{AthleteId, Ball, MatchState};

/// Integrate a free ball for one tick: gravity, horizontal damping,
/// position, then the floor bounce.
pub fn advance_free_ball(ball: &mut Ball, physics: &PhysicsConfig) {
    ball.vy += physics.gravity;
    ball.vx *= physics.damping;
    ball.x += ball.vx;
    ball.y += ball.vy;

    if ball.y > FLOOR_Y {
        ball.y = FLOOR_Y;
        ball.vy *= -physics.restitution;
        ball.vx *= physics.floor_friction;
        if ball.vy.abs() < physics.rest_threshold {
            ball.vy = 0.0;
        }
    }
}

/// Whether a free ball is slow enough to be picked up.
pub fn pickup_eligible(ball: &Ball, physics: &PhysicsConfig) -> bool {
    let resting = ball.vy == 0.0 && ball.vx.abs() < physics.rest_max_vx;
    let slow = ball.vy.abs() < physics.slow_max_vy && ball.vx.abs() < physics.slow_max_vx;
    resting || slow
}

/// Order in which athletes get a chance at a loose ball: both controlled
/// athletes first, then everybody else in roster order.
fn pickup_order(state: &MatchState) -> Vec<AthleteId> {
    let first = state.controlled(TeamId::One);
    let second = state.controlled(TeamId::Two);
    let mut order = vec![first, second];
    order.extend((0..state.athletes.len()).filter(|&i| i != first && i != second));
    order
}

/// Give a loose ball to the first athlete in range, if it is slow enough.
pub fn try_pickup(state: &mut MatchState, physics: &PhysicsConfig) -> Option<GameEvent> {
    if !state.ball.is_free() || !pickup_eligible(&state.ball, physics) {
        return None;
    }
    let (bx, by) = (state.ball.x, state.ball.y);
    let winner = pickup_order(state)
        .into_iter()
        .find(|&i| state.athletes[i].distance_to(bx, by) < physics.pickup_radius)?;

    let team = state.athletes[winner].team;
    let took_control = state.controlled(team) != winner;
    state.give_ball(winner);
    state.ball.vx = 0.0;
    state.ball.vy = 0.0;
    if took_control {
        state.bind(team, winner);
    }
    tracing::debug!(athlete = winner, %team, took_control, "Loose ball picked up");
    Some(GameEvent::BallPickedUp { team, took_control })
}

/// Keep a held ball in front of its carrier and advance the dribble.
pub fn glue_to_carrier(state: &mut MatchState, physics: &PhysicsConfig) {
    let Some(carrier) = state.carrier() else {
        return;
    };
    let athlete = &state.athletes[carrier];
    let forward = if athlete.team.attacks_up() {
        -physics.dribble_forward
    } else {
        physics.dribble_forward
    };
    let (x, y) = (athlete.x, athlete.y);

    let ball = &mut state.ball;
    ball.dribble_phase = (ball.dribble_phase + physics.dribble_step) % std::f32::consts::TAU;
    ball.x = x;
    ball.y = y + forward + ball.dribble_phase.sin() * physics.dribble_amplitude;
}

/// One tick of ball behavior: glued while held, otherwise flight plus pickup.
pub fn update_ball(state: &mut MatchState, physics: &PhysicsConfig) -> Option<GameEvent> {
    if state.ball.is_free() {
        advance_free_ball(&mut state.ball, physics);
        try_pickup(state, physics)
    } else {
        glue_to_carrier(state, physics);
        None
    }
}
