use rand::Rng;
use rand::rngs::StdRng;

use courtside_core::team::TeamId;

use crate::config::TeammateConfig;
use crate::court::{SAFE_MAX_X, SAFE_MAX_Y, SAFE_MIN};
use crate::entity::{AthleteId, MatchState};

/// Lanes uncontested teammates drift to, by formation index.
const SPREAD_LANES: [f32; 6] = [150.0, 350.0, 450.0, 650.0, 250.0, 550.0];

/// Where the `index`-th formation slot stands relative to a carrier at
/// `(bx, by)`, clamped into the safe rectangle.
pub fn formation_target(
    index: usize,
    team: TeamId,
    bx: f32,
    by: f32,
    rng: &mut StdRng,
) -> (f32, f32) {
    let up = team.attacks_up();
    let (x, y) = match index {
        0 => (
            (bx - 180.0).max(100.0),
            if up { (by - 80.0).max(100.0) } else { (by + 80.0).min(500.0) },
        ),
        1 => (
            (bx + 180.0).min(700.0),
            if up { (by - 80.0).max(100.0) } else { (by + 80.0).min(500.0) },
        ),
        2 => (
            bx + rng.random_range(-50.0..50.0),
            if up { (by - 120.0).max(50.0) } else { (by + 120.0).min(550.0) },
        ),
        3 => (
            bx + rng.random_range(-40.0..40.0),
            if up { (by + 100.0).min(550.0) } else { (by - 100.0).max(50.0) },
        ),
        _ => (
            if index % 2 == 0 { bx - 150.0 } else { bx + 150.0 },
            if up { (by - 60.0).max(50.0) } else { (by + 60.0).min(550.0) },
        ),
    };
    (x.clamp(SAFE_MIN, SAFE_MAX_X), y.clamp(SAFE_MIN, SAFE_MAX_Y))
}

/// Home lane for the `index`-th formation slot, with vertical jitter.
pub fn spread_target(index: usize, team: TeamId, rng: &mut StdRng) -> (f32, f32) {
    let base_y = if team.attacks_up() { 400.0 } else { 200.0 };
    (
        SPREAD_LANES[index % SPREAD_LANES.len()],
        base_y + rng.random_range(-50.0..50.0),
    )
}

/// Pick a new target for one uncontrolled athlete.
fn retarget(state: &mut MatchState, id: AthleteId, config: &TeammateConfig, rng: &mut StdRng) {
    let ball = &state.ball;
    if ball.is_free() && ball.vy.abs() < config.pursuit_max_vy {
        let (bx, by) = (ball.x, ball.y);
        let athlete = &mut state.athletes[id];
        if athlete.distance_to(bx, by) < config.pursuit_radius {
            athlete.target_x = bx;
            athlete.target_y = by;
        }
        return;
    }

    let team = state.athletes[id].team;
    let index = state
        .formation_order(team)
        .iter()
        .position(|&i| i == id)
        .unwrap_or(0);
    let carrier = if state.ball.holder == Some(team) {
        state
            .carrier()
            .filter(|&c| c != id && state.athletes[c].team == team)
    } else {
        None
    };

    let target = match carrier {
        Some(c) => {
            let (bx, by) = (state.athletes[c].x, state.athletes[c].y);
            Some(formation_target(index, team, bx, by, rng))
        },
        None => rng
            .random_bool(f64::from(config.spread_chance))
            .then(|| spread_target(index, team, rng)),
    };
    if let Some((x, y)) = target {
        let athlete = &mut state.athletes[id];
        athlete.target_x = x;
        athlete.target_y = y;
    }
}

/// Retarget and move every athlete nobody controls, in roster order.
pub fn update_teammates(state: &mut MatchState, config: &TeammateConfig, rng: &mut StdRng) {
    for id in 0..state.athletes.len() {
        if state.is_controlled(id) {
            continue;
        }
        retarget(state, id, config, rng);
        let athlete = &mut state.athletes[id];
        let (tx, ty, speed) = (athlete.target_x, athlete.target_y, athlete.speed);
        athlete.step_toward(tx, ty, speed, config.arrival_distance);
        athlete.clamp_to_court();
    }
}
