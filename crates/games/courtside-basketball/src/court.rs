use courtside_core::team::TeamId;

/// Court dimensions in logical units.
pub const COURT_WIDTH: f32 = 800.0;
pub const COURT_HEIGHT: f32 = 600.0;

/// The free ball bounces when it drops below this line.
pub const FLOOR_Y: f32 = 590.0;

pub const ATHLETE_RADIUS: f32 = 15.0;
pub const BALL_RADIUS: f32 = 8.0;

/// Hoop opening, exclusive on both sides.
pub const HOOP_MIN_X: f32 = 370.0;
pub const HOOP_MAX_X: f32 = 430.0;

/// Vertical thresholds the ball must cross to count at each hoop.
pub const TOP_HOOP_Y: f32 = 30.0;
pub const BOTTOM_HOOP_Y: f32 = 570.0;
/// The ball must be moving faster than this into the hoop.
pub const SCORE_MIN_SPEED: f32 = 5.0;

/// Pass targets: the y each team is trying to get the ball to.
pub const TOP_BASKET_Y: f32 = 10.0;
pub const BOTTOM_BASKET_Y: f32 = 590.0;

/// Teammate formation targets are clamped into this rectangle.
pub const SAFE_MIN: f32 = 50.0;
pub const SAFE_MAX_X: f32 = 750.0;
pub const SAFE_MAX_Y: f32 = 550.0;

pub const AI_PER_TEAM: usize = 4;

/// Tip-off spot of a team's human athlete.
pub fn tip_off_position(team: TeamId) -> (f32, f32) {
    match team {
        TeamId::One => (400.0, 500.0),
        TeamId::Two => (400.0, 100.0),
    }
}

/// Starting spot of the `slot`-th AI athlete of `team`.
pub fn ai_start_position(team: TeamId, slot: usize) -> (f32, f32) {
    let x = 100.0 + slot as f32 * 150.0;
    let y = match team {
        TeamId::One => 450.0,
        TeamId::Two => 150.0,
    };
    (x, y)
}

/// The y a team shoots and passes toward.
pub fn attack_target_y(team: TeamId) -> f32 {
    if team.attacks_up() {
        TOP_BASKET_Y
    } else {
        BOTTOM_BASKET_Y
    }
}

pub fn in_hoop_opening(x: f32) -> bool {
    x > HOOP_MIN_X && x < HOOP_MAX_X
}

/// Clamp a position into the legal area for a body of `radius`.
pub fn clamp_to_court(x: f32, y: f32, radius: f32) -> (f32, f32) {
    (
        x.clamp(radius, COURT_WIDTH - radius),
        y.clamp(radius, COURT_HEIGHT - radius),
    )
}

/// Whether a candidate coordinate is strictly inside `(radius, size - radius)`.
pub fn within_open_bounds(value: f32, radius: f32, size: f32) -> bool {
    value > radius && value < size - radius
}

pub fn distance(ax: f32, ay: f32, bx: f32, by: f32) -> f32 {
    ((ax - bx).powi(2) + (ay - by).powi(2)).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tip_off_spots_face_each_other() {
        assert_eq!(tip_off_position(TeamId::One), (400.0, 500.0));
        assert_eq!(tip_off_position(TeamId::Two), (400.0, 100.0));
    }

    #[test]
    fn ai_spots_spread_across_court() {
        assert_eq!(ai_start_position(TeamId::One, 0), (100.0, 450.0));
        assert_eq!(ai_start_position(TeamId::Two, 3), (550.0, 150.0));
    }

    #[test]
    fn hoop_opening_is_exclusive() {
        assert!(!in_hoop_opening(370.0));
        assert!(in_hoop_opening(400.0));
        assert!(!in_hoop_opening(430.0));
    }

    #[test]
    fn clamp_keeps_body_inside() {
        assert_eq!(clamp_to_court(-10.0, 700.0, 15.0), (15.0, 585.0));
    }

    #[test]
    fn open_bounds_exclude_edges() {
        assert!(!within_open_bounds(15.0, 15.0, 800.0));
        assert!(within_open_bounds(16.0, 15.0, 800.0));
        assert!(!within_open_bounds(785.0, 15.0, 800.0));
    }
}
