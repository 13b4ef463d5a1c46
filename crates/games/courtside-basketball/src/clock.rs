use serde::{Deserialize, Serialize};

use crate::config::ClockConfig;

/// Quarter and seconds remaining in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuarterClock {
    pub quarter: u8,
    pub time_left: u32,
}

/// What a one-second clock step did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockOutcome {
    Running,
    /// The given quarter ran out and the next one started.
    QuarterEnded(u8),
    /// The final quarter ran out.
    Expired,
}

impl QuarterClock {
    pub fn new(config: &ClockConfig) -> Self {
        Self {
            quarter: 1,
            time_left: config.quarter_secs,
        }
    }

    /// Advance the clock by one second.
    pub fn tick(&mut self, config: &ClockConfig) -> ClockOutcome {
        self.time_left = self.time_left.saturating_sub(1);
        if self.time_left > 0 {
            return ClockOutcome::Running;
        }
        if self.quarter < config.quarters {
            let ended = self.quarter;
            self.quarter += 1;
            self.time_left = config.quarter_secs;
            ClockOutcome::QuarterEnded(ended)
        } else {
            ClockOutcome::Expired
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quarter_ends_after_full_length() {
        let config = ClockConfig::default();
        let mut clock = QuarterClock::new(&config);
        for _ in 0..119 {
            assert_eq!(clock.tick(&config), ClockOutcome::Running);
        }
        assert_eq!(clock.time_left, 1);
        assert_eq!(clock.tick(&config), ClockOutcome::QuarterEnded(1));
        assert_eq!(clock.quarter, 2);
        assert_eq!(clock.time_left, 120);
    }

    #[test]
    fn regulation_expires_after_last_quarter() {
        let config = ClockConfig {
            quarters: 2,
            quarter_secs: 3,
        };
        let mut clock = QuarterClock::new(&config);
        let outcomes: Vec<ClockOutcome> = (0..6).map(|_| clock.tick(&config)).collect();
        assert_eq!(
            outcomes,
            vec![
                ClockOutcome::Running,
                ClockOutcome::Running,
                ClockOutcome::QuarterEnded(1),
                ClockOutcome::Running,
                ClockOutcome::Running,
                ClockOutcome::Expired,
            ]
        );
        assert_eq!(clock.quarter, 2);
        assert_eq!(clock.time_left, 0);
    }
}
