use serde::{Deserialize, Serialize};

/// Current layout of the tunable table. Files with another version are
/// still read; unknown or missing keys fall back to defaults.
pub const CONFIG_VERSION: u32 = 1;

/// Data-driven configuration for the basketball simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BasketballConfig {
    pub version: u32,
    pub physics: PhysicsConfig,
    pub actions: ActionConfig,
    pub teammates: TeammateConfig,
    pub opponent: OpponentConfig,
    pub clock: ClockConfig,
    pub crowd: CrowdConfig,
}

impl Default for BasketballConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            physics: PhysicsConfig::default(),
            actions: ActionConfig::default(),
            teammates: TeammateConfig::default(),
            opponent: OpponentConfig::default(),
            clock: ClockConfig::default(),
            crowd: CrowdConfig::default(),
        }
    }
}

/// Free-flight ball behavior. All rates are per tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Added to vertical velocity every tick.
    pub gravity: f32,
    /// Horizontal velocity multiplier every tick.
    pub damping: f32,
    /// Fraction of vertical speed kept on a floor bounce.
    pub restitution: f32,
    /// Horizontal velocity multiplier on a floor bounce.
    pub floor_friction: f32,
    /// Vertical speed below which a bounce comes to rest.
    pub rest_threshold: f32,
    /// Athletes strictly closer than this can pick up a free ball.
    pub pickup_radius: f32,
    /// A resting ball is pickable while |vx| is below this.
    pub rest_max_vx: f32,
    /// A slow ball is pickable while |vy| is below this...
    pub slow_max_vy: f32,
    /// ...and |vx| is below this.
    pub slow_max_vx: f32,
    /// Dribble phase advance per tick (radians).
    pub dribble_step: f32,
    /// Dribble bobble amplitude.
    pub dribble_amplitude: f32,
    /// Distance the held ball sits in front of the carrier.
    pub dribble_forward: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: 0.3,
            damping: 0.99,
            restitution: 0.6,
            floor_friction: 0.8,
            rest_threshold: 1.0,
            pickup_radius: 35.0,
            rest_max_vx: 0.5,
            slow_max_vy: 5.0,
            slow_max_vx: 3.0,
            dribble_step: 0.15,
            dribble_amplitude: 10.0,
            dribble_forward: 20.0,
        }
    }
}

/// Shoot, steal, pass and human movement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionConfig {
    pub shot_power: f32,
    /// Horizontal component scale of a shot.
    pub shot_horizontal_factor: f32,
    /// Attacker and defender must be strictly closer than this.
    pub steal_radius: f32,
    /// Probability a steal in range succeeds.
    pub steal_chance: f32,
    /// Human-driven athlete speed per held direction.
    pub human_speed: f32,
    pub points_per_basket: u32,
    /// Ticks between a score and the re-homing of the ball.
    pub reset_delay_ticks: u64,
}

impl Default for ActionConfig {
    fn default() -> Self {
        Self {
            shot_power: 15.0,
            shot_horizontal_factor: 0.3,
            steal_radius: 40.0,
            steal_chance: 0.4,
            human_speed: 4.0,
            points_per_basket: 2,
            reset_delay_ticks: 90,
        }
    }
}

/// Autonomous teammates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeammateConfig {
    /// AI speed is `base_speed + U[0, speed_jitter)`, drawn once per match.
    pub base_speed: f32,
    pub speed_jitter: f32,
    /// Athletes within this distance chase a free ball.
    pub pursuit_radius: f32,
    /// Free ball must be moving vertically slower than this to be chased.
    pub pursuit_max_vy: f32,
    /// Athletes stop moving once this close to their target.
    pub arrival_distance: f32,
    /// Per-tick probability of re-picking a spread lane.
    pub spread_chance: f32,
}

impl Default for TeammateConfig {
    fn default() -> Self {
        Self {
            base_speed: 2.0,
            speed_jitter: 1.0,
            pursuit_radius: 200.0,
            pursuit_max_vy: 2.0,
            arrival_distance: 5.0,
            spread_chance: 0.03,
        }
    }
}

/// Computer opponent driving team two in vs-AI mode. Speeds are fractions
/// of the athlete's own speed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpponentConfig {
    pub carry_speed: f32,
    /// Stop advancing once the carrier reaches this y.
    pub carry_stop_y: f32,
    pub jitter_chance: f32,
    pub center_speed: f32,
    /// Maximum |y - hoop| to consider shooting.
    pub shoot_range: f32,
    pub shoot_min_x: f32,
    pub shoot_max_x: f32,
    pub shoot_interval: u64,
    pub shoot_chance: f32,
    pub pass_interval: u64,
    pub pass_chance: f32,
    pub chase_speed: f32,
    pub retreat_chance: f32,
    pub retreat_speed: f32,
    /// Maximum distance to the ball to consider a steal.
    pub steal_reach: f32,
    pub steal_interval: u64,
    pub steal_chance: f32,
    pub loose_ball_speed: f32,
}

impl Default for OpponentConfig {
    fn default() -> Self {
        Self {
            carry_speed: 0.7,
            carry_stop_y: 490.0,
            jitter_chance: 0.1,
            center_speed: 0.6,
            shoot_range: 250.0,
            shoot_min_x: 340.0,
            shoot_max_x: 460.0,
            shoot_interval: 70,
            shoot_chance: 0.6,
            pass_interval: 120,
            pass_chance: 0.2,
            chase_speed: 0.6,
            retreat_chance: 0.15,
            retreat_speed: 0.5,
            steal_reach: 50.0,
            steal_interval: 50,
            steal_chance: 0.4,
            loose_ball_speed: 0.5,
        }
    }
}

/// Regulation length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    pub quarters: u8,
    pub quarter_secs: u32,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            quarters: 4,
            quarter_secs: 120,
        }
    }
}

/// Cosmetic crowd noise meter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrowdConfig {
    pub initial: u8,
    pub score_boost: u8,
    pub steal_boost: u8,
    pub max: u8,
}

impl Default for CrowdConfig {
    fn default() -> Self {
        Self {
            initial: 50,
            score_boost: 15,
            steal_boost: 10,
            max: 100,
        }
    }
}

impl BasketballConfig {
    /// Load config from environment or TOML file, falling back to defaults.
    pub fn load() -> Self {
        if let Ok(path) = std::env::var("COURTSIDE_BASKETBALL_CONFIG")
            && let Some(config) = Self::from_file(&path)
        {
            return config;
        }
        if let Some(config) = Self::from_file("config/basketball.toml") {
            return config;
        }
        Self::default()
    }

    /// Reject values the simulation cannot run with: zero decision
    /// intervals, chances outside [0, 1] and an empty regulation.
    pub fn validate(&self) -> Result<(), String> {
        let o = &self.opponent;
        for (name, interval) in [
            ("opponent.shoot_interval", o.shoot_interval),
            ("opponent.pass_interval", o.pass_interval),
            ("opponent.steal_interval", o.steal_interval),
        ] {
            if interval == 0 {
                return Err(format!("{name} must be > 0"));
            }
        }
        for (name, chance) in [
            ("teammates.spread_chance", self.teammates.spread_chance),
            ("actions.steal_chance", self.actions.steal_chance),
            ("opponent.jitter_chance", o.jitter_chance),
            ("opponent.shoot_chance", o.shoot_chance),
            ("opponent.pass_chance", o.pass_chance),
            ("opponent.retreat_chance", o.retreat_chance),
            ("opponent.steal_chance", o.steal_chance),
        ] {
            if !(0.0..=1.0).contains(&chance) {
                return Err(format!("{name} must be within [0, 1], got {chance}"));
            }
        }
        if self.clock.quarters == 0 || self.clock.quarter_secs == 0 {
            return Err("clock.quarters and clock.quarter_secs must be > 0".to_string());
        }
        Ok(())
    }

    /// Read a TOML file. Missing, unparsable or invalid files yield `None`.
    pub fn from_file(path: &str) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        match toml::from_str::<Self>(&contents) {
            Ok(config) => {
                if let Err(e) = config.validate() {
                    tracing::warn!(path, error = %e, "Ignoring invalid basketball config");
                    return None;
                }
                if config.version != CONFIG_VERSION {
                    tracing::warn!(
                        path,
                        version = config.version,
                        expected = CONFIG_VERSION,
                        "Basketball config version mismatch"
                    );
                }
                Some(config)
            },
            Err(e) => {
                tracing::warn!(path, error = %e, "Ignoring invalid basketball config");
                None
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_arcade_tuning() {
        let config = BasketballConfig::default();
        assert_eq!(config.version, CONFIG_VERSION);
        assert_eq!(config.physics.gravity, 0.3);
        assert_eq!(config.physics.pickup_radius, 35.0);
        assert_eq!(config.actions.reset_delay_ticks, 90);
        assert_eq!(config.clock.quarters, 4);
        assert_eq!(config.clock.quarter_secs, 120);
        assert_eq!(config.crowd.max, 100);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: BasketballConfig = toml::from_str(
            r#"
            version = 1

            [physics]
            gravity = 0.5

            [clock]
            quarter_secs = 60
            "#,
        )
        .unwrap();
        assert_eq!(config.physics.gravity, 0.5);
        assert_eq!(config.physics.damping, 0.99);
        assert_eq!(config.clock.quarter_secs, 60);
        assert_eq!(config.clock.quarters, 4);
        assert_eq!(config.opponent, OpponentConfig::default());
    }

    #[test]
    fn toml_roundtrip() {
        let config = BasketballConfig::default();
        let text = toml::to_string(&config).unwrap();
        let back: BasketballConfig = toml::from_str(&text).unwrap();
        assert_eq!(config, back);
    }

    #[test]
    fn missing_file_reads_none() {
        assert!(BasketballConfig::from_file("config/does-not-exist.toml").is_none());
    }

    #[test]
    fn validate_accepts_default() {
        assert!(BasketballConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_zero_intervals() {
        let mut config = BasketballConfig::default();
        config.opponent.shoot_interval = 0;
        assert!(config.validate().unwrap_err().contains("shoot_interval"));

        let mut config = BasketballConfig::default();
        config.opponent.steal_interval = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_out_of_range_chances() {
        for chance in [1.5, -0.1, f32::NAN] {
            let mut config = BasketballConfig::default();
            config.teammates.spread_chance = chance;
            assert!(config.validate().is_err(), "spread_chance {chance}");
        }
        let mut config = BasketballConfig::default();
        config.actions.steal_chance = 1.0;
        config.opponent.pass_chance = 0.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn invalid_file_falls_back_to_defaults() {
        let path = std::env::temp_dir().join(format!(
            "courtside-bad-interval-{}.toml",
            std::process::id()
        ));
        std::fs::write(
            &path,
            "version = 1\n\n[opponent]\nshoot_interval = 0\n\n[teammates]\nspread_chance = 1.5\n",
        )
        .unwrap();
        let path_str = path.to_str().unwrap();
        let loaded = BasketballConfig::from_file(path_str);
        std::fs::remove_file(&path).unwrap();

        assert!(loaded.is_none());
        let config = loaded.unwrap_or_default();
        assert_eq!(config.opponent.shoot_interval, 70);
        assert_eq!(config.teammates.spread_chance, 0.03);
    }
}
