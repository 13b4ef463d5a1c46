use serde::Deserialize;

use courtside_core::game_trait::MatchMode;
use courtside_core::net::protocol::DEFAULT_TICK_RATE_HZ;

use crate::error::RunnerError;

/// Runner configuration, loaded from `courtside.toml`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    pub mode: MatchMode,
    pub tick_rate_hz: f32,
    /// Match clock rate. Raise it to play a full match faster.
    pub clock_rate_hz: f32,
    /// Broadcast a snapshot every N ticks.
    pub snapshot_every: u32,
    /// Fixed RNG seed for a reproducible match.
    pub seed: Option<u64>,
    /// Path to a basketball tuning file. Falls back to the game's own lookup.
    pub game_config: Option<String>,
    /// Stop the session after this many seconds even if the match is running.
    pub max_duration_secs: Option<u64>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            mode: MatchMode::OneControlledVsAi,
            tick_rate_hz: DEFAULT_TICK_RATE_HZ as f32,
            clock_rate_hz: 1.0,
            snapshot_every: 1,
            seed: None,
            game_config: None,
            max_duration_secs: None,
        }
    }
}

impl RunnerConfig {
    pub fn validate(&self) -> Result<(), RunnerError> {
        if !(self.tick_rate_hz.is_finite() && self.tick_rate_hz > 0.0) {
            return Err(RunnerError::InvalidConfig(format!(
                "tick_rate_hz must be > 0, got {}",
                self.tick_rate_hz
            )));
        }
        if !(self.clock_rate_hz.is_finite() && self.clock_rate_hz > 0.0) {
            return Err(RunnerError::InvalidConfig(format!(
                "clock_rate_hz must be > 0, got {}",
                self.clock_rate_hz
            )));
        }
        if self.snapshot_every == 0 {
            return Err(RunnerError::InvalidConfig(
                "snapshot_every must be > 0".to_string(),
            ));
        }
        if self.max_duration_secs == Some(0) {
            return Err(RunnerError::InvalidConfig(
                "max_duration_secs must be > 0 when set".to_string(),
            ));
        }
        if let Some(ref path) = self.game_config
            && !std::path::Path::new(path).is_file()
        {
            return Err(RunnerError::InvalidConfig(format!(
                "game_config {path} does not exist"
            )));
        }
        Ok(())
    }

    /// Load config from `courtside.toml` if it exists, then apply env var overrides.
    pub fn load() -> Self {
        let mut config = match std::fs::read_to_string("courtside.toml") {
            Ok(content) => match toml::from_str::<RunnerConfig>(&content) {
                Ok(cfg) => {
                    tracing::info!("Loaded configuration from courtside.toml");
                    cfg
                },
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to parse courtside.toml, using defaults");
                    RunnerConfig::default()
                },
            },
            Err(_) => {
                tracing::info!("No courtside.toml found, using defaults");
                RunnerConfig::default()
            },
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        config
    }

    /// Apply `COURTSIDE_*` overrides. Unparsable values are logged and skipped.
    pub fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(val) = var("COURTSIDE_MODE") {
            match parse_mode(&val) {
                Some(mode) => self.mode = mode,
                None => tracing::warn!(value = %val, "Ignoring unknown COURTSIDE_MODE"),
            }
        }
        if let Some(val) = var("COURTSIDE_TICK_RATE")
            && let Ok(hz) = val.parse::<f32>()
        {
            self.tick_rate_hz = hz;
        }
        if let Some(val) = var("COURTSIDE_CLOCK_RATE")
            && let Ok(hz) = val.parse::<f32>()
        {
            self.clock_rate_hz = hz;
        }
        if let Some(val) = var("COURTSIDE_SNAPSHOT_EVERY")
            && let Ok(n) = val.parse::<u32>()
        {
            self.snapshot_every = n;
        }
        if let Some(val) = var("COURTSIDE_SEED")
            && let Ok(seed) = val.parse::<u64>()
        {
            self.seed = Some(seed);
        }
        if let Some(path) = var("COURTSIDE_GAME_CONFIG")
            && !path.is_empty()
        {
            self.game_config = Some(path);
        }
        if let Some(val) = var("COURTSIDE_MAX_DURATION_SECS")
            && let Ok(secs) = val.parse::<u64>()
        {
            self.max_duration_secs = Some(secs);
        }
    }
}

fn parse_mode(val: &str) -> Option<MatchMode> {
    match val.trim().to_ascii_lowercase().as_str() {
        "two-controlled" | "two" | "2p" => Some(MatchMode::TwoControlled),
        "one-controlled-vs-ai" | "vs-ai" | "1p" => Some(MatchMode::OneControlledVsAi),
        _ => None,
    }
}
