pub mod config;
pub mod error;
pub mod session;

use std::time::Duration;

use serde::{Deserialize, Serialize};

use courtside_basketball::Basketball;
use courtside_basketball::config::BasketballConfig;
use courtside_core::game_trait::{MatchMode, TeamScore};
use courtside_core::net::messages::ServerMessage;
use courtside_core::net::protocol::decode_server_message;
use courtside_core::team::{TeamId, Teams};

use config::RunnerConfig;
use error::RunnerError;
use session::{SessionBroadcast, SessionCommand, SessionConfig, spawn_session};

/// Summary printed when a headless run ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoxScore {
    pub mode: MatchMode,
    /// Whether regulation ran out, as opposed to a stop or timeout.
    pub completed: bool,
    pub ticks: u64,
    pub scores: Vec<TeamScore>,
    /// `None` on a tie.
    pub winner: Option<TeamId>,
}

impl BoxScore {
    fn new(mode: MatchMode, completed: bool, ticks: u64, scores: Vec<TeamScore>) -> Self {
        let score = |team: TeamId| {
            scores
                .iter()
                .find(|s| s.team == team)
                .map_or(0, |s| s.score)
        };
        let (one, two) = (score(TeamId::One), score(TeamId::Two));
        let winner = match one.cmp(&two) {
            std::cmp::Ordering::Greater => Some(TeamId::One),
            std::cmp::Ordering::Less => Some(TeamId::Two),
            std::cmp::Ordering::Equal => None,
        };
        Self {
            mode,
            completed,
            ticks,
            scores,
            winner,
        }
    }
}

fn scores_from(teams: &Teams, one: u32, two: u32) -> Vec<TeamScore> {
    TeamId::ALL
        .iter()
        .zip([one, two])
        .map(|(&team, score)| TeamScore {
            team,
            name: teams.name(team).to_string(),
            score,
        })
        .collect()
}

/// Build the game a runner config asks for.
pub fn build_game(config: &RunnerConfig) -> Basketball {
    let game_config = config
        .game_config
        .as_deref()
        .and_then(BasketballConfig::from_file)
        .unwrap_or_else(BasketballConfig::load);
    match config.seed {
        Some(seed) => Basketball::with_seed(game_config, seed),
        None => Basketball::with_config(game_config),
    }
}

/// Play one match without controllers until regulation ends, the duration
/// limit passes or Ctrl-C is pressed.
pub async fn run_headless(config: RunnerConfig) -> Result<BoxScore, RunnerError> {
    config.validate()?;
    let game = build_game(&config);
    let (cmd_tx, mut broadcast_rx, handle) =
        spawn_session(Box::new(game), SessionConfig::from_runner(&config));

    let deadline = async {
        match config.max_duration_secs {
            Some(secs) => tokio::time::sleep(Duration::from_secs(secs)).await,
            None => std::future::pending().await,
        }
    };
    tokio::pin!(deadline);

    let mut teams = Teams::default();
    let mut last_scores = (0, 0);
    let mut ticks = 0;
    let mut final_scores = None;
    let mut stopping = false;

    loop {
        tokio::select! {
            msg = broadcast_rx.recv() => {
                let data = match msg {
                    Some(SessionBroadcast::EncodedMessage(data)) => data,
                    Some(SessionBroadcast::Closed) | None => break,
                };
                match decode_server_message(&data)? {
                    ServerMessage::MatchStart(m) => teams = m.teams,
                    ServerMessage::Snapshot(s) => {
                        ticks = s.tick;
                        last_scores = (s.score_one, s.score_two);
                    },
                    ServerMessage::MatchEvent(e) => {
                        tracing::info!(tick = e.tick, "{}", e.message);
                    },
                    ServerMessage::MatchEnd(m) => {
                        final_scores = Some(m.scores);
                        let _ = cmd_tx.send(SessionCommand::Stop);
                        stopping = true;
                    },
                }
            }
            _ = &mut deadline, if !stopping => {
                tracing::info!("Duration limit reached, stopping");
                let _ = cmd_tx.send(SessionCommand::Stop);
                stopping = true;
            }
            _ = tokio::signal::ctrl_c(), if !stopping => {
                tracing::info!("Interrupted, stopping");
                let _ = cmd_tx.send(SessionCommand::Stop);
                stopping = true;
            }
        }
    }

    handle
        .await
        .map_err(|e| RunnerError::Session(e.to_string()))?;

    let completed = final_scores.is_some();
    let scores =
        final_scores.unwrap_or_else(|| scores_from(&teams, last_scores.0, last_scores.1));
    Ok(BoxScore::new(config.mode, completed, ticks, scores))
}
