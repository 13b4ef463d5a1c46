use std::time::Duration;

use bytes::Bytes;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use courtside_core::events::GameEvent;
use courtside_core::game_trait::{CourtGame, MatchConfig};
use courtside_core::input::{ControllerInput, ControllerInputs};
use courtside_core::net::messages::{
    ClientMessage, MatchControl, MatchEndMsg, MatchEventMsg, MatchStartMsg, ServerMessage,
};
use courtside_core::net::protocol::{
    PROTOCOL_VERSION, decode_client_message, encode_server_message,
};
use courtside_core::team::{TeamId, Teams};

use crate::config::RunnerConfig;
use crate::error::RunnerError;

/// Commands sent from input devices and menus to the session loop.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionCommand {
    /// Replace the held flags of one controller.
    Input {
        team: TeamId,
        input: ControllerInput,
    },
    Pause,
    Resume,
    Reset,
    Stop,
}

impl From<ClientMessage> for SessionCommand {
    fn from(msg: ClientMessage) -> Self {
        match msg {
            ClientMessage::ControllerInput(m) => Self::Input {
                team: m.team,
                input: m.input,
            },
            ClientMessage::MatchControl(m) => match m.action {
                MatchControl::Pause => Self::Pause,
                MatchControl::Resume => Self::Resume,
                MatchControl::Reset => Self::Reset,
            },
        }
    }
}

/// Decode a wire-format client message into a session command.
pub fn decode_command(data: &[u8]) -> Result<SessionCommand, RunnerError> {
    Ok(decode_client_message(data)?.into())
}

/// Broadcasts sent from the session loop to renderers and other listeners.
#[derive(Debug, Clone)]
pub enum SessionBroadcast {
    /// Serialized `ServerMessage` bytes.
    EncodedMessage(Bytes),
    /// The loop has exited.
    Closed,
}

/// Scheduling and match setup for one session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub match_config: MatchConfig,
    pub tick_rate_hz: f32,
    pub clock_rate_hz: f32,
    pub snapshot_every: u32,
}

impl SessionConfig {
    pub fn from_runner(config: &RunnerConfig) -> Self {
        Self {
            match_config: MatchConfig::new(config.mode),
            tick_rate_hz: config.tick_rate_hz,
            clock_rate_hz: config.clock_rate_hz,
            snapshot_every: config.snapshot_every.max(1),
        }
    }
}

/// Spawn the session loop as a tokio task.
/// Returns the command sender, broadcast receiver and task handle.
pub fn spawn_session(
    mut game: Box<dyn CourtGame>,
    config: SessionConfig,
) -> (
    mpsc::UnboundedSender<SessionCommand>,
    mpsc::UnboundedReceiver<SessionBroadcast>,
    JoinHandle<()>,
) {
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
    let (broadcast_tx, broadcast_rx) = mpsc::unbounded_channel();

    let handle = tokio::spawn(async move {
        run_session(&mut *game, config, cmd_rx, broadcast_tx).await;
    });

    (cmd_tx, broadcast_rx, handle)
}

/// Encode and send one message. Send failures mean nobody is listening.
fn broadcast(tx: &mpsc::UnboundedSender<SessionBroadcast>, msg: &ServerMessage, what: &str) {
    match encode_server_message(msg) {
        Ok(data) => {
            let _ = tx.send(SessionBroadcast::EncodedMessage(Bytes::from(data)));
        },
        Err(e) => tracing::error!(error = %e, message = what, "Failed to encode message"),
    }
}

fn broadcast_start(tx: &mpsc::UnboundedSender<SessionBroadcast>, config: &MatchConfig) {
    let msg = ServerMessage::MatchStart(MatchStartMsg {
        protocol_version: PROTOCOL_VERSION,
        mode: config.mode,
        teams: config.teams.clone(),
    });
    broadcast(tx, &msg, "MatchStart");
}

fn broadcast_events(
    tx: &mpsc::UnboundedSender<SessionBroadcast>,
    tick: u64,
    events: &[GameEvent],
    teams: &Teams,
) {
    for event in events {
        let message = event.describe(teams);
        tracing::debug!(tick, %message, "Match event");
        let msg = ServerMessage::MatchEvent(MatchEventMsg {
            tick,
            event: event.clone(),
            message,
        });
        broadcast(tx, &msg, "MatchEvent");
    }
}

/// The single-authority match loop: simulation ticks, clock ticks and
/// commands are all handled on this task, never concurrently.
async fn run_session(
    game: &mut dyn CourtGame,
    config: SessionConfig,
    mut cmd_rx: mpsc::UnboundedReceiver<SessionCommand>,
    broadcast_tx: mpsc::UnboundedSender<SessionBroadcast>,
) {
    let match_config =
        MatchConfig::with_teams(config.match_config.mode, config.match_config.teams.clone());
    game.init(&match_config);
    let teams = match_config.teams.clone();
    let metadata = game.metadata();
    tracing::info!(
        game = %metadata.name,
        mode = ?match_config.mode,
        tick_rate_hz = config.tick_rate_hz,
        clock_rate_hz = config.clock_rate_hz,
        "Session started"
    );
    broadcast_start(&broadcast_tx, &match_config);

    let mut ticks = tokio::time::interval(Duration::from_secs_f32(1.0 / config.tick_rate_hz));
    ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);
    // The clock's first second must elapse before it ticks.
    let clock_period = Duration::from_secs_f32(1.0 / config.clock_rate_hz);
    let mut clock = tokio::time::interval_at(Instant::now() + clock_period, clock_period);
    clock.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut held = ControllerInputs::default();
    let mut since_snapshot: u32 = 0;

    loop {
        tokio::select! {
            _ = ticks.tick() => {
                let events = game.update(&held);
                let snapshot = game.snapshot();
                // Events only come out of a processed tick, which advanced the counter.
                let tick = snapshot.tick.saturating_sub(1);
                broadcast_events(&broadcast_tx, tick, &events, &teams);

                since_snapshot += 1;
                if since_snapshot >= config.snapshot_every {
                    since_snapshot = 0;
                    let msg = ServerMessage::Snapshot(Box::new(snapshot));
                    broadcast(&broadcast_tx, &msg, "Snapshot");
                }
            }
            _ = clock.tick() => {
                let events = game.clock_tick();
                if events.is_empty() {
                    continue;
                }
                let tick = game.snapshot().tick;
                broadcast_events(&broadcast_tx, tick, &events, &teams);

                if events.iter().any(|e| matches!(e, GameEvent::MatchEnded { .. })) {
                    let msg = ServerMessage::MatchEnd(MatchEndMsg {
                        scores: game.final_scores(),
                    });
                    broadcast(&broadcast_tx, &msg, "MatchEnd");
                    let msg = ServerMessage::Snapshot(Box::new(game.snapshot()));
                    broadcast(&broadcast_tx, &msg, "Snapshot");
                }
            }
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(SessionCommand::Input { team, input }) => {
                        held.set(team, input);
                    },
                    Some(SessionCommand::Pause) => {
                        game.pause();
                        held = ControllerInputs::default();
                        tracing::info!("Match paused");
                    },
                    Some(SessionCommand::Resume) => {
                        game.resume();
                        tracing::info!("Match resumed");
                    },
                    Some(SessionCommand::Reset) => {
                        game.reset();
                        held = ControllerInputs::default();
                        since_snapshot = 0;
                        tracing::info!("Match reset");
                        broadcast_start(&broadcast_tx, &match_config);
                    },
                    Some(SessionCommand::Stop) | None => {
                        break;
                    },
                }
            }
        }
    }

    tracing::info!("Session stopped");
    let _ = broadcast_tx.send(SessionBroadcast::Closed);
}
