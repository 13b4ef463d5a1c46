use serde::{Deserialize, Serialize};

use super::messages::{
    ClientMessage, ControllerInputMsg, MatchControlMsg, MatchEndMsg, MatchEventMsg,
    MatchStartMsg, MessageType, ServerMessage,
};
use crate::snapshot::RenderSnapshot;

/// Current protocol version.
pub const PROTOCOL_VERSION: u8 = 1;

/// Default simulation tick rate in Hz.
pub const DEFAULT_TICK_RATE_HZ: u32 = 60;

/// Maximum message payload size in bytes.
pub const MAX_MESSAGE_SIZE: usize = 64 * 1024; // 64 KiB

#[derive(Debug)]
pub enum ProtocolError {
    EmptyMessage,
    UnknownMessageType(u8),
    PayloadTooLarge(usize),
    SerializeError(String),
    DeserializeError(String),
}

impl std::fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyMessage => write!(f, "empty message"),
            Self::UnknownMessageType(b) => write!(f, "unknown message type: 0x{b:02x}"),
            Self::PayloadTooLarge(size) => {
                write!(
                    f,
                    "payload too large: {size} bytes (max {MAX_MESSAGE_SIZE})"
                )
            },
            Self::SerializeError(e) => write!(f, "serialize error: {e}"),
            Self::DeserializeError(e) => write!(f, "deserialize error: {e}"),
        }
    }
}

impl std::error::Error for ProtocolError {}

/// Encode a serializable payload with a 1-byte type prefix.
pub fn encode_message<T: Serialize>(
    msg_type: MessageType,
    payload: &T,
) -> Result<Vec<u8>, ProtocolError> {
    let payload_bytes =
        rmp_serde::to_vec(payload).map_err(|e| ProtocolError::SerializeError(e.to_string()))?;
    let total = 1 + payload_bytes.len();
    if total > MAX_MESSAGE_SIZE {
        return Err(ProtocolError::PayloadTooLarge(total));
    }
    let mut buf = Vec::with_capacity(total);
    buf.push(msg_type as u8);
    buf.extend_from_slice(&payload_bytes);
    Ok(buf)
}

/// Encode a `ClientMessage` to wire format.
pub fn encode_client_message(msg: &ClientMessage) -> Result<Vec<u8>, ProtocolError> {
    match msg {
        ClientMessage::ControllerInput(m) => encode_message(MessageType::ControllerInput, m),
        ClientMessage::MatchControl(m) => encode_message(MessageType::MatchControl, m),
    }
}

/// Encode a `ServerMessage` to wire format.
pub fn encode_server_message(msg: &ServerMessage) -> Result<Vec<u8>, ProtocolError> {
    match msg {
        ServerMessage::MatchStart(m) => encode_message(MessageType::MatchStart, m),
        ServerMessage::Snapshot(m) => encode_message(MessageType::Snapshot, m.as_ref()),
        ServerMessage::MatchEvent(m) => encode_message(MessageType::MatchEvent, m),
        ServerMessage::MatchEnd(m) => encode_message(MessageType::MatchEnd, m),
    }
}

/// Extract the message type byte from raw wire data.
pub fn decode_message_type(data: &[u8]) -> Result<MessageType, ProtocolError> {
    if data.is_empty() {
        return Err(ProtocolError::EmptyMessage);
    }
    MessageType::from_byte(data[0]).ok_or(ProtocolError::UnknownMessageType(data[0]))
}

/// Decode a MessagePack payload (bytes after the type prefix).
pub fn decode_payload<T: for<'de> Deserialize<'de>>(data: &[u8]) -> Result<T, ProtocolError> {
    if data.is_empty() {
        return Err(ProtocolError::EmptyMessage);
    }
    rmp_serde::from_slice(&data[1..]).map_err(|e| ProtocolError::DeserializeError(e.to_string()))
}

/// Decode raw wire data into a `ClientMessage`.
pub fn decode_client_message(data: &[u8]) -> Result<ClientMessage, ProtocolError> {
    let msg_type = decode_message_type(data)?;
    match msg_type {
        MessageType::ControllerInput => Ok(ClientMessage::ControllerInput(decode_payload::<
            ControllerInputMsg,
        >(data)?)),
        MessageType::MatchControl => Ok(ClientMessage::MatchControl(decode_payload::<
            MatchControlMsg,
        >(data)?)),
        _ => Err(ProtocolError::UnknownMessageType(data[0])),
    }
}

/// Decode raw wire data into a `ServerMessage`.
pub fn decode_server_message(data: &[u8]) -> Result<ServerMessage, ProtocolError> {
    let msg_type = decode_message_type(data)?;
    match msg_type {
        MessageType::MatchStart => Ok(ServerMessage::MatchStart(decode_payload::<
            MatchStartMsg,
        >(data)?)),
        MessageType::Snapshot => Ok(ServerMessage::Snapshot(Box::new(decode_payload::<
            RenderSnapshot,
        >(data)?))),
        MessageType::MatchEvent => Ok(ServerMessage::MatchEvent(decode_payload::<
            MatchEventMsg,
        >(data)?)),
        MessageType::MatchEnd => Ok(ServerMessage::MatchEnd(decode_payload::<MatchEndMsg>(
            data,
        )?)),
        _ => Err(ProtocolError::UnknownMessageType(data[0])),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::GameEvent;
    use crate::game_trait::{MatchMode, TeamScore};
    use crate::input::ControllerInput;
    use crate::net::messages::MatchControl;
    use crate::snapshot::{AthleteView, BallView, MatchPhase};
    use crate::team::{TeamColor, TeamId, Teams};

    fn test_snapshot() -> RenderSnapshot {
        RenderSnapshot {
            tick: 120,
            athletes: vec![AthleteView {
                x: 400.0,
                y: 500.0,
                radius: 15.0,
                color: TeamColor::BLUE,
                team: TeamId::One,
                controlled: true,
                label: Some("P1".to_string()),
                has_ball: true,
            }],
            ball: BallView {
                x: 380.0,
                y: 500.0,
                radius: 8.0,
                color: TeamColor::BALL,
            },
            score_one: 2,
            score_two: 0,
            quarter: 1,
            time_left_secs: 118,
            crowd_noise: 65,
            phase: MatchPhase::Playing,
        }
    }

    #[test]
    fn roundtrip_controller_input() {
        let msg = ClientMessage::ControllerInput(ControllerInputMsg {
            team: TeamId::Two,
            input: ControllerInput {
                left: true,
                steal: true,
                ..Default::default()
            },
        });
        let encoded = encode_client_message(&msg).unwrap();
        let decoded = decode_client_message(&encoded).unwrap();
        assert_eq!(msg, decoded);
    }

    #[test]
    fn roundtrip_match_control() {
        let msg = ClientMessage::MatchControl(MatchControlMsg {
            action: MatchControl::Pause,
        });
        let encoded = encode_client_message(&msg).unwrap();
        let decoded = decode_client_message(&encoded).unwrap();
        assert_eq!(msg, decoded);
    }

    #[test]
    fn roundtrip_match_start() {
        let msg = ServerMessage::MatchStart(MatchStartMsg {
            protocol_version: PROTOCOL_VERSION,
            mode: MatchMode::OneControlledVsAi,
            teams: Teams::default(),
        });
        let encoded = encode_server_message(&msg).unwrap();
        let decoded = decode_server_message(&encoded).unwrap();
        assert_eq!(msg, decoded);
    }

    #[test]
    fn roundtrip_snapshot() {
        let msg = ServerMessage::Snapshot(Box::new(test_snapshot()));
        let encoded = encode_server_message(&msg).unwrap();
        let decoded = decode_server_message(&encoded).unwrap();
        assert_eq!(msg, decoded);
    }

    #[test]
    fn roundtrip_match_event() {
        let event = GameEvent::Scored {
            team: TeamId::One,
            points: 2,
        };
        let msg = ServerMessage::MatchEvent(MatchEventMsg {
            tick: 300,
            message: event.describe(&Teams::default()),
            event,
        });
        let encoded = encode_server_message(&msg).unwrap();
        let decoded = decode_server_message(&encoded).unwrap();
        assert_eq!(msg, decoded);
    }

    #[test]
    fn roundtrip_match_end() {
        let msg = ServerMessage::MatchEnd(MatchEndMsg {
            scores: vec![
                TeamScore {
                    team: TeamId::One,
                    name: "Team Blue".to_string(),
                    score: 42,
                },
                TeamScore {
                    team: TeamId::Two,
                    name: "Team Red".to_string(),
                    score: 38,
                },
            ],
        });
        let encoded = encode_server_message(&msg).unwrap();
        let decoded = decode_server_message(&encoded).unwrap();
        assert_eq!(msg, decoded);
    }

    #[test]
    fn decode_empty_message_fails() {
        let result = decode_message_type(&[]);
        assert!(matches!(result, Err(ProtocolError::EmptyMessage)));
    }

    #[test]
    fn decode_unknown_type_fails() {
        let result = decode_message_type(&[0xFF]);
        assert!(matches!(result, Err(ProtocolError::UnknownMessageType(0xFF))));
    }

    #[test]
    fn message_type_byte_prefix() {
        let msg = ServerMessage::Snapshot(Box::new(test_snapshot()));
        let encoded = encode_server_message(&msg).unwrap();
        assert_eq!(encoded[0], MessageType::Snapshot as u8);
    }

    #[test]
    fn decode_client_msg_with_server_type_fails() {
        let msg = ServerMessage::Snapshot(Box::new(test_snapshot()));
        let encoded = encode_server_message(&msg).unwrap();
        assert!(decode_client_message(&encoded).is_err());
    }

    #[test]
    fn decode_server_msg_with_client_type_fails() {
        let msg = ClientMessage::MatchControl(MatchControlMsg {
            action: MatchControl::Reset,
        });
        let encoded = encode_client_message(&msg).unwrap();
        assert!(decode_server_message(&encoded).is_err());
    }

    #[test]
    fn truncated_payload_fails() {
        let msg = ServerMessage::Snapshot(Box::new(test_snapshot()));
        let encoded = encode_server_message(&msg).unwrap();
        let result = decode_server_message(&encoded[..encoded.len() / 2]);
        assert!(matches!(result, Err(ProtocolError::DeserializeError(_))));
    }

    #[test]
    fn oversized_payload_rejected() {
        let huge = vec![0u8; MAX_MESSAGE_SIZE];
        let result = encode_message(MessageType::MatchEvent, &huge);
        assert!(matches!(result, Err(ProtocolError::PayloadTooLarge(_))));
    }
}
