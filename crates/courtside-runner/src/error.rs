use courtside_core::net::protocol::ProtocolError;

#[derive(Debug)]
pub enum RunnerError {
    InvalidConfig(String),
    Protocol(ProtocolError),
    /// The session task panicked or was cancelled.
    Session(String),
}

impl std::fmt::Display for RunnerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidConfig(m) => write!(f, "invalid config: {m}"),
            Self::Protocol(e) => write!(f, "protocol error: {e}"),
            Self::Session(m) => write!(f, "session failed: {m}"),
        }
    }
}

impl std::error::Error for RunnerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Protocol(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ProtocolError> for RunnerError {
    fn from(e: ProtocolError) -> Self {
        Self::Protocol(e)
    }
}
