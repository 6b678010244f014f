#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error("transport error: {message}")]
    Transport { message: String, transient: bool },

    #[error("decode error: {0}")]
    Decode(String),

    #[error("unexpected response format")]
    UnexpectedFormat,

    #[error("unknown function: {0}")]
    UnknownFunction(String),

    #[error("console I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AgentError {
    /// Whether retrying the same request could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, AgentError::Transport { transient: true, .. })
    }
}

impl From<reqwest::Error> for AgentError {
    fn from(e: reqwest::Error) -> Self {
        let transient = e.is_timeout()
            || e.is_connect()
            || e
                .status()
                .map(|s| s.is_server_error() || s.as_u16() == 429)
                .unwrap_or(false);
        AgentError::Transport {
            message: e.to_string(),
            transient,
        }
    }
}

impl From<serde_json::Error> for AgentError {
    fn from(e: serde_json::Error) -> Self {
        AgentError::Decode(e.to_string())
    }
}
