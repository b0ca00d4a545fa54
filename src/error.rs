/// Canonical error type used across all modules.
///
/// A non-success HTTP status from the proxy is deliberately not represented
/// here: the probe reports it and stops, but it is an observed outcome of the
/// run, not a fault (see [`crate::probe::ProbeOutcome`]).
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("Config error: {0}")]
    Config(String),
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("JSON encode error: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("Output error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for ProbeError {
    fn from(err: reqwest::Error) -> Self {
        ProbeError::Transport(err.to_string())
    }
}
