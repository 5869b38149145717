use thiserror::Error;

/// Why a backend round-trip did not produce a usable payload.
///
/// Transport failures and non-OK statuses are kept apart for logging only;
/// callers treat every variant the same way.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("server responded with status {0}")]
    Status(u16),
    #[error("invalid response body: {0}")]
    Decode(String),
}

impl From<gloo_net::Error> for RequestError {
    fn from(value: gloo_net::Error) -> Self {
        Self::Transport(value.to_string())
    }
}
