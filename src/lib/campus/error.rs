use thiserror::Error;

/// Every failure the client can surface to the action that triggered it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CampusError {
    /// Backend answered with a non-2xx status.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// Request never got a usable answer: connection failure or undecodable body.
    #[error("{0}")]
    Transport(String),

    /// Action is outside the viewer's role, or targets their own account.
    #[error("{0}")]
    Forbidden(String),

    /// Input rejected before any request was sent.
    #[error("{0}")]
    Validation(String),

    #[error("You are not logged in")]
    NotAuthenticated,

    #[error("Token storage failed: {0}")]
    Storage(String),
}

/// Coarse classification used to decide where an error is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Authentication,
    Authorization,
    Validation,
    Transport,
}

impl CampusError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CampusError::Api { status: 401, .. } | CampusError::NotAuthenticated => {
                ErrorKind::Authentication
            }
            CampusError::Api { status: 403, .. } | CampusError::Forbidden(_) => {
                ErrorKind::Authorization
            }
            CampusError::Api {
                status: 400 | 422,
                ..
            }
            | CampusError::Validation(_) => ErrorKind::Validation,
            CampusError::Api { .. } | CampusError::Transport(_) | CampusError::Storage(_) => {
                ErrorKind::Transport
            }
        }
    }
}

impl From<reqwest::Error> for CampusError {
    fn from(err: reqwest::Error) -> Self {
        CampusError::Transport(err.to_string())
    }
}

impl From<std::io::Error> for CampusError {
    fn from(err: std::io::Error) -> Self {
        CampusError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for CampusError {
    fn from(err: serde_json::Error) -> Self {
        CampusError::Storage(err.to_string())
    }
}
