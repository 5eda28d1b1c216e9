use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The server answered with a non-success status
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid server URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("session file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("session file is corrupt: {0}")]
    SessionFormat(#[from] serde_json::Error),

    #[error("{0}")]
    NotLoggedIn(&'static str),

    #[error("configuration error: {0}")]
    Config(String),
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// 401 and 403 both end the local session, whatever caused them
    pub fn is_auth_failure(&self) -> bool {
        matches!(self.status(), Some(401) | Some(403))
    }
}
