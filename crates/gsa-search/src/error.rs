use thiserror::Error;

/// Failure classes of the appliance adapter.
///
/// Only `InvalidArgument` ever escapes the public search, suggest and feed
/// calls. Protocol and transport failures are folded into the call's
/// outcome (`SearchResult::error`, an empty suggestion list, or a feed
/// status code).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// Caller supplied input that can never produce a valid request.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The appliance answered with a body this adapter cannot understand.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// The request never produced a usable response.
    #[error("transport error: {0}")]
    Transport(String),
}

impl SearchError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn protocol(msg: impl Into<String>) -> Self {
        Self::Protocol(msg.into())
    }
}

impl From<reqwest::Error> for SearchError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

impl From<quick_xml::Error> for SearchError {
    fn from(err: quick_xml::Error) -> Self {
        Self::Protocol(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SearchError>;
