use thiserror::Error;

/// Failure of one fetch against the article API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// Connection could not be established or was interrupted.
    #[error("request failed: {0}")]
    Request(String),

    /// The server answered with a non-success status.
    #[error("server returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("request timed out")]
    Timeout,

    /// Response body did not match the expected JSON shape.
    #[error("invalid response body: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Request(err.to_string())
        }
    }
}

pub type TransportResult<T> = Result<T, TransportError>;

/// Error returned by [`crate::ArticleListHandle`] operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error("article list controller has stopped")]
    ControllerStopped,
}
