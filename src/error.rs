use reqwest::StatusCode;
use thiserror::Error;

/// Errors returned by the HTTP layer and the typed resource services.
#[derive(Error, Debug)]
pub enum Error {
    /// The request could not be sent or the response body could not be read.
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The session token cannot be used as a header value.
    #[error("invalid session header: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    /// A request path could not be joined onto the session endpoint.
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    /// The server answered with a 401 or 403.
    #[error("session expired: {status}")]
    SessionExpired { status: StatusCode },

    /// Any other non-success status.
    #[error("server returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    /// The response body is not the expected JSON shape.
    #[error("invalid JSON payload: {0}")]
    Decode(#[from] serde_json::Error),

    /// A list page without its `items` array, or a similar gap.
    #[error("missing expected field `{0}`")]
    MissingField(&'static str),
}

impl Error {
    /// The HTTP status attached to this error, if the server answered at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::SessionExpired { status } | Self::Status { status, .. } => Some(*status),
            Self::Http(err) => err.status(),
            _ => None,
        }
    }
}

/// Result type for API operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Why a single-item operation could not pick its target.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionError {
    #[error("nothing is selected")]
    NothingSelected,
    #[error("{0} items are selected, expected one")]
    MultipleSelected(usize),
}
