use thiserror::Error;

pub type Result<T> = std::result::Result<T, BlogError>;

#[derive(Error, Debug)]
pub enum BlogError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("request failed: {0}")]
    Transport(#[from] reqwest_middleware::Error),

    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// The server answered with an error envelope
    #[error("server rejected request ({status}): {message}")]
    Api { status: u16, message: String },

    /// Non-success status without a readable error envelope
    #[error("server returned status {0}")]
    Status(u16),

    #[error("`{0}` is required")]
    MissingField(&'static str),

    #[error("not logged in")]
    NotAuthenticated,

    /// The owning view was torn down while the request was in flight
    #[error("request cancelled")]
    Cancelled,

    #[error("session store error: {0}")]
    Store(#[from] rusqlite::Error),

    #[error("invalid session: {0}")]
    Session(String),
}

impl BlogError {
    /// Message supplied by the server, if the failure carried one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Api { message, .. } => Some(message),
            _ => None,
        }
    }
}
