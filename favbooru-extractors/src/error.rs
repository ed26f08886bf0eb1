use crate::auth::AuthError;
use favbooru_common::{reqwest, serde_json};
use thiserror::Error;

/// Errors while reading the favorites feed.
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// Page numbering starts at 1.
    #[error("Page number cannot be zero.")]
    ZeroPage,

    /// The request didn't complete (DNS, TLS, connection reset, ...).
    #[error("Connection Error: {0}")]
    ConnectionError(#[from] reqwest::Error),

    #[error("Invalid connection settings: {source}")]
    AuthenticationFailure {
        #[from]
        source: AuthError,
    },

    /// The server answered with something that isn't a list of posts.
    #[error("Error while deserializing JSON: {0}")]
    JsonSerializeFail(#[from] serde_json::Error),
}
