use thiserror::Error;

#[derive(Error, Debug)]
pub enum PostError {
    #[error("Unknown file extension: {message}")]
    UnknownExtension { message: String },

    #[error("Post {id} is missing an essential field: {field}")]
    MissingField { id: u64, field: &'static str },

    #[error("Invalid timestamp {value:?}: {source}")]
    InvalidTimestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}
