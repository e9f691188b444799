//! Error types for the mixer and UltraGrid control clients

use thiserror::Error;

/// Main error type for the library
#[derive(Error, Debug)]
pub enum Error {
    #[error("Mixer error: {0}")]
    Mixer(#[from] MixerError),

    #[error("UltraGrid error: {0}")]
    UltraGrid(#[from] UltraGridError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors talking to the mixer over its JSON/TCP API
#[derive(Error, Debug)]
pub enum MixerError {
    #[error("Connection to {addr} failed: {source}")]
    ConnectionFailed {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Send failed: {0}")]
    SendFailed(#[source] std::io::Error),

    #[error("Receive failed: {0}")]
    ReceiveFailed(#[source] std::io::Error),

    #[error("Response exceeds {0} bytes")]
    ResponseTooLarge(usize),

    #[error("Mixer closed the connection without replying")]
    EmptyResponse,

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Timeout")]
    Timeout,
}

/// Errors talking to the UltraGrid control GUI
#[derive(Error, Debug)]
pub enum UltraGridError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid reply from {endpoint}: {source}")]
    InvalidReply {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Could not determine local address: {0}")]
    LocalAddress(#[source] std::io::Error),
}

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;
