//! Pandu error types

/// Pandu error types
#[derive(Debug, thiserror::Error)]
pub enum PanduError {
    // Remote API errors (directory origin, chat transport)
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("empty response from chat API")]
    EmptyResponse,
}

/// Result type alias for Pandu operations
pub type Result<T> = std::result::Result<T, PanduError>;
