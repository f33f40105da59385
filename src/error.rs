//! Error types for rawplay

use thiserror::Error;

/// Result type alias for rawplay operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for rawplay
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed stream or frame header
    #[error("Parse error: {0}")]
    Parse(String),

    /// Buffer ends before a complete header line or frame block
    #[error("Truncated stream: {0}")]
    Truncated(String),

    /// Strict frame lookup past the end of the stream
    #[error("Frame index {index} out of range for {count} frames")]
    FrameIndex { index: usize, count: usize },

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Unsupported feature
    #[error("Unsupported: {0}")]
    Unsupported(String),

    /// GPU pipeline error
    #[error("Render error: {0}")]
    Render(String),

    /// Initialization error
    #[error("Initialization error: {0}")]
    Init(String),
}

impl Error {
    /// Create a parse error
    pub fn parse<S: Into<String>>(msg: S) -> Self {
        Error::Parse(msg.into())
    }

    /// Create a truncation error
    pub fn truncated<S: Into<String>>(msg: S) -> Self {
        Error::Truncated(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Error::InvalidInput(msg.into())
    }

    /// Create an unsupported error
    pub fn unsupported<S: Into<String>>(msg: S) -> Self {
        Error::Unsupported(msg.into())
    }

    /// Create a render error
    pub fn render<S: Into<String>>(msg: S) -> Self {
        Error::Render(msg.into())
    }
}
