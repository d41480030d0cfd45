//! Error types for the mcp-social server.

use thiserror::Error;

/// Result type alias for server-level operations
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type used during startup, configuration and serving
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generation provider error
    #[error("LLM error: {0}")]
    Llm(#[from] crate::llm::LlmError),

    /// Posting provider error
    #[error("Posting error: {0}")]
    Posting(#[from] crate::posting::PostingError),

    /// MCP protocol error
    #[error("MCP error: {0}")]
    Mcp(#[from] crate::mcp::McpError),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<config::ConfigError> for Error {
    fn from(err: config::ConfigError) -> Self {
        Error::Config(err.to_string())
    }
}
