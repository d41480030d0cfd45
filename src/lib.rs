//! # mcp-social
//!
//! MCP server that turns short prompts into social media posts with Gemini
//! and publishes them to X (formerly Twitter).
//!
//! Content generation never fails from the caller's point of view: when the
//! generation provider errors, the original input is returned unchanged.

pub mod config;
pub mod content;
pub mod error;
pub mod handlers;
pub mod llm;
pub mod logging;
pub mod mcp;
pub mod posting;

pub use crate::config::AppConfig;
pub use content::{
    format_thread, ContentEnhancer, ContentExpander, Expansion, ExpansionKind, Outcome,
};
pub use error::{Error, Result};
pub use handlers::SocialHandler;
pub use mcp::McpServer;
