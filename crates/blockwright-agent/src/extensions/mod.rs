//! Agent tools and the registry that exposes them.
//!
//! - **builtin**: world tools (always on) and declaration tools (optional)
//!
//! `ToolRegistry` is the single entry point for the catalog and for executing
//! one call; batching lives in the agent loop.

pub mod builtin;
mod registry;

pub use builtin::{ToolInvocation, ToolKind};
pub use registry::{ToolRegistry, ToolRegistryBuilder};

/// A call that never reached a handler.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ToolError {
    #[error("invalid arguments for {tool}: {reason}")]
    ArgumentParse { tool: String, reason: String },

    #[error("unknown tool: {0}")]
    UnknownTool(String),
}

impl ToolError {
    pub fn kind(&self) -> &'static str {
        match self {
            ToolError::ArgumentParse { .. } => "argument_parse",
            ToolError::UnknownTool(_) => "unknown_tool",
        }
    }
}

/// Tool-result body for a failure: `{"error": message, "kind": tag}`.
pub fn error_content(message: &str, kind: &str) -> String {
    serde_json::json!({ "error": message, "kind": kind }).to_string()
}
