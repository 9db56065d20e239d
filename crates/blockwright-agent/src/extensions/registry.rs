//! ToolRegistry: the catalog the model sees plus single-call execution.
//!
//! Pattern:
//! ```ignore
//! let registry = ToolRegistry::builder()
//!     .register(builtin::world_ops::tool_definitions())
//!     .register_declarations_if(enable_memory)
//!     .build();
//! ```

use super::builtin::{declarations, world_ops, ToolInvocation, ToolKind};
use super::{error_content, ToolError};
use crate::memory::MemoryStore;
use crate::types::{ToolCall, ToolDefinition, ToolResult};
use crate::world::WorldApi;

#[derive(Debug, Clone)]
pub struct ToolRegistry {
    tool_definitions: Vec<ToolDefinition>,
}

#[derive(Debug, Default)]
pub struct ToolRegistryBuilder {
    tool_definitions: Vec<ToolDefinition>,
}

impl ToolRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add definitions. A name already registered is replaced.
    pub fn register(mut self, defs: Vec<ToolDefinition>) -> Self {
        for def in defs {
            self.tool_definitions
                .retain(|d| d.function.name != def.function.name);
            self.tool_definitions.push(def);
        }
        self
    }

    pub fn register_declarations_if(self, enable: bool) -> Self {
        if enable {
            self.register(declarations::tool_definitions())
        } else {
            self
        }
    }

    pub fn build(self) -> ToolRegistry {
        ToolRegistry {
            tool_definitions: self.tool_definitions,
        }
    }
}

impl ToolRegistry {
    pub fn builder() -> ToolRegistryBuilder {
        ToolRegistryBuilder::new()
    }

    /// World tools, plus declaration tools when `enable_memory` is set.
    pub fn standard(enable_memory: bool) -> Self {
        Self::builder()
            .register(world_ops::tool_definitions())
            .register_declarations_if(enable_memory)
            .build()
    }

    pub fn all_tool_definitions(&self) -> &[ToolDefinition] {
        &self.tool_definitions
    }

    /// Resolve a model-supplied name to a tool this registry exposes.
    pub fn resolve(&self, name: &str) -> Result<ToolKind, ToolError> {
        let registered = self
            .tool_definitions
            .iter()
            .any(|d| d.function.name == name);
        match ToolKind::from_name(name) {
            Some(kind) if registered => Ok(kind),
            _ => Err(ToolError::UnknownTool(name.to_string())),
        }
    }

    /// Execute one call. Never fails: every problem becomes error content.
    pub async fn execute(
        &self,
        call: &ToolCall,
        world: &dyn WorldApi,
        memory: &mut MemoryStore,
    ) -> ToolResult {
        let name = &call.function.name;
        let outcome = self
            .resolve(name)
            .and_then(|kind| ToolInvocation::parse(kind, &call.function.arguments));

        let (content, is_error) = match outcome {
            Err(err) => {
                tracing::warn!(tool = %name, kind = err.kind(), error = %err, "tool call rejected");
                (error_content(&err.to_string(), err.kind()), true)
            }
            Ok(invocation) => match invocation.execute(world, memory).await {
                Ok(value) => (value.to_string(), false),
                Err(err) => {
                    tracing::warn!(tool = %name, kind = err.kind(), error = %err, "tool call failed");
                    (error_content(&err.to_string(), err.kind()), true)
                }
            },
        };

        ToolResult {
            tool_call_id: call.id.clone(),
            tool_name: name.clone(),
            content,
            is_error,
        }
    }
}
