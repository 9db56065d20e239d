//! Built-in tools.
//!
//! - `world_ops`:    get_world_state, set_block, remove_block
//! - `declarations`: add_declaration, view_declarations
//!
//! The tool set is closed: [`ToolKind`] names every tool and
//! [`ToolInvocation`] carries its parsed, typed arguments.

pub(crate) mod declarations;
pub(crate) mod world_ops;


use serde::de::DeserializeOwned;
use serde_json::Value;

use super::ToolError;
use crate::memory::MemoryStore;
use crate::world::{WorldApi, WorldError};

pub use declarations::AddDeclarationArgs;
pub use world_ops::{RemoveBlockArgs, SetBlockArgs};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolKind {
    GetWorldState,
    SetBlock,
    RemoveBlock,
    AddDeclaration,
    ViewDeclarations,
}

impl ToolKind {
    pub const ALL: [ToolKind; 5] = [
        ToolKind::GetWorldState,
        ToolKind::SetBlock,
        ToolKind::RemoveBlock,
        ToolKind::AddDeclaration,
        ToolKind::ViewDeclarations,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ToolKind::GetWorldState => "get_world_state",
            ToolKind::SetBlock => "set_block",
            ToolKind::RemoveBlock => "remove_block",
            ToolKind::AddDeclaration => "add_declaration",
            ToolKind::ViewDeclarations => "view_declarations",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.name() == name)
    }
}

/// A tool call with validated arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolInvocation {
    GetWorldState,
    SetBlock(SetBlockArgs),
    RemoveBlock(RemoveBlockArgs),
    AddDeclaration(AddDeclarationArgs),
    ViewDeclarations,
}

fn parse_args<T: DeserializeOwned>(kind: ToolKind, raw: &str) -> Result<T, ToolError> {
    serde_json::from_str(raw).map_err(|e| ToolError::ArgumentParse {
        tool: kind.name().to_string(),
        reason: e.to_string(),
    })
}

impl ToolInvocation {
    /// Parse raw model arguments for `kind`. Blank input counts as `{}`.
    pub fn parse(kind: ToolKind, raw: &str) -> Result<Self, ToolError> {
        let raw = if raw.trim().is_empty() { "{}" } else { raw };
        Ok(match kind {
            ToolKind::GetWorldState => {
                parse_args::<serde_json::Map<String, Value>>(kind, raw)?;
                ToolInvocation::GetWorldState
            }
            ToolKind::SetBlock => ToolInvocation::SetBlock(parse_args(kind, raw)?),
            ToolKind::RemoveBlock => ToolInvocation::RemoveBlock(parse_args(kind, raw)?),
            ToolKind::AddDeclaration => ToolInvocation::AddDeclaration(parse_args(kind, raw)?),
            ToolKind::ViewDeclarations => {
                parse_args::<serde_json::Map<String, Value>>(kind, raw)?;
                ToolInvocation::ViewDeclarations
            }
        })
    }

    pub fn kind(&self) -> ToolKind {
        match self {
            ToolInvocation::GetWorldState => ToolKind::GetWorldState,
            ToolInvocation::SetBlock(_) => ToolKind::SetBlock,
            ToolInvocation::RemoveBlock(_) => ToolKind::RemoveBlock,
            ToolInvocation::AddDeclaration(_) => ToolKind::AddDeclaration,
            ToolInvocation::ViewDeclarations => ToolKind::ViewDeclarations,
        }
    }

    /// Run the handler. World failures come back as `Err`; declaration tools
    /// cannot fail.
    pub async fn execute(
        self,
        world: &dyn WorldApi,
        memory: &mut MemoryStore,
    ) -> Result<Value, WorldError> {
        match self {
            ToolInvocation::GetWorldState => world_ops::get_world_state(world).await,
            ToolInvocation::SetBlock(args) => world_ops::set_block(world, args).await,
            ToolInvocation::RemoveBlock(args) => world_ops::remove_block(world, args).await,
            ToolInvocation::AddDeclaration(args) => {
                Ok(declarations::add_declaration(memory, args))
            }
            ToolInvocation::ViewDeclarations => Ok(declarations::view_declarations(memory)),
        }
    }
}
