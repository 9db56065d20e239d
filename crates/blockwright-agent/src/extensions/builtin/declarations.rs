//! Declaration tools: add_declaration, view_declarations.

use serde::Deserialize;
use serde_json::{json, Value};

use crate::memory::MemoryStore;
use crate::types::ToolDefinition;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AddDeclarationArgs {
    pub key: String,
    pub value: String,
}

pub(crate) fn tool_definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::function(
            "add_declaration",
            "Record a note about your plans or progress under a key. Writing an existing key replaces its value.",
            json!({
                "type": "object",
                "properties": {
                    "key": {"type": "string", "description": "Short name for the note, e.g. 'plan'"},
                    "value": {"type": "string", "description": "The note"}
                },
                "required": ["key", "value"]
            }),
        ),
        ToolDefinition::function(
            "view_declarations",
            "View every note recorded with add_declaration.",
            json!({"type": "object", "properties": {}, "required": []}),
        ),
    ]
}

pub(super) fn add_declaration(memory: &mut MemoryStore, args: AddDeclarationArgs) -> Value {
    let declarations = memory.add_declaration(args.key, args.value);
    json!({"status": "OK", "declarations": declarations})
}

pub(super) fn view_declarations(memory: &MemoryStore) -> Value {
    json!(memory.view_declarations())
}
