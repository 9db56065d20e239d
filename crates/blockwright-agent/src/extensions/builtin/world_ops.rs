//! World tools: get_world_state, set_block, remove_block.

use serde::Deserialize;
use serde_json::{json, Value};

use crate::types::ToolDefinition;
use crate::world::{Ack, Block, BlockId, Point, WorldApi, WorldError, MAX_DURATION, MIN_DURATION};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SetBlockArgs {
    pub x: i64,
    pub y: i64,
    pub z: i64,
    pub block_id: BlockId,
    #[serde(default)]
    pub duration: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemoveBlockArgs {
    pub x: i64,
    pub y: i64,
    pub z: i64,
}

// ─── Tool definitions ───────────────────────────────────────────────────────

pub(crate) fn tool_definitions() -> Vec<ToolDefinition> {
    let block_ids: Vec<&str> = BlockId::ALL.iter().map(|b| b.as_str()).collect();
    let coord = |axis: &str| json!({"type": "integer", "description": format!("{} coordinate", axis)});
    vec![
        ToolDefinition::function(
            "get_world_state",
            "Get the current state of the world: every known block with its position and info.",
            json!({"type": "object", "properties": {}, "required": []}),
        ),
        ToolDefinition::function(
            "set_block",
            "Place a block at a position. Blocks disappear after `duration` seconds. Placing `air` clears the position.",
            json!({
                "type": "object",
                "properties": {
                    "x": coord("X"),
                    "y": coord("Y (height)"),
                    "z": coord("Z"),
                    "block_id": {
                        "type": "string",
                        "enum": block_ids,
                        "description": "Block type to place"
                    },
                    "duration": {
                        "type": "integer",
                        "minimum": MIN_DURATION,
                        "maximum": MAX_DURATION,
                        "description": format!("How long the block stays, in seconds (max {}, default {})", MAX_DURATION, MAX_DURATION)
                    }
                },
                "required": ["x", "y", "z", "block_id"]
            }),
        ),
        ToolDefinition::function(
            "remove_block",
            "Remove the block at a position. Removing an empty position is not an error.",
            json!({
                "type": "object",
                "properties": {
                    "x": coord("X"),
                    "y": coord("Y (height)"),
                    "z": coord("Z")
                },
                "required": ["x", "y", "z"]
            }),
        ),
    ]
}

// ─── Handlers ───────────────────────────────────────────────────────────────

fn ack_content(ack: Ack) -> Value {
    json!({"status": "OK", "response": ack.response})
}

pub(super) async fn get_world_state(world: &dyn WorldApi) -> Result<Value, WorldError> {
    let snapshot = world.get_world_state().await?;
    serde_json::to_value(snapshot).map_err(|e| WorldError::Decode(e.to_string()))
}

pub(super) async fn set_block(world: &dyn WorldApi, args: SetBlockArgs) -> Result<Value, WorldError> {
    let block = Block::new(Point::new(args.x, args.y, args.z), args.block_id, args.duration);
    world.set_block(block).await.map(ack_content)
}

pub(super) async fn remove_block(
    world: &dyn WorldApi,
    args: RemoveBlockArgs,
) -> Result<Value, WorldError> {
    world
        .remove_block(Point::new(args.x, args.y, args.z))
        .await
        .map(ack_content)
}
