//! In-memory fakes for the world and the model.

use std::collections::{BTreeMap, VecDeque};
use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::json;

use crate::llm::{LlmGateway, ModelReply};
use crate::types::{ChatMessage, ToolDefinition};
use crate::world::{Ack, Block, BlockId, Point, WorldApi, WorldEntry, WorldError, WorldSnapshot};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorldCall {
    GetState,
    Set(Block),
    Remove(Point),
}

/// World held in a map. With `unreachable` set every call fails like a
/// refused connection.
#[derive(Default)]
pub struct FakeWorld {
    pub unreachable: bool,
    blocks: Mutex<BTreeMap<(i64, i64, i64), BlockId>>,
    calls: Mutex<Vec<WorldCall>>,
}

impl FakeWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unreachable() -> Self {
        Self {
            unreachable: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<WorldCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: WorldCall) -> Result<(), WorldError> {
        self.calls.lock().unwrap().push(call);
        if self.unreachable {
            Err(WorldError::Network("connection refused".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl WorldApi for FakeWorld {
    async fn get_world_state(&self) -> Result<WorldSnapshot, WorldError> {
        self.record(WorldCall::GetState)?;
        Ok(self
            .blocks
            .lock()
            .unwrap()
            .iter()
            .map(|(&(x, y, z), id)| WorldEntry {
                point: Point::new(x, y, z),
                info: json!({"type_id": id.as_str()}),
            })
            .collect())
    }

    async fn set_block(&self, block: Block) -> Result<Ack, WorldError> {
        self.record(WorldCall::Set(block))?;
        let key = (block.point.x, block.point.y, block.point.z);
        let mut blocks = self.blocks.lock().unwrap();
        if block.block_id == BlockId::Air {
            blocks.remove(&key);
        } else {
            blocks.insert(key, block.block_id);
        }
        Ok(Ack {
            response: "placed".to_string(),
        })
    }

    async fn remove_block(&self, point: Point) -> Result<Ack, WorldError> {
        self.record(WorldCall::Remove(point))?;
        self.blocks.lock().unwrap().remove(&(point.x, point.y, point.z));
        Ok(Ack {
            response: "removed".to_string(),
        })
    }
}

/// One recorded model request.
#[derive(Debug, Clone)]
pub struct GatewayRequest {
    pub messages: Vec<ChatMessage>,
    pub tool_names: Option<Vec<String>>,
}

/// Replays scripted replies in order; once the script runs out it answers
/// with plain text.
#[derive(Default)]
pub struct ScriptedGateway {
    script: Mutex<VecDeque<Result<ModelReply, String>>>,
    requests: Mutex<Vec<GatewayRequest>>,
}

impl ScriptedGateway {
    pub fn new(script: Vec<Result<ModelReply, String>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<GatewayRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmGateway for ScriptedGateway {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        tools: Option<&[ToolDefinition]>,
    ) -> Result<ModelReply> {
        self.requests.lock().unwrap().push(GatewayRequest {
            messages: messages.to_vec(),
            tool_names: tools.map(|t| t.iter().map(|d| d.function.name.clone()).collect()),
        });
        let next = self.script.lock().unwrap().pop_front();
        match next {
            Some(Ok(reply)) => Ok(reply),
            Some(Err(msg)) => Err(anyhow::anyhow!(msg)),
            None => Ok(ModelReply::text("nothing more to do")),
        }
    }
}
