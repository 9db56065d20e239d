//! Execution sub-module: tool-call batch processing for the agent loop.
//!
//! Calls run one at a time in the order the model issued them, and every
//! call yields exactly one result.

use super::super::extensions::ToolRegistry;
use super::super::memory::MemoryStore;
use super::super::types::*;
use super::super::world::WorldApi;

/// Results of one batch, in input order.
pub(super) struct ToolBatchOutcome {
    pub results: Vec<ToolResult>,
    pub failed: usize,
}

pub(super) async fn execute_tool_batch(
    tool_calls: &[ToolCall],
    registry: &ToolRegistry,
    world: &dyn WorldApi,
    memory: &mut MemoryStore,
    event_sink: &mut dyn EventSink,
) -> ToolBatchOutcome {
    let mut results = Vec::with_capacity(tool_calls.len());
    let mut failed = 0;

    for tc in tool_calls {
        event_sink.on_tool_call(&tc.function.name, &tc.function.arguments);
        let result = registry.execute(tc, world, memory).await;
        tracing::info!(
            tool = %result.tool_name,
            id = %result.tool_call_id,
            is_error = result.is_error,
            "tool call executed"
        );
        event_sink.on_tool_result(&result.tool_name, &result.content, result.is_error);
        if result.is_error {
            failed += 1;
        }
        results.push(result);
    }

    ToolBatchOutcome { results, failed }
}
