//! Reflection sub-module: what to do after a turn.
//!
//! Handles the "no tool calls returned" reply and the tool-turn budget.

use blockwright_core::config::NoToolCallPolicy;

/// What the caller should do after a reply without tool calls.
#[derive(Debug, PartialEq, Eq)]
pub(super) enum ReflectionOutcome {
    /// Inject this message as a user turn, then keep looping.
    Nudge(String),
    /// Stop the loop.
    Break,
}

pub(super) fn reflect_no_tool_calls(policy: NoToolCallPolicy, nudge_prompt: &str) -> ReflectionOutcome {
    match policy {
        NoToolCallPolicy::KeepAlive => ReflectionOutcome::Nudge(nudge_prompt.to_string()),
        NoToolCallPolicy::Terminate => ReflectionOutcome::Break,
    }
}

/// What the caller should do once a tool turn has been summarized.
#[derive(Debug, PartialEq, Eq)]
pub(super) enum BudgetOutcome {
    Continue,
    /// Truncate history to the seed; declarations survive.
    Reset,
    Break,
}

pub(super) fn check_tool_turn_budget(
    tool_turns: usize,
    max_tool_turns: Option<usize>,
    policy: NoToolCallPolicy,
) -> BudgetOutcome {
    match max_tool_turns {
        Some(max) if tool_turns >= max => match policy {
            NoToolCallPolicy::KeepAlive => BudgetOutcome::Reset,
            NoToolCallPolicy::Terminate => BudgetOutcome::Break,
        },
        _ => BudgetOutcome::Continue,
    }
}
