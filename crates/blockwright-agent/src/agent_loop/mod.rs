//! Core agent loop: model ↔ world tool cycle.
//!
//! An [`AgentSession`] owns the conversation, the declaration memory, the
//! world client and the model gateway. [`AgentSession::step`] runs exactly one
//! turn; [`AgentSession::run`] repeats it until cancelled, bounded, or told to
//! stop by the no-tool-call policy.
//!
//! Sub-modules:
//!   - `execution`: tool-call batch processing
//!   - `reflection`: no-tool replies and the tool-turn budget

mod execution;
mod reflection;


use std::sync::Arc;
use std::time::Duration;

use blockwright_core::config::AgentLoopConfig;
use tokio_util::sync::CancellationToken;

use super::conversation::ConversationState;
use super::extensions::ToolRegistry;
use super::llm::{self, LlmGateway};
use super::memory::MemoryStore;
use super::types::*;
use super::world::WorldApi;

use execution::execute_tool_batch;
use reflection::{check_tool_turn_budget, reflect_no_tool_calls, BudgetOutcome, ReflectionOutcome};

/// Pause after a failed model call unless overridden.
pub const DEFAULT_ERROR_BACKOFF: Duration = Duration::from_secs(5);

/// Where the session is within a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    AwaitingModel,
    Dispatching,
    AwaitingSummary,
    Finished,
}

/// Result of one [`AgentSession::step`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// Tool calls dispatched, results appended, summary requested.
    ToolTurn { tool_calls: usize, failed: usize },
    /// Plain reply; the nudge was appended.
    Nudged,
    /// The model call failed. Nothing was appended; the history was reset if
    /// the failure was a context overflow.
    ModelError { error: String, context_reset: bool },
    Finished(TerminationReason),
}

pub struct AgentSession {
    config: AgentLoopConfig,
    conversation: ConversationState,
    memory: MemoryStore,
    registry: ToolRegistry,
    world: Arc<dyn WorldApi>,
    gateway: Arc<dyn LlmGateway>,
    error_backoff: Duration,
    stats: SessionStats,
    phase: Phase,
    termination: Option<TerminationReason>,
    tool_turns_since_reset: usize,
    last_text: Option<String>,
}

impl AgentSession {
    pub fn new(
        config: AgentLoopConfig,
        world: Arc<dyn WorldApi>,
        gateway: Arc<dyn LlmGateway>,
    ) -> Self {
        let registry = ToolRegistry::standard(config.enable_memory);
        let conversation = ConversationState::seeded(&config.seed_prompt);
        Self {
            config,
            conversation,
            memory: MemoryStore::new(),
            registry,
            world,
            gateway,
            error_backoff: DEFAULT_ERROR_BACKOFF,
            stats: SessionStats::default(),
            phase: Phase::Idle,
            termination: None,
            tool_turns_since_reset: 0,
            last_text: None,
        }
    }

    pub fn with_error_backoff(mut self, backoff: Duration) -> Self {
        self.error_backoff = backoff;
        self
    }

    pub fn conversation(&self) -> &ConversationState {
        &self.conversation
    }

    pub fn memory(&self) -> &MemoryStore {
        &self.memory
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    fn finish(&mut self, reason: TerminationReason) -> StepOutcome {
        tracing::info!(?reason, turns = self.stats.turns, "agent session finished");
        self.phase = Phase::Finished;
        self.termination = Some(reason);
        StepOutcome::Finished(reason)
    }

    fn reset_conversation(&mut self, why: &str, event_sink: &mut dyn EventSink) {
        tracing::warn!(
            why,
            dropped = self.conversation.len() - 1,
            declarations = self.memory.len(),
            "conversation reset to seed"
        );
        self.conversation.reset_to_seed();
        self.tool_turns_since_reset = 0;
        self.stats.resets += 1;
        event_sink.on_reset();
    }

    fn note_text(&mut self, text: Option<&str>, event_sink: &mut dyn EventSink) {
        if let Some(text) = text.map(str::trim).filter(|s| !s.is_empty()) {
            event_sink.on_text(text);
            self.last_text = Some(text.to_string());
        }
    }

    /// Run one turn: model call, then either the no-tool-call policy or
    /// dispatch plus a summary call.
    pub async fn step(&mut self, event_sink: &mut dyn EventSink) -> StepOutcome {
        if let Some(reason) = self.termination {
            return StepOutcome::Finished(reason);
        }

        self.stats.turns += 1;
        let turn = self.stats.turns;
        event_sink.on_turn_start(turn);
        tracing::debug!(turn, messages = self.conversation.len(), "turn start");

        // ── Model call with the full catalog ─────────────────────────────
        self.phase = Phase::AwaitingModel;
        let reply = match self
            .gateway
            .complete(
                self.conversation.snapshot(),
                Some(self.registry.all_tool_definitions()),
            )
            .await
        {
            Ok(reply) => reply,
            Err(e) => {
                self.phase = Phase::Idle;
                self.stats.model_errors += 1;
                let error = format!("{:#}", e);
                tracing::error!(turn, error = %error, "model call failed");
                let context_reset = llm::is_context_overflow_error(&error);
                if context_reset {
                    self.reset_conversation("context overflow", event_sink);
                }
                return StepOutcome::ModelError {
                    error,
                    context_reset,
                };
            }
        };

        // ── No tool calls: policy decides ────────────────────────────────
        if !reply.has_tool_calls() {
            let content = reply.content.clone().unwrap_or_default();
            self.note_text(Some(&content), event_sink);
            self.conversation.append(ChatMessage::assistant(&content));
            self.phase = Phase::Idle;
            return match reflect_no_tool_calls(self.config.on_no_tool_calls, &self.config.nudge_prompt) {
                ReflectionOutcome::Nudge(nudge) => {
                    tracing::info!(turn, "no tool calls, nudging");
                    event_sink.on_nudge(&nudge);
                    self.conversation.append(ChatMessage::user(&nudge));
                    self.stats.nudges += 1;
                    StepOutcome::Nudged
                }
                ReflectionOutcome::Break => self.finish(TerminationReason::NoToolCalls),
            };
        }

        // ── Dispatch ─────────────────────────────────────────────────────
        self.phase = Phase::Dispatching;
        self.note_text(reply.content.as_deref(), event_sink);
        self.conversation.append(ChatMessage::assistant_with_tool_calls(
            reply.content.as_deref(),
            reply.tool_calls.clone(),
        ));
        let outcome = execute_tool_batch(
            &reply.tool_calls,
            &self.registry,
            self.world.as_ref(),
            &mut self.memory,
            event_sink,
        )
        .await;
        for result in &outcome.results {
            self.conversation.append(ChatMessage::tool_result(result));
        }
        self.stats.tool_calls += outcome.results.len();
        self.stats.failed_tool_calls += outcome.failed;

        // ── Summary call, no tools offered ───────────────────────────────
        self.phase = Phase::AwaitingSummary;
        let mut context_reset = false;
        match self.gateway.complete(self.conversation.snapshot(), None).await {
            Ok(summary) => {
                if let Some(text) = summary.text_content() {
                    let text = text.to_string();
                    self.note_text(Some(&text), event_sink);
                    self.conversation.append(ChatMessage::assistant(&text));
                }
            }
            Err(e) => {
                self.stats.model_errors += 1;
                let error = format!("{:#}", e);
                tracing::warn!(turn, error = %error, "summary call failed");
                if llm::is_context_overflow_error(&error) {
                    self.reset_conversation("context overflow", event_sink);
                    context_reset = true;
                }
            }
        }
        self.phase = Phase::Idle;

        tracing::info!(
            turn,
            tool_calls = outcome.results.len(),
            failed = outcome.failed,
            "tool turn complete"
        );
        let turn_outcome = StepOutcome::ToolTurn {
            tool_calls: outcome.results.len(),
            failed: outcome.failed,
        };

        // The overflow reset already started a fresh budget.
        if context_reset {
            return turn_outcome;
        }

        self.tool_turns_since_reset += 1;
        match check_tool_turn_budget(
            self.tool_turns_since_reset,
            self.config.max_tool_turns,
            self.config.on_no_tool_calls,
        ) {
            BudgetOutcome::Continue => turn_outcome,
            BudgetOutcome::Reset => {
                self.reset_conversation("tool turn budget", event_sink);
                turn_outcome
            }
            BudgetOutcome::Break => self.finish(TerminationReason::ToolTurnBudget),
        }
    }

    /// Drive [`step`](Self::step) until cancellation, `max_turns`, or policy
    /// termination. Model failures back off and retry; the backoff sleep
    /// ends early on cancellation.
    pub async fn run(
        &mut self,
        cancel: &CancellationToken,
        max_turns: Option<usize>,
        event_sink: &mut dyn EventSink,
    ) -> AgentResult {
        let reason = loop {
            if cancel.is_cancelled() {
                tracing::info!("cancellation requested");
                break TerminationReason::Cancelled;
            }
            if max_turns.is_some_and(|max| self.stats.turns >= max) {
                tracing::info!(turns = self.stats.turns, "turn limit reached");
                break TerminationReason::MaxTurns;
            }
            match self.step(event_sink).await {
                StepOutcome::Finished(reason) => break reason,
                StepOutcome::ModelError { .. } => {
                    tracing::info!(
                        backoff_ms = self.error_backoff.as_millis() as u64,
                        "backing off before retrying the model"
                    );
                    tokio::select! {
                        _ = cancel.cancelled() => {
                            tracing::info!("cancelled during backoff");
                            break TerminationReason::Cancelled;
                        }
                        _ = tokio::time::sleep(self.error_backoff) => {}
                    }
                }
                StepOutcome::ToolTurn { .. } | StepOutcome::Nudged => {}
            }
        };

        if self.phase != Phase::Finished {
            self.phase = Phase::Idle;
        }
        AgentResult {
            reason,
            stats: self.stats.clone(),
            final_response: self.last_text.clone(),
        }
    }
}
