//! `blockwright run`: build a session from config and drive it.

use std::sync::Arc;

use anyhow::{Context, Result};
use blockwright_agent::types::TerminalEventSink;
use blockwright_agent::{AgentSession, HttpWorldClient, LlmClient};
use blockwright_core::config::env_keys::{agent, llm, world};
use blockwright_core::config::{load_dotenv, BlockwrightConfig, Overlay, ProcessEnv};
use tokio_util::sync::CancellationToken;

use crate::cli::RunArgs;

impl RunArgs {
    /// Flags as config overrides on top of the process environment.
    fn overlay<'a>(&self, base: &'a ProcessEnv) -> Overlay<'a> {
        Overlay::new(base)
            .set(world::URL, self.world_url.as_deref())
            .set(llm::API_BASE, self.api_base.as_deref())
            .set(llm::MODEL, self.model.as_deref())
            .set(llm::TEMPERATURE, self.temperature)
            .set(agent::MAX_TOOL_TURNS, self.max_tool_turns)
            .set(agent::ON_NO_TOOL_CALLS, self.single_shot.then_some("stop"))
            .set(agent::ENABLE_MEMORY, self.no_memory.then_some("false"))
    }
}

pub async fn run_agent(args: RunArgs, verbose: bool) -> Result<()> {
    load_dotenv();
    let env = ProcessEnv;
    let config = BlockwrightConfig::from_source(&args.overlay(&env))
        .context("configuration error")?;

    let world = HttpWorldClient::new(&config.world).context("failed to create world client")?;
    let gateway = LlmClient::new(&config.llm)?;
    tracing::info!(
        model = %config.llm.model,
        world = %config.world.base_url,
        policy = ?config.agent.on_no_tool_calls,
        max_tool_turns = ?config.agent.max_tool_turns,
        "starting agent session"
    );

    let mut session = AgentSession::new(config.agent, Arc::new(world), Arc::new(gateway))
        .with_error_backoff(config.llm.error_backoff);

    let cancel = CancellationToken::new();
    let on_ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupt received, stopping after the current step");
            on_ctrl_c.cancel();
        }
    });

    let mut sink = TerminalEventSink::new(verbose);
    let result = session.run(&cancel, args.max_turns, &mut sink).await;

    let s = &result.stats;
    eprintln!(
        "\nstopped ({:?}): {} turns, {} tool calls ({} failed), {} nudges, {} resets, {} model errors",
        result.reason, s.turns, s.tool_calls, s.failed_tool_calls, s.nudges, s.resets, s.model_errors
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockwright_core::config::VarSource;

    #[test]
    fn test_flags_become_overrides() {
        let args = RunArgs {
            model: Some("kimi-k2".to_string()),
            temperature: Some(0.6),
            single_shot: true,
            no_memory: true,
            ..RunArgs::default()
        };
        let env = ProcessEnv;
        let overlay = args.overlay(&env);
        assert_eq!(overlay.var(llm::MODEL).as_deref(), Some("kimi-k2"));
        assert_eq!(overlay.var(llm::TEMPERATURE).as_deref(), Some("0.6"));
        assert_eq!(overlay.var(agent::ON_NO_TOOL_CALLS).as_deref(), Some("stop"));
        assert_eq!(overlay.var(agent::ENABLE_MEMORY).as_deref(), Some("false"));
    }
}
