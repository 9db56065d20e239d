//! Unified configuration layer.
//!
//! Every environment read lives here; the rest of the workspace only sees the
//! structured configs.
//!
//! - `loader`: `env_or`, `env_optional`, `env_bool`, `.env` loading
//! - `schema`: `LlmConfig`, `WorldConfig`, `AgentLoopConfig`, `ObservabilityConfig`
//! - `env_keys`: key constants and aliases

pub mod env_keys;
pub mod loader;
pub mod schema;

pub use loader::{
    env_bool, env_optional, env_or, env_parse, env_required, load_dotenv, load_dotenv_from_dir,
    Overlay, ProcessEnv, VarSource,
};
pub use schema::{
    AgentLoopConfig, BlockwrightConfig, BreakerConfig, LlmConfig, NoToolCallPolicy,
    ObservabilityConfig, RetryConfig, WorldConfig, DEFAULT_NUDGE_PROMPT, DEFAULT_SEED_PROMPT,
};

/// Startup configuration failure. Always fatal: nothing in the loop can recover.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required setting {key}")]
    Missing { key: &'static str },

    #[error("invalid value for {key}: '{value}' ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}
