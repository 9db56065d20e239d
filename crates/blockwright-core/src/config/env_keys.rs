//! Environment variable keys and their alias chains.
//!
//! Primary keys use the `BLOCKWRIGHT_*` prefix; aliases keep the usual
//! `OPENAI_*` names working for the model endpoint.

/// Model provider (OpenAI-compatible chat completions).
pub mod llm {
    pub const API_BASE: &str = "BLOCKWRIGHT_API_BASE";
    pub const API_BASE_ALIASES: &[&str] = &["OPENAI_API_BASE", "OPENAI_BASE_URL", "BASE_URL"];

    pub const API_KEY: &str = "BLOCKWRIGHT_API_KEY";
    pub const API_KEY_ALIASES: &[&str] = &["OPENAI_API_KEY", "API_KEY"];

    pub const MODEL: &str = "BLOCKWRIGHT_MODEL";
    pub const MODEL_ALIASES: &[&str] = &["OPENAI_MODEL", "MODEL"];

    pub const TEMPERATURE: &str = "BLOCKWRIGHT_TEMPERATURE";

    pub const TIMEOUT_SECS: &str = "BLOCKWRIGHT_LLM_TIMEOUT_SECS";

    /// Pause before retrying after a failed model call.
    pub const ERROR_BACKOFF_SECS: &str = "BLOCKWRIGHT_LLM_ERROR_BACKOFF_SECS";
}

/// World service.
pub mod world {
    pub const URL: &str = "BLOCKWRIGHT_WORLD_URL";
    pub const URL_ALIASES: &[&str] = &["WORLD_SERVER_URL"];

    pub const TIMEOUT_SECS: &str = "BLOCKWRIGHT_WORLD_TIMEOUT_SECS";

    pub const RETRY_MAX_ATTEMPTS: &str = "BLOCKWRIGHT_RETRY_MAX_ATTEMPTS";
    pub const RETRY_BASE_DELAY_MS: &str = "BLOCKWRIGHT_RETRY_BASE_DELAY_MS";
    pub const RETRY_MAX_DELAY_MS: &str = "BLOCKWRIGHT_RETRY_MAX_DELAY_MS";

    pub const BREAKER_THRESHOLD: &str = "BLOCKWRIGHT_BREAKER_THRESHOLD";
    pub const BREAKER_COOLDOWN_SECS: &str = "BLOCKWRIGHT_BREAKER_COOLDOWN_SECS";
}

/// Agent loop behaviour.
pub mod agent {
    pub const MAX_TOOL_TURNS: &str = "BLOCKWRIGHT_MAX_TOOL_TURNS";
    /// `nudge` (keep-alive) or `stop` (single-shot).
    pub const ON_NO_TOOL_CALLS: &str = "BLOCKWRIGHT_ON_NO_TOOL_CALLS";
    pub const ENABLE_MEMORY: &str = "BLOCKWRIGHT_ENABLE_MEMORY";
    pub const SEED_PROMPT: &str = "BLOCKWRIGHT_SEED_PROMPT";
    pub const NUDGE_PROMPT: &str = "BLOCKWRIGHT_NUDGE_PROMPT";
}

/// Logging.
pub mod observability {
    pub const QUIET: &str = "BLOCKWRIGHT_QUIET";
    pub const LOG_LEVEL: &str = "BLOCKWRIGHT_LOG_LEVEL";
    pub const LOG_JSON: &str = "BLOCKWRIGHT_LOG_JSON";
}
