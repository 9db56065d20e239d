//! Configuration structs grouped by domain, loaded from a [`VarSource`].

use std::fmt;
use std::time::Duration;

use super::env_keys::{agent, llm, observability as obv_keys, world};
use super::loader::{
    env_bool, env_or, env_parse, env_required, load_dotenv, ProcessEnv, VarSource,
};
use super::ConfigError;

pub const DEFAULT_SEED_PROMPT: &str = "You are an AI agent controlling a character in a 3D block world. \
Your goal is to freely modify the world and build something meaningful. \
You can view the world state, place blocks and remove blocks. \
To remove a block you can also place an `air` block at that position. \
Start by checking the world state, then tell me your plan.";

pub const DEFAULT_NUDGE_PROMPT: &str =
    "Decide on your own how to proceed; I will not give you any suggestions.";

fn check_url(key: &'static str, value: String) -> Result<String, ConfigError> {
    if value.starts_with("http://") || value.starts_with("https://") {
        Ok(value.trim_end_matches('/').to_string())
    } else {
        Err(ConfigError::Invalid {
            key,
            value,
            reason: "expected an http:// or https:// URL".to_string(),
        })
    }
}

fn secs(src: &dyn VarSource, key: &'static str, default: u64) -> Result<Duration, ConfigError> {
    Ok(Duration::from_secs(env_parse::<u64>(src, key, &[])?.unwrap_or(default)))
}

fn millis(src: &dyn VarSource, key: &'static str, default: u64) -> Result<Duration, ConfigError> {
    Ok(Duration::from_millis(env_parse::<u64>(src, key, &[])?.unwrap_or(default)))
}

/// Model provider settings. Endpoint, credential and model name are required.
#[derive(Clone)]
pub struct LlmConfig {
    pub api_base: String,
    pub api_key: String,
    pub model: String,
    pub temperature: Option<f64>,
    pub timeout: Duration,
    pub error_backoff: Duration,
}

impl fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmConfig")
            .field("api_base", &self.api_base)
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("timeout", &self.timeout)
            .field("error_backoff", &self.error_backoff)
            .finish()
    }
}

impl LlmConfig {
    pub fn from_source(src: &dyn VarSource) -> Result<Self, ConfigError> {
        let api_base = check_url(
            llm::API_BASE,
            env_required(src, llm::API_BASE, llm::API_BASE_ALIASES)?,
        )?;
        let api_key = env_required(src, llm::API_KEY, llm::API_KEY_ALIASES)?;
        let model = env_required(src, llm::MODEL, llm::MODEL_ALIASES)?;
        let temperature = env_parse::<f64>(src, llm::TEMPERATURE, &[])?;
        if let Some(t) = temperature {
            if !(0.0..=2.0).contains(&t) {
                return Err(ConfigError::Invalid {
                    key: llm::TEMPERATURE,
                    value: t.to_string(),
                    reason: "expected 0.0..=2.0".to_string(),
                });
            }
        }
        Ok(Self {
            api_base,
            api_key,
            model,
            temperature,
            timeout: secs(src, llm::TIMEOUT_SECS, 300)?,
            error_backoff: secs(src, llm::ERROR_BACKOFF_SECS, 5)?,
        })
    }
}

/// Bounded exponential backoff for transient world-service failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryConfig {
    /// Total attempts per call, including the first.
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(200),
            max_delay: Duration::from_millis(5000),
        }
    }
}

/// Circuit breaker around the world service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreakerConfig {
    /// Consecutive failed operations before the breaker opens.
    pub failure_threshold: u32,
    /// How long the breaker stays open before letting a probe through.
    pub cooldown: Duration,
}

impl Default for BreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 5,
            cooldown: Duration::from_secs(30),
        }
    }
}

/// World service endpoint and resilience settings.
#[derive(Debug, Clone)]
pub struct WorldConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub retry: RetryConfig,
    pub breaker: BreakerConfig,
}

impl WorldConfig {
    pub fn from_source(src: &dyn VarSource) -> Result<Self, ConfigError> {
        let base_url = check_url(world::URL, env_required(src, world::URL, world::URL_ALIASES)?)?;
        let defaults = RetryConfig::default();
        let max_attempts = env_parse::<u32>(src, world::RETRY_MAX_ATTEMPTS, &[])?
            .unwrap_or(defaults.max_attempts);
        if max_attempts == 0 {
            return Err(ConfigError::Invalid {
                key: world::RETRY_MAX_ATTEMPTS,
                value: "0".to_string(),
                reason: "at least one attempt is required".to_string(),
            });
        }
        let breaker_defaults = BreakerConfig::default();
        let failure_threshold = env_parse::<u32>(src, world::BREAKER_THRESHOLD, &[])?
            .unwrap_or(breaker_defaults.failure_threshold)
            .max(1);
        Ok(Self {
            base_url,
            timeout: secs(src, world::TIMEOUT_SECS, 10)?,
            retry: RetryConfig {
                max_attempts,
                base_delay: millis(src, world::RETRY_BASE_DELAY_MS, 200)?,
                max_delay: millis(src, world::RETRY_MAX_DELAY_MS, 5000)?,
            },
            breaker: BreakerConfig {
                failure_threshold,
                cooldown: secs(src, world::BREAKER_COOLDOWN_SECS, 30)?,
            },
        })
    }
}

/// What the loop does when the model answers without calling any tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NoToolCallPolicy {
    /// Append the nudge message and keep going.
    #[default]
    KeepAlive,
    /// End the session.
    Terminate,
}

impl std::str::FromStr for NoToolCallPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "nudge" | "keep-alive" | "keepalive" | "continue" => Ok(Self::KeepAlive),
            "stop" | "terminate" | "single-shot" => Ok(Self::Terminate),
            other => Err(format!("unknown policy '{}', expected nudge or stop", other)),
        }
    }
}

/// Agent loop behaviour.
#[derive(Debug, Clone)]
pub struct AgentLoopConfig {
    /// Tool-call turns before the conversation is reset to the seed message.
    pub max_tool_turns: Option<usize>,
    pub on_no_tool_calls: NoToolCallPolicy,
    /// Expose the declaration tools to the model.
    pub enable_memory: bool,
    pub seed_prompt: String,
    pub nudge_prompt: String,
}

impl Default for AgentLoopConfig {
    fn default() -> Self {
        Self {
            max_tool_turns: None,
            on_no_tool_calls: NoToolCallPolicy::KeepAlive,
            enable_memory: true,
            seed_prompt: DEFAULT_SEED_PROMPT.to_string(),
            nudge_prompt: DEFAULT_NUDGE_PROMPT.to_string(),
        }
    }
}

impl AgentLoopConfig {
    pub fn from_source(src: &dyn VarSource) -> Result<Self, ConfigError> {
        let max_tool_turns = env_parse::<usize>(src, agent::MAX_TOOL_TURNS, &[])?;
        if max_tool_turns == Some(0) {
            return Err(ConfigError::Invalid {
                key: agent::MAX_TOOL_TURNS,
                value: "0".to_string(),
                reason: "must be at least 1 (unset for unbounded)".to_string(),
            });
        }
        Ok(Self {
            max_tool_turns,
            on_no_tool_calls: env_parse::<NoToolCallPolicy>(src, agent::ON_NO_TOOL_CALLS, &[])?
                .unwrap_or_default(),
            enable_memory: env_bool(src, agent::ENABLE_MEMORY, &[], true)?,
            seed_prompt: env_or(src, agent::SEED_PROMPT, &[], || DEFAULT_SEED_PROMPT.to_string()),
            nudge_prompt: env_or(src, agent::NUDGE_PROMPT, &[], || {
                DEFAULT_NUDGE_PROMPT.to_string()
            }),
        })
    }
}

/// Logging settings: quiet, log_level, log_json.
#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    pub quiet: bool,
    pub log_level: String,
    pub log_json: bool,
}

impl ObservabilityConfig {
    /// Never fails: a bad logging flag must not stop the agent, it falls back to defaults.
    pub fn from_source(src: &dyn VarSource) -> Self {
        Self {
            quiet: env_bool(src, obv_keys::QUIET, &[], false).unwrap_or(false),
            log_level: env_or(src, obv_keys::LOG_LEVEL, &[], || "blockwright=info".to_string()),
            log_json: env_bool(src, obv_keys::LOG_JSON, &[], false).unwrap_or(false),
        }
    }

    pub fn from_env() -> Self {
        load_dotenv();
        Self::from_source(&ProcessEnv)
    }
}

/// Everything the agent needs at startup.
#[derive(Debug, Clone)]
pub struct BlockwrightConfig {
    pub llm: LlmConfig,
    pub world: WorldConfig,
    pub agent: AgentLoopConfig,
}

impl BlockwrightConfig {
    /// Load from the process environment (and `.env`). Fails fast on missing
    /// credentials or URLs.
    pub fn from_env() -> Result<Self, ConfigError> {
        load_dotenv();
        Self::from_source(&ProcessEnv)
    }

    pub fn from_source(src: &dyn VarSource) -> Result<Self, ConfigError> {
        Ok(Self {
            llm: LlmConfig::from_source(src)?,
            world: WorldConfig::from_source(src)?,
            agent: AgentLoopConfig::from_source(src)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn base() -> HashMap<&'static str, &'static str> {
        [
            ("BLOCKWRIGHT_WORLD_URL", "http://localhost:1416/"),
            ("OPENAI_API_BASE", "https://api.moonshot.cn/v1"),
            ("OPENAI_API_KEY", "sk-test"),
            ("BLOCKWRIGHT_MODEL", "kimi-k2-0711-preview"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_full_config_defaults() {
        let cfg = BlockwrightConfig::from_source(&base()).unwrap();
        assert_eq!(cfg.world.base_url, "http://localhost:1416");
        assert_eq!(cfg.llm.api_base, "https://api.moonshot.cn/v1");
        assert_eq!(cfg.llm.model, "kimi-k2-0711-preview");
        assert_eq!(cfg.llm.temperature, None);
        assert_eq!(cfg.world.retry, RetryConfig::default());
        assert_eq!(cfg.world.breaker, BreakerConfig::default());
        assert_eq!(cfg.agent.on_no_tool_calls, NoToolCallPolicy::KeepAlive);
        assert_eq!(cfg.agent.max_tool_turns, None);
        assert!(cfg.agent.enable_memory);
        assert_eq!(cfg.agent.seed_prompt, DEFAULT_SEED_PROMPT);
    }

    #[test]
    fn test_missing_credentials_fail_fast() {
        for key in ["OPENAI_API_KEY", "BLOCKWRIGHT_WORLD_URL", "BLOCKWRIGHT_MODEL", "OPENAI_API_BASE"] {
            let mut src = base();
            src.remove(key);
            let err = BlockwrightConfig::from_source(&src).unwrap_err();
            assert!(matches!(err, ConfigError::Missing { .. }), "{key}: {err}");
        }
    }

    #[test]
    fn test_invalid_values() {
        let mut src = base();
        src.insert("BLOCKWRIGHT_WORLD_URL", "localhost:1416");
        assert!(matches!(
            BlockwrightConfig::from_source(&src),
            Err(ConfigError::Invalid { key: "BLOCKWRIGHT_WORLD_URL", .. })
        ));

        let mut src = base();
        src.insert("BLOCKWRIGHT_TEMPERATURE", "3.5");
        assert!(BlockwrightConfig::from_source(&src).is_err());

        let mut src = base();
        src.insert("BLOCKWRIGHT_ON_NO_TOOL_CALLS", "sometimes");
        assert!(BlockwrightConfig::from_source(&src).is_err());

        let mut src = base();
        src.insert("BLOCKWRIGHT_RETRY_MAX_ATTEMPTS", "0");
        assert!(BlockwrightConfig::from_source(&src).is_err());
    }

    #[test]
    fn test_overrides() {
        let mut src = base();
        src.insert("BLOCKWRIGHT_TEMPERATURE", "1.0");
        src.insert("BLOCKWRIGHT_MAX_TOOL_TURNS", "20");
        src.insert("BLOCKWRIGHT_ON_NO_TOOL_CALLS", "stop");
        src.insert("BLOCKWRIGHT_ENABLE_MEMORY", "0");
        src.insert("BLOCKWRIGHT_RETRY_BASE_DELAY_MS", "50");
        src.insert("BLOCKWRIGHT_BREAKER_COOLDOWN_SECS", "2");
        let cfg = BlockwrightConfig::from_source(&src).unwrap();
        assert_eq!(cfg.llm.temperature, Some(1.0));
        assert_eq!(cfg.agent.max_tool_turns, Some(20));
        assert_eq!(cfg.agent.on_no_tool_calls, NoToolCallPolicy::Terminate);
        assert!(!cfg.agent.enable_memory);
        assert_eq!(cfg.world.retry.base_delay, Duration::from_millis(50));
        assert_eq!(cfg.world.breaker.cooldown, Duration::from_secs(2));
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let cfg = LlmConfig::from_source(&base()).unwrap();
        let dbg = format!("{:?}", cfg);
        assert!(!dbg.contains("sk-test"));
        assert!(dbg.contains("<redacted>"));
    }
}
