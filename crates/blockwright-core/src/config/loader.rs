//! Environment lookup helpers.
//!
//! All reads go through a [`VarSource`] so the fallback chains are kept in one
//! place and tests can feed an in-memory map instead of the process env.

use std::collections::HashMap;
use std::env;
use std::path::Path;
use std::str::FromStr;

use super::ConfigError;

/// Somewhere configuration values can be read from.
pub trait VarSource {
    fn var(&self, key: &str) -> Option<String>;
}

/// The real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl VarSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        env::var(key).ok()
    }
}

impl VarSource for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

impl VarSource for HashMap<&str, &str> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).map(|v| v.to_string())
    }
}

/// Explicit values (e.g. command-line flags) layered over another source.
pub struct Overlay<'a> {
    overrides: HashMap<&'static str, String>,
    base: &'a dyn VarSource,
}

impl<'a> Overlay<'a> {
    pub fn new(base: &'a dyn VarSource) -> Self {
        Self {
            overrides: HashMap::new(),
            base,
        }
    }

    /// Set `key` when `value` is present.
    pub fn set(mut self, key: &'static str, value: Option<impl ToString>) -> Self {
        if let Some(v) = value {
            self.overrides.insert(key, v.to_string());
        }
        self
    }
}

impl VarSource for Overlay<'_> {
    fn var(&self, key: &str) -> Option<String> {
        self.overrides
            .get(key)
            .cloned()
            .or_else(|| self.base.var(key))
    }
}

/// Load `.env` from the current directory (never overrides existing variables).
pub fn load_dotenv() {
    use std::sync::Once;
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let dir = env::current_dir().unwrap_or_else(|_| std::path::PathBuf::from("."));
        load_dotenv_from_dir(&dir);
    });
}

/// Load `<dir>/.env` into the process environment, skipping keys already set.
pub fn load_dotenv_from_dir(dir: &Path) {
    let Ok(content) = std::fs::read_to_string(dir.join(".env")) else {
        return;
    };
    let mut loaded = 0;
    for (key, value) in parse_dotenv(&content) {
        if env::var(&key).is_err() {
            env::set_var(&key, &value);
            loaded += 1;
        }
    }
    tracing::debug!(dir = %dir.display(), loaded, ".env loaded");
}

/// Parse `KEY=value` lines. Blank lines and `#` comments are skipped, matching
/// quotes are stripped, and an unquoted trailing `# comment` is dropped.
pub fn parse_dotenv(content: &str) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some(eq_pos) = line.find('=') else {
            continue;
        };
        let key = line[..eq_pos].trim();
        let mut value = line[eq_pos + 1..].trim();
        if let Some(hash_pos) = value.find('#') {
            let before_hash = value[..hash_pos].trim_end();
            if !before_hash.contains('"') && !before_hash.contains('\'') {
                value = before_hash;
            }
        }
        if value.len() >= 2
            && ((value.starts_with('"') && value.ends_with('"'))
                || (value.starts_with('\'') && value.ends_with('\'')))
        {
            value = &value[1..value.len() - 1];
        }
        if !key.is_empty() {
            pairs.push((key.to_string(), value.to_string()));
        }
    }
    pairs
}

/// Read the primary key or the first set alias; empty values count as unset.
pub fn env_optional(src: &dyn VarSource, primary: &str, aliases: &[&str]) -> Option<String> {
    std::iter::once(primary)
        .chain(aliases.iter().copied())
        .find_map(|k| src.var(k))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Like [`env_optional`] with a fallback.
pub fn env_or<F>(src: &dyn VarSource, primary: &str, aliases: &[&str], default: F) -> String
where
    F: FnOnce() -> String,
{
    env_optional(src, primary, aliases).unwrap_or_else(default)
}

/// Required value: missing or empty is a [`ConfigError::Missing`].
pub fn env_required(
    src: &dyn VarSource,
    primary: &'static str,
    aliases: &[&str],
) -> Result<String, ConfigError> {
    env_optional(src, primary, aliases).ok_or(ConfigError::Missing { key: primary })
}

/// 1/true/yes/on are true, 0/false/no/off are false; anything else is invalid.
pub fn env_bool(
    src: &dyn VarSource,
    primary: &'static str,
    aliases: &[&str],
    default: bool,
) -> Result<bool, ConfigError> {
    match env_optional(src, primary, aliases) {
        None => Ok(default),
        Some(s) => match s.to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::Invalid {
                key: primary,
                value: s,
                reason: "expected a boolean".to_string(),
            }),
        },
    }
}

/// Parse an optional value with `FromStr`.
pub fn env_parse<T>(
    src: &dyn VarSource,
    primary: &'static str,
    aliases: &[&str],
) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env_optional(src, primary, aliases) {
        None => Ok(None),
        Some(s) => s.parse::<T>().map(Some).map_err(|e| ConfigError::Invalid {
            key: primary,
            value: s,
            reason: e.to_string(),
        }),
    }
}
