//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.threadline/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::comment::ReplyPlacement;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ThreadlineConfig {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub thread: ThreadConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct BackendConfig {
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct SessionConfig {
    pub token: Option<String>,
    pub dir: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ThreadConfig {
    pub post_id: Option<u64>,
    pub post_author: Option<String>,
    pub reply_placement: Option<ReplyPlacement>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_POST_ID: u64 = 1;

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub base_url: String,
    pub request_timeout: Duration,
    /// Token given inline (env or config file). Takes priority over `session_dir`.
    pub auth_token: Option<String>,
    pub session_dir: Option<PathBuf>,
    pub post_id: u64,
    pub post_author: Option<String>,
    pub reply_placement: ReplyPlacement,
}

/// Values given on the command line (None = not specified).
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub base_url: Option<String>,
    pub post_id: Option<u64>,
    pub post_author: Option<String>,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns `~/.threadline/`.
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".threadline"))
}

/// Returns the path to `~/.threadline/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load config from `~/.threadline/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `ThreadlineConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<ThreadlineConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(ThreadlineConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(ThreadlineConfig::default());
    }

    load_config_from(&path)
}

/// Parse a config file at an explicit path.
pub fn load_config_from(path: &Path) -> Result<ThreadlineConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: ThreadlineConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

const DEFAULT_CONFIG_CONTENT: &str = r#"# Threadline Configuration
# All settings are optional. Defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [backend]
# base_url = "http://localhost:8080"   # Or set THREADLINE_BASE_URL
# timeout_secs = 30                    # Applies to reply submission and listing

# [session]
# token = "eyJhbGciOi..."              # Or set THREADLINE_AUTH_TOKEN
# dir = "/home/me/.threadline/session" # One file per key; the token is read from `authToken`

# [thread]
# post_id = 1                          # Or set THREADLINE_POST_ID
# post_author = "music_fan_99"         # Marks the author's comments as OP
# reply_placement = "newest_last"      # "newest_last" or "newest_first"
"#;

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, DEFAULT_CONFIG_CONTENT) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &ThreadlineConfig, cli: &CliOverrides) -> ResolvedConfig {
    resolve_with_env(config, cli, |key| std::env::var(key).ok())
}

/// Same as [`resolve`], reading the environment through `env`.
pub fn resolve_with_env(
    config: &ThreadlineConfig,
    cli: &CliOverrides,
    env: impl Fn(&str) -> Option<String>,
) -> ResolvedConfig {
    // Base URL: CLI → env → config → default
    let base_url = cli
        .base_url
        .clone()
        .or_else(|| env("THREADLINE_BASE_URL"))
        .or_else(|| config.backend.base_url.clone())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

    // Post: CLI → env → config → default
    let post_id = cli
        .post_id
        .or_else(|| env("THREADLINE_POST_ID").and_then(|v| parse_post_id(&v)))
        .or(config.thread.post_id)
        .unwrap_or(DEFAULT_POST_ID);

    // Token: env → config. Falls back to the session directory at runtime.
    let auth_token = env("THREADLINE_AUTH_TOKEN").or_else(|| config.session.token.clone());

    let session_dir = config
        .session
        .dir
        .as_ref()
        .map(PathBuf::from)
        .or_else(|| config_dir().map(|d| d.join("session")));

    ResolvedConfig {
        base_url,
        request_timeout: Duration::from_secs(
            config.backend.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
        ),
        auth_token,
        session_dir,
        post_id,
        post_author: cli
            .post_author
            .clone()
            .or_else(|| config.thread.post_author.clone()),
        reply_placement: config.thread.reply_placement.unwrap_or_default(),
    }
}

fn parse_post_id(raw: &str) -> Option<u64> {
    match raw.trim().parse() {
        Ok(id) => Some(id),
        Err(e) => {
            warn!("Ignoring THREADLINE_POST_ID={:?}: {}", raw, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_default_config_parses() {
        let config = ThreadlineConfig::default();
        assert!(config.backend.base_url.is_none());
        assert!(config.thread.post_id.is_none());
    }

    #[test]
    fn test_generated_default_is_valid_toml() {
        let config: ThreadlineConfig = toml::from_str(DEFAULT_CONFIG_CONTENT).unwrap();
        assert!(config.session.token.is_none());
    }

    #[test]
    fn test_resolve_uses_defaults_when_empty() {
        let resolved = resolve_with_env(&ThreadlineConfig::default(), &CliOverrides::default(), no_env);
        assert_eq!(resolved.base_url, DEFAULT_BASE_URL);
        assert_eq!(resolved.request_timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert_eq!(resolved.post_id, DEFAULT_POST_ID);
        assert_eq!(resolved.reply_placement, ReplyPlacement::NewestLast);
        assert!(resolved.auth_token.is_none());
    }

    #[test]
    fn test_config_values_override_defaults() {
        let toml_str = r#"
[backend]
base_url = "https://comments.example.com"
timeout_secs = 5

[session]
token = "from-file"

[thread]
post_id = 42
post_author = "op_user"
reply_placement = "newest_first"
"#;
        let config: ThreadlineConfig = toml::from_str(toml_str).unwrap();
        let resolved = resolve_with_env(&config, &CliOverrides::default(), no_env);
        assert_eq!(resolved.base_url, "https://comments.example.com");
        assert_eq!(resolved.request_timeout, Duration::from_secs(5));
        assert_eq!(resolved.auth_token.as_deref(), Some("from-file"));
        assert_eq!(resolved.post_id, 42);
        assert_eq!(resolved.post_author.as_deref(), Some("op_user"));
        assert_eq!(resolved.reply_placement, ReplyPlacement::NewestFirst);
    }

    #[test]
    fn test_env_beats_config_and_cli_beats_env() {
        let config: ThreadlineConfig = toml::from_str(
            r#"
[backend]
base_url = "http://config"
[session]
token = "config-token"
[thread]
post_id = 1
"#,
        )
        .unwrap();
        let env = |key: &str| match key {
            "THREADLINE_BASE_URL" => Some("http://env".to_string()),
            "THREADLINE_AUTH_TOKEN" => Some("env-token".to_string()),
            "THREADLINE_POST_ID" => Some("7".to_string()),
            _ => None,
        };

        let resolved = resolve_with_env(&config, &CliOverrides::default(), env);
        assert_eq!(resolved.base_url, "http://env");
        assert_eq!(resolved.auth_token.as_deref(), Some("env-token"));
        assert_eq!(resolved.post_id, 7);

        let cli = CliOverrides {
            base_url: Some("http://cli".to_string()),
            post_id: Some(99),
            post_author: None,
        };
        let resolved = resolve_with_env(&config, &cli, env);
        assert_eq!(resolved.base_url, "http://cli");
        assert_eq!(resolved.post_id, 99);
    }

    #[test]
    fn test_bad_post_id_env_falls_through() {
        let env = |key: &str| (key == "THREADLINE_POST_ID").then(|| "abc".to_string());
        let resolved = resolve_with_env(&ThreadlineConfig::default(), &CliOverrides::default(), env);
        assert_eq!(resolved.post_id, DEFAULT_POST_ID);
    }

    #[test]
    fn test_sparse_toml_parses() {
        let config: ThreadlineConfig = toml::from_str("[thread]\npost_id = 3\n").unwrap();
        assert_eq!(config.thread.post_id, Some(3));
        assert!(config.backend.timeout_secs.is_none());
        assert!(config.thread.reply_placement.is_none());
    }

    #[test]
    fn test_unknown_placement_is_a_parse_error() {
        let result: Result<ThreadlineConfig, _> =
            toml::from_str("[thread]\nreply_placement = \"sideways\"\n");
        assert!(result.is_err());
    }
}
