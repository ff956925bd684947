//! # Session Credentials
//!
//! Read-only access to the current user's bearer token. The comment
//! subsystem never writes credentials; it only asks "is someone logged
//! in, and with what token?" at submission time.
//!
//! Tokens are looked up by key, the same way a browser client reads
//! `authToken` from local storage. [`FileSessionStore`] maps each key to a
//! file under `~/.threadline/session/`.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use log::{debug, warn};

/// Key under which the bearer token is stored.
pub const AUTH_TOKEN_KEY: &str = "authToken";

pub trait SessionStore: Send + Sync {
    /// Synchronous lookup; `None` when the key is absent or empty.
    fn get(&self, key: &str) -> Option<String>;

    fn bearer_token(&self) -> Option<String> {
        self.get(AUTH_TOKEN_KEY)
    }
}

/// In-memory store, used for tokens supplied via config or environment.
#[derive(Debug, Default, Clone)]
pub struct MemorySessionStore {
    values: HashMap<String, String>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store holding just the bearer token (or nothing).
    pub fn with_token(token: Option<String>) -> Self {
        let mut store = Self::new();
        if let Some(token) = token {
            store.values.insert(AUTH_TOKEN_KEY.to_string(), token);
        }
        store
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values
            .get(key)
            .filter(|v| !v.trim().is_empty())
            .cloned()
    }
}

/// Store backed by one file per key in a directory.
///
/// Files are re-read on every lookup so logging in from another terminal
/// takes effect without restarting.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    dir: PathBuf,
}

impl FileSessionStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `~/.threadline/session/`, if a home directory exists.
    pub fn default_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".threadline").join("session"))
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self, key: &str) -> Option<String> {
        let path = self.dir.join(key);
        match fs::read_to_string(&path) {
            Ok(contents) => {
                let value = contents.trim();
                if value.is_empty() {
                    debug!("Session key '{}' is empty at {}", key, path.display());
                    None
                } else {
                    Some(value.to_string())
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                warn!("Failed to read session key '{}' from {}: {}", key, path.display(), e);
                None
            }
        }
    }
}
