use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::ConfigError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubspaceConfig {
    pub server: ServerConfig,
    pub shell: ShellConfig,
    pub logging: LoggingConfig,
}

impl SubspaceConfig {
    /// Reject configurations a server cannot be built from.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.users.is_empty() {
            return Err(ConfigError::InvalidValue(
                "server.users must name at least one user".to_string(),
            ));
        }
        for user in &self.server.users {
            if user.is_empty() || !user.chars().all(char::is_alphanumeric) {
                return Err(ConfigError::InvalidValue(format!(
                    "user name '{user}' must be alphanumeric"
                )));
            }
        }
        if self.server.hostname.trim().is_empty() {
            return Err(ConfigError::InvalidValue(
                "server.hostname must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// The simulated machine the shell runs on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub hostname: String,
    /// Users created at startup, each with a `/home/{name}` directory.
    pub users: Vec<String>,
    /// Directories seeded before any user exists.
    pub system_directories: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            hostname: "subspace".to_string(),
            users: vec!["admin".to_string()],
            system_directories: vec!["/etc".to_string(), "/var".to_string()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    /// The user the REPL logs in as.
    pub user: String,
    pub prompt: String,
    pub history: HistoryConfig,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            user: "admin".to_string(),
            prompt: "{user}@{host}:{cwd}$ ".to_string(),
            history: HistoryConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    pub enabled: bool,
    pub file: String,
    pub max_entries: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            file: "~/.subspace_history".to_string(),
            max_entries: 1000,
        }
    }
}

impl HistoryConfig {
    /// History file with `~` and `$VAR` expanded.
    #[must_use]
    pub fn resolved_path(&self) -> PathBuf {
        let expanded =
            shellexpand::full(&self.file).unwrap_or_else(|_| shellexpand::tilde(&self.file));
        PathBuf::from(expanded.as_ref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
    pub format: LogFormat,
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Warn,
            format: LogFormat::Compact,
            filter: String::new(),
        }
    }
}

impl LoggingConfig {
    /// The `EnvFilter` directive: an explicit filter wins over the level.
    #[must_use]
    pub fn directive(&self) -> String {
        if self.filter.is_empty() {
            self.level.as_str().to_string()
        } else {
            self.filter.clone()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
    Compact,
}
