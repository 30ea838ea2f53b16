//! Subspace Configuration System
//!
//! YAML configuration for the simulated server and its shell.
//!
//! # Configuration Loading Priority
//!
//! 1. Compiled-in defaults
//! 2. `/etc/subspace/subspace.yaml` (system-wide)
//! 3. `~/.config/subspace/subspace.yaml` (user)
//! 4. `./subspace.yaml` (project-local)
//! 5. `SUBSPACE_CONFIG=/path/to/config.yaml` (explicit)
//! 6. Environment variables (highest priority)
//!
//! # Example Configuration
//!
//! ```yaml
//! server:
//!   hostname: "relay"
//!   users: [admin, guest]
//!   system_directories: ["/etc", "/var/log"]
//!
//! shell:
//!   user: guest
//!   prompt: "{user}@{host}:{cwd}$ "
//!
//! logging:
//!   level: debug
//!   format: json
//! ```

#![allow(missing_docs)]

mod error;
mod loader;
mod types;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use types::*;

/// Load configuration from default locations.
///
/// Searches for config files in order and merges them.
/// Environment variables override file values.
pub fn load() -> Result<SubspaceConfig, ConfigError> {
    ConfigLoader::new().load()
}

/// Load configuration from a specific file.
pub fn load_from_file(path: &str) -> Result<SubspaceConfig, ConfigError> {
    ConfigLoader::new().with_file(path).load()
}
