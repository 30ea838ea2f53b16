//! Error types for the `subspace` binary

use subspace_config::ConfigError;
use subspace_sdk::ShellError;
use thiserror::Error;

/// Result type alias for start-up and REPL failures
pub type CliResult<T> = Result<T, CliError>;

/// Failures that end the `subspace` process. Command failures never show
/// up here; the session turns them into text.
#[derive(Error, Debug)]
pub enum CliError {
    /// The configuration could not be loaded or validated
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// The configured machine could not be built
    #[error("Cannot start session: {0}")]
    Session(#[from] ShellError),

    /// The line editor failed
    #[error("Line editor error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),
}
