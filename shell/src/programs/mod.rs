//! Built-in programs, grouped the way a shell groups its builtins:
//! filesystem and navigation, session and user management, text, time.

pub mod fs;
pub mod shell;
pub mod text;
pub mod time;

use subspace_sdk::{ShellError, ShellResult};

use crate::params::BoundParameters;

/// A positional argument the schema declares as required. Binding already
/// checked it, so absence here means the schema and the program disagree.
pub(crate) fn required(params: &BoundParameters, index: usize) -> ShellResult<&str> {
    params
        .positional(index)
        .ok_or_else(|| ShellError::missing_required_parameter(format!("[{}]", index)))
}
