#![doc = include_str!("../README.md")]

mod error;
mod types;

pub use error::{ErrorCategory, ShellError, ShellResult};
pub use types::{ContentSource, FileEntry};
