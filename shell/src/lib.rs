//! subspace - a schema-driven shell over an in-memory multi-user filesystem
//!
//! This crate provides:
//! - A command-line lexer and parser (quoting, pipes, output redirection)
//! - Parameter schemas and the binder that matches arguments against them
//! - The built-in programs (mkdir, rm, cd, ls, echo, date, man, ...)
//! - [`ShellSession`], which runs command lines against one simulated machine

pub mod ast;
pub mod error;
pub mod help;
pub mod lexer;
pub mod params;
pub mod parser;
pub mod program;
pub mod programs;
pub mod session;

pub use error::{CliError, CliResult};
pub use parser::parse;
pub use program::{default_registry, ExecContext, Program, ProgramRegistry, ProgramSchema};
pub use session::ShellSession;
pub use subspace_core::User;
