//! Parsed command lines
//!
//! A command line is a pipeline of one or more stages and an optional
//! output redirection applied to the last stage's text.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub stages: Vec<PipelineSegment>,
    pub redirect: Option<Redirection>,
}

/// One `|`-separated stage: the program name and its raw argument tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineSegment {
    pub command: String,
    pub args: Vec<String>,
}

impl PipelineSegment {
    pub fn new(command: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            command: command.into(),
            args,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirection {
    pub target: String,
    pub mode: RedirectMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectMode {
    /// `>`
    Overwrite,
    /// `>>`
    Append,
}

impl RedirectMode {
    pub fn is_append(self) -> bool {
        matches!(self, RedirectMode::Append)
    }
}

impl fmt::Display for PipelineSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.command)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

impl fmt::Display for RedirectMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RedirectMode::Overwrite => write!(f, ">"),
            RedirectMode::Append => write!(f, ">>"),
        }
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, stage) in self.stages.iter().enumerate() {
            if i > 0 {
                write!(f, " | ")?;
            }
            write!(f, "{}", stage)?;
        }
        if let Some(redirect) = &self.redirect {
            write!(f, " {} {}", redirect.mode, redirect.target)?;
        }
        Ok(())
    }
}
