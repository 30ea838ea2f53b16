//! Programs and the registry that names them

use std::collections::BTreeMap;
use subspace_core::{FilesystemTree, User, UserDirectory, VirtualPath};
use subspace_sdk::{ShellError, ShellResult};

use crate::params::{BoundParameters, ParameterSchema};
use crate::programs;

/// What a program is called, what it does and what it accepts.
#[derive(Debug, Clone)]
pub struct ProgramSchema {
    command: String,
    description: String,
    parameters: ParameterSchema,
}

impl ProgramSchema {
    pub fn new(
        command: impl Into<String>,
        description: impl Into<String>,
        parameters: ParameterSchema,
    ) -> Self {
        Self {
            command: command.into(),
            description: description.into(),
            parameters,
        }
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn parameters(&self) -> &ParameterSchema {
        &self.parameters
    }
}

/// State a program runs against: the machine's tree and users, the
/// registry (for programs that describe other programs) and the user
/// issuing the command.
pub struct ExecContext<'a> {
    pub tree: &'a mut FilesystemTree,
    pub users: &'a mut UserDirectory,
    pub registry: &'a ProgramRegistry,
    pub user: &'a User,
}

impl ExecContext<'_> {
    /// Resolve `raw` against the executing user's working directory.
    pub fn resolve(&self, raw: &str) -> ShellResult<VirtualPath> {
        self.users.resolve(self.user, raw)
    }

    pub fn working_directory(&self) -> ShellResult<&VirtualPath> {
        self.users.working_directory(self.user)
    }
}

/// A named executable.
pub trait Program {
    fn schema(&self) -> &ProgramSchema;

    /// Run with already bound parameters and return the text result.
    fn execute(&self, ctx: &mut ExecContext<'_>, params: &BoundParameters) -> ShellResult<String>;

    fn command(&self) -> &str {
        self.schema().command()
    }
}

/// Name-keyed set of programs, fixed once a session is built.
#[derive(Default)]
pub struct ProgramRegistry {
    programs: BTreeMap<String, Box<dyn Program>>,
}

impl ProgramRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn register(&mut self, program: Box<dyn Program>) {
        let name = program.command().to_string();
        if self.programs.insert(name.clone(), program).is_some() {
            tracing::warn!(program = %name, "replaced an already registered program");
        }
    }

    pub fn get(&self, name: &str) -> Option<&dyn Program> {
        self.programs.get(name).map(|p| p.as_ref())
    }

    /// Like [`ProgramRegistry::get`], failing with `UnknownProgram`.
    pub fn lookup(&self, name: &str) -> ShellResult<&dyn Program> {
        self.get(name)
            .ok_or_else(|| ShellError::unknown_program(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.programs.contains_key(name)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.programs.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Program> {
        self.programs.values().map(|p| p.as_ref())
    }

    pub fn len(&self) -> usize {
        self.programs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.programs.is_empty()
    }
}

impl std::fmt::Debug for ProgramRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgramRegistry")
            .field("programs", &self.programs.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Every built-in program.
pub fn default_registry() -> ProgramRegistry {
    let mut registry = ProgramRegistry::new();

    registry.register(Box::new(programs::fs::MakeDirectory::new()));
    registry.register(Box::new(programs::fs::Remove::new()));
    registry.register(Box::new(programs::fs::Touch::new()));
    registry.register(Box::new(programs::fs::Link::new()));
    registry.register(Box::new(programs::fs::List::new()));
    registry.register(Box::new(programs::fs::ChangeDirectory::new()));
    registry.register(Box::new(programs::fs::PrintWorkingDirectory::new()));
    registry.register(Box::new(programs::shell::Manual::new()));
    registry.register(Box::new(programs::shell::Help::new()));
    registry.register(Box::new(programs::shell::UserAdd::new()));
    registry.register(Box::new(programs::shell::WhoAmI::new()));
    registry.register(Box::new(programs::text::Echo::new()));
    registry.register(Box::new(programs::text::Cat::new()));
    registry.register(Box::new(programs::time::Date::new()));
    registry.register(Box::new(programs::time::Time::new()));

    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_registry_has_every_program() {
        let registry = default_registry();
        let names: Vec<&str> = registry.names().collect();
        assert_eq!(
            names,
            vec![
                "cat", "cd", "date", "echo", "help", "ln", "ls", "man", "mkdir", "pwd", "rm",
                "time", "touch", "useradd", "whoami",
            ]
        );
    }

    #[test]
    fn lookup_unknown_program() {
        let registry = default_registry();
        assert!(registry.lookup("ls").is_ok());
        assert_eq!(
            registry.lookup("bogus").err(),
            Some(ShellError::unknown_program("bogus"))
        );
    }

    #[test]
    fn schemas_name_their_registry_key() {
        let registry = default_registry();
        for name in registry.names() {
            let program = registry.lookup(name).unwrap();
            assert_eq!(program.command(), name);
            assert!(!program.schema().description().is_empty());
        }
    }
}
