//! Session state and execution engine

use subspace_config::ServerConfig;
use subspace_core::{FilesystemTree, User, UserDirectory, VirtualPath};
use subspace_sdk::{ShellError, ShellResult};

use crate::params::bind;
use crate::parser::parse;
use crate::program::{default_registry, ExecContext, ProgramRegistry};

/// One simulated machine: its directory tree, its users and the programs
/// they can run.
#[derive(Debug)]
pub struct ShellSession {
    hostname: String,
    tree: FilesystemTree,
    users: UserDirectory,
    registry: ProgramRegistry,
}

impl ShellSession {
    /// Build a machine, seeding the configured system directories and
    /// creating every configured user.
    pub fn new(config: &ServerConfig) -> ShellResult<Self> {
        let mut tree = FilesystemTree::new();
        for dir in &config.system_directories {
            tree.create_directory(&VirtualPath::parse(dir)?, true)?;
        }

        let mut users = UserDirectory::new();
        for name in &config.users {
            users.create_user(&mut tree, name)?;
        }

        tracing::debug!(
            hostname = %config.hostname,
            users = users.len(),
            directories = tree.directory_count(),
            "session ready"
        );

        Ok(Self {
            hostname: config.hostname.clone(),
            tree,
            users,
            registry: default_registry(),
        })
    }

    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    pub fn tree(&self) -> &FilesystemTree {
        &self.tree
    }

    pub fn users(&self) -> &UserDirectory {
        &self.users
    }

    pub fn registry(&self) -> &ProgramRegistry {
        &self.registry
    }

    pub fn user(&self, name: &str) -> ShellResult<User> {
        self.users.user(name)
    }

    /// Expand `{user}`, `{host}` and `{cwd}` in a prompt template.
    pub fn prompt(&self, user: &User, template: &str) -> String {
        let cwd = self
            .users
            .working_directory(user)
            .map(ToString::to_string)
            .unwrap_or_default();
        template
            .replace("{user}", user.name())
            .replace("{host}", &self.hostname)
            .replace("{cwd}", &cwd)
    }

    /// Run one command line as `user` and return its text, or a message
    /// for a program that doesn't exist.
    ///
    /// Each stage's output is handed to the next stage as its first
    /// positional argument. The first failing stage aborts the pipeline.
    pub fn execute(&mut self, user: &User, input: &str) -> ShellResult<String> {
        let Some(line) = parse(input)? else {
            return Ok(String::new());
        };
        if !self.users.contains(user) {
            return Err(ShellError::unknown_user(user.name()));
        }

        let mut carried = String::new();
        for stage in &line.stages {
            let Some(program) = self.registry.get(&stage.command) else {
                return Ok(ShellError::unknown_program(&stage.command).to_string());
            };

            let piped = Some(carried.as_str()).filter(|s| !s.is_empty());
            let params = bind(program.schema().parameters(), piped, &stage.args)?;

            let mut ctx = ExecContext {
                tree: &mut self.tree,
                users: &mut self.users,
                registry: &self.registry,
                user,
            };
            carried = program.execute(&mut ctx, &params)?;
        }

        match line.redirect {
            Some(redirect) => {
                let target = self.users.resolve(user, &redirect.target)?;
                self.tree
                    .write_file(&target, &carried, redirect.mode.is_append())?;
                Ok(String::new())
            }
            None => Ok(carried),
        }
    }

    /// Run a command line and always return text: failures become their
    /// message.
    pub fn submit_command(&mut self, user: &User, input: &str) -> String {
        tracing::debug!(user = %user, line = input, "submitted command");
        match self.execute(user, input) {
            Ok(output) => output,
            Err(err) => {
                tracing::debug!(
                    user = %user,
                    category = %err.category(),
                    error = %err,
                    "command failed"
                );
                err.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> (ShellSession, User) {
        let session = ShellSession::new(&ServerConfig::default()).unwrap();
        let admin = session.user("admin").unwrap();
        (session, admin)
    }

    fn path(raw: &str) -> VirtualPath {
        VirtualPath::parse(raw).unwrap()
    }

    #[test]
    fn new_seeds_directories_and_users() {
        let (session, admin) = session();
        for dir in ["/etc", "/var", "/home", "/home/admin"] {
            assert!(session.tree().contains_directory(&path(dir)), "{dir}");
        }
        assert_eq!(
            session.users().working_directory(&admin).unwrap(),
            &path("/home/admin")
        );
        assert_eq!(session.user("ghost"), Err(ShellError::unknown_user("ghost")));
    }

    #[test]
    fn new_rejects_bad_config() {
        let config = ServerConfig {
            users: vec!["admin".to_string(), "admin".to_string()],
            ..ServerConfig::default()
        };
        assert_eq!(
            ShellSession::new(&config).err(),
            Some(ShellError::duplicate_user("admin"))
        );
    }

    #[test]
    fn piping_threads_output() {
        let (mut session, admin) = session();
        assert_eq!(session.submit_command(&admin, "echo hi | echo"), "hi");
        assert_eq!(session.submit_command(&admin, "echo \"a b\" | echo | echo"), "a b");
    }

    #[test]
    fn piped_flag_lookalike_stays_text() {
        let (mut session, admin) = session();
        assert_eq!(session.submit_command(&admin, "echo \"-r\" | echo"), "-r");
    }

    #[test]
    fn unknown_program_is_reported() {
        let (mut session, admin) = session();
        let out = session.submit_command(&admin, "bogus");
        assert!(out.contains("bogus"));
        assert!(out.contains("not recognised"));

        let out = session.submit_command(&admin, "echo hi | bogus | echo");
        assert!(out.starts_with("'bogus'"));
    }

    #[test]
    fn blank_line_is_empty() {
        let (mut session, admin) = session();
        assert_eq!(session.submit_command(&admin, "   "), "");
    }

    #[test]
    fn failure_aborts_pipeline() {
        let (mut session, admin) = session();
        let out = session.submit_command(&admin, "mkdir /a/b | echo done");
        assert_eq!(out, ShellError::directory_not_found("/a").to_string());
        assert!(!session.tree().contains_directory(&path("/a")));
    }

    #[test]
    fn binding_errors_become_text() {
        let (mut session, admin) = session();
        assert_eq!(
            session.submit_command(&admin, "mkdir -r"),
            ShellError::missing_required_parameter("[0]").to_string()
        );
        assert_eq!(
            session.submit_command(&admin, "mkdir x --force"),
            "cannot bind unknown parameter '--force'"
        );
    }

    #[test]
    fn cd_changes_relative_resolution() {
        let (mut session, admin) = session();
        session.submit_command(&admin, "mkdir sub");
        assert_eq!(session.submit_command(&admin, "cd sub"), "");
        assert_eq!(session.submit_command(&admin, "pwd"), "/home/admin/sub");

        session.submit_command(&admin, "touch x.txt");
        assert!(session.tree().file(&path("/home/admin/sub/x.txt")).is_ok());
    }

    #[test]
    fn redirection_overwrites_and_appends() {
        let (mut session, admin) = session();
        assert_eq!(session.submit_command(&admin, "echo hello > note.txt"), "");
        assert_eq!(session.submit_command(&admin, "cat note.txt"), "hello");

        session.submit_command(&admin, "echo world >> note.txt");
        assert_eq!(session.submit_command(&admin, "cat note.txt"), "hello\nworld");

        session.submit_command(&admin, "echo fresh > note.txt");
        assert_eq!(session.submit_command(&admin, "cat note.txt"), "fresh");
    }

    #[test]
    fn redirection_errors() {
        let (mut session, admin) = session();
        assert_eq!(
            session.submit_command(&admin, "echo a > x.txt > y.txt"),
            ShellError::TooManyRedirections.to_string()
        );
        assert_eq!(
            session.submit_command(&admin, "echo a > /missing/x.txt"),
            ShellError::directory_not_found("/missing").to_string()
        );
    }

    #[test]
    fn removing_cwd_moves_user_home() {
        let (mut session, admin) = session();
        session.submit_command(&admin, "mkdir /tmp/work -r");
        session.submit_command(&admin, "cd /tmp/work");
        assert_eq!(session.submit_command(&admin, "rm /tmp -r"), "");
        assert_eq!(session.submit_command(&admin, "pwd"), "/home/admin");
    }

    #[test]
    fn users_keep_separate_working_directories() {
        let (mut session, admin) = session();
        session.submit_command(&admin, "useradd guest");
        let guest = session.user("guest").unwrap();

        session.submit_command(&admin, "cd /etc");
        assert_eq!(session.submit_command(&guest, "pwd"), "/home/guest");
        assert_eq!(session.submit_command(&guest, "whoami"), "guest");
    }

    #[test]
    fn unknown_user_cannot_run_commands() {
        let (mut session, _) = session();
        let ghost = User::new("ghost");
        assert_eq!(
            session.execute(&ghost, "pwd"),
            Err(ShellError::unknown_user("ghost"))
        );
    }

    #[test]
    fn prompt_expands_placeholders() {
        let (session, admin) = session();
        assert_eq!(
            session.prompt(&admin, "{user}@{host}:{cwd}$ "),
            "admin@subspace:/home/admin$ "
        );
    }
}
