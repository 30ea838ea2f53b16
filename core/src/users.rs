use std::collections::BTreeMap;
use subspace_sdk::{ShellError, ShellResult};

use crate::path::{self, VirtualPath};
use crate::tree::FilesystemTree;

/// Parent of every home directory.
pub const HOME_ROOT: &str = "/home";

/// A user identity. Two users are the same when their names match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct User {
    name: String,
}

impl User {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Display for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

#[derive(Debug, Clone)]
struct UserRecord {
    home: VirtualPath,
    cwd: VirtualPath,
}

/// Registered users with their home and working directories.
#[derive(Debug, Clone, Default)]
pub struct UserDirectory {
    users: BTreeMap<String, UserRecord>,
}

impl UserDirectory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `name`, creating `/home/{name}` and starting them there.
    pub fn create_user(&mut self, tree: &mut FilesystemTree, name: &str) -> ShellResult<User> {
        path::validate_name(name)?;
        if self.users.contains_key(name) {
            return Err(ShellError::duplicate_user(name));
        }

        let home = VirtualPath::parse(HOME_ROOT)?.join(name)?;
        tree.create_directory(&home, true)?;
        self.users.insert(
            name.to_string(),
            UserRecord {
                home: home.clone(),
                cwd: home.clone(),
            },
        );
        tracing::info!(user = name, home = %home, "created user");
        Ok(User::new(name))
    }

    pub fn user(&self, name: &str) -> ShellResult<User> {
        if self.users.contains_key(name) {
            Ok(User::new(name))
        } else {
            Err(ShellError::unknown_user(name))
        }
    }

    #[must_use]
    pub fn contains(&self, user: &User) -> bool {
        self.users.contains_key(user.name())
    }

    pub fn usernames(&self) -> impl Iterator<Item = &str> {
        self.users.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.users.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn home_directory(&self, user: &User) -> ShellResult<&VirtualPath> {
        self.record(user).map(|r| &r.home)
    }

    pub fn working_directory(&self, user: &User) -> ShellResult<&VirtualPath> {
        self.record(user).map(|r| &r.cwd)
    }

    pub fn set_working_directory(
        &mut self,
        tree: &FilesystemTree,
        user: &User,
        path: VirtualPath,
    ) -> ShellResult<()> {
        let record = self
            .users
            .get_mut(user.name())
            .ok_or_else(|| ShellError::unknown_user(user.name()))?;
        if !tree.contains_directory(&path) {
            return Err(ShellError::directory_not_found(path.as_str()));
        }
        tracing::trace!(user = %user, cwd = %path, "changed working directory");
        record.cwd = path;
        Ok(())
    }

    /// Resolve `raw` against the user's working directory.
    pub fn resolve(&self, user: &User, raw: &str) -> ShellResult<VirtualPath> {
        path::resolve_relative(self.working_directory(user)?, raw)
    }

    /// Move every user whose working directory no longer exists back home,
    /// or to the root when the home is gone as well.
    pub fn repair_working_directories(&mut self, tree: &FilesystemTree) -> Vec<User> {
        let mut moved = Vec::new();
        for (name, record) in &mut self.users {
            if tree.contains_directory(&record.cwd) {
                continue;
            }
            record.cwd = if tree.contains_directory(&record.home) {
                record.home.clone()
            } else {
                VirtualPath::root()
            };
            tracing::debug!(user = %name, cwd = %record.cwd, "reset working directory");
            moved.push(User::new(name.clone()));
        }
        moved
    }

    fn record(&self, user: &User) -> ShellResult<&UserRecord> {
        self.users
            .get(user.name())
            .ok_or_else(|| ShellError::unknown_user(user.name()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(raw: &str) -> VirtualPath {
        VirtualPath::parse(raw).unwrap()
    }

    fn setup() -> (FilesystemTree, UserDirectory, User) {
        let mut tree = FilesystemTree::new();
        let mut users = UserDirectory::new();
        let admin = users.create_user(&mut tree, "admin").unwrap();
        (tree, users, admin)
    }

    #[test]
    fn create_user_makes_home() {
        let (tree, users, admin) = setup();
        assert!(tree.contains_directory(&path("/home/admin")));
        assert_eq!(users.working_directory(&admin).unwrap(), &path("/home/admin"));
        assert_eq!(users.home_directory(&admin).unwrap(), &path("/home/admin"));
    }

    #[test]
    fn duplicate_and_invalid_users() {
        let (mut tree, mut users, _) = setup();
        assert_eq!(
            users.create_user(&mut tree, "admin"),
            Err(ShellError::duplicate_user("admin"))
        );
        assert!(matches!(
            users.create_user(&mut tree, "bad/name"),
            Err(ShellError::InvalidPath { .. })
        ));
        assert_eq!(users.len(), 1);
    }

    #[test]
    fn set_working_directory_requires_existing_directory() {
        let (mut tree, mut users, admin) = setup();
        assert_eq!(
            users.set_working_directory(&tree, &admin, path("/home/admin/sub")),
            Err(ShellError::directory_not_found("/home/admin/sub"))
        );

        tree.create_directory(&path("/home/admin/sub"), false).unwrap();
        users
            .set_working_directory(&tree, &admin, path("/home/admin/sub"))
            .unwrap();
        assert_eq!(
            users.resolve(&admin, "notes.txt").unwrap(),
            path("/home/admin/sub/notes.txt")
        );
    }

    #[test]
    fn unknown_user_lookups_fail() {
        let (tree, mut users, _) = setup();
        let ghost = User::new("ghost");
        assert_eq!(users.user("ghost"), Err(ShellError::unknown_user("ghost")));
        assert_eq!(
            users.working_directory(&ghost),
            Err(ShellError::unknown_user("ghost"))
        );
        assert_eq!(
            users.set_working_directory(&tree, &ghost, VirtualPath::root()),
            Err(ShellError::unknown_user("ghost"))
        );
    }

    #[test]
    fn repair_moves_users_out_of_removed_directories() {
        let (mut tree, mut users, admin) = setup();
        tree.create_directory(&path("/tmp/work"), true).unwrap();
        users
            .set_working_directory(&tree, &admin, path("/tmp/work"))
            .unwrap();

        tree.remove_file(&path("/tmp"), true).unwrap();
        let moved = users.repair_working_directories(&tree);
        assert_eq!(moved, vec![admin.clone()]);
        assert_eq!(users.working_directory(&admin).unwrap(), &path("/home/admin"));

        tree.remove_file(&path("/home"), true).unwrap();
        users.repair_working_directories(&tree);
        assert!(users.working_directory(&admin).unwrap().is_root());
    }
}
