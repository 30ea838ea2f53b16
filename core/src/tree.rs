use chrono::{DateTime, Utc};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use subspace_sdk::{ContentSource, FileEntry, ShellError, ShellResult};

use crate::path::VirtualPath;

/// Link chains longer than this are reported as loops.
pub const MAX_LINK_DEPTH: usize = 8;

/// Directories matched by a listing, each with a snapshot of its files.
pub type Listing = BTreeMap<VirtualPath, Vec<FileEntry>>;

#[derive(Debug, Clone)]
struct Directory {
    files: BTreeMap<String, FileEntry>,
    created: DateTime<Utc>,
}

impl Default for Directory {
    fn default() -> Self {
        Self {
            files: BTreeMap::new(),
            created: Utc::now(),
        }
    }
}

/// A server's in-memory directory tree.
///
/// Directories are keyed by their full path; parent/child relationships
/// are derived from path prefixes. The root always exists.
#[derive(Debug, Clone)]
pub struct FilesystemTree {
    directories: BTreeMap<VirtualPath, Directory>,
}

impl Default for FilesystemTree {
    fn default() -> Self {
        Self::new()
    }
}

impl FilesystemTree {
    #[must_use]
    pub fn new() -> Self {
        let mut directories = BTreeMap::new();
        directories.insert(VirtualPath::root(), Directory::default());
        Self { directories }
    }

    #[must_use]
    pub fn contains_directory(&self, path: &VirtualPath) -> bool {
        self.directories.contains_key(path)
    }

    #[must_use]
    pub fn directory_count(&self) -> usize {
        self.directories.len()
    }

    #[must_use]
    pub fn directory_created(&self, path: &VirtualPath) -> Option<DateTime<Utc>> {
        self.directories.get(path).map(|d| d.created)
    }

    pub fn create_directory(&mut self, path: &VirtualPath, recursive: bool) -> ShellResult<()> {
        if path.is_root() {
            return Err(ShellError::RootTargeted);
        }
        if let Some(segment) = path.segments().find(|s| s.contains('.')) {
            return Err(ShellError::invalid_path(
                path.as_str(),
                format!("directory name '{segment}' cannot have an extension"),
            ));
        }

        if recursive {
            let mut current = VirtualPath::root();
            for segment in path.segments() {
                current = current.join(segment)?;
                self.insert_directory(&current);
            }
        } else {
            let parent = path.parent().unwrap_or_else(VirtualPath::root);
            if !self.contains_directory(&parent) {
                return Err(ShellError::directory_not_found(parent.as_str()));
            }
            self.insert_directory(path);
        }
        Ok(())
    }

    fn insert_directory(&mut self, path: &VirtualPath) {
        if let Entry::Vacant(slot) = self.directories.entry(path.clone()) {
            tracing::trace!(path = %path, "created directory");
            slot.insert(Directory::default());
        }
    }

    /// Every directory at or below `prefix`. With `wildcard`, `prefix`
    /// itself is left out.
    #[must_use]
    pub fn list_directories(&self, prefix: &VirtualPath, wildcard: bool) -> Listing {
        self.descendants(prefix)
            .filter(|(path, _)| !(wildcard && *path == prefix))
            .map(|(path, dir)| (path.clone(), dir.files.values().cloned().collect()))
            .collect()
    }

    fn descendants<'a>(
        &'a self,
        prefix: &'a VirtualPath,
    ) -> impl Iterator<Item = (&'a VirtualPath, &'a Directory)> + 'a {
        // Paths sharing a string prefix are contiguous in the map.
        self.directories
            .range(prefix.clone()..)
            .take_while(move |(path, _)| path.as_str().starts_with(prefix.as_str()))
            .filter(move |(path, _)| path.is_within(prefix))
    }

    pub fn files(&self, directory: &VirtualPath) -> ShellResult<Vec<&FileEntry>> {
        self.directories
            .get(directory)
            .map(|d| d.files.values().collect())
            .ok_or_else(|| ShellError::directory_not_found(directory.as_str()))
    }

    pub fn file(&self, path: &VirtualPath) -> ShellResult<&FileEntry> {
        let (parent, name) = split_file(path)?;
        self.directories
            .get(&parent)
            .and_then(|d| d.files.get(name))
            .ok_or_else(|| ShellError::file_not_found(path.as_str()))
    }

    pub fn create_file(&mut self, path: &VirtualPath, recursive: bool) -> ShellResult<()> {
        let (_, name) = split_file(path)?;
        let entry = FileEntry::new(name);
        self.insert_file(path, entry, recursive)
    }

    pub fn create_link(
        &mut self,
        path: &VirtualPath,
        target: &str,
        source: ContentSource,
    ) -> ShellResult<()> {
        let (_, name) = split_file(path)?;
        let entry = FileEntry::link(name, target, source);
        self.insert_file(path, entry, false)
    }

    fn insert_file(
        &mut self,
        path: &VirtualPath,
        entry: FileEntry,
        recursive: bool,
    ) -> ShellResult<()> {
        let (parent, _) = split_file(path)?;
        if recursive && !parent.is_root() {
            self.create_directory(&parent, true)?;
        }
        let directory = self
            .directories
            .get_mut(&parent)
            .ok_or_else(|| ShellError::directory_not_found(parent.as_str()))?;

        match directory.files.entry(entry.name.clone()) {
            Entry::Occupied(_) => Err(ShellError::file_already_exists(path.as_str())),
            Entry::Vacant(slot) => {
                tracing::trace!(path = %path, source = %entry.source, "created file");
                slot.insert(entry);
                Ok(())
            }
        }
    }

    /// Overwrite or append a file's text, creating the file first when it
    /// is missing. The parent directory must already exist.
    pub fn write_file(&mut self, path: &VirtualPath, text: &str, append: bool) -> ShellResult<()> {
        let (parent, name) = split_file(path)?;
        let directory = self
            .directories
            .get_mut(&parent)
            .ok_or_else(|| ShellError::directory_not_found(parent.as_str()))?;
        directory
            .files
            .entry(name.to_string())
            .or_insert_with(|| FileEntry::new(name))
            .write(text, append);
        tracing::trace!(path = %path, append, bytes = text.len(), "wrote file");
        Ok(())
    }

    /// Text of a file, following local links.
    pub fn read_file(&self, path: &VirtualPath) -> ShellResult<String> {
        let mut current = path.clone();
        for _ in 0..=MAX_LINK_DEPTH {
            let file = self.file(&current)?;
            match file.source {
                ContentSource::Inline => return Ok(file.content.clone()),
                ContentSource::RemoteLink => return Ok(format!("remote link: {}", file.content)),
                ContentSource::LocalLink => current = VirtualPath::parse(&file.content)?,
            }
        }
        Err(ShellError::TooManyLinks(path.to_string()))
    }

    /// Remove a directory (final segment without extension) or a file.
    pub fn remove_file(&mut self, path: &VirtualPath, recursive: bool) -> ShellResult<()> {
        if path.is_root() {
            return Err(ShellError::RootTargeted);
        }

        if path.extension().is_some() {
            let (parent, name) = split_file(path)?;
            self.directories
                .get_mut(&parent)
                .and_then(|d| d.files.remove(name))
                .ok_or_else(|| ShellError::file_not_found(path.as_str()))?;
            tracing::debug!(path = %path, "removed file");
            return Ok(());
        }

        let directory = self
            .directories
            .get(path)
            .ok_or_else(|| ShellError::directory_not_found(path.as_str()))?;
        if !recursive {
            let has_children = self.descendants(path).any(|(p, _)| p != path);
            if !directory.files.is_empty() || has_children {
                return Err(ShellError::directory_not_empty(path.as_str()));
            }
        }

        let before = self.directories.len();
        self.directories.retain(|p, _| !p.is_within(path));
        tracing::debug!(
            path = %path,
            removed = before - self.directories.len(),
            "removed directory"
        );
        Ok(())
    }
}

fn split_file(path: &VirtualPath) -> ShellResult<(VirtualPath, &str)> {
    let (Some(parent), Some(name)) = (path.parent(), path.file_name()) else {
        return Err(ShellError::RootTargeted);
    };
    if path.extension().is_none() {
        return Err(ShellError::invalid_path(
            path.as_str(),
            format!("file name '{name}' needs an extension"),
        ));
    }
    Ok((parent, name))
}
