use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

/// Where a file's text comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ContentSource {
    /// The content is the file's text.
    #[default]
    Inline,
    /// The content is the absolute path of another file in the same tree.
    LocalLink,
    /// The content is an opaque `host:/path` address on another machine.
    RemoteLink,
}

impl ContentSource {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Inline => "inline",
            Self::LocalLink => "link",
            Self::RemoteLink => "remote",
        }
    }

    #[must_use]
    pub const fn is_link(self) -> bool {
        matches!(self, Self::LocalLink | Self::RemoteLink)
    }
}

impl std::fmt::Display for ContentSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A file held in a directory's file set.
///
/// Equality, ordering and hashing only look at [`FileEntry::name`]: two
/// entries with the same name are the same member of a directory.
#[derive(Debug, Clone)]
pub struct FileEntry {
    pub name: String,
    pub source: ContentSource,
    pub content: String,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

impl FileEntry {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            name: name.into(),
            source: ContentSource::Inline,
            content: String::new(),
            created: now,
            modified: now,
        }
    }

    #[must_use]
    pub fn link(name: impl Into<String>, target: impl Into<String>, source: ContentSource) -> Self {
        Self {
            source,
            content: target.into(),
            ..Self::new(name)
        }
    }

    #[must_use]
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    /// Text after the last `.` of the name, if any.
    #[must_use]
    pub fn extension(&self) -> Option<&str> {
        self.name.rsplit_once('.').map(|(_, ext)| ext)
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.content.len()
    }

    /// Replace or extend the inline text. Links become inline files.
    pub fn write(&mut self, text: &str, append: bool) {
        if append && self.source == ContentSource::Inline && !self.content.is_empty() {
            self.content.push('\n');
            self.content.push_str(text);
        } else {
            self.content = text.to_string();
        }
        self.source = ContentSource::Inline;
        self.modified = Utc::now();
    }
}

impl PartialEq for FileEntry {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for FileEntry {}

impl Hash for FileEntry {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl PartialOrd for FileEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FileEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name.cmp(&other.name)
    }
}
