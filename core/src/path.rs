//! Path resolution for the virtual tree.
//!
//! Paths are `/`-separated and absolute once resolved. Every segment is
//! alphanumeric; a file name may carry one alphanumeric extension
//! (`notes.txt`). Relative input is joined onto a working directory and
//! `.`/`..` segments are folded away before validation.

use subspace_sdk::{ShellError, ShellResult};

pub const SEPARATOR: char = '/';

/// Suffix marking a listing that should skip the named directory itself.
pub const WILDCARD: char = '*';

/// A normalized, validated absolute path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VirtualPath(String);

impl VirtualPath {
    #[must_use]
    pub fn root() -> Self {
        Self(SEPARATOR.to_string())
    }

    /// Parse an absolute path. A string made only of separators is the root.
    pub fn parse(raw: &str) -> ShellResult<Self> {
        if is_root_spelling(raw) {
            return Ok(Self::root());
        }
        let normalized = normalize(raw)?;
        if !normalized.starts_with(SEPARATOR) {
            return Err(ShellError::invalid_path(raw, "path must be absolute"));
        }
        validate_segments(&normalized)?;
        Ok(Self(normalized))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.len() == 1
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split(SEPARATOR).filter(|s| !s.is_empty())
    }

    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        if self.is_root() {
            return None;
        }
        match self.0.rsplit_once(SEPARATOR) {
            Some(("", _)) | None => Some(Self::root()),
            Some((parent, _)) => Some(Self(parent.to_string())),
        }
    }

    #[must_use]
    pub fn file_name(&self) -> Option<&str> {
        if self.is_root() {
            return None;
        }
        self.0.rsplit_once(SEPARATOR).map(|(_, name)| name)
    }

    #[must_use]
    pub fn extension(&self) -> Option<&str> {
        self.file_name()?.split_once('.').map(|(_, ext)| ext)
    }

    pub fn join(&self, segment: &str) -> ShellResult<Self> {
        let joined = if self.is_root() {
            format!("{SEPARATOR}{segment}")
        } else {
            format!("{}{SEPARATOR}{segment}", self.0)
        };
        validate_segment(segment).map_err(|reason| ShellError::invalid_path(&joined, reason))?;
        Ok(Self(joined))
    }

    /// True when `self` is `ancestor` or lies below it. Compares whole
    /// segments, so `/home/ad` does not contain `/home/admin`.
    #[must_use]
    pub fn is_within(&self, ancestor: &Self) -> bool {
        if ancestor.is_root() || self == ancestor {
            return true;
        }
        self.0.starts_with(&ancestor.0) && self.0.as_bytes().get(ancestor.0.len()) == Some(&b'/')
    }
}

impl std::fmt::Display for VirtualPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for VirtualPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

fn is_root_spelling(raw: &str) -> bool {
    !raw.is_empty() && raw.chars().all(|c| c == SEPARATOR)
}

/// Trim trailing separators. An empty result (the input was empty or named
/// the root) is an error.
pub fn normalize(raw: &str) -> ShellResult<String> {
    let trimmed = raw.trim_end_matches(SEPARATOR);
    if trimmed.is_empty() {
        return Err(ShellError::invalid_path(
            raw,
            "path is empty or targets the root directory",
        ));
    }
    Ok(trimmed.to_string())
}

/// Resolve `raw` against `cwd`. Absolute input ignores `cwd`.
pub fn resolve_relative(cwd: &VirtualPath, raw: &str) -> ShellResult<VirtualPath> {
    if raw.is_empty() {
        return Err(ShellError::invalid_path(raw, "path is empty"));
    }
    let joined = if raw.starts_with(SEPARATOR) {
        raw.to_string()
    } else if cwd.is_root() {
        format!("{SEPARATOR}{raw}")
    } else {
        format!("{cwd}{SEPARATOR}{raw}")
    };

    let trimmed = joined.trim_end_matches(SEPARATOR);
    let mut stack: Vec<&str> = Vec::new();
    for segment in trimmed.split(SEPARATOR).skip(1) {
        match segment {
            "." => {}
            ".." => {
                stack.pop();
            }
            other => stack.push(other),
        }
    }

    if stack.is_empty() {
        return Ok(VirtualPath::root());
    }
    VirtualPath::parse(&format!("{SEPARATOR}{}", stack.join("/")))
}

/// Check every segment of `path`. The error names the first offending one.
pub fn validate_segments(path: &str) -> ShellResult<()> {
    if is_root_spelling(path) {
        return Ok(());
    }
    let body = path.strip_prefix(SEPARATOR).unwrap_or(path);
    for segment in body.split(SEPARATOR) {
        validate_segment(segment).map_err(|reason| ShellError::invalid_path(path, reason))?;
    }
    Ok(())
}

/// Validate a bare name such as a username: alphanumeric, no extension.
pub fn validate_name(name: &str) -> ShellResult<()> {
    if is_alphanumeric(name) {
        Ok(())
    } else {
        Err(ShellError::invalid_path(
            name,
            format!("name '{name}' must be alphanumeric"),
        ))
    }
}

/// Split a trailing `*` off a listing argument.
#[must_use]
pub fn strip_wildcard(raw: &str) -> (&str, bool) {
    raw.strip_suffix(WILDCARD)
        .map_or((raw, false), |base| (base, true))
}

fn validate_segment(segment: &str) -> Result<(), String> {
    if segment.is_empty() {
        return Err("path contains an empty segment".to_string());
    }
    let valid = match segment.split_once('.') {
        Some((stem, ext)) => is_alphanumeric(stem) && is_alphanumeric(ext),
        None => is_alphanumeric(segment),
    };
    if valid {
        Ok(())
    } else {
        Err(format!("segment '{segment}' is not alphanumeric"))
    }
}

fn is_alphanumeric(s: &str) -> bool {
    !s.is_empty() && s.chars().all(char::is_alphanumeric)
}
