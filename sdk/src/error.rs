use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShellError {
    #[error("invalid path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("directory not found: {0}")]
    DirectoryNotFound(String),

    #[error("directory not empty: {0}")]
    DirectoryNotEmpty(String),

    #[error("file not found: {0}")]
    FileNotFound(String),

    #[error("file already exists: {0}")]
    FileAlreadyExists(String),

    #[error("the root directory cannot be created or removed")]
    RootTargeted,

    #[error("cannot bind unknown parameter '{0}'")]
    UnknownParameter(String),

    #[error("parameter '{0}' expects a value")]
    MissingParameterValue(String),

    #[error("unexpected argument '{0}'")]
    UnexpectedArgument(String),

    #[error("missing required parameter '{0}'")]
    MissingRequiredParameter(String),

    #[error("invalid value for '{name}': {reason}")]
    InvalidParameterValue { name: String, reason: String },

    #[error("'{0}' is not recognised as the name of an operable program, command, or script.")]
    UnknownProgram(String),

    #[error("a command may redirect its output only once")]
    TooManyRedirections,

    #[error("user already exists: {0}")]
    DuplicateUser(String),

    #[error("unknown user: {0}")]
    UnknownUser(String),

    #[error("syntax error: {0}")]
    Syntax(String),

    #[error("too many levels of links: {0}")]
    TooManyLinks(String),
}

/// Coarse grouping of [`ShellError`] variants, used for log fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    Path,
    Filesystem,
    Binding,
    Program,
    Syntax,
    User,
}

impl ErrorCategory {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Path => "path",
            Self::Filesystem => "filesystem",
            Self::Binding => "binding",
            Self::Program => "program",
            Self::Syntax => "syntax",
            Self::User => "user",
        }
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ShellError {
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidPath { .. } | Self::RootTargeted => ErrorCategory::Path,
            Self::DirectoryNotFound(_)
            | Self::DirectoryNotEmpty(_)
            | Self::FileNotFound(_)
            | Self::FileAlreadyExists(_)
            | Self::TooManyLinks(_) => ErrorCategory::Filesystem,
            Self::UnknownParameter(_)
            | Self::MissingParameterValue(_)
            | Self::UnexpectedArgument(_)
            | Self::MissingRequiredParameter(_)
            | Self::InvalidParameterValue { .. } => ErrorCategory::Binding,
            Self::UnknownProgram(_) => ErrorCategory::Program,
            Self::TooManyRedirections | Self::Syntax(_) => ErrorCategory::Syntax,
            Self::DuplicateUser(_) | Self::UnknownUser(_) => ErrorCategory::User,
        }
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::DirectoryNotFound(_) | Self::FileNotFound(_) | Self::UnknownUser(_)
        )
    }

    #[must_use]
    pub fn is_binding_error(&self) -> bool {
        self.category() == ErrorCategory::Binding
    }

    #[must_use]
    pub fn invalid_path(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn directory_not_found(path: impl Into<String>) -> Self {
        Self::DirectoryNotFound(path.into())
    }

    #[must_use]
    pub fn directory_not_empty(path: impl Into<String>) -> Self {
        Self::DirectoryNotEmpty(path.into())
    }

    #[must_use]
    pub fn file_not_found(path: impl Into<String>) -> Self {
        Self::FileNotFound(path.into())
    }

    #[must_use]
    pub fn file_already_exists(path: impl Into<String>) -> Self {
        Self::FileAlreadyExists(path.into())
    }

    #[must_use]
    pub fn unknown_parameter(name: impl Into<String>) -> Self {
        Self::UnknownParameter(name.into())
    }

    #[must_use]
    pub fn missing_parameter_value(name: impl Into<String>) -> Self {
        Self::MissingParameterValue(name.into())
    }

    #[must_use]
    pub fn unexpected_argument(arg: impl Into<String>) -> Self {
        Self::UnexpectedArgument(arg.into())
    }

    #[must_use]
    pub fn missing_required_parameter(name: impl Into<String>) -> Self {
        Self::MissingRequiredParameter(name.into())
    }

    #[must_use]
    pub fn invalid_parameter_value(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameterValue {
            name: name.into(),
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn unknown_program(name: impl Into<String>) -> Self {
        Self::UnknownProgram(name.into())
    }

    #[must_use]
    pub fn duplicate_user(name: impl Into<String>) -> Self {
        Self::DuplicateUser(name.into())
    }

    #[must_use]
    pub fn unknown_user(name: impl Into<String>) -> Self {
        Self::UnknownUser(name.into())
    }

    #[must_use]
    pub fn syntax(reason: impl Into<String>) -> Self {
        Self::Syntax(reason.into())
    }
}

pub type ShellResult<T> = Result<T, ShellError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_categories() {
        assert_eq!(
            ShellError::invalid_path("/a-b", "bad").category(),
            ErrorCategory::Path
        );
        assert_eq!(ShellError::RootTargeted.category(), ErrorCategory::Path);
        assert_eq!(
            ShellError::directory_not_empty("/a").category(),
            ErrorCategory::Filesystem
        );
        assert_eq!(
            ShellError::missing_required_parameter("0").category(),
            ErrorCategory::Binding
        );
        assert_eq!(
            ShellError::unknown_program("bogus").category(),
            ErrorCategory::Program
        );
        assert_eq!(
            ShellError::TooManyRedirections.category(),
            ErrorCategory::Syntax
        );
        assert_eq!(
            ShellError::duplicate_user("admin").category(),
            ErrorCategory::User
        );
    }

    #[test]
    fn error_predicates() {
        assert!(ShellError::file_not_found("/x.txt").is_not_found());
        assert!(ShellError::directory_not_found("/a").is_not_found());
        assert!(!ShellError::RootTargeted.is_not_found());

        assert!(ShellError::unknown_parameter("x").is_binding_error());
        assert!(ShellError::unexpected_argument("extra").is_binding_error());
        assert!(!ShellError::syntax("oops").is_binding_error());
    }

    #[test]
    fn error_display() {
        let err = ShellError::invalid_path("/home/a-b", "segment 'a-b' is not alphanumeric");
        assert_eq!(
            err.to_string(),
            "invalid path '/home/a-b': segment 'a-b' is not alphanumeric"
        );

        let err = ShellError::unknown_parameter("force");
        assert_eq!(err.to_string(), "cannot bind unknown parameter 'force'");

        let err = ShellError::unknown_program("bogus");
        assert!(err.to_string().starts_with("'bogus' is not recognised"));
    }
}
