//! Parameter schemas and argument binding
//!
//! Every program declares the parameters it accepts. [`bind`] matches a
//! stage's raw argument tokens against that declaration.

use bitflags::bitflags;
use std::collections::BTreeMap;
use subspace_sdk::{ShellError, ShellResult};

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ParamFlags: u8 {
        /// The parameter consumes the following token as its value.
        const EXPECTS_VALUE = 1;
        /// Binding fails if the parameter is never supplied.
        const REQUIRED = 1 << 1;
    }
}

/// One declared parameter.
///
/// A positional parameter uses its index as both its full and short name.
/// Two parameters are equal when either name matches, which is what keeps
/// a schema free of colliding identifiers.
#[derive(Debug, Clone)]
pub struct ParameterInformation {
    full_name: String,
    short_name: String,
    description: String,
    flags: ParamFlags,
    position: Option<usize>,
}

impl ParameterInformation {
    pub fn positional(index: usize, description: impl Into<String>, required: bool) -> Self {
        let mut flags = ParamFlags::EXPECTS_VALUE;
        flags.set(ParamFlags::REQUIRED, required);
        Self {
            full_name: index.to_string(),
            short_name: index.to_string(),
            description: description.into(),
            flags,
            position: Some(index),
        }
    }

    /// A presence flag such as `--recursive -r`.
    pub fn flag(
        full_name: impl Into<String>,
        short_name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            full_name: full_name.into(),
            short_name: short_name.into(),
            description: description.into(),
            flags: ParamFlags::empty(),
            position: None,
        }
    }

    /// A named parameter that takes a value, such as `--format -f FORMAT`.
    pub fn option(
        full_name: impl Into<String>,
        short_name: impl Into<String>,
        description: impl Into<String>,
        required: bool,
    ) -> Self {
        let mut flags = ParamFlags::EXPECTS_VALUE;
        flags.set(ParamFlags::REQUIRED, required);
        Self {
            full_name: full_name.into(),
            short_name: short_name.into(),
            description: description.into(),
            flags,
            position: None,
        }
    }

    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn short_name(&self) -> &str {
        &self.short_name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn flags(&self) -> ParamFlags {
        self.flags
    }

    pub fn position(&self) -> Option<usize> {
        self.position
    }

    pub fn expects_value(&self) -> bool {
        self.flags.contains(ParamFlags::EXPECTS_VALUE)
    }

    pub fn is_required(&self) -> bool {
        self.flags.contains(ParamFlags::REQUIRED)
    }

    pub fn is_positional(&self) -> bool {
        self.position.is_some()
    }

    /// `[0]` for positionals, `--name -n` for named parameters.
    pub fn display_name(&self) -> String {
        match self.position {
            Some(index) => format!("[{}]", index),
            None => format!("--{} -{}", self.full_name, self.short_name),
        }
    }
}

impl PartialEq for ParameterInformation {
    fn eq(&self, other: &Self) -> bool {
        self.full_name == other.full_name || self.short_name == other.short_name
    }
}

/// The ordered parameter declarations of one program.
#[derive(Debug, Clone, Default)]
pub struct ParameterSchema {
    parameters: Vec<ParameterInformation>,
}

impl ParameterSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter. A parameter colliding with an existing one on
    /// either name is ignored.
    pub fn with(mut self, parameter: ParameterInformation) -> Self {
        if self.parameters.contains(&parameter) {
            tracing::warn!(
                parameter = %parameter.display_name(),
                "ignoring parameter that collides with an existing declaration"
            );
        } else {
            self.parameters.push(parameter);
        }
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = &ParameterInformation> {
        self.parameters.iter()
    }

    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    pub fn positional_count(&self) -> usize {
        self.parameters.iter().filter(|p| p.is_positional()).count()
    }

    pub fn by_full_name(&self, name: &str) -> Option<&ParameterInformation> {
        self.parameters
            .iter()
            .find(|p| !p.is_positional() && p.full_name == name)
    }

    pub fn by_short_name(&self, name: &str) -> Option<&ParameterInformation> {
        self.parameters
            .iter()
            .find(|p| !p.is_positional() && p.short_name == name)
    }

    pub fn at_position(&self, index: usize) -> Option<&ParameterInformation> {
        self.parameters.iter().find(|p| p.position == Some(index))
    }
}

/// Bound values keyed by full name. Presence flags bind to an empty
/// string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoundParameters {
    values: BTreeMap<String, String>,
}

impl BoundParameters {
    pub fn get(&self, full_name: &str) -> Option<&str> {
        self.values.get(full_name).map(String::as_str)
    }

    pub fn positional(&self, index: usize) -> Option<&str> {
        self.get(&index.to_string())
    }

    pub fn has_flag(&self, full_name: &str) -> bool {
        self.values.contains_key(full_name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn insert(&mut self, parameter: &ParameterInformation, value: impl Into<String>) {
        self.values.insert(parameter.full_name.clone(), value.into());
    }
}

/// Bind `tokens` against `schema`.
///
/// `piped` is the previous pipeline stage's output. It fills positional 0
/// before any token is looked at and is never read as a flag.
pub fn bind(
    schema: &ParameterSchema,
    piped: Option<&str>,
    tokens: &[String],
) -> ShellResult<BoundParameters> {
    let mut bound = BoundParameters::default();
    let mut next_position = 0;

    if let Some(value) = piped {
        bind_positional(schema, &mut bound, &mut next_position, value)?;
    }

    let mut iter = tokens.iter();
    while let Some(token) = iter.next() {
        let named = if let Some(name) = token.strip_prefix("--") {
            Some(schema.by_full_name(name))
        } else if let Some(name) = token.strip_prefix('-').filter(|n| !n.is_empty()) {
            Some(schema.by_short_name(name))
        } else {
            None
        };

        match named {
            Some(Some(parameter)) if parameter.expects_value() => {
                match iter.next().filter(|value| !value.starts_with('-')) {
                    Some(value) => bound.insert(parameter, value.as_str()),
                    None => return Err(ShellError::missing_parameter_value(token)),
                }
            }
            Some(Some(parameter)) => bound.insert(parameter, ""),
            Some(None) => return Err(ShellError::unknown_parameter(token)),
            None => bind_positional(schema, &mut bound, &mut next_position, token)?,
        }
    }

    if let Some(missing) = schema
        .iter()
        .find(|p| p.is_required() && !bound.has_flag(&p.full_name))
    {
        return Err(ShellError::missing_required_parameter(missing.display_name()));
    }

    Ok(bound)
}

fn bind_positional(
    schema: &ParameterSchema,
    bound: &mut BoundParameters,
    next_position: &mut usize,
    value: &str,
) -> ShellResult<()> {
    let parameter = schema
        .at_position(*next_position)
        .ok_or_else(|| ShellError::unexpected_argument(value))?;
    bound.insert(parameter, value);
    *next_position += 1;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn path_schema() -> ParameterSchema {
        ParameterSchema::new()
            .with(ParameterInformation::positional(0, "path", true))
            .with(ParameterInformation::flag("recursive", "r", "recurse"))
    }

    #[test]
    fn binds_positional_and_flag() {
        let bound = bind(&path_schema(), None, &tokens(&["foo", "-r"])).unwrap();
        assert_eq!(bound.positional(0), Some("foo"));
        assert!(bound.has_flag("recursive"));
        assert_eq!(bound.get("recursive"), Some(""));

        let bound = bind(&path_schema(), None, &tokens(&["--recursive", "foo"])).unwrap();
        assert_eq!(bound.positional(0), Some("foo"));
        assert!(bound.has_flag("recursive"));
    }

    #[test]
    fn flag_alone_misses_required_positional() {
        assert_eq!(
            bind(&path_schema(), None, &tokens(&["-r"])),
            Err(ShellError::missing_required_parameter("[0]"))
        );
    }

    #[test]
    fn unknown_parameters_fail() {
        assert_eq!(
            bind(&path_schema(), None, &tokens(&["foo", "--force"])),
            Err(ShellError::unknown_parameter("--force"))
        );
        assert_eq!(
            bind(&path_schema(), None, &tokens(&["-x", "foo"])),
            Err(ShellError::unknown_parameter("-x"))
        );
    }

    #[test]
    fn extra_positional_fails() {
        assert_eq!(
            bind(&path_schema(), None, &tokens(&["a", "b"])),
            Err(ShellError::unexpected_argument("b"))
        );
    }

    #[test]
    fn options_consume_their_value() {
        let schema = ParameterSchema::new()
            .with(ParameterInformation::option("format", "f", "format", false))
            .with(ParameterInformation::flag("utc", "u", "utc"));

        let bound = bind(&schema, None, &tokens(&["-f", "%H:%M", "-u"])).unwrap();
        assert_eq!(bound.get("format"), Some("%H:%M"));
        assert!(bound.has_flag("utc"));

        assert_eq!(
            bind(&schema, None, &tokens(&["--format"])),
            Err(ShellError::missing_parameter_value("--format"))
        );
        assert_eq!(
            bind(&schema, None, &tokens(&["-f", "-u"])),
            Err(ShellError::missing_parameter_value("-f"))
        );
    }

    #[test]
    fn piped_value_fills_first_positional() {
        let schema = ParameterSchema::new()
            .with(ParameterInformation::positional(0, "text", false))
            .with(ParameterInformation::positional(1, "more", false));

        let bound = bind(&schema, Some("-r"), &tokens(&["next"])).unwrap();
        assert_eq!(bound.positional(0), Some("-r"));
        assert_eq!(bound.positional(1), Some("next"));

        let none = ParameterSchema::new();
        assert_eq!(
            bind(&none, Some("hi"), &[]),
            Err(ShellError::unexpected_argument("hi"))
        );
    }

    #[test]
    fn lone_dash_is_positional() {
        let bound = bind(&path_schema(), None, &tokens(&["-"])).unwrap();
        assert_eq!(bound.positional(0), Some("-"));
    }

    #[test]
    fn schema_skips_colliding_names() {
        let schema = ParameterSchema::new()
            .with(ParameterInformation::flag("recursive", "r", "first"))
            .with(ParameterInformation::flag("remote", "r", "second"))
            .with(ParameterInformation::flag("recursive", "R", "third"));
        assert_eq!(schema.len(), 1);
        assert_eq!(schema.by_short_name("r").map(|p| p.description()), Some("first"));
    }

    #[test]
    fn display_names() {
        assert_eq!(ParameterInformation::positional(2, "x", false).display_name(), "[2]");
        assert_eq!(
            ParameterInformation::flag("long", "l", "x").display_name(),
            "--long -l"
        );
        assert!(ParameterInformation::positional(0, "x", true).is_required());
        assert!(!ParameterInformation::flag("long", "l", "x").expects_value());
    }
}
