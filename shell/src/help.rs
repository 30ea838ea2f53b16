//! Rendering of program manuals and the program list.

use crate::params::ParameterInformation;
use crate::program::{ProgramRegistry, ProgramSchema};

/// The program's description followed by one line per parameter.
pub fn format_manual(schema: &ProgramSchema) -> String {
    let mut out = String::new();
    out.push_str(schema.description());
    for parameter in schema.parameters().iter() {
        out.push('\n');
        out.push_str(&format_parameter(parameter));
    }
    out
}

/// `[0] : description` or `--full -short : description`.
pub fn format_parameter(parameter: &ParameterInformation) -> String {
    format!("{} : {}", parameter.display_name(), parameter.description())
}

pub fn format_program_list(registry: &ProgramRegistry) -> String {
    let width = registry.names().map(str::len).max().unwrap_or(0);
    registry
        .iter()
        .map(|p| {
            format!(
                "{:width$}  {}",
                p.command(),
                p.schema().description(),
                width = width
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ParameterSchema;

    #[test]
    fn manual_lists_parameters_in_order() {
        let schema = ProgramSchema::new(
            "mkdir",
            "Create a directory.",
            ParameterSchema::new()
                .with(ParameterInformation::positional(0, "Directory to create.", true))
                .with(ParameterInformation::flag("recursive", "r", "Create parents.")),
        );
        assert_eq!(
            format_manual(&schema),
            "Create a directory.\n[0] : Directory to create.\n--recursive -r : Create parents."
        );
    }

    #[test]
    fn manual_without_parameters_is_description() {
        let schema = ProgramSchema::new("pwd", "Print the working directory.", ParameterSchema::new());
        assert_eq!(format_manual(&schema), "Print the working directory.");
    }
}
