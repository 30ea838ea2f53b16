use subspace_sdk::ShellResult;

use super::required;
use crate::params::{BoundParameters, ParameterInformation, ParameterSchema};
use crate::program::{ExecContext, Program, ProgramSchema};

pub struct Echo {
    schema: ProgramSchema,
}

impl Echo {
    pub fn new() -> Self {
        Self {
            schema: ProgramSchema::new(
                "echo",
                "Print the given text.",
                ParameterSchema::new().with(ParameterInformation::positional(
                    0,
                    "Text to print; quote it to keep spaces.",
                    false,
                )),
            ),
        }
    }
}

impl Program for Echo {
    fn schema(&self) -> &ProgramSchema {
        &self.schema
    }

    fn execute(&self, _ctx: &mut ExecContext<'_>, params: &BoundParameters) -> ShellResult<String> {
        Ok(params.positional(0).unwrap_or_default().to_string())
    }
}

pub struct Cat {
    schema: ProgramSchema,
}

impl Cat {
    pub fn new() -> Self {
        Self {
            schema: ProgramSchema::new(
                "cat",
                "Print the contents of a file, following links.",
                ParameterSchema::new().with(ParameterInformation::positional(
                    0,
                    "Path of the file to print.",
                    true,
                )),
            ),
        }
    }
}

impl Program for Cat {
    fn schema(&self) -> &ProgramSchema {
        &self.schema
    }

    fn execute(&self, ctx: &mut ExecContext<'_>, params: &BoundParameters) -> ShellResult<String> {
        let path = ctx.resolve(required(params, 0)?)?;
        ctx.tree.read_file(&path)
    }
}
