use subspace_sdk::ShellResult;

use super::required;
use crate::help::{format_manual, format_program_list};
use crate::params::{BoundParameters, ParameterInformation, ParameterSchema};
use crate::program::{ExecContext, Program, ProgramSchema};

pub struct Manual {
    schema: ProgramSchema,
}

impl Manual {
    pub fn new() -> Self {
        Self {
            schema: ProgramSchema::new(
                "man",
                "Show the manual of a program.",
                ParameterSchema::new().with(ParameterInformation::positional(
                    0,
                    "Name of the program to describe.",
                    true,
                )),
            ),
        }
    }
}

impl Program for Manual {
    fn schema(&self) -> &ProgramSchema {
        &self.schema
    }

    fn execute(&self, ctx: &mut ExecContext<'_>, params: &BoundParameters) -> ShellResult<String> {
        let target = ctx.registry.lookup(required(params, 0)?)?;
        Ok(format_manual(target.schema()))
    }
}

pub struct Help {
    schema: ProgramSchema,
}

impl Help {
    pub fn new() -> Self {
        Self {
            schema: ProgramSchema::new(
                "help",
                "List every available program.",
                ParameterSchema::new(),
            ),
        }
    }
}

impl Program for Help {
    fn schema(&self) -> &ProgramSchema {
        &self.schema
    }

    fn execute(&self, ctx: &mut ExecContext<'_>, _params: &BoundParameters) -> ShellResult<String> {
        Ok(format_program_list(ctx.registry))
    }
}

pub struct UserAdd {
    schema: ProgramSchema,
}

impl UserAdd {
    pub fn new() -> Self {
        Self {
            schema: ProgramSchema::new(
                "useradd",
                "Create a user with a home directory under /home.",
                ParameterSchema::new().with(ParameterInformation::positional(
                    0,
                    "Name of the new user.",
                    true,
                )),
            ),
        }
    }
}

impl Program for UserAdd {
    fn schema(&self) -> &ProgramSchema {
        &self.schema
    }

    fn execute(&self, ctx: &mut ExecContext<'_>, params: &BoundParameters) -> ShellResult<String> {
        ctx.users.create_user(ctx.tree, required(params, 0)?)?;
        Ok(String::new())
    }
}

pub struct WhoAmI {
    schema: ProgramSchema,
}

impl WhoAmI {
    pub fn new() -> Self {
        Self {
            schema: ProgramSchema::new(
                "whoami",
                "Print the name of the current user.",
                ParameterSchema::new(),
            ),
        }
    }
}

impl Program for WhoAmI {
    fn schema(&self) -> &ProgramSchema {
        &self.schema
    }

    fn execute(&self, ctx: &mut ExecContext<'_>, _params: &BoundParameters) -> ShellResult<String> {
        Ok(ctx.user.name().to_string())
    }
}
