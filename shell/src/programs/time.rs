use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local, Utc};
use subspace_sdk::{ShellError, ShellResult};

use crate::params::{BoundParameters, ParameterInformation, ParameterSchema};
use crate::program::{ExecContext, Program, ProgramSchema};

const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const TIME_FORMAT: &str = "%H:%M:%S";

fn utc_flag() -> ParameterInformation {
    ParameterInformation::flag("utc", "u", "Use UTC instead of local time.")
}

/// Render `time` with a strftime string. Malformed formats are rejected
/// up front since chrono only reports them while writing.
fn render(time: DateTime<Utc>, format: &str, utc: bool) -> ShellResult<String> {
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(ShellError::invalid_parameter_value(
            "--format",
            format!("'{}' is not a valid time format", format),
        ));
    }
    Ok(if utc {
        time.format(format).to_string()
    } else {
        time.with_timezone(&Local).format(format).to_string()
    })
}

pub struct Date {
    schema: ProgramSchema,
}

impl Date {
    pub fn new() -> Self {
        Self {
            schema: ProgramSchema::new(
                "date",
                "Print the current date and time.",
                ParameterSchema::new()
                    .with(utc_flag())
                    .with(ParameterInformation::option(
                        "format",
                        "f",
                        "strftime format to print with, e.g. +%Y-%m-%d.",
                        false,
                    ))
                    .with(ParameterInformation::option(
                        "reference",
                        "r",
                        "Print the modification time of this file instead of now.",
                        false,
                    )),
            ),
        }
    }
}

impl Program for Date {
    fn schema(&self) -> &ProgramSchema {
        &self.schema
    }

    fn execute(&self, ctx: &mut ExecContext<'_>, params: &BoundParameters) -> ShellResult<String> {
        let time = match params.get("reference") {
            Some(raw) => ctx.tree.file(&ctx.resolve(raw)?)?.modified,
            None => Utc::now(),
        };
        let format = params
            .get("format")
            .map_or(DEFAULT_DATE_FORMAT, |f| f.strip_prefix('+').unwrap_or(f));
        render(time, format, params.has_flag("utc"))
    }
}

pub struct Time {
    schema: ProgramSchema,
}

impl Time {
    pub fn new() -> Self {
        Self {
            schema: ProgramSchema::new(
                "time",
                "Print the current time of day.",
                ParameterSchema::new().with(utc_flag()),
            ),
        }
    }
}

impl Program for Time {
    fn schema(&self) -> &ProgramSchema {
        &self.schema
    }

    fn execute(&self, _ctx: &mut ExecContext<'_>, params: &BoundParameters) -> ShellResult<String> {
        render(Utc::now(), TIME_FORMAT, params.has_flag("utc"))
    }
}
