use subspace_core::path::strip_wildcard;
use subspace_core::{Listing, VirtualPath};
use subspace_sdk::{ContentSource, FileEntry, ShellError, ShellResult};

use super::required;
use crate::params::{BoundParameters, ParameterInformation, ParameterSchema};
use crate::program::{ExecContext, Program, ProgramSchema};

fn recursive_flag(description: &str) -> ParameterInformation {
    ParameterInformation::flag("recursive", "r", description)
}

pub struct MakeDirectory {
    schema: ProgramSchema,
}

impl MakeDirectory {
    pub fn new() -> Self {
        Self {
            schema: ProgramSchema::new(
                "mkdir",
                "Create a directory.",
                ParameterSchema::new()
                    .with(ParameterInformation::positional(0, "Path of the directory to create.", true))
                    .with(recursive_flag("Create missing parent directories as well.")),
            ),
        }
    }
}

impl Program for MakeDirectory {
    fn schema(&self) -> &ProgramSchema {
        &self.schema
    }

    fn execute(&self, ctx: &mut ExecContext<'_>, params: &BoundParameters) -> ShellResult<String> {
        let path = ctx.resolve(required(params, 0)?)?;
        ctx.tree.create_directory(&path, params.has_flag("recursive"))?;
        Ok(String::new())
    }
}

pub struct Remove {
    schema: ProgramSchema,
}

impl Remove {
    pub fn new() -> Self {
        Self {
            schema: ProgramSchema::new(
                "rm",
                "Remove a file, or a directory when the name has no extension.",
                ParameterSchema::new()
                    .with(ParameterInformation::positional(0, "Path of the file or directory to remove.", true))
                    .with(recursive_flag("Remove a directory together with everything below it.")),
            ),
        }
    }
}

impl Program for Remove {
    fn schema(&self) -> &ProgramSchema {
        &self.schema
    }

    fn execute(&self, ctx: &mut ExecContext<'_>, params: &BoundParameters) -> ShellResult<String> {
        let path = ctx.resolve(required(params, 0)?)?;
        ctx.tree.remove_file(&path, params.has_flag("recursive"))?;
        // Anyone standing inside the removed directory is moved out of it.
        ctx.users.repair_working_directories(ctx.tree);
        Ok(String::new())
    }
}

pub struct Touch {
    schema: ProgramSchema,
}

impl Touch {
    pub fn new() -> Self {
        Self {
            schema: ProgramSchema::new(
                "touch",
                "Create an empty file.",
                ParameterSchema::new()
                    .with(ParameterInformation::positional(0, "Path of the file to create.", true))
                    .with(recursive_flag("Create missing parent directories as well.")),
            ),
        }
    }
}

impl Program for Touch {
    fn schema(&self) -> &ProgramSchema {
        &self.schema
    }

    fn execute(&self, ctx: &mut ExecContext<'_>, params: &BoundParameters) -> ShellResult<String> {
        let path = ctx.resolve(required(params, 0)?)?;
        ctx.tree.create_file(&path, params.has_flag("recursive"))?;
        Ok(String::new())
    }
}

pub struct Link {
    schema: ProgramSchema,
}

impl Link {
    pub fn new() -> Self {
        Self {
            schema: ProgramSchema::new(
                "ln",
                "Create a file that links to another file.",
                ParameterSchema::new()
                    .with(ParameterInformation::positional(0, "The file to link to.", true))
                    .with(ParameterInformation::positional(1, "Path of the link to create.", true))
                    .with(ParameterInformation::flag(
                        "remote",
                        "R",
                        "Treat the target as a host:/path address on another machine.",
                    )),
            ),
        }
    }
}

impl Program for Link {
    fn schema(&self) -> &ProgramSchema {
        &self.schema
    }

    fn execute(&self, ctx: &mut ExecContext<'_>, params: &BoundParameters) -> ShellResult<String> {
        let target = required(params, 0)?;
        let link = ctx.resolve(required(params, 1)?)?;

        let (target, source) = if params.has_flag("remote") {
            match target.split_once(':') {
                Some((host, path)) if !host.is_empty() && path.starts_with('/') => {
                    (target.to_string(), ContentSource::RemoteLink)
                }
                _ => {
                    return Err(ShellError::invalid_parameter_value(
                        "[0]",
                        format!("remote target '{}' must look like host:/path", target),
                    ))
                }
            }
        } else {
            (ctx.resolve(target)?.to_string(), ContentSource::LocalLink)
        };

        ctx.tree.create_link(&link, &target, source)?;
        Ok(String::new())
    }
}

pub struct List {
    schema: ProgramSchema,
}

impl List {
    pub fn new() -> Self {
        Self {
            schema: ProgramSchema::new(
                "ls",
                "List a directory, everything below it and the files they hold.",
                ParameterSchema::new()
                    .with(ParameterInformation::positional(
                        0,
                        "Directory to list; defaults to the working directory. A trailing * lists only what is below it.",
                        false,
                    ))
                    .with(ParameterInformation::flag(
                        "long",
                        "l",
                        "Show source, size and modification time for each file.",
                    )),
            ),
        }
    }
}

impl Program for List {
    fn schema(&self) -> &ProgramSchema {
        &self.schema
    }

    fn execute(&self, ctx: &mut ExecContext<'_>, params: &BoundParameters) -> ShellResult<String> {
        let (base, wildcard) = strip_wildcard(params.positional(0).unwrap_or("."));
        let directory = if base.is_empty() {
            ctx.working_directory()?.clone()
        } else {
            ctx.resolve(base)?
        };
        if !ctx.tree.contains_directory(&directory) {
            return Err(ShellError::directory_not_found(directory.as_str()));
        }

        let listing = ctx.tree.list_directories(&directory, wildcard);
        Ok(format_listing(&listing, params.has_flag("long")))
    }
}

/// Directory paths first, then (after a blank line) the full path of
/// every file they hold.
fn format_listing(listing: &Listing, long: bool) -> String {
    let mut lines: Vec<String> = listing.keys().map(ToString::to_string).collect();

    let files: Vec<String> = listing
        .iter()
        .flat_map(|(dir, files)| files.iter().map(move |f| format_file(dir, f, long)))
        .collect();
    if !files.is_empty() {
        lines.push(String::new());
        lines.extend(files);
    }

    lines.join("\n")
}

fn format_file(directory: &VirtualPath, file: &FileEntry, long: bool) -> String {
    let path = if directory.is_root() {
        format!("/{}", file.name)
    } else {
        format!("{}/{}", directory, file.name)
    };
    if long {
        format!(
            "{:<6} {:>6} {} {}",
            file.source.as_str(),
            file.size(),
            file.modified.format("%Y-%m-%d %H:%M:%S"),
            path
        )
    } else {
        path
    }
}

pub struct ChangeDirectory {
    schema: ProgramSchema,
}

impl ChangeDirectory {
    pub fn new() -> Self {
        Self {
            schema: ProgramSchema::new(
                "cd",
                "Change the working directory.",
                ParameterSchema::new().with(ParameterInformation::positional(
                    0,
                    "Directory to move to; defaults to your home directory.",
                    false,
                )),
            ),
        }
    }
}

impl Program for ChangeDirectory {
    fn schema(&self) -> &ProgramSchema {
        &self.schema
    }

    fn execute(&self, ctx: &mut ExecContext<'_>, params: &BoundParameters) -> ShellResult<String> {
        let target = match params.positional(0) {
            Some(raw) => ctx.resolve(raw)?,
            None => ctx.users.home_directory(ctx.user)?.clone(),
        };
        ctx.users.set_working_directory(ctx.tree, ctx.user, target)?;
        Ok(String::new())
    }
}

pub struct PrintWorkingDirectory {
    schema: ProgramSchema,
}

impl PrintWorkingDirectory {
    pub fn new() -> Self {
        Self {
            schema: ProgramSchema::new(
                "pwd",
                "Print the working directory.",
                ParameterSchema::new(),
            ),
        }
    }
}

impl Program for PrintWorkingDirectory {
    fn schema(&self) -> &ProgramSchema {
        &self.schema
    }

    fn execute(&self, ctx: &mut ExecContext<'_>, _params: &BoundParameters) -> ShellResult<String> {
        Ok(ctx.working_directory()?.to_string())
    }
}
