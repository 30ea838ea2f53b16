use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};
use std::borrow::Cow;
use subspace_core::path::resolve_relative;
use subspace_core::{User, VirtualPath};
use subspace_shell::ShellSession;

/// Tab completion for program names and virtual paths.
///
/// Holds a snapshot of the session taken before each prompt, since the
/// editor owns the helper while the REPL owns the session.
pub struct SubspaceHelper {
    programs: Vec<String>,
    cwd: VirtualPath,
    entries: Vec<(VirtualPath, bool)>,
}

impl SubspaceHelper {
    pub fn new(session: &ShellSession, user: &User) -> Self {
        let mut helper = Self {
            programs: session.registry().names().map(str::to_string).collect(),
            cwd: VirtualPath::root(),
            entries: Vec::new(),
        };
        helper.refresh(session, user);
        helper
    }

    /// Re-read the working directory and the tree.
    pub fn refresh(&mut self, session: &ShellSession, user: &User) {
        self.cwd = session
            .users()
            .working_directory(user)
            .cloned()
            .unwrap_or_else(|_| VirtualPath::root());

        self.entries.clear();
        for (dir, files) in session.tree().list_directories(&VirtualPath::root(), false) {
            for file in &files {
                if let Ok(path) = dir.join(&file.name) {
                    self.entries.push((path, false));
                }
            }
            if !dir.is_root() {
                self.entries.push((dir, true));
            }
        }
    }

    fn complete_path(&self, word: &str) -> Vec<Pair> {
        let (dir_part, partial) = match word.rfind('/') {
            Some(i) => (&word[..=i], &word[i + 1..]),
            None => ("", word),
        };
        let dir = if dir_part.is_empty() {
            self.cwd.clone()
        } else {
            match resolve_relative(&self.cwd, dir_part) {
                Ok(dir) => dir,
                Err(_) => return vec![],
            }
        };

        let mut names: Vec<String> = self
            .entries
            .iter()
            .filter(|(path, _)| path.parent().as_ref() == Some(&dir))
            .filter_map(|(path, is_dir)| {
                let name = path.file_name()?;
                name.starts_with(partial).then(|| {
                    if *is_dir {
                        format!("{name}/")
                    } else {
                        name.to_string()
                    }
                })
            })
            .collect();
        names.sort();

        names
            .into_iter()
            .map(|name| Pair {
                replacement: format!("{dir_part}{name}"),
                display: name,
            })
            .collect()
    }
}

impl Completer for SubspaceHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line_to_cursor = &line[..pos];

        let (start, word) = find_word_start(line_to_cursor);

        let before = line_to_cursor[..start].trim_end();
        let is_command_position = before.is_empty() || before.ends_with('|');

        let mut completions = Vec::new();

        if is_command_position {
            for program in &self.programs {
                if program.starts_with(word) {
                    completions.push(Pair {
                        display: program.clone(),
                        replacement: program.clone(),
                    });
                }
            }
        } else if !word.starts_with('-') {
            completions = self.complete_path(word);
        }

        Ok((start, completions))
    }
}

fn find_word_start(line: &str) -> (usize, &str) {
    let mut start = line.len();
    for (i, c) in line.char_indices().rev() {
        if c.is_whitespace() || c == '|' || c == '>' {
            break;
        }
        start = i;
    }
    (start, &line[start..])
}

impl Hinter for SubspaceHelper {
    type Hint = String;

    fn hint(&self, _line: &str, _pos: usize, _ctx: &Context<'_>) -> Option<String> {
        None
    }
}

impl Highlighter for SubspaceHelper {
    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Cow::Borrowed(hint)
    }
}

impl Validator for SubspaceHelper {}

impl Helper for SubspaceHelper {}
