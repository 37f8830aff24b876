use std::borrow::Cow::{self, Borrowed, Owned};

use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};

use crate::command::COMMANDS;

/// Argument placeholder shown as a hint once a command name is complete.
fn usage(command: &str) -> Option<&'static str> {
    match command {
        "/select" => Some(" <id>"),
        "/upload" => Some(" <path>"),
        _ => None,
    }
}

fn takes_argument(command: &str) -> bool {
    usage(command).is_some()
}

/// Completion, hints and highlighting for slash commands.
#[derive(Clone, Default)]
pub struct CliHelper;

impl CliHelper {
    pub fn new() -> Self {
        Self
    }

    fn command_name(line: &str) -> Option<&str> {
        line.starts_with('/')
            .then(|| line.split_whitespace().next().unwrap_or(line))
    }
}

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let prefix = &line[..pos];
        if !prefix.starts_with('/') || prefix.contains(' ') {
            return Ok((0, Vec::new()));
        }

        let candidates = COMMANDS
            .iter()
            .filter(|cmd| cmd.starts_with(prefix))
            .map(|cmd| Pair {
                display: cmd.to_string(),
                replacement: if takes_argument(cmd) {
                    format!("{cmd} ")
                } else {
                    cmd.to_string()
                },
            })
            .collect();
        Ok((0, candidates))
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        if pos < line.len() {
            return None;
        }
        let name = Self::command_name(line)?;

        if line.contains(' ') {
            return (line.trim_end() == name)
                .then(|| usage(name).map(|u| u.trim_start().to_string()))
                .flatten();
        }

        if let Some(placeholder) = COMMANDS.contains(&name).then(|| usage(name)).flatten() {
            return Some(placeholder.to_string());
        }
        COMMANDS
            .iter()
            .find(|cmd| cmd.starts_with(name) && cmd.len() > name.len())
            .map(|cmd| cmd[name.len()..].to_string())
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        match Self::command_name(line) {
            Some(name) if COMMANDS.contains(&name) => Owned(line.bright_cyan().to_string()),
            Some(_) => Owned(line.yellow().to_string()),
            None => Borrowed(line),
        }
    }

    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Owned(hint.bright_black().to_string())
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Validator for CliHelper {}
