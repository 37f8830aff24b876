//! REPL input parsing.

use std::path::PathBuf;

/// Slash commands offered for completion and hints.
pub const COMMANDS: &[&str] = &[
    "/login", "/signup", "/logout", "/whoami", "/list", "/new", "/select", "/upload", "/sidebar",
    "/help",
];

/// One line of REPL input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Login,
    Signup,
    Logout,
    WhoAmI,
    List,
    New,
    Select(i64),
    Upload(PathBuf),
    Sidebar,
    Help,
    Quit,
    /// Plain text for the selected conversation.
    Send(String),
    /// A malformed slash command, with the reason.
    Invalid(String),
}

impl Command {
    /// Parses a trimmed, non-empty line.
    pub fn parse(line: &str) -> Self {
        if line == "quit" || line == "exit" {
            return Self::Quit;
        }
        if !line.starts_with('/') {
            return Self::Send(line.to_string());
        }

        let (name, args) = match line.split_once(char::is_whitespace) {
            Some((name, args)) => (name, args.trim()),
            None => (line, ""),
        };

        match name {
            "/login" => Self::Login,
            "/signup" => Self::Signup,
            "/logout" => Self::Logout,
            "/whoami" => Self::WhoAmI,
            "/list" => Self::List,
            "/new" => Self::New,
            "/sidebar" => Self::Sidebar,
            "/help" => Self::Help,
            "/select" => match args.parse::<i64>() {
                Ok(id) => Self::Select(id),
                Err(_) => Self::Invalid("usage: /select <conversation id>".to_string()),
            },
            "/upload" if !args.is_empty() => Self::Upload(PathBuf::from(args)),
            "/upload" => Self::Invalid("usage: /upload <path>".to_string()),
            other => Self::Invalid(format!("unknown command {other} (try /help)")),
        }
    }
}

pub fn help_text() -> &'static str {
    "\
/login            log in with email and password
/signup           create an account
/logout           forget the stored credential
/whoami           show the logged-in account
/list             list conversations
/new              start a new conversation
/select <id>      open a conversation
/upload <path>    upload a .txt or .md document for retrieval
/sidebar          show or hide the conversation list
/help             this text
quit | exit       leave
Anything else is sent as a message."
}
