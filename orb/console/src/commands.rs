//! Console Commands
//!
//! Parses one input line into a [`Command`]. Plain text is a chat message;
//! a leading `/` selects one of the slash commands. Project and todo numbers
//! are 1-based as printed by the board view.

/// One parsed input line
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Send text to the kernel as typed
    Chat(String),
    /// Save a thought
    Thought(String),
    /// Add a project
    Project(String),
    /// Add a todo to a project (0-based index)
    Todo {
        /// Target project
        project: usize,
        /// Todo text
        text: String,
    },
    /// Flip a todo (0-based indices)
    Done {
        /// Target project
        project: usize,
        /// Target todo
        todo: usize,
    },
    /// Print thoughts and the board
    Show,
    /// Print the command list
    Help,
    /// Leave the console
    Quit,
    /// Blank line
    Empty,
    /// Unusable input, with the reason to print
    Invalid(String),
}

/// Command list printed by `/help`
pub const HELP: &str = "\
Commands:
  <text>               send a chat message
  /thought <text>      save a thought
  /project <name>      add a project
  /todo <n> <text>     add a todo to project n
  /done <n> <m>        toggle todo m of project n
  /show                print thoughts and projects
  /help                show this list
  /quit                exit";

impl Command {
    /// Parse one line of input
    #[must_use]
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Self::Empty;
        }
        let Some(rest) = trimmed.strip_prefix('/') else {
            return Self::Chat(line.to_string());
        };

        let (name, args) = match rest.split_once(char::is_whitespace) {
            Some((name, args)) => (name, args.trim()),
            None => (rest, ""),
        };

        match name {
            "thought" | "t" => Self::Thought(args.to_string()),
            "project" | "p" => Self::Project(args.to_string()),
            "todo" => parse_todo(args),
            "done" => parse_done(args),
            "show" | "ls" => Self::Show,
            "help" | "?" => Self::Help,
            "quit" | "exit" | "q" => Self::Quit,
            other => Self::Invalid(format!("unknown command /{other}, try /help")),
        }
    }
}

fn parse_todo(args: &str) -> Command {
    let (number, text) = args.split_once(char::is_whitespace).unwrap_or((args, ""));
    match parse_number(number) {
        Some(project) => Command::Todo {
            project,
            text: text.trim().to_string(),
        },
        None => Command::Invalid("usage: /todo <project number> <text>".to_string()),
    }
}

fn parse_done(args: &str) -> Command {
    let mut parts = args.split_whitespace();
    let project = parts.next().and_then(parse_number);
    let todo = parts.next().and_then(parse_number);
    match (project, todo, parts.next()) {
        (Some(project), Some(todo), None) => Command::Done { project, todo },
        _ => Command::Invalid("usage: /done <project number> <todo number>".to_string()),
    }
}

/// 1-based number to 0-based index
fn parse_number(text: &str) -> Option<usize> {
    text.parse::<usize>().ok()?.checked_sub(1)
}
