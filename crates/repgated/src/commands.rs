//! Line commands read from stdin

use repgate_util::PresetId;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Start the named workout preset
    Start(PresetId),
    Complete,
    Cancel,
    Lock,
    Status,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandParseError {
    #[error("empty command")]
    Empty,

    #[error("unknown command '{0}' (try: start <preset>, complete, cancel, lock, status, quit)")]
    Unknown(String),

    #[error("'start' needs a workout preset id")]
    MissingPreset,

    #[error("'{command}' takes no arguments")]
    UnexpectedArgument { command: String },
}

impl FromStr for Command {
    type Err = CommandParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return Err(CommandParseError::Empty);
        };
        let verb = verb.to_lowercase();
        let rest: Vec<&str> = words.collect();

        if verb == "start" {
            return match rest.as_slice() {
                [preset] => Ok(Command::Start(PresetId::new(*preset))),
                [] => Err(CommandParseError::MissingPreset),
                _ => Err(CommandParseError::UnexpectedArgument { command: verb }),
            };
        }

        let command = match verb.as_str() {
            "complete" | "done" => Command::Complete,
            "cancel" => Command::Cancel,
            "lock" => Command::Lock,
            "status" => Command::Status,
            "quit" | "exit" => Command::Quit,
            _ => return Err(CommandParseError::Unknown(verb)),
        };

        if !rest.is_empty() {
            return Err(CommandParseError::UnexpectedArgument { command: verb });
        }
        Ok(command)
    }
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Start(_) => "start",
            Command::Complete => "complete",
            Command::Cancel => "cancel",
            Command::Lock => "lock",
            Command::Status => "status",
            Command::Quit => "quit",
        }
    }
}
