//! Command requests and replies as seen by plugins.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// A parsed control-channel command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandRequest {
    /// Upper-cased command verb, e.g. `RETR`.
    pub command: String,
    /// Argument following the verb, if any.
    pub argument: Option<String>,
}

impl CommandRequest {
    /// Creates a request from a verb and optional argument.
    pub fn new(command: &str, argument: Option<&str>) -> Self {
        Self {
            command: command.to_ascii_uppercase(),
            argument: argument.map(str::to_string),
        }
    }

    /// Parses a raw command line such as `"RETR report.csv"`.
    ///
    /// The verb is separated from the argument by the first space; a blank
    /// argument is treated as absent.
    pub fn parse(line: &str) -> Result<Self, AppError> {
        let line = line.trim_end_matches(['\r', '\n']);
        let (command, argument) = match line.split_once(' ') {
            Some((command, argument)) => (command, Some(argument.trim())),
            None => (line, None),
        };

        let command = command.trim();
        if command.is_empty() {
            return Err(AppError::validation("Empty command line"));
        }

        Ok(Self::new(command, argument.filter(|a| !a.is_empty())))
    }

    /// Returns true when the verb matches `command`, ignoring case.
    pub fn is(&self, command: &str) -> bool {
        self.command.eq_ignore_ascii_case(command)
    }
}

impl std::fmt::Display for CommandRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.argument {
            Some(argument) => write!(f, "{} {}", self.command, argument),
            None => write!(f, "{}", self.command),
        }
    }
}

/// The reply the engine sent for a command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    /// Three-digit reply code.
    pub code: u16,
    /// Reply text.
    pub message: String,
}

impl Reply {
    /// Creates a reply.
    pub fn new(code: u16, message: &str) -> Self {
        Self {
            code,
            message: message.to_string(),
        }
    }

    /// Positive completion, intermediate, or preliminary replies (below 400).
    pub fn is_positive(&self) -> bool {
        self.code < 400
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_argument() {
        let request = CommandRequest::parse("retr report.csv\r\n").expect("parse");
        assert_eq!(request.command, "RETR");
        assert_eq!(request.argument.as_deref(), Some("report.csv"));
        assert!(request.is("Retr"));
        assert_eq!(request.to_string(), "RETR report.csv");
    }

    #[test]
    fn test_parse_keeps_spaces_inside_argument() {
        let request = CommandRequest::parse("STOR my file.txt").expect("parse");
        assert_eq!(request.argument.as_deref(), Some("my file.txt"));
    }

    #[test]
    fn test_parse_without_argument() {
        let request = CommandRequest::parse("PWD").expect("parse");
        assert_eq!(request.command, "PWD");
        assert_eq!(request.argument, None);

        let request = CommandRequest::parse("NOOP ").expect("parse");
        assert_eq!(request.argument, None);
    }

    #[test]
    fn test_parse_empty_line() {
        let err = CommandRequest::parse("\r\n").expect_err("empty");
        assert_eq!(err.kind, crate::error::ErrorKind::Validation);
    }

    #[test]
    fn test_reply_is_positive() {
        assert!(Reply::new(226, "Transfer complete").is_positive());
        assert!(!Reply::new(550, "File unavailable").is_positive());
    }
}
