//! Stdin compose control: slash commands and message composition.

use thiserror::Error;

use crate::application::services::markup::{code_block_markup, paragraph_markup};
use crate::domain::TopicId;

const FENCE: &str = "```";

/// A slash command typed into the compose control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Copy a whole message.
    Copy {
        /// 1-based message number, as shown in the transcript.
        index: usize,
    },
    /// Copy one code block of a message.
    CopyCode {
        /// 1-based message number.
        index: usize,
        /// 1-based code block number within the message.
        block: usize,
    },
    /// Toggle expansion of a message.
    Expand {
        /// 1-based message number.
        index: usize,
    },
    /// Jump to the latest message.
    Bottom,
    /// Switch to another topic.
    Topic(TopicId),
    /// Reload topic metadata and the feed.
    Refresh,
    /// Resend the kept draft after a failed send.
    Retry,
    /// Dismiss the current notification.
    Dismiss,
    /// Print the command list.
    Help,
    /// Leave the room.
    Quit,
}

/// A slash command line that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// No such command.
    #[error("unknown command: /{0}")]
    Unknown(String),
    /// Missing or malformed arguments; carries the usage line.
    #[error("usage: {0}")]
    Usage(&'static str),
}

/// Lines printed by `/help`.
pub const HELP: &[&str] = &[
    "/copy <n>            copy message n",
    "/copycode <n> <k>    copy code block k of message n",
    "/expand <n>          show more or less of message n",
    "/bottom              jump to the latest message",
    "/topic <id>          switch topic",
    "/refresh             reload topic and messages",
    "/retry               resend the kept draft",
    "/dismiss             dismiss the current notification",
    "/quit                leave",
    "```                  start or end a code block",
];

/// Parses a slash command line (including the leading `/`).
///
/// # Errors
/// Returns [`CommandError`] for unknown commands or bad arguments.
pub fn parse_command(line: &str) -> Result<Command, CommandError> {
    let mut parts = line.trim().trim_start_matches('/').split_whitespace();
    let name = parts.next().unwrap_or_default();
    let args: Vec<&str> = parts.collect();

    let number = |i: usize, usage: &'static str| -> Result<usize, CommandError> {
        args.get(i)
            .and_then(|s| s.parse::<usize>().ok())
            .ok_or(CommandError::Usage(usage))
    };

    match name {
        "copy" => Ok(Command::Copy {
            index: number(0, "/copy <n>")?,
        }),
        "copycode" => Ok(Command::CopyCode {
            index: number(0, "/copycode <n> <k>")?,
            block: number(1, "/copycode <n> <k>")?,
        }),
        "expand" => Ok(Command::Expand {
            index: number(0, "/expand <n>")?,
        }),
        "bottom" => Ok(Command::Bottom),
        "topic" => {
            let id = args
                .first()
                .and_then(|s| s.parse::<u64>().ok())
                .ok_or(CommandError::Usage("/topic <id>"))?;
            Ok(Command::Topic(TopicId(id)))
        }
        "refresh" => Ok(Command::Refresh),
        "retry" => Ok(Command::Retry),
        "dismiss" => Ok(Command::Dismiss),
        "help" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        other => Err(CommandError::Unknown(other.to_string())),
    }
}

/// Result of feeding one input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComposeStep {
    /// Nothing to do yet (blank line or inside a code block).
    Pending,
    /// Editor markup ready to send.
    Ready(String),
    /// A parsed slash command.
    Command(Command),
    /// A slash line that did not parse.
    Invalid(CommandError),
}

/// Turns stdin lines into editor markup. Lines between fences become one
/// code block; any other line is one paragraph message.
#[derive(Debug, Default)]
pub struct Composer {
    code: Option<Vec<String>>,
}

impl Composer {
    /// Creates a composer outside any code block.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether an opening fence is waiting for its close.
    #[must_use]
    pub const fn in_code_block(&self) -> bool {
        self.code.is_some()
    }

    /// Consumes one stdin line.
    pub fn feed(&mut self, line: &str) -> ComposeStep {
        if let Some(code) = self.code.as_mut() {
            if line.trim_end() == FENCE {
                let source = code.join("\n");
                self.code = None;
                return if source.trim().is_empty() {
                    ComposeStep::Pending
                } else {
                    ComposeStep::Ready(code_block_markup(&source))
                };
            }
            code.push(line.to_string());
            return ComposeStep::Pending;
        }

        if line.trim_start().starts_with(FENCE) {
            self.code = Some(Vec::new());
            return ComposeStep::Pending;
        }
        if line.starts_with('/') {
            return match parse_command(line) {
                Ok(command) => ComposeStep::Command(command),
                Err(e) => ComposeStep::Invalid(e),
            };
        }
        if line.trim().is_empty() {
            return ComposeStep::Pending;
        }
        ComposeStep::Ready(paragraph_markup(line))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("/copy 2", Command::Copy { index: 2 } ; "copy")]
    #[test_case("/copycode 3 1", Command::CopyCode { index: 3, block: 1 } ; "copycode")]
    #[test_case("/expand 1", Command::Expand { index: 1 } ; "expand")]
    #[test_case("/topic 42", Command::Topic(TopicId(42)) ; "topic")]
    #[test_case("/bottom", Command::Bottom ; "bottom")]
    #[test_case("/exit", Command::Quit ; "exit_alias")]
    fn test_parse_command(line: &str, expected: Command) {
        assert_eq!(parse_command(line), Ok(expected));
    }

    #[test]
    fn test_parse_command_errors() {
        assert_eq!(
            parse_command("/copy"),
            Err(CommandError::Usage("/copy <n>"))
        );
        assert_eq!(
            parse_command("/nope"),
            Err(CommandError::Unknown("nope".to_string()))
        );
    }

    #[test]
    fn test_plain_line_is_paragraph() {
        let mut composer = Composer::new();
        assert_eq!(
            composer.feed("a < b"),
            ComposeStep::Ready("<p>a &lt; b</p>".to_string())
        );
        assert_eq!(composer.feed("   "), ComposeStep::Pending);
    }

    #[test]
    fn test_fenced_block_is_code_markup() {
        let mut composer = Composer::new();
        assert_eq!(composer.feed("```python"), ComposeStep::Pending);
        assert!(composer.in_code_block());
        assert_eq!(composer.feed("def f():"), ComposeStep::Pending);
        assert_eq!(composer.feed("    return 1"), ComposeStep::Pending);
        assert_eq!(
            composer.feed("```"),
            ComposeStep::Ready(code_block_markup("def f():\n    return 1"))
        );
        assert!(!composer.in_code_block());
    }

    #[test]
    fn test_commands_are_literal_inside_code() {
        let mut composer = Composer::new();
        composer.feed("```");
        assert_eq!(composer.feed("/quit"), ComposeStep::Pending);
        assert_eq!(
            composer.feed("```"),
            ComposeStep::Ready(code_block_markup("/quit"))
        );
    }

    #[test]
    fn test_empty_fence_sends_nothing() {
        let mut composer = Composer::new();
        composer.feed("```");
        assert_eq!(composer.feed("```"), ComposeStep::Pending);
    }
}
