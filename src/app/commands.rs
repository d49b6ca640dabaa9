//! Chat command parser.
//!
//! Recognises `<prefix><setmode> [token]` (by default `!setmode random`).
//! The command word is case-insensitive; anything else is not a command.

use crate::config::CommandConfig;
use crate::engine::mode::Mode;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedCommand {
    /// Switch the assignment mode. `token` is the raw first argument.
    SetMode { token: Option<String> },
}

/// Parse a chat message into a [`ParsedCommand`].
///
/// Returns `None` if the message does not start with the command prefix or
/// names an unknown command.
pub fn parse_command(input: &str, cfg: &CommandConfig) -> Option<ParsedCommand> {
    let rest = input.strip_prefix(cfg.prefix.as_str())?;
    let mut parts = rest.split_whitespace();
    let cmd = parts.next()?.to_lowercase();

    if cmd == cfg.setmode.to_lowercase() {
        let token = parts.next().map(|s| s.to_string());
        Some(ParsedCommand::SetMode { token })
    } else {
        None
    }
}

/// Usage text for the mode command.
pub fn setmode_usage(cfg: &CommandConfig) -> String {
    let cmd = format!("{}{}", cfg.prefix, cfg.setmode);
    format!(
        "`{cmd} 0` or `{cmd} random`: random mode\n`{cmd} 1` or `{cmd} name`: display-name mode",
        cmd = cmd
    )
}

/// Reply for a missing mode argument. Also serves as the status report.
pub fn setmode_help(cfg: &CommandConfig, current: Mode) -> String {
    format!(
        "Please specify a mode (current: **{}**).\n{}",
        current,
        setmode_usage(cfg)
    )
}
