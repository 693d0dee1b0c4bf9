use std::path::PathBuf;

use anyhow::{anyhow, bail, Context};
use quickprint_core::{PrintSettings, Rotation, TxId};

pub const HELP: &str = "\
Commands:
  select <path>            pick a PDF and encode it
  print                    send the encoded file to the print agent
  retry <txid>             resend a failed job with the current file
  clear                    drop the selected file and any pending job
  set fit on|off           fit the page to the paper width
  set rotation 0|270       rotate the page clockwise
  set timeout <ms>         agent timeout in milliseconds
  set error-dialog on|off  let the agent show its own error dialog
  status                   show the current file and settings
  history                  list recent print jobs, newest first
  clear-history            forget all recent print jobs
  callback <url>           record an agent callback URL by hand
  help                     show this text
  quit                     leave the session";

/// One line typed in an interactive session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Select(PathBuf),
    Print,
    Retry(TxId),
    Clear,
    Set(SettingChange),
    Status,
    History,
    ClearHistory,
    Callback(String),
    Help,
    Quit,
    Empty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingChange {
    FitToWidth(bool),
    Rotation(Rotation),
    TimeoutMs(u32),
    ErrorDialog(bool),
}

impl SettingChange {
    pub fn apply(self, settings: &PrintSettings) -> PrintSettings {
        let mut next = *settings;
        match self {
            SettingChange::FitToWidth(value) => next.fit_to_width = value,
            SettingChange::Rotation(rotation) => next.rotation = Some(rotation),
            SettingChange::TimeoutMs(timeout) => next.timeout_ms = Some(timeout),
            SettingChange::ErrorDialog(value) => next.error_dialog = Some(value),
        }
        next
    }
}

pub fn parse_line(line: &str) -> anyhow::Result<SessionCommand> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "" => SessionCommand::Empty,
        "select" | "open" => SessionCommand::Select(PathBuf::from(required(rest, "select <path>")?)),
        "print" => SessionCommand::Print,
        "retry" => SessionCommand::Retry(TxId::from(required(rest, "retry <txid>")?)),
        "clear" => SessionCommand::Clear,
        "set" => SessionCommand::Set(parse_setting(rest)?),
        "status" => SessionCommand::Status,
        "history" => SessionCommand::History,
        "clear-history" => SessionCommand::ClearHistory,
        "callback" => SessionCommand::Callback(required(rest, "callback <url>")?.to_string()),
        "help" | "?" => SessionCommand::Help,
        "quit" | "exit" => SessionCommand::Quit,
        other => bail!("Unknown command '{other}'. Type 'help' for a list."),
    };
    Ok(command)
}

fn required<'a>(rest: &'a str, usage: &str) -> anyhow::Result<&'a str> {
    if rest.is_empty() {
        bail!("Usage: {usage}");
    }
    Ok(rest)
}

fn parse_setting(rest: &str) -> anyhow::Result<SettingChange> {
    let (name, value) = rest
        .split_once(char::is_whitespace)
        .map(|(name, value)| (name, value.trim()))
        .ok_or_else(|| anyhow!("Usage: set fit|rotation|timeout|error-dialog <value>"))?;

    match name.to_ascii_lowercase().as_str() {
        "fit" => Ok(SettingChange::FitToWidth(parse_switch(value)?)),
        "rotation" => {
            let degrees: u16 = value
                .parse()
                .with_context(|| format!("Rotation must be 0 or 270, got '{value}'"))?;
            let rotation = Rotation::try_from(degrees).map_err(|err| anyhow!("{err}"))?;
            Ok(SettingChange::Rotation(rotation))
        }
        "timeout" => {
            let timeout = value
                .parse()
                .with_context(|| format!("Timeout must be milliseconds, got '{value}'"))?;
            Ok(SettingChange::TimeoutMs(timeout))
        }
        "error-dialog" => Ok(SettingChange::ErrorDialog(parse_switch(value)?)),
        other => bail!("Unknown setting '{other}'"),
    }
}

fn parse_switch(value: &str) -> anyhow::Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "on" | "yes" | "true" => Ok(true),
        "off" | "no" | "false" => Ok(false),
        _ => bail!("Expected on or off, got '{value}'"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_plain_commands() {
        assert_eq!(parse_line("print").unwrap(), SessionCommand::Print);
        assert_eq!(parse_line("  QUIT ").unwrap(), SessionCommand::Quit);
        assert_eq!(parse_line("").unwrap(), SessionCommand::Empty);
        assert_eq!(parse_line("clear-history").unwrap(), SessionCommand::ClearHistory);
    }

    #[test]
    fn keeps_spaces_in_paths() {
        assert_eq!(
            parse_line("select /tmp/my labels/receipt.pdf").unwrap(),
            SessionCommand::Select(PathBuf::from("/tmp/my labels/receipt.pdf"))
        );
    }

    #[test]
    fn arguments_are_required() {
        assert!(parse_line("select").is_err());
        assert!(parse_line("retry").is_err());
        assert!(parse_line("callback  ").is_err());
    }

    #[test]
    fn parses_settings() {
        assert_eq!(
            parse_line("set fit off").unwrap(),
            SessionCommand::Set(SettingChange::FitToWidth(false))
        );
        assert_eq!(
            parse_line("set rotation 270").unwrap(),
            SessionCommand::Set(SettingChange::Rotation(Rotation::Clockwise270))
        );
        assert_eq!(
            parse_line("set timeout 30000").unwrap(),
            SessionCommand::Set(SettingChange::TimeoutMs(30_000))
        );
        assert_eq!(
            parse_line("set error-dialog on").unwrap(),
            SessionCommand::Set(SettingChange::ErrorDialog(true))
        );
    }

    #[test]
    fn rejects_bad_settings() {
        assert!(parse_line("set rotation 90").is_err());
        assert!(parse_line("set timeout soon").is_err());
        assert!(parse_line("set fit maybe").is_err());
        assert!(parse_line("set colour red").is_err());
        assert!(parse_line("set fit").is_err());
        assert!(parse_line("frobnicate").is_err());
    }

    #[test]
    fn setting_change_touches_one_field() {
        let before = PrintSettings::default();
        let after = SettingChange::Rotation(Rotation::Clockwise270).apply(&before);
        assert_eq!(after.rotation, Some(Rotation::Clockwise270));
        assert_eq!(after.fit_to_width, before.fit_to_width);
        assert_eq!(after.timeout_ms, before.timeout_ms);
    }
}
