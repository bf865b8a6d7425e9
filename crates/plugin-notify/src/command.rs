//! Parsing of the `/weegram` subcommands.

use crate::NotifyError;

pub const SUBCOMMANDS: [&str; 7] = [
    "status",
    "enable",
    "disable",
    "chatid",
    "token",
    "withcontent",
    "help",
];

pub const USAGE: [&str; 8] = [
    "  status: get service status",
    "  enable [<time>]: enable service",
    "    - time: inactivity duration to activate (in min)",
    "  disable: disable service",
    "  chatid <id>: set chat-id",
    "  token <token>: set token",
    "  withcontent: content in notification",
    "  help: get help",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Status,
    Enable { inactivity: Option<u64> },
    Disable,
    ChatId(String),
    Token(String),
    WithContent,
    Help,
}

impl Command {
    /// Parse a raw argument string. Validation happens here so that a
    /// rejected command never touches the settings.
    pub fn parse(args: &str) -> Result<Self, NotifyError> {
        let mut words = args.split_whitespace();
        let Some(name) = words.next() else {
            return Err(NotifyError::UnknownCommand(String::new()));
        };
        let arg = words.next();

        match name {
            "status" => Ok(Self::Status),
            "enable" => {
                let inactivity = arg
                    .map(|raw| {
                        raw.parse::<u64>().map_err(|_| {
                            NotifyError::Validation(format!("bad inactivity value: \"{raw}\""))
                        })
                    })
                    .transpose()?;
                Ok(Self::Enable { inactivity })
            }
            "disable" => Ok(Self::Disable),
            "chatid" => required(arg, "chatid").map(Self::ChatId),
            "token" => required(arg, "token").map(Self::Token),
            "withcontent" => Ok(Self::WithContent),
            "help" => Ok(Self::Help),
            _ => Err(NotifyError::UnknownCommand(
                args.split_whitespace().collect::<Vec<_>>().join(" "),
            )),
        }
    }
}

fn required(arg: Option<&str>, what: &str) -> Result<String, NotifyError> {
    match arg {
        Some(value) if !value.is_empty() => Ok(value.to_owned()),
        _ => Err(NotifyError::Validation(format!("bad {what}"))),
    }
}
