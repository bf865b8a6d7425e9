//! Console line grammar of the bridge.

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Input {
    /// `/<name> <args>`
    Command { name: String, args: String },
    /// `/set <option> <value>`
    Set { option: String, value: String },
    /// `/help [<command>]`
    Help(Option<String>),
    /// `/quit`
    Quit,
    /// `pm <nick> <text>`
    PrivateMessage { nick: String, text: String },
    /// `msg <nick> <text>`
    ChannelMessage { nick: String, text: String },
    /// Anything the user typed that is not one of the above.
    Chat(String),
    Invalid(&'static str),
    Empty,
}

pub(crate) fn parse_line(line: &str) -> Input {
    let line = line.trim();
    if line.is_empty() {
        return Input::Empty;
    }

    if let Some(rest) = line.strip_prefix('/') {
        let (name, args) = split_word(rest);
        return match name {
            "quit" => Input::Quit,
            "help" => Input::Help((!args.is_empty()).then(|| args.to_owned())),
            "set" => {
                let (option, value) = split_word(args);
                if option.is_empty() {
                    Input::Invalid("usage: /set <option> <value>")
                } else {
                    Input::Set {
                        option: option.to_owned(),
                        value: value.to_owned(),
                    }
                }
            }
            "" => Input::Invalid("missing command name"),
            _ => Input::Command {
                name: name.to_owned(),
                args: args.to_owned(),
            },
        };
    }

    let (kind, rest) = split_word(line);
    match kind {
        "pm" | "msg" => {
            let (nick, text) = split_word(rest);
            if nick.is_empty() {
                return Input::Invalid("usage: pm|msg <nick> <text>");
            }
            let nick = nick.to_owned();
            let text = text.to_owned();
            if kind == "pm" {
                Input::PrivateMessage { nick, text }
            } else {
                Input::ChannelMessage { nick, text }
            }
        }
        _ => Input::Chat(line.to_owned()),
    }
}

fn split_word(s: &str) -> (&str, &str) {
    let s = s.trim_start();
    s.split_once(char::is_whitespace)
        .map_or((s, ""), |(head, tail)| (head, tail.trim()))
}

/// Decides whether a channel message mentions the user.
#[derive(Debug, Clone, Default)]
pub(crate) struct Highlighter {
    words: Vec<String>,
}

impl Highlighter {
    pub(crate) fn new(nick: Option<&str>, extra: &[String]) -> Self {
        let words = nick
            .into_iter()
            .chain(extra.iter().map(String::as_str))
            .map(str::trim)
            .filter(|w| !w.is_empty())
            .map(str::to_lowercase)
            .collect();
        Self { words }
    }

    /// True when any highlight word appears as a whole word in `text`.
    pub(crate) fn matches(&self, text: &str) -> bool {
        if self.words.is_empty() {
            return false;
        }
        text.split_whitespace()
            .map(|token| {
                token
                    .trim_start_matches(['@', '(', '[', '<', '"', '\''])
                    .trim_end_matches([':', ',', '.', ';', '!', '?', ')', ']', '>', '"', '\''])
                    .to_lowercase()
            })
            .any(|token| self.words.contains(&token))
    }
}
