use crate::compact_whitespace;

/// A chat event that may turn into an outbound notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationEvent {
    pub nick: String,
    pub text: String,
    pub is_private: bool,
}

impl NotificationEvent {
    pub fn private(nick: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            nick: nick.into(),
            text: text.into(),
            is_private: true,
        }
    }

    /// Build an event from a raw highlight payload: the first whitespace
    /// delimited token is the nick, the rest is the message.
    ///
    /// Returns `None` when the payload holds no token at all.
    #[must_use]
    pub fn from_highlight(raw: &str) -> Option<Self> {
        let trimmed = raw.trim_start();
        let nick = trimmed.split_whitespace().next()?;
        Some(Self {
            nick: nick.to_owned(),
            text: compact_whitespace(&trimmed[nick.len()..]),
            is_private: false,
        })
    }

    /// Short label used in the notification text.
    #[must_use]
    pub const fn kind_label(&self) -> &'static str {
        if self.is_private {
            "priv message"
        } else {
            "message"
        }
    }
}
