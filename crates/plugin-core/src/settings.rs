//! Plugin options stored in the host, with defaults written lazily.

use core::fmt;

use tracing::debug;

use crate::Host;

pub const ON: &str = "on";
pub const OFF: &str = "off";

/// The fixed set of options the notifier understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionKey {
    Enabled,
    Inactivity,
    Token,
    ChatId,
    WithContent,
}

impl OptionKey {
    pub const ALL: [Self; 5] = [
        Self::Enabled,
        Self::Inactivity,
        Self::Token,
        Self::ChatId,
        Self::WithContent,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Enabled => "enabled",
            Self::Inactivity => "inactivity",
            Self::Token => "token",
            Self::ChatId => "chatid",
            Self::WithContent => "withcontent",
        }
    }

    #[must_use]
    pub const fn default_value(self) -> &'static str {
        match self {
            Self::Enabled | Self::WithContent => OFF,
            Self::Inactivity => "0",
            Self::Token | Self::ChatId => "",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.name() == name)
    }
}

impl fmt::Display for OptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Typed view over the string store, parsed once per read.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NotifierConfig {
    pub enabled: bool,
    pub inactivity_minutes: u64,
    pub token: String,
    pub chat_id: String,
    pub with_content: bool,
}

/// String settings accessor backed by the host option store.
#[derive(Clone, Copy)]
pub struct Settings<'h> {
    host: &'h dyn Host,
}

impl fmt::Debug for Settings<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("app", &self.host.app_name())
            .finish_non_exhaustive()
    }
}

impl<'h> Settings<'h> {
    #[must_use]
    pub const fn new(host: &'h dyn Host) -> Self {
        Self { host }
    }

    /// Read an option, storing its default first when it was never set.
    #[must_use]
    pub fn get(&self, key: OptionKey) -> String {
        if !self.host.option_is_set(key.name()) {
            debug!(option = %key, default = key.default_value(), "Writing option default");
            self.host.option_set(key.name(), key.default_value());
        }
        self.host
            .option_get(key.name())
            .unwrap_or_else(|| key.default_value().to_owned())
    }

    pub fn set(&self, key: OptionKey, value: &str) {
        self.host.option_set(key.name(), value);
    }

    /// Make sure every option has a stored value.
    pub fn init_defaults(&self) {
        for key in OptionKey::ALL {
            let _ = self.get(key);
        }
    }

    #[must_use]
    pub fn is_on(&self, key: OptionKey) -> bool {
        self.get(key) == ON
    }

    /// Idle threshold in minutes; anything unparsable counts as disabled.
    #[must_use]
    pub fn inactivity_minutes(&self) -> u64 {
        self.get(OptionKey::Inactivity).trim().parse().unwrap_or(0)
    }

    #[must_use]
    pub fn snapshot(&self) -> NotifierConfig {
        NotifierConfig {
            enabled: self.is_on(OptionKey::Enabled),
            inactivity_minutes: self.inactivity_minutes(),
            token: self.get(OptionKey::Token),
            chat_id: self.get(OptionKey::ChatId),
            with_content: self.is_on(OptionKey::WithContent),
        }
    }
}
