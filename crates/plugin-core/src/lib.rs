pub mod event;
#[cfg(any(test, feature = "test-utils"))]
pub mod memory;
pub mod settings;

use core::fmt;

pub use event::NotificationEvent;
pub use settings::{NotifierConfig, OptionKey, Settings};

/// Status handed back to the host after every callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnCode {
    Ok,
    Error,
}

impl ReturnCode {
    #[must_use]
    pub const fn is_ok(self) -> bool {
        matches!(self, Self::Ok)
    }
}

/// Host signals a plugin can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Signal {
    PrivateMessage,
    Highlight,
}

impl Signal {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::PrivateMessage => "private_message",
            Self::Highlight => "highlight",
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Opaque handle returned by [`Host::hook_signal`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HookId(pub u64);

/// Everything the host needs to register and document a plugin command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub name: String,
    pub description: String,
    pub args: String,
    pub args_description: String,
    pub completion: String,
}

/// The services a chat application exposes to a hosted plugin.
///
/// Hosts dispatch plugin callbacks one at a time, so implementations only
/// need interior mutability to satisfy the `Send + Sync` bound.
pub trait Host: Send + Sync {
    /// Name of the chat application, used in outbound notifications.
    fn app_name(&self) -> &str;

    /// Whether the plugin option `name` has a stored value.
    fn option_is_set(&self, name: &str) -> bool;
    fn option_get(&self, name: &str) -> Option<String>;
    fn option_set(&self, name: &str, value: &str);

    /// Seconds since the user's last activity in the host.
    fn idle_seconds(&self) -> u64;

    fn hook_signal(&self, signal: Signal) -> HookId;
    fn unhook(&self, hook: HookId);

    fn hook_command(&self, command: &CommandSpec);

    /// Subscribe to changes of host options matching `pattern`
    /// (a trailing `*` matches any suffix).
    fn hook_config(&self, pattern: &str);

    /// Print a line to the host's core buffer.
    fn print(&self, line: &str);
}

#[must_use]
pub fn truncate(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

/// Collapse runs of whitespace into single spaces.
#[must_use]
pub fn compact_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Match a host option name against a subscription pattern.
#[must_use]
pub fn pattern_matches(pattern: &str, name: &str) -> bool {
    pattern
        .strip_suffix('*')
        .map_or_else(|| pattern == name, |prefix| name.starts_with(prefix))
}
