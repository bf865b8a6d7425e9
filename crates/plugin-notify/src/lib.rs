//! Telegram notifications for private messages and highlights received
//! while the user is away.
//!
//! The [`Notifier`] is driven entirely by host callbacks: commands, option
//! changes and the two message signals it subscribes to while enabled.

pub mod command;
mod error;
pub mod hooks;
pub mod message;

use std::sync::Arc;

use plugin_core::{
    CommandSpec, Host, NotificationEvent, OptionKey, ReturnCode, Settings,
    settings::{OFF, ON},
    truncate,
};
use plugin_telegram::Transport;
use tracing::{debug, info, warn};

pub use command::Command;
pub use error::NotifyError;
pub use hooks::HookManager;

pub const NAME: &str = "weegram";
pub const AUTHOR: &str = "deadc0de6";
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const LICENSE: &str = "GPL-3.0";
pub const DESCRIPTION: &str = "Telegram notification on priv/highlight message";

/// Host option pattern covering every option of this plugin.
#[must_use]
pub fn config_pattern() -> String {
    format!("plugins.var.{NAME}.*")
}

#[must_use]
pub fn command_spec() -> CommandSpec {
    CommandSpec {
        name: NAME.to_owned(),
        description: DESCRIPTION.to_owned(),
        args: command::SUBCOMMANDS.join("|"),
        args_description: command::USAGE.join("\n"),
        completion: command::SUBCOMMANDS.join("|"),
    }
}

/// Why an event did not produce a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Suppression {
    Disabled,
    UserActive { idle_minutes: u64, threshold: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Sent,
    Suppressed(Suppression),
}

pub struct Notifier {
    host: Arc<dyn Host>,
    transport: Arc<dyn Transport>,
    hooks: HookManager,
}

impl core::fmt::Debug for Notifier {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Notifier")
            .field("app", &self.host.app_name())
            .field("hooks", &self.hooks)
            .finish_non_exhaustive()
    }
}

impl Notifier {
    pub fn new(host: Arc<dyn Host>, transport: Arc<dyn Transport>) -> Self {
        Self {
            host,
            transport,
            hooks: HookManager::new(),
        }
    }

    fn settings(&self) -> Settings<'_> {
        Settings::new(self.host.as_ref())
    }

    #[must_use]
    pub const fn hooks(&self) -> &HookManager {
        &self.hooks
    }

    /// Plugin load: register the command, write option defaults, follow
    /// option changes and hook messages if already enabled.
    pub fn init(&mut self) {
        self.host.hook_command(&command_spec());
        self.settings().init_defaults();
        self.host.hook_config(&config_pattern());
        self.sync_hooks();
        info!(
            plugin = NAME,
            version = VERSION,
            author = AUTHOR,
            license = LICENSE,
            "Notifier loaded"
        );
    }

    /// Plugin unload.
    pub fn shutdown(&mut self) {
        self.hooks.deactivate(self.host.as_ref());
    }

    fn sync_hooks(&mut self) {
        let enabled = self.settings().is_on(OptionKey::Enabled);
        self.hooks.sync(self.host.as_ref(), enabled);
    }

    pub async fn on_private_message(&self, nick: &str, text: &str) -> ReturnCode {
        let event = NotificationEvent::private(nick, text);
        self.dispatch(&event).await
    }

    pub async fn on_highlight(&self, raw: &str) -> ReturnCode {
        let Some(event) = NotificationEvent::from_highlight(raw) else {
            warn!(payload = %truncate(raw, 80), "Highlight without sender; ignoring");
            return ReturnCode::Ok;
        };
        self.dispatch(&event).await
    }

    async fn dispatch(&self, event: &NotificationEvent) -> ReturnCode {
        match self.notify(event).await {
            Ok(Outcome::Sent) => {
                info!(nick = %event.nick, private = event.is_private, "Notification sent");
                ReturnCode::Ok
            }
            Ok(Outcome::Suppressed(reason)) => {
                debug!(nick = %event.nick, reason = ?reason, "Notification suppressed");
                ReturnCode::Ok
            }
            Err(e) => {
                warn!(error = %e, nick = %event.nick, "Notification failed");
                self.report(&e)
            }
        }
    }

    /// Decide whether `event` warrants a notification and send it.
    pub async fn notify(&self, event: &NotificationEvent) -> Result<Outcome, NotifyError> {
        let config = self.settings().snapshot();
        if !config.enabled {
            return Ok(Outcome::Suppressed(Suppression::Disabled));
        }

        if config.inactivity_minutes > 0 {
            let idle_minutes = self.host.idle_seconds() / 60;
            if idle_minutes < config.inactivity_minutes {
                return Ok(Outcome::Suppressed(Suppression::UserActive {
                    idle_minutes,
                    threshold: config.inactivity_minutes,
                }));
            }
        }

        let text = message::compose(
            event,
            self.host.app_name(),
            config.with_content,
            message::now(),
        );
        self.transport
            .send_message(&config.token, &config.chat_id, &text)
            .await?;
        Ok(Outcome::Sent)
    }

    /// Handle `/weegram <args>`.
    pub fn on_command(&mut self, args: &str) -> ReturnCode {
        match Command::parse(args) {
            Ok(command) => {
                self.execute(command);
                ReturnCode::Ok
            }
            Err(e) => self.report(&e),
        }
    }

    fn execute(&mut self, command: Command) {
        let host = Arc::clone(&self.host);
        let settings = Settings::new(host.as_ref());
        match command {
            Command::Status => self.print_status(),
            Command::Enable { inactivity } => {
                if let Some(minutes) = inactivity {
                    settings.set(OptionKey::Inactivity, &minutes.to_string());
                }
                settings.set(OptionKey::Enabled, ON);
                info!(inactivity = ?inactivity, "Notifications enabled");
                self.sync_hooks();
                self.print_status();
            }
            Command::Disable => {
                settings.set(OptionKey::Enabled, OFF);
                info!("Notifications disabled");
                self.sync_hooks();
                self.print_status();
            }
            Command::ChatId(id) => {
                settings.set(OptionKey::ChatId, &id);
                self.print_status();
            }
            Command::Token(token) => {
                settings.set(OptionKey::Token, &token);
                self.print_status();
            }
            Command::WithContent => {
                let next = if settings.is_on(OptionKey::WithContent) {
                    OFF
                } else {
                    ON
                };
                settings.set(OptionKey::WithContent, next);
                self.print_status();
            }
            Command::Help => self.print_help(),
        }
    }

    /// An option under [`config_pattern`] changed outside the command.
    pub fn on_config_changed(&mut self, option: &str, value: &str) -> ReturnCode {
        debug!(option, value, "Option changed");
        self.sync_hooks();
        ReturnCode::Ok
    }

    fn print_status(&self) {
        let settings = self.settings();
        self.host.print(&format!("{NAME} status:"));
        for key in OptionKey::ALL {
            self.host.print(&format!("- {key}: {}", settings.get(key)));
        }
    }

    fn print_help(&self) {
        self.host
            .print(&format!("{NAME} ({})", command::SUBCOMMANDS.join("|")));
        self.host.print(&command::USAGE.join("\n"));
    }

    fn report(&self, err: &NotifyError) -> ReturnCode {
        self.host.print(&format!("{NAME} ERROR: {err}"));
        ReturnCode::Error
    }
}
