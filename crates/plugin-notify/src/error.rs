use plugin_telegram::TelegramError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotifyError {
    /// Token or chat id not configured.
    #[error("{0}")]
    Configuration(String),

    /// A command argument failed validation; nothing was changed.
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Transport(TelegramError),

    #[error("unknown command: \"{0}\"")]
    UnknownCommand(String),
}

impl From<TelegramError> for NotifyError {
    fn from(err: TelegramError) -> Self {
        match err {
            TelegramError::MissingCredentials => Self::Configuration(err.to_string()),
            TelegramError::Http(_) | TelegramError::Api { .. } => Self::Transport(err),
        }
    }
}
