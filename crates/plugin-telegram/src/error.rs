use thiserror::Error;

#[derive(Debug, Error)]
pub enum TelegramError {
    /// Token or chat id not configured; no request was made.
    #[error("missing token or chatid")]
    MissingCredentials,

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with something other than 200.
    #[error("error {status}: {body}")]
    Api { status: u16, body: String },
}
