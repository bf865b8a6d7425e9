use plugin_core::NotificationEvent;
use time::{OffsetDateTime, format_description::BorrowedFormatItem, macros::format_description};

const TIMESTAMP: &[BorrowedFormatItem<'static>] =
    format_description!("[year][month][day]-[hour]:[minute]");

/// Current local time, or UTC when the local offset is unknown.
#[must_use]
pub fn now() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}

#[must_use]
pub fn timestamp(at: OffsetDateTime) -> String {
    at.format(TIMESTAMP).unwrap_or_default()
}

/// Render the notification text sent to the bot chat.
#[must_use]
pub fn compose(
    event: &NotificationEvent,
    app_name: &str,
    with_content: bool,
    at: OffsetDateTime,
) -> String {
    let mut text = format!(
        "[{}] {} from \"{}\" on {app_name}",
        timestamp(at),
        event.kind_label(),
        event.nick,
    );
    if with_content {
        text.push_str(": ");
        text.push_str(&event.text);
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn timestamp_is_compact_and_zero_padded() {
        assert_eq!(timestamp(datetime!(2024-03-07 09:05 UTC)), "20240307-09:05");
    }

    #[test]
    fn private_message_without_content() {
        let ev = NotificationEvent::private("alice", "secret stuff");
        let text = compose(&ev, "weechat", false, datetime!(2024-12-31 23:59 UTC));
        assert_eq!(text, "[20241231-23:59] priv message from \"alice\" on weechat");
    }

    #[test]
    fn highlight_with_content() {
        let ev = NotificationEvent::from_highlight("bob are you there?").unwrap();
        let text = compose(&ev, "chat", true, datetime!(2024-01-02 03:04 UTC));
        assert_eq!(
            text,
            "[20240102-03:04] message from \"bob\" on chat: are you there?"
        );
    }
}
