use core::ops::ControlFlow;
use std::future::Future;
use std::sync::Arc;

use plugin_core::{Host, ReturnCode, Signal};
use plugin_notify::Notifier;
use tokio::io::{AsyncBufRead, AsyncBufReadExt as _};
use tracing::{debug, info, warn};

use crate::host::StdioHost;
use crate::input::{Highlighter, Input, parse_line};

/// Feeds console lines to the hosted notifier, one at a time.
#[derive(Debug)]
pub(crate) struct Bridge {
    host: Arc<StdioHost>,
    notifier: Notifier,
    highlighter: Highlighter,
}

impl Bridge {
    pub(crate) fn new(host: Arc<StdioHost>, notifier: Notifier, highlighter: Highlighter) -> Self {
        Self {
            host,
            notifier,
            highlighter,
        }
    }

    /// Load the plugin into the host.
    pub(crate) fn start(&mut self) {
        self.notifier.init();
    }

    /// Unload the plugin.
    pub(crate) fn stop(&mut self) {
        self.notifier.shutdown();
    }

    /// Process lines until end of input, `/quit`, or `shutdown` completing.
    ///
    /// Bytes that are not valid UTF-8 are replaced rather than ending the loop.
    /// `shutdown` is polled for the whole run, also while a callback is stalled.
    pub(crate) async fn run<R, S>(&mut self, mut reader: R, shutdown: S)
    where
        R: AsyncBufRead + Unpin,
        S: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let mut buf = Vec::new();
        loop {
            buf.clear();
            let read = tokio::select! {
                biased;
                () = &mut shutdown => break,
                read = reader.read_until(b'\n', &mut buf) => read,
            };
            match read {
                Ok(0) => {
                    info!("End of input");
                    break;
                }
                Ok(_) => {}
                Err(err) => {
                    warn!(error = %err, "Reading input failed");
                    break;
                }
            }

            let line = String::from_utf8_lossy(&buf);
            let line = line.trim_end_matches(['\n', '\r']);
            let flow = tokio::select! {
                biased;
                () = &mut shutdown => break,
                flow = self.handle_line(line) => flow,
            };
            if flow.is_break() {
                break;
            }
        }
    }

    pub(crate) async fn handle_line(&mut self, line: &str) -> ControlFlow<()> {
        match parse_line(line) {
            Input::Empty => {}
            Input::Quit => return ControlFlow::Break(()),
            Input::Invalid(usage) => self.host.print(usage),
            Input::Chat(_) => self.host.touch(),
            Input::Help(name) => {
                self.host.touch();
                self.print_help(name.as_deref());
            }
            Input::Command { name, args } => {
                self.host.touch();
                if self.host.has_command(&name) {
                    let rc = self.notifier.on_command(&args);
                    log_rc("command", rc);
                } else {
                    self.host.print(&format!("Unknown command: /{name}"));
                }
            }
            Input::Set { option, value } => {
                self.host.touch();
                self.host.option_set(&option, &value);
                let full = self.host.full_option_name(&option);
                self.host.print(&format!("{full} = \"{value}\""));
                if self.host.watches(&full) {
                    let rc = self.notifier.on_config_changed(&full, &value);
                    log_rc("config", rc);
                }
            }
            Input::PrivateMessage { nick, text } => {
                self.host.print(&format!("[pm] <{nick}> {text}"));
                if self.host.is_hooked(Signal::PrivateMessage) {
                    let rc = self.notifier.on_private_message(&nick, &text).await;
                    log_rc(Signal::PrivateMessage.name(), rc);
                }
            }
            Input::ChannelMessage { nick, text } => {
                self.host.print(&format!("<{nick}> {text}"));
                if self.highlighter.matches(&text) && self.host.is_hooked(Signal::Highlight) {
                    let rc = self.notifier.on_highlight(&format!("{nick} {text}")).await;
                    log_rc(Signal::Highlight.name(), rc);
                }
            }
        }
        ControlFlow::Continue(())
    }

    fn print_help(&self, name: Option<&str>) {
        match name {
            Some(name) => match self.host.command(name) {
                Some(spec) => {
                    self.host
                        .print(&format!("/{}: {}", spec.name, spec.description));
                    self.host.print(&format!("  /{} {}", spec.name, spec.args));
                    self.host.print(&spec.args_description);
                }
                None => self.host.print(&format!("Unknown command: /{name}")),
            },
            None => {
                self.host.print("Commands: /help [<command>], /set <option> <value>, /quit");
                self.host.print("Events: pm <nick> <text>, msg <nick> <text>");
                if let Some(spec) = self.host.command(plugin_notify::NAME) {
                    self.host
                        .print(&format!("Plugin: /{} {}", spec.name, spec.completion));
                }
            }
        }
    }
}

fn log_rc(callback: &str, rc: ReturnCode) {
    if rc.is_ok() {
        debug!(callback, "Callback returned ok");
    } else {
        warn!(callback, "Callback returned error");
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;
    use plugin_telegram::{TelegramError, Transport};
    use tempfile::TempDir;

    use super::*;

    #[derive(Debug, Default)]
    struct Outbox {
        sent: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Transport for Outbox {
        async fn send_message(
            &self,
            _token: &str,
            _chat_id: &str,
            text: &str,
        ) -> Result<(), TelegramError> {
            self.sent.lock().unwrap().push(text.to_owned());
            Ok(())
        }
    }

    fn bridge(tmp: &TempDir) -> (Arc<StdioHost>, Arc<Outbox>, Bridge) {
        let host = Arc::new(
            StdioHost::open("console", plugin_notify::NAME, &tmp.path().join("settings.json"))
                .unwrap(),
        );
        let outbox = Arc::new(Outbox::default());
        let notifier = Notifier::new(
            Arc::clone(&host) as Arc<dyn Host>,
            Arc::clone(&outbox) as Arc<dyn Transport>,
        );
        let mut bridge = Bridge::new(
            Arc::clone(&host),
            notifier,
            Highlighter::new(Some("ferris"), &[]),
        );
        bridge.start();
        (host, outbox, bridge)
    }

    fn sent(outbox: &Outbox) -> Vec<String> {
        outbox.sent.lock().unwrap().clone()
    }

    /// Transport whose sends never complete.
    #[derive(Debug)]
    struct Stalled;

    #[async_trait]
    impl Transport for Stalled {
        async fn send_message(
            &self,
            _token: &str,
            _chat_id: &str,
            _text: &str,
        ) -> Result<(), TelegramError> {
            std::future::pending().await
        }
    }

    const SETUP: &[u8] = b"/weegram token 1:abc\n/weegram chatid 42\n/weegram enable\n";

    #[tokio::test]
    async fn invalid_utf8_line_does_not_end_input() {
        let tmp = TempDir::new().unwrap();
        let (host, outbox, mut bridge) = bridge(&tmp);
        let mut input = SETUP.to_vec();
        input.extend_from_slice(b"\xff\xfe x\npm alice hi\n");

        bridge
            .run(Cursor::new(input), std::future::pending::<()>())
            .await;

        let sent = sent(&outbox);
        assert_eq!(sent.len(), 1);
        assert!(sent[0].ends_with("priv message from \"alice\" on console"));
        assert!(host.is_hooked(Signal::PrivateMessage));
    }

    #[tokio::test]
    async fn run_stops_at_quit_and_keeps_crlf_lines_intact() {
        let tmp = TempDir::new().unwrap();
        let (host, outbox, mut bridge) = bridge(&tmp);
        let mut input = SETUP.to_vec();
        input.extend_from_slice(b"/weegram chatid 77\r\n/quit\npm alice hi\n");

        bridge
            .run(Cursor::new(input), std::future::pending::<()>())
            .await;

        assert_eq!(host.option_get("chatid").as_deref(), Some("77"));
        assert!(sent(&outbox).is_empty());
    }

    #[tokio::test]
    async fn shutdown_interrupts_a_stalled_send() {
        let tmp = TempDir::new().unwrap();
        let host = Arc::new(
            StdioHost::open("console", plugin_notify::NAME, &tmp.path().join("settings.json"))
                .unwrap(),
        );
        let notifier = Notifier::new(
            Arc::clone(&host) as Arc<dyn Host>,
            Arc::new(Stalled) as Arc<dyn Transport>,
        );
        let mut bridge = Bridge::new(Arc::clone(&host), notifier, Highlighter::new(None, &[]));
        bridge.start();
        let mut input = SETUP.to_vec();
        input.extend_from_slice(b"pm alice hi\n");

        let shutdown = tokio::time::sleep(Duration::from_millis(50));
        let finished = tokio::time::timeout(
            Duration::from_secs(5),
            bridge.run(Cursor::new(input), shutdown),
        )
        .await;

        assert!(finished.is_ok());
    }

    #[tokio::test]
    async fn events_are_ignored_until_enabled() {
        let tmp = TempDir::new().unwrap();
        let (_, outbox, mut bridge) = bridge(&tmp);

        let _ = bridge.handle_line("pm alice hello").await;
        let _ = bridge.handle_line("msg bob ferris: ping").await;

        assert!(sent(&outbox).is_empty());
    }

    #[tokio::test]
    async fn enabled_bridge_forwards_pm_and_highlight() {
        let tmp = TempDir::new().unwrap();
        let (_, outbox, mut bridge) = bridge(&tmp);
        let _ = bridge.handle_line("/weegram token 1:abc").await;
        let _ = bridge.handle_line("/weegram chatid 42").await;
        let _ = bridge.handle_line("/weegram enable").await;

        let _ = bridge.handle_line("pm alice hello").await;
        let _ = bridge.handle_line("msg bob unrelated chatter").await;
        let _ = bridge.handle_line("msg bob ferris: ping").await;

        let sent = sent(&outbox);
        assert_eq!(sent.len(), 2);
        assert!(sent[0].ends_with("priv message from \"alice\" on console"));
        assert!(sent[1].ends_with("] message from \"bob\" on console"));
    }

    #[tokio::test]
    async fn threshold_suppresses_while_user_is_typing() {
        let tmp = TempDir::new().unwrap();
        let (_, outbox, mut bridge) = bridge(&tmp);
        let _ = bridge.handle_line("/weegram token 1:abc").await;
        let _ = bridge.handle_line("/weegram chatid 42").await;
        let _ = bridge.handle_line("/weegram enable 10").await;
        let _ = bridge.handle_line("just chatting").await;

        let _ = bridge.handle_line("pm alice hello").await;

        assert!(sent(&outbox).is_empty());
    }

    #[tokio::test]
    async fn external_set_toggles_hooks() {
        let tmp = TempDir::new().unwrap();
        let (host, _, mut bridge) = bridge(&tmp);

        let _ = bridge.handle_line("/set enabled on").await;
        assert!(host.is_hooked(Signal::PrivateMessage));
        assert!(host.is_hooked(Signal::Highlight));

        let _ = bridge.handle_line("/set enabled off").await;
        assert!(!host.is_hooked(Signal::PrivateMessage));
    }

    #[tokio::test]
    async fn quit_breaks_and_stop_unhooks() {
        let tmp = TempDir::new().unwrap();
        let (host, _, mut bridge) = bridge(&tmp);
        let _ = bridge.handle_line("/weegram enable").await;

        assert_eq!(bridge.handle_line("/quit").await, ControlFlow::Break(()));
        bridge.stop();

        assert!(!host.is_hooked(Signal::Highlight));
    }

    #[tokio::test]
    async fn settings_persist_across_sessions() {
        let tmp = TempDir::new().unwrap();
        {
            let (_, _, mut bridge) = bridge(&tmp);
            let _ = bridge.handle_line("/weegram enable 5").await;
        }

        let (host, _, _) = bridge(&tmp);

        assert_eq!(host.option_get("inactivity").as_deref(), Some("5"));
        assert!(host.is_hooked(Signal::PrivateMessage));
    }
}
