mod config;
mod host;
mod input;
mod logging;
mod runtime;

use std::{path::PathBuf, sync::Arc};

use anyhow::{Context as _, Result};
use clap::Parser;
use plugin_core::Host;
use plugin_notify::Notifier;
use plugin_telegram::{DEFAULT_API_BASE, TelegramClient, Transport};
use tokio::io::BufReader;
use tracing::{info, warn};

use crate::config::load_config;
use crate::host::StdioHost;
use crate::input::Highlighter;
use crate::logging::init_tracing;
use crate::runtime::Bridge;

#[derive(Parser, Debug)]
#[command(
    name = "weegram-bridge",
    version,
    about = "Forward private messages and highlights to Telegram while you are away"
)]
struct Args {
    /// YAML config with the app name, own nick and highlight words
    #[arg(long, env = "WEEGRAM_CONFIG", default_value = "./config.yaml")]
    config: PathBuf,

    /// JSON file holding the plugin options
    #[arg(long, env = "WEEGRAM_SETTINGS", default_value = "./settings.json")]
    settings: PathBuf,

    /// Telegram Bot API base URL
    #[arg(long, env = "WEEGRAM_API_BASE", default_value = DEFAULT_API_BASE)]
    api_base: String,

    /// Own nick, overrides the one from the config file
    #[arg(long, env = "WEEGRAM_NICK")]
    nick: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    // Load .env if present so clap can pick up env vars.
    let _ = dotenvy::dotenv();
    let args = Args::parse();

    let config = load_config(&args.config)?;
    let nick = args.nick.or(config.nick);

    let host = Arc::new(StdioHost::open(
        config.app_name.as_str(),
        plugin_notify::NAME,
        &args.settings,
    )?);

    let http = reqwest::Client::builder()
        .user_agent(concat!("weegram-bridge/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("building HTTP client")?;
    let transport: Arc<dyn Transport> =
        Arc::new(TelegramClient::with_api_base(http, args.api_base));

    let notifier = Notifier::new(Arc::clone(&host) as Arc<dyn Host>, transport);
    let highlighter = Highlighter::new(nick.as_deref(), &config.highlights);
    let mut bridge = Bridge::new(Arc::clone(&host), notifier, highlighter);
    bridge.start();

    info!(
        app = %config.app_name,
        nick = ?nick,
        settings = %args.settings.display(),
        "Bridge ready; type /help"
    );

    let interrupted = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "Listening for ctrl-c failed");
            std::future::pending::<()>().await;
        }
        info!("Interrupted");
    };
    bridge
        .run(BufReader::new(tokio::io::stdin()), interrupted)
        .await;

    bridge.stop();
    info!("Bridge stopped");
    Ok(())
}
