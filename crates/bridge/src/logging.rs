use tracing::{Subscriber, level_filters::LevelFilter};
use tracing_subscriber::{
    EnvFilter, Layer, layer::SubscriberExt as _, registry::LookupSpan, util::SubscriberInitExt as _,
};

pub enum LogFormat {
    Json,
    Pretty,
}

impl LogFormat {
    pub fn layer<S>(self) -> Box<dyn Layer<S> + Send + Sync + 'static>
    where
        for<'a> S: Subscriber + LookupSpan<'a>,
    {
        // stdout belongs to the host console.
        let fmt = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

        match self {
            Self::Json => Box::new(fmt.json().with_target(false)),
            Self::Pretty => Box::new(fmt.compact().with_target(true)),
        }
    }
}

pub fn init_tracing() {
    let log_mode = std::env::var("RUST_LOG_MODE").unwrap_or_else(|_| "pretty".into());

    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    let log_mode = match log_mode.as_str() {
        "json" => LogFormat::Json,
        _ => LogFormat::Pretty,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(log_mode.layer())
        .init();
}
