//! imagelabel - image labeling server.
//!
//! Shows annotators one image at a time and records the label they choose.

mod cli;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, reload, util::SubscriberInitExt, EnvFilter};

use imagelabel::config::load_settings_with_options;

/// Default log filter when `RUST_LOG` is unset.
fn default_filter(verbose: bool, db_echo: bool) -> String {
    let mut filter = if verbose {
        "imagelabel=info".to_string()
    } else {
        "imagelabel=warn".to_string()
    };
    if db_echo {
        filter.push_str(",imagelabel::repository=debug");
    }
    filter
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (before anything else)
    let _ = dotenvy::dotenv();

    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity. The filter sits behind a reload
    // layer so `db_echo` from the settings can widen it once they are loaded.
    let env_filter = EnvFilter::try_from_default_env().ok();
    let from_env = env_filter.is_some();
    let (filter_layer, filter_handle) = reload::Layer::new(
        env_filter.unwrap_or_else(|| EnvFilter::new(default_filter(cli.verbose, false))),
    );

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let (settings, _config) = load_settings_with_options(cli.load_options()).await?;

    if settings.db_echo && !from_env {
        if let Err(e) = filter_handle.reload(EnvFilter::new(default_filter(cli.verbose, true))) {
            tracing::warn!("Failed to enable database logging: {}", e);
        }
    }

    // Run CLI
    cli::run(cli, settings).await
}
