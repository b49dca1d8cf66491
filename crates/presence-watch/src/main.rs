//! presence-watch: subscribe to one page and print who is viewing it.

mod cli;
mod render;

use presence_client::{CurrentUser, PresenceClient};
use presence_common::ConfigError;
use presence_config::PresenceConfig;
use tracing_subscriber::EnvFilter;

use crate::cli::Args;

fn load_config(args: &Args) -> Result<PresenceConfig, ConfigError> {
    match &args.config {
        Some(path) => presence_config::load_config_from(path),
        None => presence_config::load_config(),
    }
}

/// Command-line flags win over the file.
fn apply_overrides(config: &mut PresenceConfig, args: &Args) {
    if let Some(host) = &args.host {
        config.server.host = host.clone();
    }
    if args.secure {
        config.server.secure = true;
    }
}

fn init_logging(args: &Args, config: &PresenceConfig) {
    let fallback = format!("presence_watch={0},presence_client={0}", config.logging.level.as_str());
    let directive = args.log_level.as_deref().unwrap_or(&fallback);
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(directive))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() {
    let args = cli::parse();

    // Logging depends on the configured level, so it starts after loading.
    let loaded = load_config(&args);
    let mut config = match &loaded {
        Ok(config) => config.clone(),
        Err(_) => PresenceConfig::default(),
    };
    apply_overrides(&mut config, &args);
    init_logging(&args, &config);

    if let Err(e) = loaded {
        tracing::warn!("Config load failed, using defaults: {e}");
    }
    tracing::info!(
        "presence-watch v{} watching {} on {}",
        env!("CARGO_PKG_VERSION"),
        args.page,
        config.server.host
    );

    let (mut client, mut events) = PresenceClient::from_config(&config);
    let user = CurrentUser::new(args.user_id.clone(), args.nickname.clone());
    client.subscribe(&args.page, user).await;

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted, leaving page");
                break;
            }
            event = events.recv() => match event {
                Some(event) => {
                    if !client.is_current(&event) {
                        continue;
                    }
                    if let Some(line) = render::describe(&event.event) {
                        println!("{line}");
                    }
                    if client.status().is_terminal() {
                        break;
                    }
                }
                None => break,
            }
        }
    }

    client.close().await;
    tracing::info!("Shutdown complete");
}
