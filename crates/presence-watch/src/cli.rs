use std::path::PathBuf;

use clap::Parser;

/// Watch who else is viewing a page.
#[derive(Parser, Debug)]
#[command(name = "presence-watch", version, about)]
pub struct Args {
    /// Page to subscribe to.
    #[arg(short, long)]
    pub page: String,

    /// Your user id.
    #[arg(short = 'u', long)]
    pub user_id: String,

    /// Display name shown to other viewers.
    #[arg(short, long)]
    pub nickname: String,

    /// Config file path override.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Presence server `host[:port]`, overriding the config.
    #[arg(long)]
    pub host: Option<String>,

    /// Connect with `wss` instead of `ws`.
    #[arg(long)]
    pub secure: bool,

    /// Log level override (trace, debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,
}

pub fn parse() -> Args {
    Args::parse()
}
