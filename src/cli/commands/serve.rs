use anyhow::{Context, Result};
use std::net::{IpAddr, SocketAddr};
use tracing::{info, warn};

use super::scan_setup;
use crate::cli::{GlobalArgs, ServeArgs};
use crate::config::Config;
use crate::paths::{display_path, DetectionSource};
use crate::server::{start_server, AppState};

/// Run the HTTP server until interrupted
pub async fn run(global: &GlobalArgs, args: ServeArgs, config: Config) -> Result<()> {
    let (agents_dir, options) = scan_setup(global, &config);

    let bind = args.bind.unwrap_or_else(|| config.server.bind.clone());
    let port = args.port.unwrap_or(config.server.port);
    let ip: IpAddr = bind
        .parse()
        .with_context(|| format!("Invalid bind address: {}", bind))?;
    let enable_sessions = config.sessions.enabled && !args.no_sessions;

    info!(
        "Agents directory: {} ({})",
        display_path(&agents_dir.path),
        agents_dir.source
    );
    if agents_dir.source == DetectionSource::NotFound {
        warn!("No Clawdbot agents directory found; endpoints will return empty data");
    }
    if !enable_sessions {
        info!("Active sessions disabled; serving usage only");
    }

    start_server(
        SocketAddr::new(ip, port),
        AppState { options },
        enable_sessions,
    )
    .await
}
