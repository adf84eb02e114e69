// Huddle proxy server entry point.
//
// Startup sequence:
// 1. Initialize tracing (stdout)
// 2. Load config
// 3. Build the Sleeper and SportsData clients
// 4. Serve the routes until Ctrl+C

use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use huddle_api::sleeper::SleeperClient;
use huddle_api::sportsdata::StatsClient;
use huddle_core::config;
use huddle_core::logging;
use huddle_server::routes::{create_routes, ServerState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing
    logging::init_stdout()?;

    // 2. Load config
    let config = config::load_config().context("failed to load configuration")?;

    // 3. Build the upstream clients
    let league = SleeperClient::from_config(&config).context("failed to build Sleeper client")?;
    let stats = StatsClient::from_config(&config).context("failed to build stats client")?;
    if !stats.is_active() {
        info!("Player stats routes will return empty results (no SportsData API key)");
    }
    let state = Arc::new(ServerState {
        league: Arc::new(league),
        stats: Arc::new(stats),
        season: config.stats.season,
    });

    // 4. Serve
    let addr = tokio::net::lookup_host((config.server.host.as_str(), config.server.port))
        .await
        .with_context(|| format!("failed to resolve {}", config.server.host))?
        .next()
        .with_context(|| format!("no address for {}", config.server.host))?;

    let (bound, server) = warp::serve(create_routes(state))
        .try_bind_with_graceful_shutdown(addr, async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Ctrl+C received, shutting down");
        })
        .with_context(|| format!("failed to bind {addr}"))?;

    info!("Huddle server running on http://{bound}");
    server.await;
    info!("Huddle server stopped");
    Ok(())
}
