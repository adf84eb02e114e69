// Huddle terminal client entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file, not terminal)
// 2. Load config
// 3. Open the session database and restore the last session
// 4. Build the upstream clients (direct or through huddle-server)
// 5. Create mpsc channels
// 6. Spawn app logic task
// 7. Run the TUI until the user quits
// 8. Cleanup on exit

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::sync::mpsc;
use tracing::{error, info};

use huddle_api::proxy::ProxyClient;
use huddle_api::sleeper::SleeperClient;
use huddle_api::sportsdata::StatsClient;
use huddle_app::app::{self, AppState, Sources};
use huddle_core::config::{self, ClientMode, Config};
use huddle_core::db::Database;
use huddle_core::logging;
use huddle_core::session::SessionStore;
use huddle_tui::tui;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing (log to file, not terminal)
    let log_path = logging::init_file("huddle.log")?;
    info!("Huddle starting up, logging to {}", log_path.display());

    // 2. Load config
    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: mode={:?}, season={:?}",
        config.client.mode, config.stats.season
    );

    // 3. Open the session database
    let db_path = config.session.resolved_db_path();
    let db = Database::open(&db_path.to_string_lossy()).context("failed to open database")?;
    info!("Database opened at {}", db_path.display());

    let session = SessionStore::load(db).context("failed to load session")?;
    match session.current() {
        Some(s) => info!("Restored session for {}", s.username),
        None => info!("No saved session, starting at login"),
    }

    // 4. Build the upstream clients
    let sources = build_sources(&config)?;

    // 5. Create mpsc channels
    let (fetch_tx, fetch_rx) = mpsc::channel(256);
    let (cmd_tx, cmd_rx) = mpsc::channel(64);
    let (ui_tx, ui_rx) = mpsc::channel(256);

    let app_state = AppState::new(config, session, sources, fetch_tx);

    // 6. Spawn app logic task
    let app_handle = tokio::spawn(async move {
        if let Err(e) = app::run(cmd_rx, fetch_rx, ui_tx, app_state).await {
            error!("Application loop error: {}", e);
        }
    });

    // 7. Run the TUI event loop (blocking until user quits)
    info!("Application ready");
    if let Err(e) = tui::run(ui_rx, cmd_tx).await {
        error!("TUI error: {}", e);
    }

    // 8. Cleanup: wait for app task to finish (with timeout)
    let _ = tokio::time::timeout(Duration::from_secs(5), async {
        let _ = app_handle.await;
    })
    .await;

    info!("Huddle shut down cleanly");
    Ok(())
}

fn build_sources(config: &Config) -> anyhow::Result<Sources> {
    match config.client.mode {
        ClientMode::Direct => {
            let league = SleeperClient::from_config(config).context("failed to build Sleeper client")?;
            let stats = StatsClient::from_config(config).context("failed to build stats client")?;
            if stats.is_active() {
                info!("Stats client active ({})", config.stats.base_url);
            } else {
                info!("Stats client disabled (no API key)");
            }
            Ok(Sources {
                league: Arc::new(league),
                stats: Arc::new(stats),
            })
        }
        ClientMode::Proxy => {
            let proxy = Arc::new(
                ProxyClient::from_config(config).context("failed to build proxy client")?,
            );
            info!("Routing requests through {}", config.client.proxy_url);
            Ok(Sources {
                league: proxy.clone(),
                stats: proxy,
            })
        }
    }
}
