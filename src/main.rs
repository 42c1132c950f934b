//! Nightcap - anti-sleep clicking and delayed shutdown behind a local control server
//!
//! This is the main entry point for the nightcap application.

use tokio::net::TcpListener;
use tracing::{info, warn};

use nightcap::{
    api::create_router,
    config::Config,
    services::{DryRunGateway, OsGateway, SystemGateway},
    state::AppState,
    tasks::{run_event_loop, ControlHandle},
    utils::close_on_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("nightcap={},tower_http=info", config.log_level()))
        .init();

    info!("Starting nightcap v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration: host={}, port={}, interval={}s, offset={}h{}m, dry_run={}",
        config.host, config.port, config.interval, config.hours, config.minutes, config.dry_run
    );

    let gateway: Box<dyn OsGateway> = if config.dry_run {
        info!("Dry run: clicks and shutdown commands will only be logged");
        Box::new(DryRunGateway::new())
    } else {
        let gateway = SystemGateway::new();
        if let Err(e) = gateway.probe() {
            warn!("{}; anti-sleep clicks will fail until input is available", e);
        }
        Box::new(gateway)
    };

    let state = AppState::new(config.port, config.host.clone(), config.defaults());
    let (handle, commands) = ControlHandle::channel(32);

    // The event loop owns all state; it ends when a close is accepted
    let event_loop = tokio::spawn(run_event_loop(state, gateway, commands));
    tokio::spawn(close_on_signal(handle.clone()));

    let app = create_router(handle);

    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /anti-sleep/start  - Start clicking in place on an interval");
    info!("  POST /anti-sleep/stop   - Stop clicking");
    info!("  POST /shutdown/schedule - Schedule an OS shutdown");
    info!("  POST /shutdown/cancel   - Cancel the scheduled shutdown");
    info!("  POST /close             - Close (add ?confirm=true with a shutdown pending)");
    info!("  GET  /status            - Controls, countdown and errors");
    info!("  GET  /health            - Health check");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            match event_loop.await {
                Ok(state) => {
                    if state.shutdown.is_pending() {
                        info!("Leaving the scheduled shutdown in place");
                    }
                }
                Err(e) => tracing::error!("Event loop failed: {}", e),
            }
        })
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
