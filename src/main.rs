use std::sync::Arc;

use log::{error, info, warn};

use wd_bridge::config::BridgeConfig;
use wd_bridge::hub::LogHub;
use wd_bridge::ingest::{Lifecycle, Receiver};
use wd_bridge::Engine;

/// Re-read the parameter sources on SIGHUP and rebuild the channel mapping.
#[cfg(unix)]
async fn reload_on_hangup(config: BridgeConfig, engine: Arc<Engine>) {
    use tokio::signal::unix::{signal, SignalKind};

    let mut hangup = match signal(SignalKind::hangup()) {
        Ok(hangup) => hangup,
        Err(e) => {
            warn!("Configuration reload on SIGHUP unavailable: {}", e);
            return;
        }
    };

    while hangup.recv().await.is_some() {
        info!("SIGHUP received, reloading configuration");
        match config.reload_params() {
            Ok(params) => {
                // Errors are logged by the engine; the old mapping stays active
                let _ = engine.apply_config(&params);
            }
            Err(e) => error!("Failed to reload configuration: {}", e),
        }
    }
}

#[cfg(not(unix))]
async fn reload_on_hangup(_config: BridgeConfig, _engine: Arc<Engine>) {}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .format_timestamp_secs()
        .init();

    // Load configuration
    let config = match BridgeConfig::new() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return Err(e);
        }
    };

    let hub = Arc::new(LogHub::new());
    let engine = Arc::new(Engine::new(hub.clone()));

    let settings = match engine.apply_config(&config.params) {
        Ok(settings) => settings,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            return Err(e.into());
        }
    };

    let lifecycle = Lifecycle::new();
    let receiver = match Receiver::bind(
        &settings.transport,
        engine.clone(),
        lifecycle.clone(),
        config.decimation,
    )
    .await
    {
        Ok(receiver) => receiver,
        Err(e) => {
            error!("Fatal error: {}", e);
            return Err(e.into());
        }
    };
    let handle = receiver.start();

    tokio::spawn(reload_on_hangup(config, engine.clone()));

    // Handle Ctrl+C gracefully
    tokio::signal::ctrl_c().await?;
    info!("Program terminated by user. Exiting gracefully.");
    lifecycle.stop();

    match handle.await {
        Ok(stats) => info!(
            "Published {} values from {} records",
            hub.reports(),
            stats.dispatched
        ),
        Err(e) => error!("Receiver task failed: {}", e),
    }

    Ok(())
}
