use anyhow::Context;
use fleetglass_core::{logging, SessionConfig};
use fleetglass_link::{LogPresenter, SessionDriver, TelemetrySession, WsTransport};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();

    let config = SessionConfig::default();
    info!(
        endpoint = %config.endpoint,
        max_rows = config.max_rows,
        reconnect_delay_ms = config.reconnect_delay_ms,
        "FleetGlass console starting"
    );

    let session = TelemetrySession::new(config).context("invalid session configuration")?;
    let driver = SessionDriver::new(session, WsTransport::new(), LogPresenter::default());
    let handle = driver.handle();
    let driver_task = tokio::spawn(driver.run());

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for shutdown signal")?;
    info!("Shutdown requested");

    handle.dispose().await?;
    let session = driver_task.await.context("session driver panicked")?;

    let snapshot = session.snapshot();
    info!(
        summary = %serde_json::to_string(&snapshot)?,
        "FleetGlass console stopped"
    );
    Ok(())
}
