//! Quitanda server binary

use tracing::info;

use quitanda_common::wait_for_shutdown_signal;
use quitanda_migration::{Migrator, MigratorTrait};
use quitanda_server::{
    metrics,
    model::Configuration,
    startup::{assemble_state, http_server, init_logging},
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let configuration = Configuration::new();

    let _logging_guard = init_logging(&configuration.logging_config())?;

    metrics::init_metrics();
    if configuration.metrics_enabled() {
        metrics::install_exporter(configuration.metrics_port())?;
    }

    let database_connection = configuration.database_connection().await?;
    if configuration.db_auto_migrate() {
        Migrator::up(&database_connection, None).await?;
        info!("Database migrations applied");
    }

    let app_state = assemble_state(configuration.clone(), database_connection);

    let shutdown = wait_for_shutdown_signal().await;
    let relay_handle = app_state.relay.clone().start(shutdown.clone());

    let address = app_state.configuration.server_address();
    let port = app_state.configuration.server_port();
    let server = http_server(app_state, address.clone(), port)?;
    info!(%address, port, "Quitanda server listening");

    let mut shutdown_rx = shutdown.subscribe();
    tokio::select! {
        result = server => {
            result?;
        }
        _ = shutdown_rx.recv() => {
            info!("Shutting down");
        }
    }

    shutdown.shutdown();
    let _ = relay_handle.await;

    Ok(())
}
