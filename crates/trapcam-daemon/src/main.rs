//! Camera trap daemon binary.

use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use trapcam_daemon::{SimulatedSensor, TrapConfig, TrapController};

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing with colored output for dev, JSON for production
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::from_default_env()
        .add_directive("trapcam_daemon=info".parse().unwrap())
        .add_directive("trapcam_media=info".parse().unwrap());

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }

    info!("Starting trapcam-daemon");

    // Load configuration
    let config = TrapConfig::from_env();
    info!("Trap config: {:?}", config);

    // The PIR driver is not wired up yet; run against the simulated sensor.
    let sensor = Box::new(SimulatedSensor::idle());

    let mut controller = match TrapController::new(config, sensor).await {
        Ok(c) => c,
        Err(e) => {
            match &e {
                trapcam_daemon::TrapError::Media(trapcam_media::MediaError::ModuleNotFound(
                    name,
                )) => {
                    error!("{} module not found, ensure connections are secure", name);
                }
                _ => {
                    error!("Failed to initialize camera trap: {}", e);
                }
            }
            std::process::exit(1);
        }
    };

    // Setup signal handler
    let shutdown = controller.shutdown_handle();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("Received shutdown signal");
        let _ = shutdown.send(true);
    });

    // Run controller
    if let Err(e) = controller.run().await {
        error!("Camera trap error: {}", e);
        std::process::exit(1);
    }

    info!("Camera trap shutdown complete");
}
