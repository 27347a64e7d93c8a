mod app;

use std::{
    fs::{self, File, OpenOptions},
    sync::Mutex,
};

use anyhow::{Context, Result};
use handtally_core::config::{self, AppConfig};
use tracing::{subscriber::NoSubscriber, warn};
use tracing_subscriber::{prelude::*, EnvFilter};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let (config, warnings) = AppConfig::load_or_default(&config::default_config_path());
    setup_logging(&config);
    for warning in &warnings {
        warn!("{warning}");
    }

    let mut app = app::HandtallyApp::new(config);
    match app.run().await {
        Ok(exit) => {
            tracing::info!(?exit, "Exiting");
            for line in exit.farewell() {
                println!("{line}");
            }
            Ok(())
        }
        Err(err) => {
            tracing::error!(?err, "Unexpected error");
            Err(err)
        }
    }
}

/// Install file logging, or a no-op subscriber when the log file is unavailable.
fn setup_logging(config: &AppConfig) -> bool {
    match init_logging(config) {
        Ok(()) => true,
        Err(_) => {
            let _ = tracing::subscriber::set_global_default(NoSubscriber::default());
            false
        }
    }
}

fn init_logging(config: &AppConfig) -> Result<()> {
    let log_file = open_log_file(config)?;
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // The alternate screen owns stdout, so only the file layer is installed.
    let file_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_ansi(false)
        .compact()
        .with_writer(Mutex::new(log_file));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .try_init()?;

    Ok(())
}

fn open_log_file(config: &AppConfig) -> Result<File> {
    let log_dir = config.log_dir();
    fs::create_dir_all(&log_dir)
        .with_context(|| format!("failed to create {}", log_dir.display()))?;
    let log_path = log_dir.join("handtally.log");
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("failed to open {}", log_path.display()))
}
