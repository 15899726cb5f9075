use viewbridge::error::ViewbridgeError;
use viewbridge::logger::initialize as LoggerInitialize;
use viewbridge::state::{AppState, StateCommand};

use bridge_core::config::AppConfig;
use bridge_core::gui::GuiBridge;
use bridge_core::registry::catalog;
use bridge_core::session::SessionController;
use bridge_core::viewer::Viewer;

use common::ErrorLocation;

use std::fs::create_dir_all;
use std::panic::Location;
use std::process::ExitCode;
use std::sync::Arc;

use log::{error, info, warn};

const APP_DIR_NAME: &str = "viewbridge";

/// Exit code when the control server cannot bind its address. Distinct from
/// generic startup failure so supervisors can tell the two apart.
const BIND_FAILURE_EXIT: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(e) => {
            // the logger may not be up yet; stderr is the fallback
            eprintln!("{e}");
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<ExitCode, ViewbridgeError> {
    let log_dir = dirs::data_local_dir()
        .map(|dir| dir.join(APP_DIR_NAME).join("logs"))
        .ok_or_else(|| app_error("No local data directory available for logs"))?;
    create_dir_all(&log_dir)
        .map_err(|e| app_error(format!("Failed to create log directory: {e}")))?;
    LoggerInitialize(&log_dir)?;

    info!("Viewbridge starting");
    info!("Log directory: {}", log_dir.display());

    // A corrupt config must not keep the viewer host from starting
    let config = match dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME)) {
        Some(config_dir) => match AppConfig::load(&config_dir) {
            Ok(config) => config,
            Err(e) => {
                error!("Config unusable, falling back to defaults: {e}");
                AppConfig::default()
            }
        },
        None => {
            warn!("No config directory available, using defaults");
            AppConfig::default()
        }
    };

    let state = AppState::default();
    let viewer = Viewer::new(config.canvas.width, config.canvas.height);
    let bridge = GuiBridge::spawn(viewer);
    let registry = catalog::builtin()
        .map_err(|e| app_error(format!("Failed to build operation catalog: {e}")))?;
    let mut controller = SessionController::new(
        Arc::new(registry),
        bridge,
        config.server.invoke_timeout(),
    );

    let addr = match controller
        .start(&config.server.host, config.server.port)
        .await
    {
        Ok(addr) => addr,
        Err(e) => {
            error!("Failed to start control server: {e}");
            return Ok(ExitCode::from(BIND_FAILURE_EXIT));
        }
    };
    if let Err(e) = state.update(StateCommand::SetListening(addr)).await {
        warn!("Failed to record listening address: {e}");
    }

    info!("Control server ready on {addr}");

    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to wait for shutdown signal: {e}");
    }
    info!("Shutting down");

    // release the bound address before exit
    controller.stop().await;
    if let Err(e) = state.update(StateCommand::ClearListening).await {
        warn!("Failed to clear listening address: {e}");
    }

    Ok(ExitCode::SUCCESS)
}

#[track_caller]
fn app_error(message: impl Into<String>) -> ViewbridgeError {
    ViewbridgeError::App {
        message: message.into(),
        location: ErrorLocation::from(Location::caller()),
    }
}
