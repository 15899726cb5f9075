//! Server lifecycle orchestration for the host application.
//!
//! The host UI exposes two actions, "Start Server" and "Stop Server"; both
//! map onto this controller and both are idempotent. Starting while already
//! listening reports the existing address instead of opening a second
//! socket; stopping while idle is a no-op. The host must call
//! [`SessionController::stop`] before process exit so the bound address is
//! released synchronously.

use crate::error::server::ServerError;
use crate::gui::GuiBridge;
use crate::registry::OperationRegistry;
use crate::server::{ServerHandle, start_server};

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use log::info;

pub struct SessionController {
    registry: Arc<OperationRegistry>,
    bridge: GuiBridge,
    invoke_timeout: Duration,
    server: Option<ServerHandle>,
}

impl SessionController {
    pub fn new(
        registry: Arc<OperationRegistry>,
        bridge: GuiBridge,
        invoke_timeout: Duration,
    ) -> Self {
        Self {
            registry,
            bridge,
            invoke_timeout,
            server: None,
        }
    }

    /// Start listening, or report the existing address when already running.
    pub async fn start(&mut self, host: &str, port: u16) -> Result<SocketAddr, ServerError> {
        if let Some(handle) = &self.server {
            let addr = handle.local_addr();
            info!("Start requested but server is already listening on {addr}");
            return Ok(addr);
        }

        let handle = start_server(
            host,
            port,
            Arc::clone(&self.registry),
            self.bridge.clone(),
            self.invoke_timeout,
        )
        .await?;
        let addr = handle.local_addr();
        self.server = Some(handle);
        Ok(addr)
    }

    /// Stop the server and wait for the bound address to be released. No-op
    /// when idle.
    pub async fn stop(&mut self) {
        match self.server.take() {
            Some(handle) => {
                let addr = handle.local_addr();
                handle.shutdown().await;
                info!("Server on {addr} stopped");
            }
            None => info!("Stop requested but server is idle"),
        }
    }

    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.server.as_ref().map(ServerHandle::local_addr)
    }

    pub fn is_running(&self) -> bool {
        self.server.is_some()
    }
}
