//! Handle to a running bridge server.

use std::net::SocketAddr;

use log::warn;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Represents a bound, running server task.
///
/// Returned by [`start_server`](crate::server::start_server). Holds the
/// shutdown signal and the accept-loop task; [`Self::shutdown`] stops the
/// server and waits for the task to finish, releasing the bound address.
pub struct ServerHandle {
    pub(crate) local_addr: SocketAddr,
    pub(crate) shutdown: watch::Sender<bool>,
    pub(crate) task: JoinHandle<()>,
}

impl ServerHandle {
    /// The address the listener actually bound, with the resolved port when
    /// an ephemeral port (0) was requested.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Signal shutdown and wait for the accept loop to exit.
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(true);
        if let Err(e) = self.task.await {
            warn!("Server task did not shut down cleanly: {e}");
        }
    }
}
