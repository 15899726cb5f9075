use std::net::SocketAddr;
use std::sync::Arc;

use log::{info, warn};
use tokio::sync::{Mutex, RwLock, mpsc};

/// Commands that mutate application state.
///
/// All state mutations go through the state actor via these commands so
/// access stays serialized even when the UI and the server lifecycle race.
#[derive(Debug, Clone)]
pub enum StateCommand {
    /// Record the address the control server is listening on
    SetListening(SocketAddr),

    /// Clear the listening address (after stop)
    ClearListening,
}

/// Application state manager.
///
/// Uses an actor pattern: commands are processed sequentially by a dedicated
/// task while reads go straight through a shared RwLock.
#[derive(Clone)]
pub struct AppState {
    /// Channel to send state mutation commands to the actor
    command_tx: Arc<Mutex<Option<mpsc::Sender<StateCommand>>>>,

    /// Shared read access to the server's listening address
    listening: Arc<RwLock<Option<SocketAddr>>>,

    /// Tracks whether the actor has been spawned
    actor_init: Arc<Mutex<bool>>,
}

impl AppState {
    /// Create a new state manager.
    ///
    /// The actor is lazily spawned on first use within an async context.
    pub fn new() -> Self {
        Self {
            command_tx: Arc::new(Mutex::new(None)),
            listening: Arc::new(RwLock::new(None)),
            actor_init: Arc::new(Mutex::new(false)),
        }
    }

    /// Send a state update command.
    ///
    /// Returns an error if the state actor has died (should never happen).
    pub async fn update(&self, cmd: StateCommand) -> Result<(), String> {
        self.ensure_actor().await;

        let tx_guard = self.command_tx.lock().await;
        let tx = tx_guard.as_ref().ok_or("Actor not initialized")?;
        tx.send(cmd)
            .await
            .map_err(|e| format!("State actor died: {e}"))
    }

    /// Current listening address, `None` while the server is idle.
    pub async fn get_listening(&self) -> Option<SocketAddr> {
        *self.listening.read().await
    }

    /// Ensure the actor is spawned (called lazily from async context)
    async fn ensure_actor(&self) {
        let mut init_guard = self.actor_init.lock().await;
        if !*init_guard {
            let (tx, rx) = mpsc::channel(100);
            let listening_clone = Arc::clone(&self.listening);

            // Store tx before spawning to avoid a race with early updates
            let mut tx_guard = self.command_tx.lock().await;
            *tx_guard = Some(tx);
            drop(tx_guard);

            tokio::spawn(state_actor(rx, listening_clone));
            *init_guard = true;
            info!("State actor spawned");
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// The state actor task.
///
/// Owns the mutable state and processes commands sequentially.
async fn state_actor(
    mut command_rx: mpsc::Receiver<StateCommand>,
    listening: Arc<RwLock<Option<SocketAddr>>>,
) {
    info!("State actor started");

    while let Some(cmd) = command_rx.recv().await {
        match cmd {
            StateCommand::SetListening(addr) => {
                let mut write = listening.write().await;

                if let Some(existing) = *write {
                    warn!("Replacing listening address {existing} with {addr}");
                } else {
                    info!("Server listening on {addr}");
                }

                *write = Some(addr);
            }
            StateCommand::ClearListening => {
                let mut write = listening.write().await;

                match *write {
                    Some(addr) => info!("Clearing listening address {addr}"),
                    None => warn!("Clear requested but no server was listening"),
                }

                *write = None;
            }
        }
    }

    warn!("State actor stopped - this should not happen during normal operation");
}
