//! The GUI thread bridge.
//!
//! One dedicated thread owns the [`Viewer`] and drains an in-order task
//! queue; that thread is the GUI event loop as far as this crate is
//! concerned. The only data shared between the network side and the GUI
//! thread is each invocation's completion slot: a oneshot channel written
//! exactly once by the GUI thread and read exactly once by the waiting
//! caller.
//!
//! # Ordering
//!
//! Tasks are delivered in receipt order. The queue does not reorder, but it
//! also cannot stop host-initiated work running on the same thread from
//! interleaving between tasks.
//!
//! # Cancellation
//!
//! A deadline that elapses unblocks the caller with a timeout failure. The
//! queued task is not aborted (event-loop execution cannot be preempted);
//! its late completion is discarded when the send into the consumed slot
//! fails.

use crate::codec::Payload;
use crate::error::bridge::BridgeError;
use crate::error::viewer::ViewerError;
use crate::registry::{Arguments, OperationDescriptor};
use crate::viewer::Viewer;

use common::ErrorLocation;

use std::panic::Location;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use log::{info, warn};
use tokio::sync::{mpsc, oneshot};

/// One queued unit of work: the operation, its validated arguments, and the
/// single-use completion slot.
pub struct PendingInvocation {
    descriptor: Arc<OperationDescriptor>,
    arguments: Arguments,
    completion: oneshot::Sender<Result<Payload, ViewerError>>,
}

/// Handle for posting work onto the viewer's event-loop thread.
///
/// Cloning is cheap; all clones feed the same queue. The event loop exits
/// when every handle is dropped.
#[derive(Clone)]
pub struct GuiBridge {
    tasks: mpsc::UnboundedSender<PendingInvocation>,
}

impl GuiBridge {
    /// Take ownership of the viewer and start its event loop on a dedicated
    /// thread.
    pub fn spawn(viewer: Viewer) -> Self {
        let (tasks, queue) = mpsc::unbounded_channel();
        thread::spawn(move || event_loop(viewer, queue));
        Self { tasks }
    }

    /// Execute `descriptor` on the GUI thread and wait for its result.
    ///
    /// Blocks (asynchronously) until the GUI thread fills the completion
    /// slot or `timeout` elapses, whichever comes first.
    pub async fn invoke(
        &self,
        descriptor: Arc<OperationDescriptor>,
        arguments: Arguments,
        timeout: Duration,
    ) -> Result<Payload, BridgeError> {
        let operation = descriptor.name();
        let (completion, result) = oneshot::channel();

        self.tasks
            .send(PendingInvocation {
                descriptor,
                arguments,
                completion,
            })
            .map_err(|_| BridgeError::Closed {
                message: format!("GUI event loop is gone; cannot invoke '{operation}'"),
                location: ErrorLocation::from(Location::caller()),
            })?;

        match tokio::time::timeout(timeout, result).await {
            Err(_) => Err(BridgeError::Timeout {
                operation: operation.to_string(),
                timeout_ms: timeout.as_millis() as u64,
                location: ErrorLocation::from(Location::caller()),
            }),
            Ok(Err(_)) => Err(BridgeError::Closed {
                message: format!("GUI event loop dropped the completion slot for '{operation}'"),
                location: ErrorLocation::from(Location::caller()),
            }),
            Ok(Ok(Ok(payload))) => Ok(payload),
            Ok(Ok(Err(source))) => Err(BridgeError::Execution {
                operation: operation.to_string(),
                source,
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }
}

/// The event loop: drains the task queue in receipt order, executing each
/// handler against the owned viewer.
fn event_loop(mut viewer: Viewer, mut queue: mpsc::UnboundedReceiver<PendingInvocation>) {
    info!("Viewer event loop started");

    while let Some(task) = queue.blocking_recv() {
        let name = task.descriptor.name();
        let result = task.descriptor.execute(&mut viewer, &task.arguments);
        if task.completion.send(result).is_err() {
            // caller gave up (deadline elapsed); slot already consumed
            warn!("Discarding late completion of '{name}'");
        }
    }

    info!("Viewer event loop stopped");
}
