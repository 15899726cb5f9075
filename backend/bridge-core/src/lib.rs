//! Core of the viewer control bridge.
//!
//! This crate lets a remote control-protocol client drive a running viewer
//! as if its operations were local function calls. The pieces, leaves first:
//!
//! - [`registry`] - named viewer operations with parameter schemas
//! - [`gui`] - marshals invocations onto the viewer's event-loop thread
//! - [`codec`] - wire-transmissible result values, including image blocks
//! - [`protocol`] - the line-delimited JSON request/response surface
//! - [`server`] - loopback TCP server owning the connection lifecycle
//! - [`session`] - idempotent start/stop exposed to the host application
//!
//! The viewer itself is an external collaborator; [`viewer`] models exactly
//! the command surface the operation catalog needs.

pub mod codec;
pub mod config;
pub mod error;
pub mod gui;
pub mod protocol;
pub mod registry;
pub mod server;
pub mod session;
pub mod viewer;

#[cfg(test)]
mod tests;

/// The server only ever binds to loopback; the bridge is a local IPC surface,
/// not a network service.
pub const LOOPBACK_HOST: &str = "127.0.0.1";

/// Default control port. Port 0 requests an ephemeral port instead.
pub const DEFAULT_PORT: u16 = 64908;

pub const DEFAULT_BIND_ADDRESS: &str =
    const_format::concatcp!(LOOPBACK_HOST, ":", DEFAULT_PORT);
