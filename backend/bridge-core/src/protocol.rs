//! Wire surface of the bridge: one JSON object per line, each direction.
//!
//! Requests are either a tool call or a liveness probe:
//!
//! ```json
//! {"type": "call", "id": 7, "name": "list_layers", "arguments": {}}
//! {"type": "ping", "id": 8}
//! ```
//!
//! Every well-formed request gets exactly one response, correlated by `id`:
//!
//! ```json
//! {"status": "ok", "id": 7, "payload": {"type": "list", "value": []}}
//! {"status": "error", "id": 7, "error": {"code": "unknown_operation", "message": "..."}}
//! {"status": "pong", "id": 8}
//! ```
//!
//! The probe is answered inline by the server without touching the GUI
//! thread, so a client can test connectivity with a bounded timeout before
//! issuing real operations.

use crate::codec::Payload;
use crate::error::bridge::BridgeError;
use crate::error::registry::RegistryError;
use crate::registry::Arguments;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Request {
    Call {
        id: u64,
        name: String,
        #[serde(default)]
        arguments: Arguments,
    },
    Ping {
        id: u64,
    },
}

impl Request {
    pub fn id(&self) -> u64 {
        match self {
            Request::Call { id, .. } | Request::Ping { id } => *id,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    UnknownOperation,
    InvalidArguments,
    ExecutionError,
    Timeout,
    MalformedPayload,
    ConnectionLost,
    InternalError,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireError {
    pub code: ErrorCode,
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Response {
    Ok { id: u64, payload: Payload },
    Error { id: u64, error: WireError },
    Pong { id: u64 },
}

impl Response {
    pub fn ok(id: u64, payload: Payload) -> Self {
        Response::Ok { id, payload }
    }

    pub fn pong(id: u64) -> Self {
        Response::Pong { id }
    }

    pub fn error(id: u64, code: ErrorCode, message: impl Into<String>) -> Self {
        Response::Error {
            id,
            error: WireError {
                code,
                message: message.into(),
                details: Vec::new(),
            },
        }
    }

    /// Failure response for a lookup/validation error resolved at the server
    /// boundary.
    pub fn registry_failure(id: u64, error: &RegistryError) -> Self {
        let code = match error {
            RegistryError::UnknownOperation { .. } => ErrorCode::UnknownOperation,
            RegistryError::InvalidArguments { .. } => ErrorCode::InvalidArguments,
            // duplicate registration cannot reach the wire; report as internal
            RegistryError::DuplicateName { .. } => ErrorCode::InternalError,
        };
        Response::Error {
            id,
            error: WireError {
                code,
                message: error.to_string(),
                details: error.argument_problems(),
            },
        }
    }

    /// Failure response for an invocation that made it past validation.
    pub fn bridge_failure(id: u64, error: &BridgeError) -> Self {
        let code = match error {
            BridgeError::Timeout { .. } => ErrorCode::Timeout,
            BridgeError::Execution { .. } => ErrorCode::ExecutionError,
            BridgeError::Closed { .. } => ErrorCode::InternalError,
        };
        Response::error(id, code, error.to_string())
    }

    pub fn id(&self) -> u64 {
        match self {
            Response::Ok { id, .. } | Response::Error { id, .. } | Response::Pong { id } => *id,
        }
    }
}
