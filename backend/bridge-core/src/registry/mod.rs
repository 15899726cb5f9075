//! Process-wide table of viewer operations.
//!
//! Each operation is an [`OperationDescriptor`]: a stable name, a parameter
//! schema, and a handler mapping validated arguments to a [`Payload`] or a
//! domain error. The registry is built once at startup and shared read-only
//! behind an `Arc` afterwards, so lookups are safe from any thread. Handlers
//! themselves only ever run on the GUI thread (see [`crate::gui`]) and never
//! perform socket I/O.

pub mod catalog;
pub mod schema;

pub use schema::{ParamKind, ParamSchema, ParamSpec};

use crate::codec::Payload;
use crate::error::registry::RegistryError;
use crate::error::viewer::ViewerError;
use crate::viewer::Viewer;

use common::ErrorLocation;

use std::collections::HashMap;
use std::fmt;
use std::panic::Location;
use std::sync::Arc;

/// Arguments of one tool call: parameter name to JSON value.
pub type Arguments = serde_json::Map<String, serde_json::Value>;

type Handler = dyn Fn(&mut Viewer, &Arguments) -> Result<Payload, ViewerError> + Send + Sync;

pub struct OperationDescriptor {
    name: &'static str,
    /// One-line result-shape hint, surfaced to operators and logs.
    summary: &'static str,
    schema: ParamSchema,
    handler: Box<Handler>,
}

impl OperationDescriptor {
    pub fn new(
        name: &'static str,
        summary: &'static str,
        schema: ParamSchema,
        handler: impl Fn(&mut Viewer, &Arguments) -> Result<Payload, ViewerError>
        + Send
        + Sync
        + 'static,
    ) -> Self {
        Self {
            name,
            summary,
            schema,
            handler: Box::new(handler),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn summary(&self) -> &'static str {
        self.summary
    }

    pub fn schema(&self) -> &ParamSchema {
        &self.schema
    }

    /// Run the handler. Callers must already have validated `arguments`
    /// against [`Self::schema`] and must be on the GUI thread.
    pub fn execute(&self, viewer: &mut Viewer, arguments: &Arguments) -> Result<Payload, ViewerError> {
        (self.handler)(viewer, arguments)
    }
}

impl fmt::Debug for OperationDescriptor {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("OperationDescriptor")
            .field("name", &self.name)
            .field("summary", &self.summary)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Default)]
pub struct OperationRegistry {
    operations: HashMap<&'static str, Arc<OperationDescriptor>>,
}

impl OperationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a descriptor to its name. Rebinding an existing name is refused;
    /// registration happens exactly once at process start.
    pub fn register(&mut self, descriptor: OperationDescriptor) -> Result<(), RegistryError> {
        let name = descriptor.name();
        if self.operations.contains_key(name) {
            return Err(RegistryError::DuplicateName {
                name: name.to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }
        self.operations.insert(name, Arc::new(descriptor));
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Result<Arc<OperationDescriptor>, RegistryError> {
        self.operations
            .get(name)
            .cloned()
            .ok_or_else(|| RegistryError::UnknownOperation {
                name: name.to_string(),
                location: ErrorLocation::from(Location::caller()),
            })
    }

    /// Lookup plus schema validation in one step; the per-request path the
    /// server uses.
    pub fn validate(
        &self,
        name: &str,
        arguments: &Arguments,
    ) -> Result<Arc<OperationDescriptor>, RegistryError> {
        let descriptor = self.lookup(name)?;
        descriptor.schema().validate(name, arguments)?;
        Ok(descriptor)
    }

    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.operations.keys().copied().collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}
