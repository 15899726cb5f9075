//! Declared parameter schemas, checked before any dispatch.
//!
//! Runtime name-based dispatch only stays safe because every operation
//! carries an explicit schema: by the time a handler runs, every argument has
//! the declared kind and every constraint holds.

use crate::error::registry::RegistryError;
use crate::registry::Arguments;

use common::ErrorLocation;

use std::panic::Location;

use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Bool,
    Int,
    Float,
    Text,
    List,
    Record,
    /// A layer reference: either a layer name (text) or a list index (int).
    LayerRef,
}

impl ParamKind {
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            ParamKind::Bool => value.is_boolean(),
            ParamKind::Int => value.is_i64() || value.is_u64(),
            ParamKind::Float => value.is_number(),
            ParamKind::Text => value.is_string(),
            ParamKind::List => value.is_array(),
            ParamKind::Record => value.is_object(),
            ParamKind::LayerRef => value.is_string() || value.is_u64() || value.is_i64(),
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            ParamKind::Bool => "bool",
            ParamKind::Int => "int",
            ParamKind::Float => "float",
            ParamKind::Text => "text",
            ParamKind::List => "list",
            ParamKind::Record => "record",
            ParamKind::LayerRef => "layer name or index",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ParamSpec {
    pub name: &'static str,
    pub kind: ParamKind,
    pub required: bool,
    /// Numeric params only: reject values <= 0 (e.g. zoom, gamma).
    pub positive: bool,
}

impl ParamSpec {
    pub fn required(name: &'static str, kind: ParamKind) -> Self {
        Self {
            name,
            kind,
            required: true,
            positive: false,
        }
    }

    pub fn optional(name: &'static str, kind: ParamKind) -> Self {
        Self {
            name,
            kind,
            required: false,
            positive: false,
        }
    }

    pub fn positive(mut self) -> Self {
        self.positive = true;
        self
    }
}

/// Full parameter schema for one operation.
#[derive(Debug, Clone, Default)]
pub struct ParamSchema {
    params: Vec<ParamSpec>,
}

impl ParamSchema {
    pub fn new(params: Vec<ParamSpec>) -> Self {
        Self { params }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn params(&self) -> &[ParamSpec] {
        &self.params
    }

    /// Check `arguments` against this schema, collecting every problem in
    /// one pass. An explicit JSON `null` counts as an absent argument.
    #[track_caller]
    pub fn validate(&self, operation: &str, arguments: &Arguments) -> Result<(), RegistryError> {
        let mut missing = Vec::new();
        let mut mistyped = Vec::new();

        for spec in &self.params {
            let value = arguments.get(spec.name).filter(|v| !v.is_null());
            let Some(value) = value else {
                if spec.required {
                    missing.push(spec.name.to_string());
                }
                continue;
            };

            if !spec.kind.matches(value) {
                mistyped.push(format!(
                    "{}: expected {}, got {}",
                    spec.name,
                    spec.kind.describe(),
                    kind_of(value)
                ));
                continue;
            }

            if spec.positive {
                let numeric = value.as_f64().unwrap_or(f64::NAN);
                if numeric.is_nan() || numeric <= 0.0 {
                    mistyped.push(format!("{}: must be positive, got {numeric}", spec.name));
                }
            }
        }

        let unexpected: Vec<String> = arguments
            .keys()
            .filter(|key| !self.params.iter().any(|spec| spec.name == key.as_str()))
            .cloned()
            .collect();

        if missing.is_empty() && unexpected.is_empty() && mistyped.is_empty() {
            Ok(())
        } else {
            Err(RegistryError::InvalidArguments {
                operation: operation.to_string(),
                missing,
                unexpected,
                mistyped,
                location: ErrorLocation::from(Location::caller()),
            })
        }
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "text",
        Value::Array(_) => "list",
        Value::Object(_) => "record",
    }
}
