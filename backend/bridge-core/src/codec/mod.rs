//! Result values in wire-transmissible form.
//!
//! A [`Payload`] is a tagged variant over everything a viewer operation can
//! return: scalars, text, lists, records, or a self-describing binary image
//! block. Tagging is explicit so image bytes never ride inside an ambiguous
//! generic value; the remote side always knows what it is decoding.
//!
//! Serialization goes through serde to the protocol's JSON value model, once
//! per response. Incoming call arguments stay in the protocol's native JSON
//! map and are validated by the registry schema instead.

pub mod image;

pub use image::ImageBlock;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Payload {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    List(Vec<Payload>),
    Record(BTreeMap<String, Payload>),
    Image(ImageBlock),
}

impl Payload {
    pub fn text(value: impl Into<String>) -> Self {
        Payload::Text(value.into())
    }

    pub fn record<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Payload)>,
    {
        Payload::Record(
            entries
                .into_iter()
                .map(|(key, value)| (key.into(), value))
                .collect(),
        )
    }

    pub fn float_list(values: &[f64]) -> Self {
        Payload::List(values.iter().map(|v| Payload::Float(*v)).collect())
    }

    /// `Text` when present, `Null` otherwise.
    pub fn opt_text(value: Option<impl Into<String>>) -> Self {
        match value {
            Some(text) => Payload::Text(text.into()),
            None => Payload::Null,
        }
    }
}

impl From<bool> for Payload {
    fn from(value: bool) -> Self {
        Payload::Bool(value)
    }
}

impl From<i64> for Payload {
    fn from(value: i64) -> Self {
        Payload::Int(value)
    }
}

impl From<f64> for Payload {
    fn from(value: f64) -> Self {
        Payload::Float(value)
    }
}

impl From<&str> for Payload {
    fn from(value: &str) -> Self {
        Payload::Text(value.to_string())
    }
}

impl From<String> for Payload {
    fn from(value: String) -> Self {
        Payload::Text(value)
    }
}
