//! Shared primitives for the viewbridge workspace.
//!
//! This crate contains pure data types passed between layers. It has no
//! business logic.
//!
//! ## Architecture
//!
//! - **common** (this crate): shared primitives
//! - **bridge-core**: bridge logic operating on them
//! - **viewbridge**: host application wiring everything together

pub mod error;

pub use error::error_location::ErrorLocation;
