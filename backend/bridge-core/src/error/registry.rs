use common::ErrorLocation;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    /// An operation name was registered twice. Registration happens once at
    /// process start, so this is a programming error, not a runtime one.
    #[error("Duplicate Operation Error: '{name}' is already registered {location}")]
    DuplicateName {
        name: String,
        location: ErrorLocation,
    },

    #[error("Unknown Operation Error: '{name}' {location}")]
    UnknownOperation {
        name: String,
        location: ErrorLocation,
    },

    /// Arguments did not satisfy the operation's parameter schema. The three
    /// lists are reported together so a client can fix a call in one pass.
    #[error("Invalid Arguments Error: '{operation}': {summary} {location}", summary = problem_summary(missing, unexpected, mistyped))]
    InvalidArguments {
        operation: String,
        missing: Vec<String>,
        unexpected: Vec<String>,
        mistyped: Vec<String>,
        location: ErrorLocation,
    },
}

impl RegistryError {
    /// Flatten an `InvalidArguments` error into client-facing detail lines.
    pub fn argument_problems(&self) -> Vec<String> {
        match self {
            RegistryError::InvalidArguments {
                missing,
                unexpected,
                mistyped,
                ..
            } => {
                let mut details = Vec::new();
                details.extend(missing.iter().map(|p| format!("missing parameter: {p}")));
                details.extend(
                    unexpected
                        .iter()
                        .map(|p| format!("unexpected parameter: {p}")),
                );
                details.extend(mistyped.iter().map(|p| format!("mistyped parameter: {p}")));
                details
            }
            _ => Vec::new(),
        }
    }
}

fn problem_summary(missing: &[String], unexpected: &[String], mistyped: &[String]) -> String {
    format!(
        "{} missing, {} unexpected, {} mistyped",
        missing.len(),
        unexpected.len(),
        mistyped.len()
    )
}
