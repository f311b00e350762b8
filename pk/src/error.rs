//! Prompt error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading or interpolating a prompt
#[derive(Debug, Error)]
pub enum PromptError {
    #[error("Missing variables: {}", .variables.join(", "))]
    MissingVariables {
        /// Unbound identifiers, de-duplicated, in first-occurrence order
        variables: Vec<String>,
        /// The template text that referenced them
        template: String,
    },

    #[error("Namespace {namespace} is not defined in path aliases")]
    NamespaceUndefined { namespace: String },

    #[error("Failed to read template file {}: {source}", .path.display())]
    LoadFileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PromptError {
    /// Check if this is a missing-variables error
    pub fn is_missing_variables(&self) -> bool {
        matches!(self, PromptError::MissingVariables { .. })
    }

    /// Check if this error came from the loader
    pub fn is_load_error(&self) -> bool {
        match self {
            PromptError::MissingVariables { .. } => false,
            PromptError::NamespaceUndefined { .. } => true,
            PromptError::LoadFileRead { .. } => true,
        }
    }

    /// Get the missing identifier names if this is a missing-variables error
    pub fn missing_variables(&self) -> Option<&[String]> {
        match self {
            PromptError::MissingVariables { variables, .. } => Some(variables),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, PromptError>;
