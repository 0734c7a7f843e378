//! # AppError
//!
//! Centralized error handling for the Ruddit core.
//! Maps local and remote failures to actionable error types.

use std::fmt;
use thiserror::Error;

/// Form fields that can fail validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Title,
    Topic,
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormField::Title => f.write_str("title"),
            FormField::Topic => f.write_str("topic"),
        }
    }
}

/// One failed field and the message to show next to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: FormField,
    pub message: &'static str,
}

/// Every field-level problem found in a single validation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn push(&mut self, field: FormField, message: &'static str) {
        self.0.push(FieldError { field, message });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = FormField> + '_ {
        self.0.iter().map(|e| e.field)
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    /// Returns the message attached to `field`, if it failed.
    pub fn message_for(&self, field: FormField) -> Option<&'static str> {
        self.0.iter().find(|e| e.field == field).map(|e| e.message)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", e.field, e.message)?;
        }
        Ok(())
    }
}

/// The primary error type for all rd-core operations.
#[derive(Error, Debug)]
pub enum AppError {
    /// A required form field is missing; detected locally, nothing was sent
    #[error("validation error: {0}")]
    Validation(ValidationErrors),

    /// A gateway read or write failed (transport, backend, or timeout)
    #[error("remote operation failed: {0}")]
    RemoteOperation(#[source] anyhow::Error),

    /// The action needs a signed-in viewer
    #[error("unauthenticated: {0}")]
    Unauthenticated(String),
}

impl AppError {
    pub fn is_validation(&self) -> bool {
        matches!(self, AppError::Validation(_))
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, AppError::RemoteOperation(_))
    }
}

/// A specialized Result type for Ruddit logic.
pub type Result<T> = std::result::Result<T, AppError>;
