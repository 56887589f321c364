// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Kliros.

use std::fmt;

use thiserror::Error;

/// Top-level error type for all Kliros operations.
#[derive(Debug, Error)]
pub enum KlirosError {
    // -- Loading --
    /// Network, HTTP status, or malformed JSON while loading a document.
    #[error("failed to load {resource}: {detail}")]
    Transport { resource: String, detail: String },

    /// Structural violation found by the validator.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    // -- Import / export --
    #[error("unsupported file format: {0}")]
    UnsupportedFormat(String),

    // -- Admin --
    #[error("backup {0} not found")]
    BackupNotFound(i64),

    #[error("no {0} document is loaded")]
    NoDocument(&'static str),

    #[error("news item '{0}' not found")]
    NewsNotFound(String),

    #[error("service '{0}' not found")]
    ServiceNotFound(String),

    // -- Storage / persistence --
    #[error("storage error: {0}")]
    Storage(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl KlirosError {
    /// Shorthand for a transport failure on `resource`.
    pub fn transport(resource: impl Into<String>, detail: impl fmt::Display) -> Self {
        Self::Transport {
            resource: resource.into(),
            detail: detail.to_string(),
        }
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, KlirosError>;

/// What exactly is wrong with a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// Absent, null, empty string, or zero.
    Missing,
    /// Present but of the wrong JSON type.
    WrongType { expected: &'static str },
    /// An array that must hold at least one element is empty.
    Empty,
    /// Right type, unacceptable value.
    Invalid(String),
}

/// First structural violation found in a document.
///
/// `record` is the 1-based index of the offending record, or `None` when the
/// problem sits at the document root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: String,
    pub record: Option<usize>,
    pub violation: Violation,
}

impl ValidationError {
    pub fn root(field: impl Into<String>, violation: Violation) -> Self {
        Self {
            field: field.into(),
            record: None,
            violation,
        }
    }

    pub fn in_record(field: impl Into<String>, record: usize, violation: Violation) -> Self {
        Self {
            field: field.into(),
            record: Some(record),
            violation,
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.violation {
            Violation::Missing => write!(f, "missing required field \"{}\"", self.field)?,
            Violation::WrongType { expected } => {
                write!(f, "field \"{}\" must be {expected}", self.field)?
            }
            Violation::Empty => write!(f, "field \"{}\" must not be empty", self.field)?,
            Violation::Invalid(detail) => {
                write!(f, "field \"{}\" is invalid: {detail}", self.field)?
            }
        }
        if let Some(record) = self.record {
            write!(f, " in record {record}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}
