//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::node::SettingKind;

/// Domain errors represent lookup and syntax violations.
/// These are independent of file and terminal concerns.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("setting not found: {path}")]
    SettingNotFound { path: String },

    #[error("setting type mismatch: {path} ('{segment}' cannot be looked up in {kind})")]
    SettingTypeMismatch {
        path: String,
        segment: String,
        kind: SettingKind,
    },

    #[error("unknown common setting alias: {0}")]
    UnknownAlias(String),

    #[error("line {line}: {message}")]
    Syntax { line: usize, message: String },
}

impl DomainError {
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::SettingNotFound { path: path.into() }
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
