//! Error conversion helpers for reading configuration files
//!
//! Provides extension traits for cleaner error handling with path context.

use std::io;
use std::path::Path;

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{DomainError, DomainResult};

/// Extension trait for converting `io::Result` to `ApplicationResult` with context.
pub trait IoResultExt<T> {
    /// Attach the file being read to an I/O error.
    ///
    /// # Example
    /// ```ignore
    /// fs.read_to_string(&path).with_path_context(&path)?;
    /// ```
    fn with_path_context(self, path: &Path) -> ApplicationResult<T>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn with_path_context(self, path: &Path) -> ApplicationResult<T> {
        self.map_err(|e| ApplicationError::FileIo {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

/// Extension trait for attaching the file name to parser errors.
pub trait ParseResultExt<T> {
    fn with_file_context(self, file: &Path) -> ApplicationResult<T>;
}

impl<T> ParseResultExt<T> for DomainResult<T> {
    fn with_file_context(self, file: &Path) -> ApplicationResult<T> {
        self.map_err(|e| match e {
            DomainError::Syntax { line, message } => ApplicationError::Parse {
                file: file.to_path_buf(),
                line,
                message,
            },
            other => ApplicationError::Domain(other),
        })
    }
}
