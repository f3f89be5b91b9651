//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::application::services::QueryService;
use crate::config::Settings;
use crate::domain::AliasTable;
use crate::infrastructure::traits::{FileSystem, RealFileSystem};

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    /// Built-in aliases merged with the user's `[aliases]`, fixed for the process
    pub aliases: Arc<AliasTable>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(settings, Arc::new(RealFileSystem))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(settings: Settings, fs: Arc<dyn FileSystem>) -> Self {
        let aliases = Arc::new(AliasTable::with_overrides(
            settings
                .aliases
                .iter()
                .map(|(alias, path)| (alias.clone(), path.clone())),
        ));
        let settings = Arc::new(settings);

        Self {
            settings,
            fs,
            aliases,
        }
    }

    /// Query service using the configured alias table and format options.
    pub fn query_service(&self) -> QueryService {
        QueryService::new(
            Arc::clone(&self.fs),
            Arc::clone(&self.aliases),
            self.settings.format.options(),
        )
    }
}
