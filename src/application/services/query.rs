//! Setting query service
//!
//! Loads acquisition configs through the filesystem boundary and answers
//! alias/path queries against them.

use std::io;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::{ApplicationResult, IoResultExt, ParseResultExt};
use crate::domain::{
    parser, AliasTable, ConfigNode, DomainError, DomainResult, FormatOptions, RunLocator,
    SettingResolver,
};
use crate::infrastructure::traits::FileSystem;

/// Result of one query in a batch.
///
/// A failed query keeps an empty value and carries its diagnostic.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryOutcome {
    pub query: String,
    pub value: String,
    pub error: Option<DomainError>,
}

impl QueryOutcome {
    pub fn is_resolved(&self) -> bool {
        self.error.is_none()
    }

    /// `<query> : <value>`
    pub fn line(&self) -> String {
        format!("{} : {}", self.query, self.value)
    }
}

/// Service answering setting queries against acquisition configs.
pub struct QueryService {
    fs: Arc<dyn FileSystem>,
    aliases: Arc<AliasTable>,
    options: FormatOptions,
}

impl QueryService {
    /// Create a new query service.
    pub fn new(fs: Arc<dyn FileSystem>, aliases: Arc<AliasTable>, options: FormatOptions) -> Self {
        Self {
            fs,
            aliases,
            options,
        }
    }

    /// Same service with different group rendering.
    pub fn with_options(&self, options: FormatOptions) -> Self {
        Self {
            fs: Arc::clone(&self.fs),
            aliases: Arc::clone(&self.aliases),
            options,
        }
    }

    pub fn aliases(&self) -> &AliasTable {
        &self.aliases
    }

    /// Read and parse the config file at `path`.
    ///
    /// # Errors
    /// - `FileIo`: file missing, not a regular file, or unreadable
    /// - `Parse`: malformed config text, with file and line
    #[instrument(skip(self))]
    pub fn load(&self, path: &Path) -> ApplicationResult<ConfigNode> {
        if !self.fs.exists(path) {
            return Err(io::Error::new(io::ErrorKind::NotFound, "file does not exist"))
                .with_path_context(path);
        }
        if !self.fs.is_file(path) {
            return Err(io::Error::new(io::ErrorKind::InvalidInput, "not a regular file"))
                .with_path_context(path);
        }
        let text = self.fs.read_to_string(path).with_path_context(path)?;
        let tree = parser::parse(&text).with_file_context(path)?;
        debug!("load: {} top-level settings in {}", tree.len(), path.display());
        Ok(tree)
    }

    /// Read the `acq.cfg` of a station run.
    pub fn load_run(&self, locator: &RunLocator) -> ApplicationResult<ConfigNode> {
        debug!("load_run: {}", locator);
        self.load(&locator.config_path())
    }

    /// Resolve one alias or dotted path.
    pub fn query(&self, tree: &ConfigNode, alias_or_path: &str) -> ApplicationResult<String> {
        Ok(self.resolver(tree).resolve_alias(alias_or_path)?)
    }

    /// Resolve every alias or path independently; failures do not stop the batch.
    #[instrument(skip(self, tree, queries))]
    pub fn query_all<S: AsRef<str>>(&self, tree: &ConfigNode, queries: &[S]) -> Vec<QueryOutcome> {
        let resolver = self.resolver(tree);
        queries
            .iter()
            .map(|query| {
                let query = query.as_ref();
                outcome(query, resolver.resolve_alias(query))
            })
            .collect()
    }

    /// One outcome per top-level setting, in file order.
    pub fn dump(&self, tree: &ConfigNode) -> Vec<QueryOutcome> {
        let resolver = self.resolver(tree);
        tree.children()
            .unwrap_or_default()
            .iter()
            .map(|(name, _)| outcome(name, resolver.resolve(name)))
            .collect()
    }

    fn resolver<'a>(&'a self, tree: &'a ConfigNode) -> SettingResolver<'a> {
        SettingResolver::new(tree)
            .with_aliases(&self.aliases)
            .with_options(self.options)
    }
}

fn outcome(query: &str, result: DomainResult<String>) -> QueryOutcome {
    match result {
        Ok(value) => QueryOutcome {
            query: query.to_string(),
            value,
            error: None,
        },
        Err(e) => {
            debug!("query failed: {}", e);
            QueryOutcome {
                query: query.to_string(),
                value: String::new(),
                error: Some(e),
            }
        }
    }
}
