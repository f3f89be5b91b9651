//! Domain layer: configuration tree, formatting, lookup
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod alias;
pub mod error;
pub mod format;
pub mod node;
pub mod parser;
pub mod resolve;
pub mod run;

pub use alias::{AliasTable, BUILTIN_ALIASES};
pub use error::{DomainError, DomainResult};
pub use format::{format_value, FormatOptions};
pub use node::{ConfigNode, SettingKind};
pub use resolve::SettingResolver;
pub use run::RunLocator;
