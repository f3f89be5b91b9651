//! Common setting aliases
//!
//! Short mnemonics for frequently inspected settings. The table is built once
//! and never mutated afterwards.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;

use crate::domain::error::{DomainError, DomainResult};

/// Built-in aliases, available in every table.
pub const BUILTIN_ALIASES: &[(&str, &str)] = &[
    ("rf0_enabled", "radiant.trigger.RF0.enabled"),
    ("rf1_enabled", "radiant.trigger.RF1.enabled"),
    ("scalers_use_pps", "radiant.scalers.use_pps"),
];

static BUILTIN: Lazy<AliasTable> =
    Lazy::new(|| AliasTable::from_entries(BUILTIN_ALIASES.iter().copied()));

/// Immutable mapping from alias to dotted setting path.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AliasTable {
    entries: BTreeMap<String, String>,
}

impl AliasTable {
    /// The process-wide table of built-in aliases.
    pub fn builtin() -> &'static AliasTable {
        &BUILTIN
    }

    /// Built-in aliases overlaid with `extra`; later entries win.
    pub fn with_overrides<I, K, V>(extra: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut table = Self::builtin().clone();
        for (alias, path) in extra {
            table.entries.insert(alias.into(), path.into());
        }
        table
    }

    /// Table holding exactly `entries`.
    pub fn from_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn get(&self, alias: &str) -> Option<&str> {
        self.entries.get(alias).map(String::as_str)
    }

    /// Turn user input into a setting path.
    ///
    /// Input containing a `.` already is a path and bypasses the table.
    pub fn to_path<'a>(&'a self, alias_or_path: &'a str) -> DomainResult<&'a str> {
        if alias_or_path.contains('.') {
            return Ok(alias_or_path);
        }
        self.get(alias_or_path)
            .ok_or_else(|| DomainError::UnknownAlias(alias_or_path.to_string()))
    }

    /// Entries in alias order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
