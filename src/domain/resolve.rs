//! Setting resolution: path or alias in, formatted value out

use tracing::{debug, trace};

use crate::domain::alias::AliasTable;
use crate::domain::error::DomainResult;
use crate::domain::format::{format_value, FormatOptions};
use crate::domain::node::ConfigNode;

/// Resolves setting paths and aliases against one parsed configuration tree.
#[derive(Debug, Clone, Copy)]
pub struct SettingResolver<'a> {
    tree: &'a ConfigNode,
    aliases: &'a AliasTable,
    options: FormatOptions,
}

impl<'a> SettingResolver<'a> {
    /// Resolver using the built-in aliases and default formatting.
    pub fn new(tree: &'a ConfigNode) -> Self {
        Self {
            tree,
            aliases: AliasTable::builtin(),
            options: FormatOptions::default(),
        }
    }

    pub fn with_aliases(mut self, aliases: &'a AliasTable) -> Self {
        self.aliases = aliases;
        self
    }

    pub fn with_options(mut self, options: FormatOptions) -> Self {
        self.options = options;
        self
    }

    /// Format the setting at `path`.
    ///
    /// Groups render as `{\nname = value, \n...\n}` blocks, everything else
    /// goes through the value formatter.
    pub fn resolve(&self, path: &str) -> DomainResult<String> {
        let node = self.tree.lookup(path)?;
        debug!("resolve: path={} kind={}", path, node.kind());
        match node {
            ConfigNode::Group(children) => Ok(self.format_group(path, children)),
            other => Ok(format_value(other)),
        }
    }

    /// Map `alias_or_path` through the alias table, then [`resolve`](Self::resolve).
    pub fn resolve_alias(&self, alias_or_path: &str) -> DomainResult<String> {
        let path = self.aliases.to_path(alias_or_path)?;
        debug!("resolve_alias: {} -> {}", alias_or_path, path);
        self.resolve(path)
    }

    fn format_group(&self, path: &str, children: &[(String, ConfigNode)]) -> String {
        if children.is_empty() {
            return String::new();
        }
        let mut value = String::from("{\n");
        for (i, (name, child)) in children.iter().enumerate() {
            let child_path = format!("{}.{}", path, name);
            let rendered = match child {
                ConfigNode::Group(nested) if self.options.expand_nested_groups => {
                    self.format_group(&child_path, nested)
                }
                other => format_value(other),
            };
            trace!("format_group: {} = {:?}", child_path, rendered);
            if i > 0 {
                value.push_str(", \n");
            }
            value.push_str(name);
            value.push_str(" = ");
            value.push_str(&rendered);
        }
        value.push_str("\n}");
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::DomainError;

    fn station() -> ConfigNode {
        ConfigNode::Group(vec![(
            "radiant".into(),
            ConfigNode::Group(vec![
                (
                    "trigger".into(),
                    ConfigNode::Group(vec![
                        (
                            "RF0".into(),
                            ConfigNode::Group(vec![
                                ("enabled".into(), ConfigNode::Boolean(true)),
                                ("num_coincidences".into(), ConfigNode::Integer(2)),
                            ]),
                        ),
                        (
                            "RF1".into(),
                            ConfigNode::Group(vec![("enabled".into(), ConfigNode::Boolean(false))]),
                        ),
                    ]),
                ),
                (
                    "scalers".into(),
                    ConfigNode::Group(vec![
                        ("use_pps".into(), ConfigNode::Boolean(true)),
                        ("period".into(), ConfigNode::Float(1.0)),
                    ]),
                ),
                ("empty".into(), ConfigNode::Group(vec![])),
            ]),
        )])
    }

    #[test]
    fn test_resolve_scalar() {
        let tree = station();
        let resolver = SettingResolver::new(&tree);
        assert_eq!(resolver.resolve("radiant.scalers.use_pps").unwrap(), "1");
        assert_eq!(resolver.resolve("radiant.scalers.period").unwrap(), "1.000000");
    }

    #[test]
    fn test_resolve_group() {
        let tree = station();
        let resolver = SettingResolver::new(&tree);
        assert_eq!(
            resolver.resolve("radiant.scalers").unwrap(),
            "{\nuse_pps = 1, \nperiod = 1.000000\n}"
        );
    }

    #[test]
    fn test_resolve_parsed_group_with_string() {
        let tree = crate::domain::parser::parse("g = { a = 1; b = \"x\"; };").unwrap();
        assert_eq!(
            SettingResolver::new(&tree).resolve("g").unwrap(),
            "{\na = 1, \nb = x\n}"
        );
    }

    #[test]
    fn test_resolve_empty_group() {
        let tree = station();
        assert_eq!(SettingResolver::new(&tree).resolve("radiant.empty").unwrap(), "");
    }

    #[test]
    fn test_resolve_nested_groups_recursive_and_shallow() {
        let tree = station();
        let resolver = SettingResolver::new(&tree);
        assert_eq!(
            resolver.resolve("radiant.trigger").unwrap(),
            "{\nRF0 = {\nenabled = 1, \nnum_coincidences = 2\n}, \nRF1 = {\nenabled = 0\n}\n}"
        );
        let shallow = resolver.with_options(FormatOptions::shallow());
        assert_eq!(
            shallow.resolve("radiant.trigger").unwrap(),
            "{\nRF0 = , \nRF1 = \n}"
        );
    }

    #[test]
    fn test_resolve_missing_path() {
        let tree = station();
        assert_eq!(
            SettingResolver::new(&tree).resolve("radiant.scalers.nope"),
            Err(DomainError::not_found("radiant.scalers.nope"))
        );
    }

    #[test]
    fn test_alias_matches_direct_path() {
        let tree = station();
        let resolver = SettingResolver::new(&tree);
        assert_eq!(
            resolver.resolve_alias("rf0_enabled"),
            resolver.resolve("radiant.trigger.RF0.enabled")
        );
        assert_eq!(
            resolver.resolve_alias("rf1_enabled"),
            resolver.resolve("radiant.trigger.RF1.enabled")
        );
    }

    #[test]
    fn test_dotted_alias_bypasses_table() {
        let tree = station();
        let empty = AliasTable::default();
        let resolver = SettingResolver::new(&tree).with_aliases(&empty);
        assert_eq!(resolver.resolve_alias("radiant.scalers.use_pps").unwrap(), "1");
        assert_eq!(
            resolver.resolve_alias("scalers_use_pps"),
            Err(DomainError::UnknownAlias("scalers_use_pps".into()))
        );
    }
}
