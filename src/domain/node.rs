//! Configuration tree: typed nodes and path lookup

use std::fmt;

use crate::domain::error::{DomainError, DomainResult};

/// Kind tag of a [`ConfigNode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingKind {
    Integer,
    Float,
    Boolean,
    String,
    Array,
    List,
    Group,
}

impl fmt::Display for SettingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SettingKind::Integer => "integer",
            SettingKind::Float => "float",
            SettingKind::Boolean => "boolean",
            SettingKind::String => "string",
            SettingKind::Array => "array",
            SettingKind::List => "list",
            SettingKind::Group => "group",
        };
        f.write_str(name)
    }
}

/// A node of a parsed configuration file.
///
/// Arrays hold scalars only, lists hold any node, groups hold named children
/// in file order. The root of a parsed file is an unnamed group.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigNode {
    Integer(i64),
    Float(f64),
    Boolean(bool),
    String(String),
    Array(Vec<ConfigNode>),
    List(Vec<ConfigNode>),
    Group(Vec<(String, ConfigNode)>),
}

/// One step of a setting path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment<'a> {
    Name(&'a str),
    Index(usize),
}

impl fmt::Display for PathSegment<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Name(name) => f.write_str(name),
            PathSegment::Index(idx) => write!(f, "[{}]", idx),
        }
    }
}

/// Split a dotted path into segments.
///
/// Segments are separated by `.`; `[n]` addresses the n-th element of an
/// array, list or group. Empty paths and empty segments are rejected.
pub fn parse_path(path: &str) -> DomainResult<Vec<PathSegment<'_>>> {
    if path.is_empty() {
        return Err(DomainError::not_found(path));
    }
    path.split('.')
        .map(|segment| {
            if segment.is_empty() {
                return Err(DomainError::not_found(path));
            }
            match segment.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
                Some(index) => index
                    .parse::<usize>()
                    .map(PathSegment::Index)
                    .map_err(|_| DomainError::not_found(path)),
                None => Ok(PathSegment::Name(segment)),
            }
        })
        .collect()
}

impl ConfigNode {
    pub fn kind(&self) -> SettingKind {
        match self {
            ConfigNode::Integer(_) => SettingKind::Integer,
            ConfigNode::Float(_) => SettingKind::Float,
            ConfigNode::Boolean(_) => SettingKind::Boolean,
            ConfigNode::String(_) => SettingKind::String,
            ConfigNode::Array(_) => SettingKind::Array,
            ConfigNode::List(_) => SettingKind::List,
            ConfigNode::Group(_) => SettingKind::Group,
        }
    }

    pub fn is_group(&self) -> bool {
        matches!(self, ConfigNode::Group(_))
    }

    /// Named children of a group, `None` for every other kind.
    pub fn children(&self) -> Option<&[(String, ConfigNode)]> {
        match self {
            ConfigNode::Group(children) => Some(children),
            _ => None,
        }
    }

    /// Direct child of a group by name.
    pub fn get(&self, name: &str) -> Option<&ConfigNode> {
        self.children()?
            .iter()
            .find(|(child, _)| child == name)
            .map(|(_, node)| node)
    }

    /// Number of elements (arrays, lists) or children (groups); scalars have none.
    pub fn len(&self) -> usize {
        match self {
            ConfigNode::Array(items) | ConfigNode::List(items) => items.len(),
            ConfigNode::Group(children) => children.len(),
            _ => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Walk `path` from this node.
    ///
    /// # Errors
    /// - `SettingNotFound`: malformed path, unknown name, index out of range
    /// - `SettingTypeMismatch`: a segment that cannot apply to the node reached so far
    pub fn lookup(&self, path: &str) -> DomainResult<&ConfigNode> {
        let segments = parse_path(path)?;
        let mut current = self;
        for segment in segments {
            current = match (current, &segment) {
                (ConfigNode::Group(_), PathSegment::Name(name)) => current
                    .get(name)
                    .ok_or_else(|| DomainError::not_found(path))?,
                (ConfigNode::Group(children), PathSegment::Index(idx)) => children
                    .get(*idx)
                    .map(|(_, node)| node)
                    .ok_or_else(|| DomainError::not_found(path))?,
                (ConfigNode::Array(items) | ConfigNode::List(items), PathSegment::Index(idx)) => {
                    items.get(*idx).ok_or_else(|| DomainError::not_found(path))?
                }
                (node, segment) => {
                    return Err(DomainError::SettingTypeMismatch {
                        path: path.to_string(),
                        segment: segment.to_string(),
                        kind: node.kind(),
                    })
                }
            };
        }
        Ok(current)
    }
}
