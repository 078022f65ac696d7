//! Route table: single-level hash paths mapped to template ids.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::RouteError;

/// Path rendered when the location hash is empty or unrecognized.
pub const DEFAULT_PATH: &str = "/home";

/// A routable path of the fixed form `/segment`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RoutePath(String);

impl RoutePath {
    /// Parse a `/segment` path.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::InvalidPath`] for empty segments, nested paths,
    /// or anything not starting with `/`.
    pub fn parse(path: &str) -> Result<Self, RouteError> {
        let Some(segment) = path.strip_prefix('/') else {
            return Err(RouteError::InvalidPath(path.to_string()));
        };
        if segment.is_empty() || segment.contains(['/', '#', '?']) {
            return Err(RouteError::InvalidPath(path.to_string()));
        }
        Ok(Self(path.to_string()))
    }

    /// The path as written, e.g. `/home`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The location fragment for this path, e.g. `#/home`.
    #[must_use]
    pub fn to_hash(&self) -> String {
        format!("#{}", self.0)
    }
}

impl fmt::Display for RoutePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for RoutePath {
    type Error = RouteError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<RoutePath> for String {
    fn from(path: RoutePath) -> Self {
        path.0
    }
}

/// Identifier of a `<template>` element in the document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateId(String);

impl TemplateId {
    /// Create a template id (without the leading `#`).
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        match id.strip_prefix('#') {
            Some(stripped) => Self(stripped.to_string()),
            None => Self(id),
        }
    }

    /// The element id.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Strip the leading `#` from a location hash.
///
/// An empty hash yields an empty path, which the route table resolves to
/// the default path.
#[must_use]
pub fn path_from_hash(hash: &str) -> &str {
    hash.strip_prefix('#').unwrap_or(hash)
}

/// Outcome of resolving a path against the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolved<'a> {
    /// The path that will actually be rendered.
    pub path: &'a RoutePath,
    /// Template registered for `path`.
    pub template: &'a TemplateId,
    /// Whether the requested path was unknown and the default was used.
    pub fell_back: bool,
}

/// Immutable mapping from route path to template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTable {
    routes: BTreeMap<RoutePath, TemplateId>,
    default_path: RoutePath,
}

impl RouteTable {
    /// Build a table from `(path, template)` pairs.
    ///
    /// # Errors
    ///
    /// Returns an error if a path is malformed or `default_path` has no entry.
    pub fn new<I, P, T>(entries: I, default_path: &str) -> Result<Self, RouteError>
    where
        I: IntoIterator<Item = (P, T)>,
        P: AsRef<str>,
        T: Into<String>,
    {
        let mut routes = BTreeMap::new();
        for (path, template) in entries {
            routes.insert(RoutePath::parse(path.as_ref())?, TemplateId::new(template));
        }
        let default_path = RoutePath::parse(default_path)?;
        if !routes.contains_key(&default_path) {
            return Err(RouteError::MissingDefault(default_path.to_string()));
        }
        Ok(Self {
            routes,
            default_path,
        })
    }

    /// Resolve `path`, substituting the default path when it is unknown.
    #[must_use]
    pub fn resolve(&self, path: &str) -> Resolved<'_> {
        if let Some((path, template)) = self.routes.iter().find(|(p, _)| p.as_str() == path) {
            return Resolved {
                path,
                template,
                fell_back: false,
            };
        }
        Resolved {
            path: &self.default_path,
            template: &self.routes[&self.default_path],
            fell_back: true,
        }
    }

    /// The fallback path.
    #[must_use]
    pub fn default_path(&self) -> &RoutePath {
        &self.default_path
    }

    /// Whether `path` has an entry.
    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.routes.keys().any(|p| p.as_str() == path)
    }

    /// All registered templates, in path order.
    pub fn templates(&self) -> impl Iterator<Item = &TemplateId> {
        self.routes.values()
    }

    /// Number of routes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Check if the table is empty. Never true for a constructed table.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        let routes = [
            ("/home", "tpl-home"),
            ("/work", "tpl-work"),
            ("/about", "tpl-about"),
            ("/contact", "tpl-contact"),
        ]
        .into_iter()
        .map(|(path, template)| (RoutePath(path.to_string()), TemplateId::new(template)))
        .collect();
        Self {
            routes,
            default_path: RoutePath(DEFAULT_PATH.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_has_four_routes() {
        let table = RouteTable::default();
        assert_eq!(table.len(), 4);
        for path in ["/home", "/work", "/about", "/contact"] {
            assert!(table.contains(path), "missing {path}");
        }
    }

    #[test]
    fn resolve_known_path() {
        let table = RouteTable::default();
        let resolved = table.resolve("/work");
        assert_eq!(resolved.path.as_str(), "/work");
        assert_eq!(resolved.template.as_str(), "tpl-work");
        assert!(!resolved.fell_back);
    }

    #[test]
    fn resolve_unknown_path_falls_back_to_home() {
        let table = RouteTable::default();
        for path in ["/nope", "", "/", "work", "/home/extra"] {
            let resolved = table.resolve(path);
            assert_eq!(resolved.path.as_str(), "/home", "path {path:?}");
            assert_eq!(resolved.template.as_str(), "tpl-home");
            assert!(resolved.fell_back);
        }
    }

    #[test]
    fn path_from_hash_strips_leading_hash_only() {
        assert_eq!(path_from_hash("#/about"), "/about");
        assert_eq!(path_from_hash("/about"), "/about");
        assert_eq!(path_from_hash(""), "");
        assert_eq!(path_from_hash("##/x"), "#/x");
    }

    #[test]
    fn route_path_rejects_nested_and_relative() {
        assert!(RoutePath::parse("/home").is_ok());
        assert!(RoutePath::parse("home").is_err());
        assert!(RoutePath::parse("/").is_err());
        assert!(RoutePath::parse("/a/b").is_err());
        assert!(RoutePath::parse("/a?b=1").is_err());
    }

    #[test]
    fn new_requires_default_entry() {
        let err = RouteTable::new([("/work", "tpl-work")], "/home").unwrap_err();
        assert_eq!(err, RouteError::MissingDefault("/home".to_string()));
    }

    #[test]
    fn template_id_strips_selector_hash() {
        assert_eq!(TemplateId::new("#tpl-home").as_str(), "tpl-home");
        assert_eq!(TemplateId::new("tpl-home").as_str(), "tpl-home");
    }

    #[test]
    fn route_path_serde_validates() {
        let ok: RoutePath = serde_json::from_str("\"/about\"").expect("valid path");
        assert_eq!(ok.to_hash(), "#/about");
        assert!(serde_json::from_str::<RoutePath>("\"about\"").is_err());
    }
}
