use crate::models::{Role, RouteRule};
use std::sync::Arc;
use thiserror::Error;

/// RegistryError
///
/// Configuration errors detected while building a `RouteRegistry`. All of them are
/// fatal at startup: a broken authorization table must never be served.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("route prefix `{0}` must be a single top-level segment such as `/teacher`")]
    MalformedPrefix(String),
    #[error("route prefixes overlap at `{0}`")]
    OverlappingPrefix(String),
    #[error("role `{0}` has no route rule covering its dashboard")]
    MissingRole(Role),
}

/// RouteRegistry
///
/// The static, deny-by-default authorization table mapping top-level areas of the
/// application to the roles allowed to enter them. Read-only after construction.
#[derive(Debug, Clone)]
pub struct RouteRegistry {
    rules: Vec<RouteRule>,
}

/// RegistryState
///
/// The shared handle to the registry stored in the application state.
pub type RegistryState = Arc<RouteRegistry>;

impl RouteRegistry {
    /// new
    ///
    /// Builds a registry from explicit rules and validates the invariants:
    /// 1. each prefix is exactly one path segment (`/teacher`),
    /// 2. no two prefixes name the same area,
    /// 3. every role's dashboard is reachable for that role.
    pub fn new(rules: Vec<RouteRule>) -> Result<Self, RegistryError> {
        for (index, rule) in rules.iter().enumerate() {
            let segment = rule
                .path_prefix
                .strip_prefix('/')
                .ok_or_else(|| RegistryError::MalformedPrefix(rule.path_prefix.clone()))?;
            if segment.is_empty() || segment.contains('/') {
                return Err(RegistryError::MalformedPrefix(rule.path_prefix.clone()));
            }
            if rules[..index]
                .iter()
                .any(|earlier| earlier.path_prefix == rule.path_prefix)
            {
                return Err(RegistryError::OverlappingPrefix(rule.path_prefix.clone()));
            }
        }

        let registry = Self { rules };

        for role in Role::ALL {
            if !registry.is_allowed(role, default_path_for(role)) {
                return Err(RegistryError::MissingRole(role));
            }
        }

        Ok(registry)
    }

    /// standard
    ///
    /// The production table: one area per role.
    pub fn standard() -> Self {
        let rules = Role::ALL
            .into_iter()
            .map(|role| RouteRule {
                path_prefix: area_root(role).to_string(),
                allowed_roles: vec![role],
            })
            .collect();

        // The standard table is derived from `area_root` and therefore always valid.
        Self { rules }
    }

    /// is_allowed
    ///
    /// True iff some rule's prefix covers `path` on a segment boundary and `role` is
    /// listed on that rule. Paths outside every rule are denied.
    pub fn is_allowed(&self, role: Role, path: &str) -> bool {
        let Some(path) = normalize_path(path) else {
            return false;
        };
        self.rules
            .iter()
            .find(|rule| is_same_or_descendant(path, &rule.path_prefix))
            .is_some_and(|rule| rule.allowed_roles.contains(&role))
    }

    pub fn rules(&self) -> &[RouteRule] {
        &self.rules
    }
}

/// area_root
///
/// The top-level path segment owned by a role.
pub fn area_root(role: Role) -> &'static str {
    match role {
        Role::SuperAdmin => "/super-admin",
        Role::SchoolAdmin => "/school",
        Role::Teacher => "/teacher",
        Role::Student => "/student",
        Role::Parent => "/parent",
    }
}

/// default_path_for
///
/// The landing page for a role: the `dashboard` page directly under its area root.
pub fn default_path_for(role: Role) -> &'static str {
    match role {
        Role::SuperAdmin => "/super-admin/dashboard",
        Role::SchoolAdmin => "/school/dashboard",
        Role::Teacher => "/teacher/dashboard",
        Role::Student => "/student/dashboard",
        Role::Parent => "/parent/dashboard",
    }
}

/// normalize_path
///
/// Drops any query string or fragment and trailing slashes. The root stays `/`.
///
/// Returns `None` for paths that are not in canonical form: relative paths, empty
/// segments (`/teacher//x`), dot segments (`.`, `..`, also percent-encoded as
/// `%2e`) and encoded or literal separators inside a segment (`%2f`, `%5c`, `\`).
/// Such paths are rejected rather than resolved, so they never match a rule.
pub fn normalize_path(path: &str) -> Option<&str> {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    let trimmed = path[..end].trim_end_matches('/');
    if trimmed.is_empty() {
        return if path.starts_with('/') || end == 0 { Some("/") } else { None };
    }

    let rest = trimmed.strip_prefix('/')?;
    if rest.split('/').all(is_plain_segment) {
        Some(trimmed)
    } else {
        None
    }
}

fn is_plain_segment(segment: &str) -> bool {
    if segment.is_empty() || segment.contains('\\') {
        return false;
    }

    let lowered = segment.to_ascii_lowercase();
    if lowered.contains("%2f") || lowered.contains("%5c") {
        return false;
    }

    let decoded = lowered.replace("%2e", ".");
    decoded != "." && decoded != ".."
}

/// is_same_or_descendant
///
/// Segment-aligned prefix test: `/school/users` is under `/school`, `/schoolx` is not.
pub fn is_same_or_descendant(path: &str, prefix: &str) -> bool {
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}
