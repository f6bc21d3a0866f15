use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error;
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

// --- Roles ---

/// Role
///
/// The closed set of user categories. Every lookup table in the crate (route rules,
/// dashboards, navigation templates) is an exhaustive match over this enum, so a
/// missing or misspelled role is a compile-time error rather than a silent fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Role {
    SuperAdmin,
    SchoolAdmin,
    Teacher,
    Student,
    Parent,
}

impl Role {
    /// Every role, in menu/documentation order.
    pub const ALL: [Role; 5] = [
        Role::SuperAdmin,
        Role::SchoolAdmin,
        Role::Teacher,
        Role::Student,
        Role::Parent,
    ];

    /// The wire name used in JSON and in the accounts file.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "super_admin",
            Role::SchoolAdmin => "school_admin",
            Role::Teacher => "teacher",
            Role::Student => "student",
            Role::Parent => "parent",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// UnknownRole
///
/// Raised when a role string from configuration does not name one of the five roles.
/// This is treated as fatal at load time: the system never guesses a role.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown role `{0}`")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| UnknownRole(s.to_string()))
    }
}

// --- Session Schemas ---

/// Identity
///
/// The resolved identity of the logged-in user. Created on a successful login and
/// exclusively owned by the `SessionStore`; callers only ever receive clones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct Identity {
    pub id: Uuid,
    pub display_name: String,
    pub role: Role,
    // Reference to a profile image, if the provider knows one.
    pub avatar_url: Option<String>,
    #[ts(type = "string")]
    pub logged_in_at: DateTime<Utc>,
}

/// Credentials
///
/// Input payload for the login form (POST /auth/login).
/// The password is passed straight through to the identity provider and never logged.
#[derive(Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct Credentials {
    #[schema(example = "teacher@lms.local")]
    pub email: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// ProviderUser
///
/// The result shape returned by an identity provider on successful authentication.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderUser {
    pub id: Uuid,
    pub name: String,
    pub role: Role,
    pub avatar_url: Option<String>,
}

// --- Access Control Schemas ---

/// RouteRule
///
/// Binds one top-level path prefix to the roles allowed to enter it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct RouteRule {
    pub path_prefix: String,
    pub allowed_roles: Vec<Role>,
}

/// GuardOutcome
///
/// Output schema for GET /api/guard. Mirrors a `GuardDecision` in a renderer friendly form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct GuardOutcome {
    /// One of `unauthenticated`, `authenticated_allowed`, `authenticated_denied`.
    pub state: String,
    /// Where the client must navigate instead, if anywhere.
    pub location: Option<String>,
}

// --- Navigation Schemas (Output) ---

/// NavEntryView
///
/// One navigation node as handed to the renderer, with the per-render flags attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct NavEntryView {
    pub id: String,
    pub name: String,
    pub target_path: Option<String>,
    /// The current path is this entry's target, or lies below it.
    pub active: bool,
    /// Some transitive child is active. Drives highlighting of collapsed groups.
    pub has_active_child: bool,
    pub open: bool,
    #[schema(no_recursion)]
    pub children: Vec<NavEntryView>,
}

/// NavGroupView
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct NavGroupView {
    pub title: String,
    pub items: Vec<NavEntryView>,
}

/// ToggleRequest
///
/// Input payload for POST /api/navigation/toggle.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct ToggleRequest {
    #[schema(example = "teacher/pembelajaran/cbt-ujian")]
    pub id: String,
}

/// ExpansionSnapshot
///
/// Output schema describing the expansion state after a toggle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct ExpansionSnapshot {
    pub id: String,
    pub open: bool,
    /// All currently open ids, sorted.
    pub open_ids: Vec<String>,
}

// --- View Descriptors (Output) ---

/// PageView
///
/// What the renderer receives after the route guard admits a navigation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct PageView {
    pub path: String,
    /// Name of the navigation entry targeting this path, if one exists.
    pub title: Option<String>,
    pub role: Role,
    pub navigation: Vec<NavGroupView>,
}

/// StatusView
///
/// Descriptor for the two unguarded views: the login form and the unauthorized notice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct StatusView {
    pub view: String,
    pub message: String,
    /// True while a login call is in flight; the form must disable its submit button.
    pub submit_disabled: bool,
    /// The caller's own dashboard, when someone is logged in.
    pub home: Option<String>,
}
