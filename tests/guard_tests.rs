use chrono::Utc;
use lms_portal::{
    guard::{GuardDecision, GuardState, LOGIN_PATH, RouteGuard, UNAUTHORIZED_PATH},
    models::{Identity, Role},
    registry::{RouteRegistry, default_path_for},
};
use uuid::Uuid;

fn identity(role: Role) -> Identity {
    Identity {
        id: Uuid::new_v4(),
        display_name: format!("Test {role}"),
        role,
        avatar_url: None,
        logged_in_at: Utc::now(),
    }
}

// --- Tests ---

#[test]
fn test_unauthenticated_is_sent_to_login() {
    let registry = RouteRegistry::standard();
    let guard = RouteGuard::new(&registry);

    for path in ["/parent/children", "/", "/teacher", "/nowhere"] {
        let decision = guard.evaluate(None, path);
        assert_eq!(decision, GuardDecision::RedirectToLogin);
        assert_eq!(decision.state(), GuardState::Unauthenticated);
        assert_eq!(decision.location(), Some(LOGIN_PATH));
    }
}

#[test]
fn test_allowed_path_renders_without_redirect() {
    let registry = RouteRegistry::standard();
    let guard = RouteGuard::new(&registry);
    let parent = identity(Role::Parent);

    let decision = guard.evaluate(Some(&parent), "/parent/children");

    assert_eq!(decision, GuardDecision::Allow);
    assert_eq!(decision.state(), GuardState::AuthenticatedAllowed);
    assert_eq!(decision.location(), None);
}

#[test]
fn test_other_area_is_redirected_to_unauthorized() {
    let registry = RouteRegistry::standard();
    let guard = RouteGuard::new(&registry);
    let student = identity(Role::Student);

    let decision = guard.evaluate(Some(&student), "/teacher/gradebook");

    assert_eq!(decision, GuardDecision::RedirectToUnauthorized);
    assert_eq!(decision.state(), GuardState::AuthenticatedDenied);
    assert_eq!(decision.location(), Some(UNAUTHORIZED_PATH));
}

#[test]
fn test_area_index_redirects_to_dashboard() {
    let registry = RouteRegistry::standard();
    let guard = RouteGuard::new(&registry);

    for role in Role::ALL {
        let user = identity(role);
        let root = lms_portal::registry::area_root(role);
        let expected = GuardDecision::RedirectToDashboard(default_path_for(role));

        assert_eq!(guard.evaluate(Some(&user), root), expected);
        assert_eq!(guard.evaluate(Some(&user), &format!("{root}/")), expected);
    }
}

#[test]
fn test_application_root_redirects_to_dashboard() {
    let registry = RouteRegistry::standard();
    let guard = RouteGuard::new(&registry);
    let teacher = identity(Role::Teacher);

    let decision = guard.evaluate(Some(&teacher), "/");

    assert_eq!(decision, GuardDecision::RedirectToDashboard("/teacher/dashboard"));
    assert_eq!(decision.location(), Some("/teacher/dashboard"));
}

#[test]
fn test_foreign_area_index_is_unauthorized() {
    let registry = RouteRegistry::standard();
    let guard = RouteGuard::new(&registry);
    let teacher = identity(Role::Teacher);

    assert_eq!(
        guard.evaluate(Some(&teacher), "/school"),
        GuardDecision::RedirectToUnauthorized
    );
}

#[test]
fn test_unknown_paths_are_denied() {
    let registry = RouteRegistry::standard();
    let guard = RouteGuard::new(&registry);
    let admin = identity(Role::SuperAdmin);

    assert_eq!(
        guard.evaluate(Some(&admin), "/reports/export"),
        GuardDecision::RedirectToUnauthorized
    );
    assert_eq!(
        guard.evaluate(Some(&admin), "/super-adminx/dashboard"),
        GuardDecision::RedirectToUnauthorized
    );
}

#[test]
fn test_guard_is_stateless_across_attempts() {
    let registry = RouteRegistry::standard();
    let guard = RouteGuard::new(&registry);
    let student = identity(Role::Student);

    // A denial does not influence the next attempt.
    assert_eq!(
        guard.evaluate(Some(&student), "/teacher/gradebook"),
        GuardDecision::RedirectToUnauthorized
    );
    assert_eq!(
        guard.evaluate(Some(&student), "/student/grades"),
        GuardDecision::Allow
    );
    assert_eq!(
        guard.evaluate(None, "/student/grades"),
        GuardDecision::RedirectToLogin
    );
}

#[test]
fn test_outcome_serializes_state_and_location() {
    let registry = RouteRegistry::standard();
    let guard = RouteGuard::new(&registry);
    let student = identity(Role::Student);

    let outcome = guard.evaluate(Some(&student), "/teacher/gradebook").outcome();
    assert_eq!(outcome.state, "authenticated_denied");
    assert_eq!(outcome.location.as_deref(), Some("/unauthorized"));

    let outcome = guard.evaluate(Some(&student), "/student/grades").outcome();
    assert_eq!(outcome.state, "authenticated_allowed");
    assert_eq!(outcome.location, None);

    let outcome = guard.evaluate(None, "/student/grades").outcome();
    assert_eq!(outcome.state, "unauthenticated");
    assert_eq!(outcome.location.as_deref(), Some("/login"));
}

#[test]
fn test_dot_segment_paths_are_unauthorized() {
    let registry = RouteRegistry::standard();
    let guard = RouteGuard::new(&registry);
    let teacher = identity(Role::Teacher);

    for path in [
        "/teacher/../school/users",
        "/teacher/%2e%2e/school/users",
        "/teacher//x",
        "/teacher/./dashboard",
    ] {
        let decision = guard.evaluate(Some(&teacher), path);
        assert_eq!(decision, GuardDecision::RedirectToUnauthorized, "{path}");
        assert_eq!(decision.location(), Some(UNAUTHORIZED_PATH));
    }

    // Still unauthenticated first: no identity means login, whatever the path.
    assert_eq!(
        guard.evaluate(None, "/teacher/../school/users"),
        GuardDecision::RedirectToLogin
    );
}
