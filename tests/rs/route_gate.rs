//! Integration tests for the route gate and the login validators.

use degree_admin::core::gate::{decide, resolve, role_home, RouteDecision, ROUTES};
use degree_admin::core::models::{Role, User};
use degree_admin::core::validation::{is_valid_password, is_valid_username};

fn redirect(to: &str, from: Option<&str>) -> RouteDecision {
    RouteDecision::Redirect {
        to: to.to_string(),
        from: from.map(str::to_string),
    }
}

#[test]
fn no_user_goes_to_login_with_origin() {
    assert_eq!(
        decide(None, Some(Role::Student), "/student/plan"),
        redirect("/login", Some("/student/plan"))
    );
    assert_eq!(decide(None, None, "/anything"), redirect("/login", Some("/anything")));
}

#[test]
fn wrong_role_goes_home() {
    let faculty = User::new("lauraben", Role::Faculty);
    assert_eq!(
        decide(Some(&faculty), Some(Role::Student), "/student"),
        redirect("/faculty", None)
    );

    let student = User::new("evantimm", Role::Student);
    assert_eq!(
        decide(Some(&student), Some(Role::Admin), "/admin/users"),
        redirect("/student", None)
    );
}

#[test]
fn matching_or_missing_role_renders() {
    let admin = User::new("aidencox", Role::Admin);
    assert_eq!(decide(Some(&admin), Some(Role::Admin), "/admin"), RouteDecision::Render);
    assert_eq!(decide(Some(&admin), None, "/admin"), RouteDecision::Render);
}

#[test]
fn resolve_uses_route_table() {
    let student = User::new("evantimm", Role::Student);

    assert_eq!(resolve("/login", None), RouteDecision::Render);
    assert_eq!(resolve("/student/plan/", Some(&student)), RouteDecision::Render);
    assert_eq!(
        resolve("/student/plan", None),
        redirect("/login", Some("/student/plan"))
    );
    assert_eq!(
        resolve("/faculty/approvals", Some(&student)),
        redirect("/student", None)
    );
    assert_eq!(resolve("/", Some(&student)), redirect("/login", None));
    assert_eq!(resolve("/nowhere", None), redirect("/login", None));
}

#[test]
fn every_protected_route_sends_other_roles_home() {
    let users = [
        User::new("evantimm", Role::Student),
        User::new("fredjone", Role::Faculty),
        User::new("aidencox", Role::Admin),
    ];
    for route in ROUTES.iter().filter(|r| r.protected) {
        for user in &users {
            let expected = if route.role == Some(user.role) {
                RouteDecision::Render
            } else {
                redirect(role_home(user.role), None)
            };
            assert_eq!(resolve(route.path, Some(user)), expected, "{}", route.path);
        }
    }
}

#[test]
fn username_validator_cases() {
    assert!(is_valid_username("abcdefgh"));
    assert!(is_valid_username("evantimm"));
    assert!(!is_valid_username("Abcdefgh"));
    assert!(!is_valid_username("abcdefg"));
    assert!(!is_valid_username("abcdefghi"));
    assert!(!is_valid_username("abcd3fgh"));
    assert!(!is_valid_username(""));
}

#[test]
fn password_validator_cases() {
    assert!(is_valid_password("fR7!k9PzL2q#"));
    assert!(is_valid_password("Lb8$hY3mQw"));
    assert!(is_valid_password("Aa1!aaaa"));
    assert!(!is_valid_password("Aa1!aaa"), "too short");
    assert!(!is_valid_password(&format!("Aa1!{}", "a".repeat(37))), "too long");
    assert!(!is_valid_password("aa1!aaaaaa"), "no uppercase");
    assert!(!is_valid_password("AA1!AAAAAA"), "no lowercase");
    assert!(!is_valid_password("Aab!aaaaaa"), "no digit");
    assert!(!is_valid_password("Aa1aaaaaaa"), "no special");
}
