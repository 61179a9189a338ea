use super::form::valid_username;
use super::*;
use crate::config::AuthSettings;
use crate::storage::{MemoryStorage, Storage};

fn type_into(form: &mut dyn AuthForm, field: Field, text: &str) {
    form.set_focus(field);
    for c in text.chars() {
        form.push_char(c);
    }
}

#[test]
fn route_paths_round_trip() {
    for route in Route::ALL {
        assert_eq!(Route::from_path(route.path()), Some(route));
    }
    assert_eq!(Route::from_path("/liked/"), Some(Route::Liked));
    assert_eq!(Route::from_path(""), Some(Route::Player));
    assert_eq!(Route::from_path("/admin"), None);
}

#[test]
fn parse_reads_and_decodes_next() {
    let loc = Location::parse("/login?next=%2Fliked");
    assert_eq!(loc.route, Route::Login);
    assert_eq!(loc.next.as_deref(), Some("/liked"));
    assert_eq!(loc.to_url(), "/login?next=%2Fliked");

    let loc = Location::parse("/signup?foo=1&next=/search");
    assert_eq!(loc.route, Route::Signup);
    assert_eq!(loc.next.as_deref(), Some("/search"));

    assert_eq!(Location::parse("/nowhere"), Location::new(Route::Player));
}

#[test]
fn sanitize_next_rejects_foreign_targets() {
    assert_eq!(sanitize_next("/liked?x=1").as_deref(), Some("/liked"));
    assert_eq!(sanitize_next("//evil.example/liked"), None);
    assert_eq!(sanitize_next("https://evil.example"), None);
    assert_eq!(sanitize_next("/\\evil"), None);
    assert_eq!(sanitize_next("/unknown"), None);

    let loc = Location::parse("/login?next=https%3A%2F%2Fevil.example");
    assert_eq!(loc.next, None);
}

#[test]
fn guard_redirects_signed_out_users_to_login() {
    let to = guard(&Location::new(Route::Liked), false);
    assert_eq!(to.route, Route::Login);
    assert_eq!(to.next.as_deref(), Some("/liked"));

    assert_eq!(guard(&Location::new(Route::Liked), true), Location::new(Route::Liked));
    assert_eq!(guard(&Location::new(Route::Search), false), Location::new(Route::Search));
}

#[test]
fn guard_moves_signed_in_users_off_auth_pages() {
    let from = Location::parse("/login?next=/liked");
    assert_eq!(guard(&from, true), Location::new(Route::Liked));
    assert_eq!(guard(&Location::new(Route::Signup), true), Location::new(Route::Player));
    assert_eq!(after_auth(&Location::parse("/login?next=/signup")).route, Route::Player);
}

#[test]
fn login_with_empty_password_is_rejected() {
    let auth = AuthSettings::default();
    let mut form = LoginForm::default();
    type_into(&mut form, Field::Username, "demo");

    assert_eq!(form.submit(&auth), FormOutcome::Invalid);
    assert!(form.validation().is_invalid(Field::Password));
    assert!(!form.validation().is_invalid(Field::Username));
    assert_eq!(form.validation().message.as_deref(), Some("Enter your password."));
    assert_eq!(form.focus(), Field::Password);
    assert_eq!(form.username, "demo");
}

#[test]
fn login_checks_the_demo_credential() {
    let auth = AuthSettings::default();
    let mut form = LoginForm::default();
    type_into(&mut form, Field::Username, " demo ");
    type_into(&mut form, Field::Password, "wrong");
    assert_eq!(form.submit(&auth), FormOutcome::Invalid);
    assert_eq!(
        form.validation().message.as_deref(),
        Some("Incorrect username or password.")
    );

    form.set_focus(Field::Password);
    for _ in 0..5 {
        form.pop_char();
    }
    form.push_char('a');
    assert!(!form.validation().is_invalid(Field::Password));
    for c in "llegro123".chars() {
        form.push_char(c);
    }

    match form.submit(&auth) {
        FormOutcome::Success(user) => {
            assert_eq!(user.username, "demo");
            assert!(user.ts.is_some());
        }
        FormOutcome::Invalid => panic!("expected success: {:?}", form.validation()),
    }
    assert!(form.password.is_empty());
}

#[test]
fn focus_cycles_through_form_fields() {
    let mut login = LoginForm::default();
    assert_eq!(login.focus(), Field::Username);
    login.focus_next();
    assert_eq!(login.focus(), Field::Password);
    login.focus_next();
    assert_eq!(login.focus(), Field::Username);
    login.set_focus(Field::Confirm);
    assert_eq!(login.focus(), Field::Username);

    let mut signup = SignupForm::default();
    signup.set_focus(Field::DisplayName);
    signup.focus_prev();
    assert_eq!(signup.focus(), Field::Confirm);
}

#[test]
fn username_pattern() {
    assert!(valid_username("abc"));
    assert!(valid_username("mira.sol_99-x"));
    assert!(!valid_username("ab"));
    assert!(!valid_username("has space"));
    assert!(!valid_username(&"a".repeat(33)));
    assert!(!valid_username("ünï"));
}

#[test]
fn signup_validates_every_field() {
    let auth = AuthSettings::default();
    let mut form = SignupForm::default();
    type_into(&mut form, Field::Username, "x");
    type_into(&mut form, Field::Password, "short");
    type_into(&mut form, Field::Confirm, "shorter");

    assert_eq!(form.submit(&auth), FormOutcome::Invalid);
    let v = form.validation();
    assert!(v.is_invalid(Field::Username));
    assert!(v.is_invalid(Field::Password));
    assert!(v.is_invalid(Field::Confirm));
    assert!(!v.is_invalid(Field::DisplayName));
    assert!(v.message.as_deref().unwrap().starts_with("Usernames are"));
}

#[test]
fn signup_success_keeps_display_name() {
    let auth = AuthSettings::default();
    let mut form = SignupForm::default();
    type_into(&mut form, Field::DisplayName, "  Mira ");
    type_into(&mut form, Field::Username, "mira");
    type_into(&mut form, Field::Password, "secret1");
    type_into(&mut form, Field::Confirm, "secret1");

    let FormOutcome::Success(user) = form.submit(&auth) else {
        panic!("expected success: {:?}", form.validation());
    };
    assert_eq!(user.display_name.as_deref(), Some("Mira"));
    assert_eq!(user.label(), "Mira");
}

#[test]
fn session_round_trip_and_malformed_values() {
    let mut storage = MemoryStorage::new();
    assert_eq!(current_user(&storage), None);

    let user = AuthUser {
        username: "demo".into(),
        display_name: None,
        ts: Some(1),
    };
    sign_in(&mut storage, &user).unwrap();
    assert_eq!(storage.get_item(AUTH_KEY).as_deref(), Some(r#"{"username":"demo","ts":1}"#));
    assert_eq!(current_user(&storage), Some(user.clone()));
    assert_eq!(user.label(), "demo");

    sign_out(&mut storage).unwrap();
    assert_eq!(current_user(&storage), None);

    storage.set_item(AUTH_KEY, "{oops").unwrap();
    assert_eq!(current_user(&storage), None);

    storage.set_item(AUTH_KEY, r#"{"username":"  ","displayName":"x"}"#).unwrap();
    assert_eq!(current_user(&storage), None);
}
