//! Integration tests for account creation.

#![allow(clippy::indexing_slicing)]

use alfath_integration_tests::{Behavior, MockBackend, TAKEN_USERNAME};
use alfath_storefront::account::{SignupError, SignupForm};
use secrecy::SecretString;

fn form(username: &str, contact: &str) -> SignupForm {
    SignupForm {
        username: username.to_string(),
        contact: contact.to_string(),
        password: SecretString::from("secret123"),
        confirm_password: SecretString::from("secret123"),
    }
}

#[tokio::test]
async fn test_signup_with_email() {
    let backend = MockBackend::start().await.expect("mock backend should start");
    let state = backend.app_state().expect("state should build");

    state
        .sign_up(&form("sara", "sara@example.com"))
        .await
        .expect("sign-up should succeed");

    let signups = backend.signups();
    assert_eq!(signups.len(), 1);
    assert_eq!(signups[0]["username"], "sara");
    assert_eq!(signups[0]["email"], "sara@example.com");
    assert_eq!(signups[0]["password"], "secret123");
    assert!(signups[0].get("phone").is_none());
}

#[tokio::test]
async fn test_signup_with_phone() {
    let backend = MockBackend::start().await.expect("mock backend should start");
    let state = backend.app_state().expect("state should build");

    state
        .sign_up(&form("omar", "01098765432"))
        .await
        .expect("sign-up should succeed");

    assert_eq!(backend.signups()[0]["phone"], "01098765432");
}

#[tokio::test]
async fn test_conflict_maps_to_already_exists() {
    let backend = MockBackend::start().await.expect("mock backend should start");
    let state = backend.app_state().expect("state should build");

    let err = state
        .sign_up(&form(TAKEN_USERNAME, "taken@example.com"))
        .await
        .expect_err("sign-up should be rejected");

    assert!(matches!(err, SignupError::AlreadyExists));
    assert_eq!(
        err.user_message(),
        "هذا البريد الإلكتروني أو اسم المستخدم مستخدم بالفعل."
    );
}

#[tokio::test]
async fn test_other_statuses_map_by_code() {
    let backend = MockBackend::start().await.expect("mock backend should start");
    let state = backend.app_state().expect("state should build");

    backend.set_behavior(Behavior::Status(422));
    let err = state.sign_up(&form("sara", "sara@example.com")).await;
    assert!(matches!(err, Err(SignupError::Incomplete)));

    backend.set_behavior(Behavior::Status(400));
    let err = state.sign_up(&form("sara", "sara@example.com")).await;
    assert!(matches!(err, Err(SignupError::InvalidData)));

    backend.set_behavior(Behavior::Status(502));
    let err = state.sign_up(&form("sara", "sara@example.com")).await;
    assert!(matches!(err, Err(SignupError::Request(_))));
}

#[tokio::test]
async fn test_invalid_form_is_not_sent() {
    let backend = MockBackend::start().await.expect("mock backend should start");
    let state = backend.app_state().expect("state should build");

    let err = state.sign_up(&form("sara", "not a contact")).await;
    assert!(matches!(err, Err(SignupError::InvalidContact(_))));
    assert!(backend.signups().is_empty());
}
