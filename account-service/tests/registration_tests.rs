mod common;

use std::sync::Arc;

use account_service::account::errors::AccountError;
use account_service::account::errors::PolicyViolation;
use account_service::account::models::AccountId;
use account_service::account::models::Credentials;
use account_service::account::models::RegisterCommand;
use account_service::account::ports::AccountServicePort;
use account_service::account::service::AccountServiceOptions;
use chrono::Duration;
use common::TestApp;

#[tokio::test]
async fn test_register_returns_numeric_id_and_token() {
    let app = TestApp::spawn();

    let registration = app
        .service
        .register(RegisterCommand::new("Alice123!", "Str0ng&Pass"))
        .await
        .expect("Registration failed");

    assert_eq!(registration.account.id, AccountId(1));
    assert_eq!(registration.account.identifier.as_str(), "Alice123!");

    let session = registration.session.expect("Missing session token");
    let claims = app
        .token_issuer
        .validate(&session.token)
        .expect("Token validation failed");
    assert_eq!(claims.subject(), "Alice123!");
}

#[tokio::test]
async fn test_register_short_identifier() {
    let app = TestApp::spawn();

    let result = app
        .service
        .register(RegisterCommand::new("ab", "Str0ng&Pass"))
        .await;

    assert!(matches!(
        result,
        Err(AccountError::Validation(PolicyViolation::TooShort { .. }))
    ));
    assert!(app.store.is_empty().await);
}

#[tokio::test]
async fn test_register_weak_password_persists_nothing() {
    let app = TestApp::spawn();

    for weak in ["abcdefgh", "ABCDEFGH", "12345678", "!!!!!!!!"] {
        let result = app
            .service
            .register(RegisterCommand::new("Alice123!", weak))
            .await;

        assert!(
            matches!(
                result,
                Err(AccountError::Validation(PolicyViolation::TooWeak { .. }))
            ),
            "{weak:?} should be too weak"
        );
    }

    assert!(app.store.is_empty().await);
}

#[tokio::test]
async fn test_register_twice_conflicts() {
    let app = TestApp::spawn();

    app.service
        .register(RegisterCommand::new("Alice123!", "Str0ng&Pass"))
        .await
        .expect("First registration failed");

    let second = app
        .service
        .register(RegisterCommand::new("Alice123!", "Different#Pass1"))
        .await;

    assert_eq!(
        second.unwrap_err(),
        AccountError::Conflict("Alice123!".to_string())
    );
    assert_eq!(app.store.len().await, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_registers_for_same_identifier() {
    let app = TestApp::spawn();

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let service = Arc::clone(&app.service);
            tokio::spawn(async move {
                service
                    .register(RegisterCommand::new(
                        "racer@example.com",
                        format!("Str0ng&Pass{i}"),
                    ))
                    .await
            })
        })
        .collect();

    let mut successes = 0;
    let mut conflicts = 0;
    for handle in handles {
        match handle.await.expect("Register task panicked") {
            Ok(_) => successes += 1,
            Err(AccountError::Conflict(_)) => conflicts += 1,
            Err(other) => panic!("Unexpected error: {other:?}"),
        }
    }

    assert_eq!(successes, 1);
    assert_eq!(conflicts, 7);
    assert_eq!(app.store.len().await, 1);
}

#[tokio::test]
async fn test_login_after_register() {
    let app = TestApp::spawn();

    let registration = app
        .service
        .register(
            RegisterCommand::new("alice@example.com", "Str0ng&Pass")
                .with_display_name("Alice")
                .with_privilege(2),
        )
        .await
        .unwrap();

    let authentication = app
        .service
        .login(Credentials::new("alice@example.com", "Str0ng&Pass"))
        .await
        .expect("Login failed");

    assert_eq!(authentication.account, registration.account);
    assert!(authentication.session.is_some());
}

#[tokio::test]
async fn test_login_wrong_password_and_unknown_identifier_look_the_same() {
    let app = TestApp::spawn();

    app.service
        .register(RegisterCommand::new("Alice123!", "Str0ng&Pass"))
        .await
        .unwrap();

    let wrong_password = app
        .service
        .login(Credentials::new("Alice123!", "wrong"))
        .await
        .unwrap_err();
    let unknown = app
        .service
        .login(Credentials::new("Nobody123", "Str0ng&Pass"))
        .await
        .unwrap_err();

    assert_eq!(wrong_password, AccountError::Unauthorized);
    assert_eq!(wrong_password, unknown);
    assert_eq!(wrong_password.to_string(), unknown.to_string());
}

#[tokio::test]
async fn test_login_is_case_sensitive() {
    let app = TestApp::spawn();

    app.service
        .register(RegisterCommand::new("Alice123!", "Str0ng&Pass"))
        .await
        .unwrap();

    let result = app
        .service
        .login(Credentials::new("alice123!", "Str0ng&Pass"))
        .await;

    assert_eq!(result.unwrap_err(), AccountError::Unauthorized);
}

#[tokio::test]
async fn test_tokens_disabled_by_options() {
    let app = TestApp::spawn_with(AccountServiceOptions {
        issue_token_on_register: false,
        issue_token_on_login: false,
        ..AccountServiceOptions::default()
    });

    let registration = app
        .service
        .register(RegisterCommand::new("Alice123!", "Str0ng&Pass"))
        .await
        .unwrap();
    let authentication = app
        .service
        .login(Credentials::new("Alice123!", "Str0ng&Pass"))
        .await
        .unwrap();

    assert!(registration.session.is_none());
    assert!(authentication.session.is_none());
}

#[tokio::test]
async fn test_token_valid_until_expiry() {
    let app = TestApp::spawn();

    let session = app.service.issue_token("Alice123!").await.unwrap();
    let expires_at = session.claims.expires_at().unwrap();

    assert!(app
        .token_issuer
        .validate_at(&session.token, expires_at - Duration::seconds(1))
        .is_ok());
    assert!(app
        .token_issuer
        .validate_at(&session.token, expires_at + Duration::seconds(1))
        .is_err());
    assert_eq!(
        app.service.validate_token(&session.token).await.unwrap(),
        session.claims
    );
}

#[tokio::test]
async fn test_list_accounts_never_exposes_digests() {
    let app = TestApp::spawn();

    app.service
        .register(RegisterCommand::new("Alice123!", "Str0ng&Pass").with_display_name("Alice"))
        .await
        .unwrap();
    app.service
        .register(RegisterCommand::new("bob@example.com", "B0b&Password"))
        .await
        .unwrap();

    let accounts = app.service.list_accounts().await.unwrap();

    assert_eq!(accounts.len(), 2);
    assert_eq!(accounts[0].identifier.as_str(), "Alice123!");
    assert_eq!(accounts[0].display_name.as_deref(), Some("Alice"));
    assert_eq!(accounts[1].privilege, 0);
    assert!(!format!("{:?}", accounts).contains("$argon2"));
}
