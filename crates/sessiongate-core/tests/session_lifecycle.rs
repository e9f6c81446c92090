use sessiongate_core::{
    FileStorage, GatewayConfig, MemoryStorage, Outcome, RecordingNavigator, SessionTokenGateway,
    TokenStorage, TOKEN_KEY,
};

const LOGIN_URL: &str = "https://login.example.com/signin";

fn config() -> GatewayConfig {
    GatewayConfig::new(LOGIN_URL).with_dev_token("dev-xyz")
}

#[test]
fn test_empty_storage_redirects_once() {
    let nav = RecordingNavigator::new();
    let gw = SessionTokenGateway::new(config(), MemoryStorage::new(), nav.clone());

    let outcome = gw.access_token().unwrap();

    assert!(outcome.is_redirect());
    assert!(outcome.into_token().is_none());
    assert_eq!(nav.visits(), vec![LOGIN_URL]);
}

#[test]
fn test_stored_token_is_returned_without_navigation() {
    let nav = RecordingNavigator::new();
    let storage = MemoryStorage::with_value(TOKEN_KEY, "abc123");
    let gw = SessionTokenGateway::new(config(), storage, nav.clone());

    let outcome = gw.access_token().unwrap();

    assert_eq!(outcome.token().map(|t| t.as_str()), Some("abc123"));
    assert!(nav.visits().is_empty());
}

#[test]
fn test_empty_value_behaves_like_absent() {
    let nav = RecordingNavigator::new();
    let storage = MemoryStorage::with_value(TOKEN_KEY, "");
    let gw = SessionTokenGateway::new(config(), storage, nav.clone());

    match gw.access_token().unwrap() {
        Outcome::Redirect(redirect) => assert_eq!(redirect.url, LOGIN_URL),
        Outcome::Token(token) => panic!("unexpected token {:?}", token),
    }
    assert_eq!(nav.visits().len(), 1);
}

#[test]
fn test_seeded_dev_token_is_read_back() {
    let nav = RecordingNavigator::new();
    let gw = SessionTokenGateway::new(config(), MemoryStorage::new(), nav.clone());

    gw.set_dev_token().unwrap();
    let outcome = gw.access_token().unwrap();

    assert_eq!(outcome.token().map(|t| t.as_str()), Some("dev-xyz"));
    assert!(nav.visits().is_empty());
}

#[test]
fn test_seeding_twice_is_idempotent() {
    let nav = RecordingNavigator::new();
    let storage = MemoryStorage::new();
    let gw = SessionTokenGateway::new(config(), storage.clone(), nav.clone());

    gw.set_dev_token().unwrap();
    gw.set_dev_token().unwrap();

    assert_eq!(storage.get(TOKEN_KEY).unwrap().as_deref(), Some("dev-xyz"));
    assert_eq!(storage.len(), 1);
    assert!(nav.visits().is_empty());
}

#[test]
fn test_round_trip_for_various_values() {
    for value in ["a", "abc123", "eyJhbGciOiJIUzI1NiJ9.e30.sig", "with space", "ünïcødé"] {
        let storage = MemoryStorage::new();
        let gw = SessionTokenGateway::new(
            GatewayConfig::new(LOGIN_URL).with_dev_token(value),
            storage,
            RecordingNavigator::new(),
        );
        gw.set_dev_token().unwrap();
        let outcome = gw.access_token().unwrap();
        assert_eq!(outcome.token().map(|t| t.as_str()), Some(value));
    }
}

#[test]
fn test_file_storage_persists_across_gateways() {
    let dir = tempfile::tempdir().unwrap();

    let first = SessionTokenGateway::new(
        config(),
        FileStorage::new(dir.path().to_path_buf()),
        RecordingNavigator::new(),
    );
    first.set_dev_token().unwrap();

    let nav = RecordingNavigator::new();
    let second = SessionTokenGateway::new(
        GatewayConfig::new(LOGIN_URL),
        FileStorage::new(dir.path().to_path_buf()),
        nav.clone(),
    );
    let outcome = second.access_token().unwrap();

    assert_eq!(outcome.token().map(|t| t.as_str()), Some("dev-xyz"));
    assert!(nav.visits().is_empty());
}

#[test]
fn test_gateway_over_borrowed_storage() {
    let storage = MemoryStorage::with_value(TOKEN_KEY, "abc123");
    let nav = RecordingNavigator::new();
    let gw = SessionTokenGateway::new(config(), &storage, &nav);

    assert!(!gw.access_token().unwrap().is_redirect());
}
