use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::GatewayConfig;
use crate::error::{GatewayError, Result};
use crate::navigation::Navigator;
use crate::storage::TokenStorage;
use crate::token::SessionToken;

/// Storage slot the session token lives under
pub const TOKEN_KEY: &str = "userToken";

/// Login page the client has been (or should be) sent to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Redirect {
    pub url: String,
}

/// Result of looking up the session token.
///
/// A missing token is not an error: it is the `Redirect` outcome, and the
/// caller decides how to leave.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub enum Outcome {
    Token(SessionToken),
    Redirect(Redirect),
}

impl Outcome {
    pub fn token(&self) -> Option<&SessionToken> {
        match self {
            Outcome::Token(token) => Some(token),
            Outcome::Redirect(_) => None,
        }
    }

    pub fn into_token(self) -> Option<SessionToken> {
        match self {
            Outcome::Token(token) => Some(token),
            Outcome::Redirect(_) => None,
        }
    }

    pub fn is_redirect(&self) -> bool {
        matches!(self, Outcome::Redirect(_))
    }
}

/// Gates access on the presence of a stored session token.
pub struct SessionTokenGateway<S, N> {
    config: GatewayConfig,
    storage: S,
    navigator: N,
}

impl<S: TokenStorage, N: Navigator> SessionTokenGateway<S, N> {
    pub fn new(config: GatewayConfig, storage: S, navigator: N) -> Self {
        Self {
            config,
            storage,
            navigator,
        }
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    /// Send the client to the configured login page.
    ///
    /// The navigator's failure, if any, is returned as-is.
    pub fn redirect_to_login(&self) -> Result<Redirect> {
        info!("redirecting client to login page at {}", self.config.login_url);
        self.navigator.replace(&self.config.login_url)?;
        Ok(self.login_redirect())
    }

    /// Look up the token without navigating anywhere
    pub fn resolve(&self) -> Result<Outcome> {
        let stored = self.storage.get(TOKEN_KEY)?;
        match stored.and_then(SessionToken::new) {
            Some(token) => {
                debug!(token = %token.redacted(), "found access token");
                Ok(Outcome::Token(token))
            }
            None => Ok(Outcome::Redirect(self.login_redirect())),
        }
    }

    /// Look up the token, redirecting to login when it is absent or empty.
    ///
    /// On the `Redirect` outcome the navigator has already been invoked
    /// exactly once; the caller must not continue as if authenticated.
    pub fn access_token(&self) -> Result<Outcome> {
        match self.resolve()? {
            Outcome::Token(token) => Ok(Outcome::Token(token)),
            Outcome::Redirect(_) => {
                info!("unable to find access token in storage, redirecting to login");
                Ok(Outcome::Redirect(self.redirect_to_login()?))
            }
        }
    }

    /// Write the configured development token into the token slot
    pub fn set_dev_token(&self) -> Result<SessionToken> {
        let token = self
            .config
            .dev_token
            .clone()
            .and_then(SessionToken::new)
            .ok_or(GatewayError::MissingDevToken)?;
        info!("setting dev access token with value {}", token.redacted());
        self.storage.set(TOKEN_KEY, token.as_str())?;
        Ok(token)
    }

    fn login_redirect(&self) -> Redirect {
        Redirect {
            url: self.config.login_url.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::RecordingNavigator;
    use crate::storage::MemoryStorage;

    const LOGIN_URL: &str = "https://login.example.com";

    fn gateway(
        storage: MemoryStorage,
        dev_token: Option<&str>,
    ) -> SessionTokenGateway<MemoryStorage, RecordingNavigator> {
        let mut config = GatewayConfig::new(LOGIN_URL);
        if let Some(dev_token) = dev_token {
            config = config.with_dev_token(dev_token);
        }
        SessionTokenGateway::new(config, storage, RecordingNavigator::new())
    }

    struct FailingNavigator;

    impl Navigator for FailingNavigator {
        fn replace(&self, url: &str) -> Result<()> {
            Err(GatewayError::Navigation {
                url: url.to_string(),
                reason: "invalid target".to_string(),
            })
        }
    }

    #[test]
    fn test_resolve_does_not_navigate() {
        let gw = gateway(MemoryStorage::new(), None);
        let outcome = gw.resolve().unwrap();
        assert_eq!(
            outcome,
            Outcome::Redirect(Redirect {
                url: LOGIN_URL.to_string()
            })
        );
        assert!(gw.navigator().visits().is_empty());
    }

    #[test]
    fn test_access_token_present() {
        let gw = gateway(MemoryStorage::with_value(TOKEN_KEY, "abc123"), None);
        let outcome = gw.access_token().unwrap();
        assert_eq!(outcome.token().map(|t| t.as_str()), Some("abc123"));
        assert!(gw.navigator().visits().is_empty());
    }

    #[test]
    fn test_access_token_empty_redirects() {
        let gw = gateway(MemoryStorage::with_value(TOKEN_KEY, ""), None);
        let outcome = gw.access_token().unwrap();
        assert!(outcome.is_redirect());
        assert_eq!(gw.navigator().visits(), vec![LOGIN_URL]);
    }

    #[test]
    fn test_redirect_to_login() {
        let gw = gateway(MemoryStorage::new(), None);
        let redirect = gw.redirect_to_login().unwrap();
        assert_eq!(redirect.url, LOGIN_URL);
        assert_eq!(gw.navigator().last().as_deref(), Some(LOGIN_URL));
    }

    #[test]
    fn test_navigation_failure_propagates() {
        let gw = SessionTokenGateway::new(
            GatewayConfig::new("not a url"),
            MemoryStorage::new(),
            FailingNavigator,
        );
        match gw.access_token() {
            Err(GatewayError::Navigation { url, .. }) => assert_eq!(url, "not a url"),
            other => panic!("expected navigation error, got {:?}", other),
        }
    }

    #[test]
    fn test_set_dev_token_without_config() {
        let storage = MemoryStorage::new();
        let gw = gateway(storage.clone(), None);
        assert!(matches!(gw.set_dev_token(), Err(GatewayError::MissingDevToken)));
        assert!(storage.is_empty());
    }

    #[test]
    fn test_set_dev_token_overwrites_existing() {
        let storage = MemoryStorage::with_value(TOKEN_KEY, "stale");
        let gw = gateway(storage.clone(), Some("dev-xyz"));
        let token = gw.set_dev_token().unwrap();
        assert_eq!(token.as_str(), "dev-xyz");
        assert_eq!(storage.get(TOKEN_KEY).unwrap().as_deref(), Some("dev-xyz"));
    }

    #[test]
    fn test_outcome_serializes_tagged() {
        let outcome = Outcome::Token(SessionToken::new("abc123").unwrap());
        let json = serde_json::to_string(&outcome).unwrap();
        assert_eq!(json, r#"{"kind":"token","value":"abc123"}"#);

        let outcome = Outcome::Redirect(Redirect {
            url: LOGIN_URL.to_string(),
        });
        let json = serde_json::to_string(&outcome).unwrap();
        assert_eq!(
            json,
            r#"{"kind":"redirect","value":{"url":"https://login.example.com"}}"#
        );
    }
}
