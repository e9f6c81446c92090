use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Prefix of the `Authorization` header value carrying a token
const BEARER_PREFIX: &str = "Bearer ";

/// Number of leading characters kept when a token is shown in logs
const REDACTED_PREFIX_LEN: usize = 4;

/// Values this short or shorter are hidden entirely
const REDACTED_MAX_HIDDEN_LEN: usize = 8;

/// Opaque session credential. Never empty.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct SessionToken(String);

impl SessionToken {
    /// Wrap a raw value. Empty values are not tokens.
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        if value.is_empty() {
            None
        } else {
            Some(Self(value))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }

    /// Value for an `Authorization` request header
    pub fn authorization_header(&self) -> String {
        format!("{}{}", BEARER_PREFIX, self.0)
    }

    /// Extract the token from an `Authorization: Bearer <token>` header value
    pub fn from_authorization_header(header: &str) -> Option<Self> {
        let token = header
            .strip_prefix(BEARER_PREFIX)
            .and_then(|rest| rest.split(' ').next())
            .and_then(Self::new);
        if token.is_none() {
            warn!("received invalid Authorization header '{}'", redact(header));
        }
        token
    }

    /// Short form safe to put in logs
    pub fn redacted(&self) -> String {
        redact(&self.0)
    }
}

fn redact(value: &str) -> String {
    if value.chars().count() <= REDACTED_MAX_HIDDEN_LEN {
        return "****".to_string();
    }
    let prefix: String = value.chars().take(REDACTED_PREFIX_LEN).collect();
    format!("{}****", prefix)
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SessionToken").field(&self.redacted()).finish()
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SessionToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for SessionToken {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| "session token must not be empty".to_string())
    }
}

impl From<SessionToken> for String {
    fn from(token: SessionToken) -> Self {
        token.0
    }
}
