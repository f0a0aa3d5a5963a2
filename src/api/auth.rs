use chrono::{DateTime, Utc};
use std::fmt;

/// Login/password pair. Only borrowed for the login call, never kept by the client.
#[derive(Clone)]
pub struct Credentials {
    pub login: String,
    pub password: String,
}

impl Credentials {
    pub fn new(login: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("login", &self.login)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Opaque bearer token, exactly as the login endpoint returned it.
#[derive(Clone, PartialEq, Eq)]
pub struct Token(String);

impl Token {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Token(<{} bytes>)", self.0.len())
    }
}

/// Authentication state threaded through every data call.
///
/// MyStat does not tell us when a token stops being valid, so tokens from a
/// login carry no expiry. `is_expired` is the hook a refresh policy would
/// plug into; today the client only logs when it fires.
#[derive(Debug, Clone)]
pub struct AuthContext {
    token: Token,
    obtained_at: DateTime<Utc>,
    expires_at: Option<DateTime<Utc>>,
}

impl AuthContext {
    pub fn new(token: Token) -> Self {
        Self {
            token,
            obtained_at: Utc::now(),
            expires_at: None,
        }
    }

    pub fn with_expiry(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    pub fn token(&self) -> &Token {
        &self.token
    }

    pub fn obtained_at(&self) -> DateTime<Utc> {
        self.obtained_at
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| now >= at)
    }

    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token.as_str())
    }
}
