use serde::{Deserialize, Serialize};
use std::fmt;

/// Social login provider accepted by the auth collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMethod {
    Google,
    Twitter,
    Github,
    Discord,
}

impl fmt::Display for AuthMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Google => write!(f, "google"),
            Self::Twitter => write!(f, "twitter"),
            Self::Github => write!(f, "github"),
            Self::Discord => write!(f, "discord"),
        }
    }
}

/// The authenticated end user, as returned by the auth collaborator.
///
/// Created on successful login, destroyed on explicit disconnect. The token
/// is opaque to the gateway and is only ever forwarded to the wallet service.
#[derive(Clone, Serialize, Deserialize)]
pub struct Identity {
    pub method: AuthMethod,
    pub name: String,
    pub token: String,
}

// The session token never goes to logs.
impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Identity")
            .field("method", &self.method)
            .field("name", &self.name)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// The resolved on-chain identifier for the user.
///
/// Derived at most once per provider generation and immutable for the rest
/// of the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountAddress(String);

impl AccountAddress {
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for AccountAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for AccountAddress {
    fn from(address: String) -> Self {
        Self(address)
    }
}
