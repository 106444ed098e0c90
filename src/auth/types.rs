//! Types for identities and sessions

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a user account
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Marketplace role chosen at registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Farmer,
    #[default]
    Consumer,
}

/// Who is acting, as seen by the core
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: UserId,
    pub role: UserRole,

    /// Token to act on the user's behalf; `None` falls back to the anonymous key
    pub access_token: Option<String>,
}

/// The parts of a Supabase access token the client reads
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Claims {
    pub sub: String,

    #[serde(default)]
    pub exp: Option<i64>,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub user_metadata: UserMetadata,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct UserMetadata {
    #[serde(rename = "type", default)]
    pub role: Option<UserRole>,
}
