//! Session handling for the signed-in user

use jsonwebtoken::{decode, DecodingKey, Validation};
use std::collections::HashSet;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use super::types::{Claims, Identity, UserId, UserRole};
use super::IdentityProvider;
use crate::error::Result;

/// Session data
#[derive(Debug, Clone)]
pub struct Session {
    /// The access token
    pub access_token: String,

    /// The user ID
    pub user_id: UserId,

    /// The role picked at registration
    pub role: UserRole,

    /// The user's email, when the token carries it
    pub email: Option<String>,

    /// The expiry timestamp
    pub expires_at: Option<i64>,
}

fn now_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::from_secs(0))
        .as_secs() as i64
}

impl Session {
    /// Create a new session
    pub fn new(access_token: String, user_id: UserId, role: UserRole, expires_in: i64) -> Self {
        Self {
            access_token,
            user_id,
            role,
            email: None,
            expires_at: Some(now_secs() + expires_in),
        }
    }

    /// Build a session from a Supabase access token.
    ///
    /// The signature is not checked here: the backend verifies every request
    /// carrying the token, the client only needs the subject and role.
    pub fn from_access_token(access_token: &str) -> Result<Self> {
        let mut validation = Validation::default();
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims = HashSet::new();

        let data = decode::<Claims>(access_token, &DecodingKey::from_secret(&[]), &validation)?;
        let claims = data.claims;

        Ok(Self {
            access_token: access_token.to_string(),
            user_id: UserId::new(claims.sub),
            role: claims.user_metadata.role.unwrap_or_default(),
            email: claims.email,
            expires_at: claims.exp,
        })
    }

    /// Check if the session has expired
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires_at) => now_secs() >= expires_at,
            None => false,
        }
    }
}

impl IdentityProvider for Session {
    fn current_identity(&self) -> Option<Identity> {
        if self.is_expired() {
            return None;
        }
        Some(Identity {
            user_id: self.user_id.clone(),
            role: self.role,
            access_token: Some(self.access_token.clone()),
        })
    }
}
