//! Identity of the signed-in user
//!
//! Sign-in itself happens elsewhere; the core only needs to know who is
//! acting and which token to forward to the backend.

mod session;
mod types;

pub use session::*;
pub use types::{Identity, UserId, UserRole};

/// Source of the current user's identity
pub trait IdentityProvider: Send + Sync {
    /// `None` when nobody is signed in or the session lapsed
    fn current_identity(&self) -> Option<Identity>;
}

impl IdentityProvider for Identity {
    fn current_identity(&self) -> Option<Identity> {
        Some(self.clone())
    }
}
