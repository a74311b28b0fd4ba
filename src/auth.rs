//! Authentication Module
//!
//! Provides:
//! - The `Authenticator` seam used by the session to gate the registration form
//! - A static credential pair implementation (placeholder gate, not a security boundary)

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

/// Demo account accepted when no credentials are configured
pub const DEFAULT_EMAIL: &str = "admin@regdesk.local";
pub const DEFAULT_PASSWORD: &str = "regdesk";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid credentials. Please try again.")]
    InvalidCredentials,
}

/// Email/password pair submitted at the login prompt
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl Default for Credentials {
    fn default() -> Self {
        Self::new(DEFAULT_EMAIL, DEFAULT_PASSWORD)
    }
}

// Never print the password.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Something that can decide whether an identity may open the registration form
pub trait Authenticator: Send + Sync {
    fn verify(&self, identity: &Credentials) -> bool;
}

/// Accepts exactly one fixed email/password pair
#[derive(Debug, Clone)]
pub struct StaticAuthenticator {
    expected: Credentials,
}

impl StaticAuthenticator {
    pub fn new(expected: Credentials) -> Self {
        Self { expected }
    }
}

impl Default for StaticAuthenticator {
    fn default() -> Self {
        Self::new(Credentials::default())
    }
}

impl Authenticator for StaticAuthenticator {
    fn verify(&self, identity: &Credentials) -> bool {
        // Exact comparison: no trimming, no case folding.
        let matches = identity.email == self.expected.email
            && identity.password == self.expected.password;
        if matches {
            debug!("Credentials accepted for {}", identity.email);
        } else {
            warn!("Rejected login attempt");
        }
        matches
    }
}

impl<A: Authenticator + ?Sized> Authenticator for Box<A> {
    fn verify(&self, identity: &Credentials) -> bool {
        (**self).verify(identity)
    }
}

/// Check a login attempt, mapping a mismatch to the generic error
pub fn check<A: Authenticator + ?Sized>(
    authenticator: &A,
    email: &str,
    password: &str,
) -> Result<(), AuthError> {
    if authenticator.verify(&Credentials::new(email, password)) {
        Ok(())
    } else {
        Err(AuthError::InvalidCredentials)
    }
}
