use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod session;

pub use session::SessionStore;

/// Authenticated identity attached to a session. There is exactly one
/// operator account, so this only carries the username.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Principal {
    pub username: String,
}

#[derive(Debug, Error)]
pub enum AuthError {
    /// Deliberately identical for unknown-username and wrong-password so the
    /// response cannot be used for enumeration.
    #[error("Incorrect username or password")]
    InvalidCredentials,
}

/// The configured admin credential pair. Comparison is exact string equality;
/// there is no credential store behind this.
#[derive(Clone)]
pub struct AdminCredentials {
    username: String,
    password: String,
}

impl AdminCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn verify(&self, username: &str, password: &str) -> Result<Principal, AuthError> {
        if username == self.username && password == self.password {
            Ok(Principal {
                username: self.username.clone(),
            })
        } else {
            Err(AuthError::InvalidCredentials)
        }
    }
}

impl std::fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AdminCredentials(**redacted**)")
    }
}
