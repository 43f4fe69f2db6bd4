//! Authenticated session.

use secrecy::SecretString;

use webshop_core::{Capabilities, Role};

use crate::api::{LoginResponse, UserProfile};

/// Token and profile of the logged-in user.
///
/// Implements `Debug` manually to redact the token.
#[derive(Clone)]
pub struct Session {
    token: SecretString,
    user: UserProfile,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("token", &"[REDACTED]")
            .field("user", &self.user)
            .finish()
    }
}

impl Session {
    #[must_use]
    pub fn new(token: SecretString, user: UserProfile) -> Self {
        Self { token, user }
    }

    /// Bearer token for authenticated requests.
    #[must_use]
    pub const fn token(&self) -> &SecretString {
        &self.token
    }

    #[must_use]
    pub const fn user(&self) -> &UserProfile {
        &self.user
    }

    #[must_use]
    pub const fn role(&self) -> Role {
        self.user.role
    }

    #[must_use]
    pub const fn capabilities(&self) -> Capabilities {
        self.user.role.capabilities()
    }
}

impl From<LoginResponse> for Session {
    fn from(response: LoginResponse) -> Self {
        Self::new(SecretString::from(response.access_token), response.user)
    }
}
