use std::fmt::{self, Debug};

use serde::{Deserialize, Serialize};

use crate::{Account, BackendError, Plan};

/// Email and password for a login.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Login email.
    pub email: String,
    /// Plain-text password, sent over the wire once.
    pub password: String,
}

impl Credentials {
    /// Creates credentials from an email and a password.
    #[inline]
    pub fn new<E: Into<String>, P: Into<String>>(email: E, password: P) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// A sign-up form: account details plus the chosen plan.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    /// Full name, which also becomes the client name.
    pub name: String,
    /// Login email.
    pub email: String,
    /// Plain-text password.
    pub password: String,
    /// The selected plan.
    pub plan: Plan,
}

impl Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("plan", &self.plan)
            .finish()
    }
}

/// A successful login or registration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthGrant {
    /// Bearer token for [`AuthBackend::fetch_account`].
    pub access_token: String,
    /// The account the token belongs to.
    pub account: Account,
}

/// A backend that manages accounts.
pub trait AuthBackend: Send + Sync {
    /// The error type that may be returned by the backend.
    type Error: BackendError;

    /// Exchanges credentials for a token.
    fn login(
        &self,
        credentials: &Credentials,
    ) -> impl Future<Output = Result<AuthGrant, Self::Error>> + Send + 'static;

    /// Creates a user, its client and an API key, and signs in.
    fn register(
        &self,
        registration: &Registration,
    ) -> impl Future<Output = Result<AuthGrant, Self::Error>> + Send + 'static;

    /// Fetches the account a previously issued token belongs to.
    fn fetch_account(
        &self,
        access_token: &str,
    ) -> impl Future<Output = Result<Account, Self::Error>> + Send + 'static;
}
