//! Signing in and out.

use std::error::Error;
use std::fmt::{self, Debug, Display};
use std::io;

use chatbot_backend::{
    Account, AuthBackend, AuthGrant, BackendError, Credentials, ErrorKind,
    OAuthCallback, OAuthError, Registration,
};

use crate::token_store::TokenStore;

const LOGIN_FAILED: &str = "Login failed";
const REGISTRATION_FAILED: &str = "Registration failed";

/// Whether someone is signed in.
#[derive(Clone, Default, PartialEq, Eq)]
pub enum AccountState {
    /// Nobody is signed in.
    #[default]
    Anonymous,
    /// Signed in with a valid token.
    Authenticated {
        /// The bearer token.
        access_token: String,
        /// The account the token belongs to.
        account: Account,
    },
}

impl Debug for AccountState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccountState::Anonymous => f.write_str("Anonymous"),
            AccountState::Authenticated { account, .. } => f
                .debug_struct("Authenticated")
                .field("access_token", &"<redacted>")
                .field("account", account)
                .finish(),
        }
    }
}

/// Why a sign-in did not go through.
#[derive(Debug)]
pub enum AuthError {
    /// The backend refused the request or could not be reached.
    Rejected {
        /// What to show to the user.
        message: String,
        /// The underlying failure.
        kind: ErrorKind,
    },
    /// The OAuth redirect did not carry a token.
    OAuth(OAuthError),
    /// The token could not be read or written.
    Storage(io::Error),
}

impl AuthError {
    fn rejected<E: BackendError>(err: E, default_message: &str) -> Self {
        let message = err.detail().unwrap_or(default_message).to_owned();
        AuthError::Rejected {
            message,
            kind: err.kind(),
        }
    }

    /// Returns the backend failure kind, if the backend was involved.
    #[inline]
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            AuthError::Rejected { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

impl Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::Rejected { message, .. } => f.write_str(message),
            AuthError::OAuth(err) => Display::fmt(err, f),
            AuthError::Storage(err) => write!(f, "cannot access the token store: {err}"),
        }
    }
}

impl Error for AuthError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            AuthError::Rejected { .. } => None,
            AuthError::OAuth(err) => Some(err),
            AuthError::Storage(err) => Some(err),
        }
    }
}

impl From<OAuthError> for AuthError {
    #[inline]
    fn from(value: OAuthError) -> Self {
        AuthError::OAuth(value)
    }
}

impl From<io::Error> for AuthError {
    #[inline]
    fn from(value: io::Error) -> Self {
        AuthError::Storage(value)
    }
}

/// The signed-in user, if any, and the token that proves it.
///
/// Every successful sign-in persists the token to the store so that
/// [`AccountSession::hydrate`] can restore the session on the next run.
pub struct AccountSession<B, S> {
    backend: B,
    store: S,
    state: AccountState,
}

impl<B: AuthBackend, S: TokenStore> AccountSession<B, S> {
    /// Creates an anonymous session. Call [`AccountSession::hydrate`] to
    /// pick up a stored token.
    pub fn new(backend: B, store: S) -> Self {
        Self {
            backend,
            store,
            state: AccountState::Anonymous,
        }
    }

    /// Restores the session from the stored token.
    ///
    /// A token the backend no longer accepts is removed from the store.
    /// Only storage failures are reported; the session is anonymous
    /// afterwards in every other failure case.
    pub async fn hydrate(&mut self) -> Result<&AccountState, AuthError> {
        self.state = AccountState::Anonymous;
        let Some(access_token) = self.store.load()? else {
            debug!("no stored token");
            return Ok(&self.state);
        };

        match self.backend.fetch_account(&access_token).await {
            Ok(account) => {
                debug!(email = %account.user.email, "session restored");
                self.state = AccountState::Authenticated {
                    access_token,
                    account,
                };
            }
            Err(err) => {
                warn!(kind = %err.kind(), "stored token rejected: {err}");
                self.store.clear()?;
            }
        }
        Ok(&self.state)
    }

    /// Signs in with an email and a password.
    pub async fn login(&mut self, credentials: Credentials) -> Result<Account, AuthError> {
        let grant = self
            .backend
            .login(&credentials)
            .await
            .map_err(|err| AuthError::rejected(err, LOGIN_FAILED))?;
        self.accept(grant)
    }

    /// Creates an account and signs in.
    pub async fn register(&mut self, registration: Registration) -> Result<Account, AuthError> {
        let grant = self
            .backend
            .register(&registration)
            .await
            .map_err(|err| AuthError::rejected(err, REGISTRATION_FAILED))?;
        self.accept(grant)
    }

    /// Finishes an OAuth login from the URL the backend redirected to.
    pub async fn complete_oauth(&mut self, callback_url: &str) -> Result<Account, AuthError> {
        let callback = OAuthCallback::parse(callback_url)?;
        debug!(provider = ?callback.provider, "completing oauth login");
        let account = self
            .backend
            .fetch_account(&callback.access_token)
            .await
            .map_err(|err| AuthError::rejected(err, LOGIN_FAILED))?;
        self.accept(AuthGrant {
            access_token: callback.access_token,
            account,
        })
    }

    /// Signs out and forgets the stored token.
    pub fn logout(&mut self) -> Result<(), AuthError> {
        self.state = AccountState::Anonymous;
        self.store.clear()?;
        Ok(())
    }

    fn accept(&mut self, grant: AuthGrant) -> Result<Account, AuthError> {
        self.store.save(&grant.access_token)?;
        info!(email = %grant.account.user.email, "signed in");
        self.state = AccountState::Authenticated {
            access_token: grant.access_token,
            account: grant.account.clone(),
        };
        Ok(grant.account)
    }

    /// Returns the current state.
    #[inline]
    pub fn state(&self) -> &AccountState {
        &self.state
    }

    /// Returns the signed-in account.
    #[inline]
    pub fn account(&self) -> Option<&Account> {
        match &self.state {
            AccountState::Authenticated { account, .. } => Some(account),
            AccountState::Anonymous => None,
        }
    }

    /// Returns `true` if someone is signed in.
    #[inline]
    pub fn is_authenticated(&self) -> bool {
        self.account().is_some()
    }

    /// Returns the API key of the signed-in account.
    #[inline]
    pub fn api_key(&self) -> Option<&str> {
        self.account().map(|account| account.api_key.as_str())
    }

    /// Returns the backend.
    #[inline]
    pub fn backend(&self) -> &B {
        &self.backend
    }
}

impl<B, S> Debug for AccountSession<B, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountSession")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
