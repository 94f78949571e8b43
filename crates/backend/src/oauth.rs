use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use url::Url;

/// A third-party identity provider offered on the login screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OAuthProvider {
    /// Google accounts.
    Google,
    /// Microsoft accounts.
    Microsoft,
    /// GitHub accounts.
    Github,
}

impl OAuthProvider {
    /// All providers, in button order.
    pub const ALL: [OAuthProvider; 3] = [
        OAuthProvider::Google,
        OAuthProvider::Microsoft,
        OAuthProvider::Github,
    ];

    /// Path segment used by the backend.
    pub fn id(self) -> &'static str {
        match self {
            OAuthProvider::Google => "google",
            OAuthProvider::Microsoft => "microsoft",
            OAuthProvider::Github => "github",
        }
    }

    /// Returns the URL that starts the provider's login flow.
    pub fn login_url(self, base_url: &str) -> Result<Url, url::ParseError> {
        Url::parse(&format!(
            "{}/auth/{}/login",
            base_url.trim_end_matches('/'),
            self.id()
        ))
    }
}

impl Display for OAuthProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for OAuthProvider {
    type Err = OAuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OAuthProvider::ALL
            .into_iter()
            .find(|p| p.id().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| OAuthError::UnknownProvider(s.to_owned()))
    }
}

/// The outcome of an OAuth redirect back to the client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OAuthCallback {
    /// The access token issued by the backend.
    pub access_token: String,
    /// The provider name reported by the backend, if any.
    pub provider: Option<String>,
}

impl OAuthCallback {
    /// Parses the callback URL the backend redirected to.
    ///
    /// The backend appends `token` and `provider` on success, or `error`
    /// on failure.
    pub fn parse(callback_url: &str) -> Result<Self, OAuthError> {
        let url = Url::parse(callback_url.trim())
            .map_err(|err| OAuthError::InvalidUrl(err.to_string()))?;

        let mut token = None;
        let mut provider = None;
        let mut error = None;
        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                "token" => token = Some(value.into_owned()),
                "provider" => provider = Some(value.into_owned()),
                "error" => error = Some(value.into_owned()),
                _ => {}
            }
        }

        match (token, error) {
            (Some(access_token), _) if !access_token.is_empty() => Ok(Self {
                access_token,
                provider,
            }),
            (_, Some(error)) => Err(OAuthError::Denied(error)),
            _ => Err(OAuthError::MissingToken),
        }
    }
}

/// Errors from the OAuth helpers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OAuthError {
    /// The provider name is not one of [`OAuthProvider::ALL`].
    UnknownProvider(String),
    /// The callback is not a valid URL.
    InvalidUrl(String),
    /// The backend reported an error instead of a token.
    Denied(String),
    /// The callback carries neither a token nor an error.
    MissingToken,
}

impl Display for OAuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OAuthError::UnknownProvider(name) => {
                write!(f, "unknown OAuth provider `{name}`")
            }
            OAuthError::InvalidUrl(reason) => {
                write!(f, "invalid callback URL: {reason}")
            }
            OAuthError::Denied(reason) => write!(f, "OAuth login failed: {reason}"),
            OAuthError::MissingToken => write!(f, "callback carries no token"),
        }
    }
}

impl std::error::Error for OAuthError {}
