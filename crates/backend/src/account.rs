use serde::{Deserialize, Serialize};

use crate::Plan;

/// Number of API key characters shown before the key is elided.
const API_KEY_PREVIEW_LEN: usize = 20;

/// The person signed in.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct User {
    /// Opaque user id.
    pub id: String,
    /// Login email.
    pub email: String,
    /// Role on the platform, e.g. `client`.
    pub role: String,
}

/// The organization the user belongs to, which owns the API key.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Client {
    /// Opaque client id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Subscribed plan.
    pub plan: Plan,
    /// Account status, e.g. `active`.
    pub status: String,
}

/// Everything the dashboard knows about the signed-in user.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Account {
    /// The user.
    pub user: User,
    /// The user's client.
    pub client: Client,
    /// API key for the chat endpoints.
    pub api_key: String,
}

impl Account {
    /// Returns the API key shortened for display, e.g. in a summary card.
    pub fn masked_api_key(&self) -> String {
        let preview: String =
            self.api_key.chars().take(API_KEY_PREVIEW_LEN).collect();
        format!("{preview}...")
    }
}

impl std::fmt::Debug for Account {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Account")
            .field("user", &self.user)
            .field("client", &self.client)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(api_key: &str) -> Account {
        Account {
            user: User {
                id: "u1".to_owned(),
                email: "budi@example.com".to_owned(),
                role: "client".to_owned(),
            },
            client: Client {
                id: "c1".to_owned(),
                name: "Toko Budi".to_owned(),
                plan: Plan::Basic,
                status: "active".to_owned(),
            },
            api_key: api_key.to_owned(),
        }
    }

    #[test]
    fn test_masked_api_key() {
        let long = account("0123456789abcdefghijklmnop");
        assert_eq!(long.masked_api_key(), "0123456789abcdefghij...");

        let short = account("short-key");
        assert_eq!(short.masked_api_key(), "short-key...");
    }

    #[test]
    fn test_debug_hides_key() {
        let debug = format!("{:?}", account("secret-key"));
        assert!(!debug.contains("secret-key"));
    }
}
