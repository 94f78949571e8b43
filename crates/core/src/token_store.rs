//! Where the access token lives between runs.

use std::io;
use std::sync::{Arc, Mutex, PoisonError};

/// Persistent storage for a single access token.
///
/// Implementations are expected to be cheap and synchronous, like the
/// browser storage they stand in for.
pub trait TokenStore: Send + Sync {
    /// Returns the stored token, if any.
    fn load(&self) -> io::Result<Option<String>>;

    /// Stores a token, replacing the previous one.
    fn save(&self, token: &str) -> io::Result<()>;

    /// Removes the stored token. Clearing an empty store is not an error.
    fn clear(&self) -> io::Result<()>;
}

/// A [`TokenStore`] that forgets everything when dropped. Clones share the
/// same slot.
#[derive(Clone, Debug, Default)]
pub struct MemoryTokenStore {
    token: Arc<Mutex<Option<String>>>,
}

impl MemoryTokenStore {
    /// Creates a store that already holds `token`.
    pub fn with_token<S: Into<String>>(token: S) -> Self {
        Self {
            token: Arc::new(Mutex::new(Some(token.into()))),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> io::Result<Option<String>> {
        Ok(self.token.lock().unwrap_or_else(PoisonError::into_inner).clone())
    }

    fn save(&self, token: &str) -> io::Result<()> {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = Some(token.to_owned());
        Ok(())
    }

    fn clear(&self) -> io::Result<()> {
        self.token.lock().unwrap_or_else(PoisonError::into_inner).take();
        Ok(())
    }
}
