use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

use chatbot_core::TokenStore;

const APP_DIR: &str = "chatbot";
const TOKEN_FILE: &str = "access_token";

/// A [`TokenStore`] backed by a single file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    /// Creates a store that keeps the token at `path`.
    #[inline]
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    /// Returns a store in the per-user config directory, e.g.
    /// `~/.config/chatbot/access_token` on Linux.
    pub fn in_config_dir() -> io::Result<Self> {
        let dir = dirs::config_dir().ok_or_else(|| {
            io::Error::new(ErrorKind::NotFound, "no config directory for this user")
        })?;
        Ok(Self::new(dir.join(APP_DIR).join(TOKEN_FILE)))
    }

    /// Returns the file location.
    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> io::Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(token) => {
                let token = token.trim();
                Ok((!token.is_empty()).then(|| token.to_owned()))
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }

    fn save(&self, token: &str) -> io::Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(&self.path, token)?;
        debug!(path = %self.path.display(), "token saved");
        Ok(())
    }

    fn clear(&self) -> io::Result<()> {
        match fs::remove_file(&self.path) {
            Err(err) if err.kind() != ErrorKind::NotFound => Err(err),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_load_clear() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("nested").join("token"));

        assert_eq!(store.load().unwrap(), None);
        store.save("token-1").unwrap();
        assert_eq!(store.load().unwrap().as_deref(), Some("token-1"));
        store.save("token-2").unwrap();
        assert_eq!(store.load().unwrap().as_deref(), Some("token-2"));

        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
        store.clear().unwrap();
    }

    #[test]
    fn test_blank_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token");
        fs::write(&path, "  \n").unwrap();
        assert_eq!(FileTokenStore::new(path).load().unwrap(), None);
    }
}
