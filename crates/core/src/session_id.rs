use std::fmt::{self, Display};

use chrono::Utc;

/// Opaque identifier correlating one conversation's requests on the server.
///
/// A new one is generated for every controller and never persisted.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    /// Generates an id from the current time, e.g. `session_1718000000000`.
    pub fn generate() -> Self {
        Self(format!("session_{}", Utc::now().timestamp_millis()))
    }

    /// Returns the id as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for SessionId {
    #[inline]
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for SessionId {
    #[inline]
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_format() {
        let id = SessionId::generate();
        let millis = id.as_str().strip_prefix("session_").unwrap();
        assert!(millis.parse::<i64>().unwrap() > 0);
    }
}
