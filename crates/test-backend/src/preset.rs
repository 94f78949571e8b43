use serde::{Deserialize, Serialize};

/// How the fake backend answers one chat request.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum PresetReply {
    /// Answers with the given text.
    #[serde(rename = "reply")]
    Reply(String),
    /// Fails as if the server returned this status code.
    #[serde(rename = "status")]
    Status(u16),
    /// Fails as if the connection could not be established.
    #[serde(rename = "transport")]
    Transport,
    /// Never answers.
    #[serde(rename = "hang")]
    Hang,
}

impl PresetReply {
    /// Shorthand for [`PresetReply::Reply`].
    #[inline]
    pub fn reply<S: Into<String>>(text: S) -> Self {
        PresetReply::Reply(text.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_script() {
        let script: Vec<PresetReply> = serde_json::from_str(
            r#"[
                { "type": "reply", "data": "Hai!" },
                { "type": "status", "data": 503 },
                { "type": "transport" },
                { "type": "hang" }
            ]"#,
        )
        .unwrap();
        assert_eq!(
            script,
            [
                PresetReply::reply("Hai!"),
                PresetReply::Status(503),
                PresetReply::Transport,
                PresetReply::Hang,
            ]
        );
    }
}
