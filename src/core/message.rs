use chrono::Utc;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum MessageRole {
    User,
    Character,
}

/// A single transcript entry. Messages are created once and never edited;
/// ordering within a session is append order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    pub id: u64,
    pub role: MessageRole,
    pub content: String,
    pub timestamp: String,
}

impl MessageRole {
    pub fn as_str(self) -> &'static str {
        match self {
            MessageRole::User => "user",
            MessageRole::Character => "character",
        }
    }

    pub fn is_user(self) -> bool {
        self == MessageRole::User
    }

    pub fn is_character(self) -> bool {
        self == MessageRole::Character
    }
}

impl AsRef<str> for MessageRole {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl TryFrom<&str> for MessageRole {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "user" => Ok(MessageRole::User),
            "character" => Ok(MessageRole::Character),
            _ => Err(format!("invalid message role: {value}")),
        }
    }
}

impl TryFrom<String> for MessageRole {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_from(value.as_str())
    }
}

impl From<MessageRole> for String {
    fn from(value: MessageRole) -> Self {
        value.as_str().to_string()
    }
}

impl Message {
    pub fn new(
        id: u64,
        role: MessageRole,
        content: impl Into<String>,
        timestamp: impl Into<String>,
    ) -> Self {
        Self {
            id,
            role,
            content: content.into(),
            timestamp: timestamp.into(),
        }
    }

    pub fn user(id: u64, content: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self::new(id, MessageRole::User, content, timestamp)
    }

    pub fn character(id: u64, content: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self::new(id, MessageRole::Character, content, timestamp)
    }

    pub fn is_user(&self) -> bool {
        self.role.is_user()
    }

    pub fn is_character(&self) -> bool {
        self.role.is_character()
    }
}

/// Current wall-clock time as an RFC 3339 string, the timestamp format used
/// throughout the transcript.
pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_round_trip_through_strings() {
        assert_eq!(MessageRole::try_from("user"), Ok(MessageRole::User));
        assert_eq!(
            MessageRole::try_from("character"),
            Ok(MessageRole::Character)
        );
        assert_eq!(String::from(MessageRole::User), "user");
        assert_eq!(String::from(MessageRole::Character), "character");
    }

    #[test]
    fn invalid_role_strings_are_rejected() {
        assert!(MessageRole::try_from("assistant").is_err());
        assert!(MessageRole::try_from("").is_err());
    }

    #[test]
    fn constructors_set_roles() {
        let user = Message::user(1, "hi", "2026-01-01T00:00:00Z");
        let character = Message::character(2, "hello", "2026-01-01T00:00:01Z");
        assert!(user.is_user());
        assert!(character.is_character());
        assert_eq!(user.content, "hi");
        assert_eq!(character.timestamp, "2026-01-01T00:00:01Z");
    }

    #[test]
    fn now_rfc3339_parses_back() {
        let stamp = now_rfc3339();
        assert!(chrono::DateTime::parse_from_rfc3339(&stamp).is_ok());
    }

    #[test]
    fn serde_uses_lowercase_role_strings() {
        let msg = Message::user(7, "hi", "2026-01-01T00:00:00Z");
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"role\":\"user\""));
        let back: Message = serde_json::from_str(&json).unwrap();
        assert_eq!(back, msg);
    }
}
