use serde::{Deserialize, Serialize};

pub mod client;

/// Character identity forwarded with every chat request so the service can
/// stay in persona without holding character state of its own.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct CharacterContext {
    pub name: String,
    pub personality: String,
    pub greeting: String,
}

#[derive(Serialize, Clone, Debug)]
pub struct ChatRequest {
    pub message: String,
    #[serde(rename = "characterContext")]
    pub character_context: CharacterContext,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct ChatReply {
    pub ai: String,
    pub timestamp: String,
}
