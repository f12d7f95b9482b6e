//! Built-in character roster
//!
//! This module handles loading and querying the character roster that ships
//! with the binary, embedded as TOML in builtin_characters.toml.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Character {
    pub id: u32,
    pub name: String,
    pub personality: String,
    pub greeting: String,
    pub image: String,
    pub description: String,
}

#[derive(Debug, Deserialize)]
struct CharacterRoster {
    characters: Vec<Character>,
}

impl Character {
    /// Build the context payload sent alongside every chat request.
    pub fn context(&self) -> crate::api::CharacterContext {
        crate::api::CharacterContext {
            name: self.name.clone(),
            personality: self.personality.clone(),
            greeting: self.greeting.clone(),
        }
    }
}

/// Load the built-in characters from the embedded configuration
pub fn load_builtin_characters() -> Vec<Character> {
    const ROSTER_CONTENT: &str = include_str!("../builtin_characters.toml");

    let roster: CharacterRoster =
        toml::from_str(ROSTER_CONTENT).expect("Failed to parse builtin_characters.toml");

    roster.characters
}

/// Find a character by id
pub fn find_character(characters: &[Character], id: u32) -> Option<&Character> {
    characters.iter().find(|c| c.id == id)
}

/// Find a character by name (case-insensitive)
pub fn find_character_by_name<'a>(
    characters: &'a [Character],
    name: &str,
) -> Option<&'a Character> {
    characters.iter().find(|c| c.name.eq_ignore_ascii_case(name))
}
