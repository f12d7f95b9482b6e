//! In-memory session bookkeeping.
//!
//! The store maps each character id to its insertion-ordered list of chat
//! sessions. Entries are created lazily on first selection and never removed;
//! sessions only ever grow. Nothing here survives the process: conversations
//! live exactly as long as the terminal session.

use std::collections::HashMap;

use chrono::Utc;

use crate::core::character::Character;
use crate::core::message::{now_rfc3339, Message};

#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub id: u64,
    pub title: String,
    pub messages: Vec<Message>,
}

impl Session {
    fn new(id: u64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            messages: Vec::new(),
        }
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }
}

/// Hands out creation-time-derived ids.
///
/// Ids are wall-clock milliseconds; when two ids are requested within the
/// same millisecond the generator bumps past the last issued value, so ids
/// are strictly increasing and never collide.
#[derive(Debug, Default)]
pub struct IdGenerator {
    last: u64,
}

impl IdGenerator {
    pub fn next_id(&mut self) -> u64 {
        let now = Utc::now().timestamp_millis().max(0) as u64;
        self.last = now.max(self.last + 1);
        self.last
    }
}

/// Result of [`SessionStore::append_message`]: the session the message
/// actually landed in, and whether that session had to be created on the fly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppendOutcome {
    pub session_id: u64,
    pub created_session: bool,
}

#[derive(Default)]
pub struct SessionStore {
    sessions: HashMap<u32, Vec<Session>>,
    ids: IdGenerator,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a character's session list with the two sample conversations.
    ///
    /// Idempotent: a character that already has an entry is left untouched.
    /// Returns the id of the character's first session so the caller can
    /// adopt it as current.
    pub fn ensure_seeded(&mut self, character: &Character) -> Option<u64> {
        if !self.sessions.contains_key(&character.id) {
            let seeded = self.seed_sessions(character);
            self.sessions.insert(character.id, seeded);
        }
        self.sessions
            .get(&character.id)
            .and_then(|sessions| sessions.first())
            .map(|session| session.id)
    }

    /// Append a new empty session to the character's list and return its id.
    pub fn create_session(&mut self, character_id: u32, title: impl Into<String>) -> u64 {
        let id = self.ids.next_id();
        self.sessions
            .entry(character_id)
            .or_default()
            .push(Session::new(id, title));
        id
    }

    /// Append `message` to the session matching `session_id` within the
    /// character's list. When no session matches (none was active yet, or the
    /// id is stale) a fresh session is created first and the message lands
    /// there; the outcome reports the id actually used so the caller can
    /// adopt it.
    pub fn append_message(
        &mut self,
        character: &Character,
        session_id: Option<u64>,
        message: Message,
    ) -> AppendOutcome {
        let existing = session_id.filter(|id| self.contains_session(character.id, *id));

        let (target, created) = match existing {
            Some(id) => (id, false),
            None => {
                let title = format!("New chat with {}", character.name);
                (self.create_session(character.id, title), true)
            }
        };

        let sessions = self.sessions.entry(character.id).or_default();
        if let Some(session) = sessions.iter_mut().find(|s| s.id == target) {
            session.messages.push(message);
        }

        AppendOutcome {
            session_id: target,
            created_session: created,
        }
    }

    /// Next unique message id, drawn from the same generator as session ids.
    pub fn next_message_id(&mut self) -> u64 {
        self.ids.next_id()
    }

    pub fn is_seeded(&self, character_id: u32) -> bool {
        self.sessions.contains_key(&character_id)
    }

    pub fn sessions_for(&self, character_id: u32) -> &[Session] {
        self.sessions
            .get(&character_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn session(&self, character_id: u32, session_id: u64) -> Option<&Session> {
        self.sessions
            .get(&character_id)?
            .iter()
            .find(|s| s.id == session_id)
    }

    pub fn contains_session(&self, character_id: u32, session_id: u64) -> bool {
        self.session(character_id, session_id).is_some()
    }

    fn seed_sessions(&mut self, character: &Character) -> Vec<Session> {
        let stamp = now_rfc3339();

        let mut intro = Session::new(
            self.ids.next_id(),
            format!("Getting to know {}", character.name),
        );
        intro.messages.push(Message::character(
            self.ids.next_id(),
            character.greeting.clone(),
            stamp.clone(),
        ));
        intro.messages.push(Message::user(
            self.ids.next_id(),
            format!("Hello {}!", character.name),
            stamp.clone(),
        ));
        intro.messages.push(Message::character(
            self.ids.next_id(),
            "It's lovely to chat with you, Master. Ask me anything!",
            stamp.clone(),
        ));

        let mut casual = Session::new(
            self.ids.next_id(),
            format!("Casual talk with {}", character.name),
        );
        casual.messages.push(Message::character(
            self.ids.next_id(),
            "We can talk about hobbies or your day.",
            stamp,
        ));

        vec![intro, casual]
    }
}
