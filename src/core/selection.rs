//! Active-selection tracking.
//!
//! Which character and which session the UI is showing, plus the sidebar
//! open/closed flag for narrow terminals. The selected character drives the
//! picker-vs-chat screen split; the active character is the last non-none
//! selection, kept so the chat can resume silently after a trip back to the
//! picker and so the picker can mark who is currently active.

use crate::core::character::{find_character, Character};
use crate::core::store::SessionStore;

#[derive(Debug, Default)]
pub struct SelectionState {
    selected_character: Option<u32>,
    active_character: Option<u32>,
    current_session: Option<u64>,
    sidebar_open: bool,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected_character(&self) -> Option<u32> {
        self.selected_character
    }

    pub fn active_character(&self) -> Option<u32> {
        self.active_character
    }

    pub fn current_session(&self) -> Option<u64> {
        self.current_session
    }

    pub fn sidebar_open(&self) -> bool {
        self.sidebar_open
    }

    /// The character message operations act on: the selection if there is
    /// one, otherwise the last active character.
    pub fn effective_character(&self) -> Option<u32> {
        self.selected_character.or(self.active_character)
    }

    /// Select a character, seeding its session list on first contact.
    ///
    /// The current session jumps to the character's first session unless the
    /// current id already names one of this character's sessions, so a round
    /// trip through the picker lands back where the user left off.
    pub fn select_character(
        &mut self,
        character: &Character,
        store: &mut SessionStore,
        narrow: bool,
    ) {
        let first = store.ensure_seeded(character);

        self.selected_character = Some(character.id);
        self.active_character = Some(character.id);

        let keep_current = self
            .current_session
            .is_some_and(|id| store.contains_session(character.id, id));
        if !keep_current {
            self.current_session = first;
        }

        if narrow {
            self.sidebar_open = false;
        }
    }

    /// Back to the character grid. The active character and current session
    /// survive so a message sent from the picker resumes the conversation.
    pub fn return_to_picker(&mut self) {
        self.selected_character = None;
    }

    pub fn select_session(&mut self, session_id: u64, narrow: bool) {
        self.current_session = Some(session_id);
        if narrow {
            self.sidebar_open = false;
        }
    }

    /// Adopt a session the store created on the fly during an append.
    pub fn adopt_session(&mut self, session_id: u64) {
        self.current_session = Some(session_id);
    }

    /// Start a fresh session for the effective character and make it current.
    /// No-op (returns `None`) when no character was ever selected.
    pub fn start_new_session(
        &mut self,
        characters: &[Character],
        store: &mut SessionStore,
        narrow: bool,
    ) -> Option<u64> {
        let character_id = self.effective_character()?;
        let character = find_character(characters, character_id)?;

        let id = store.create_session(character.id, format!("New chat with {}", character.name));
        self.current_session = Some(id);
        if narrow {
            self.sidebar_open = false;
        }
        Some(id)
    }

    pub fn toggle_sidebar(&mut self) {
        self.sidebar_open = !self.sidebar_open;
    }

    pub fn close_sidebar(&mut self) {
        self.sidebar_open = false;
    }
}
