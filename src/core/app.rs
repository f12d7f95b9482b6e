//! Runtime application state.
//!
//! [`App`] owns the character roster, the session store, the selection
//! tracker, and the bookkeeping around in-flight sends. The chat loop owns
//! the terminal and the network; everything that mutates conversation state
//! funnels through here, so the whole send flow stays testable without a
//! live endpoint.

use crate::api::client::ChatError;
use crate::api::{CharacterContext, ChatReply};
use crate::core::character::{find_character, load_builtin_characters, Character};
use crate::core::config::Config;
use crate::core::message::{now_rfc3339, Message};
use crate::core::selection::SelectionState;
use crate::core::store::{Session, SessionStore};
use crate::ui::theme::Theme;
use crate::utils::logging::LoggingState;

/// Shown in place of a reply when the chat request fails.
pub const FALLBACK_REPLY: &str =
    "I apologize, Master. I'm having trouble connecting right now. Please try again in a moment.";

/// Conversation openers offered while the current session is still empty.
pub const SUGGESTIONS: [&str; 4] = [
    "What can you help me with?",
    "Explain a concept to me",
    "Help me write some code",
    "Give me creative ideas",
];

/// Everything the network task needs for one send, captured at call time.
/// The reply is routed back to this character and session even if the user
/// navigates elsewhere while the request is in flight.
#[derive(Debug, Clone)]
pub struct OutboundSend {
    pub character_id: u32,
    pub session_id: u64,
    pub message: String,
    pub context: CharacterContext,
}

pub struct App {
    pub characters: Vec<Character>,
    pub store: SessionStore,
    pub selection: SelectionState,
    pub logging: LoggingState,
    pub theme: Theme,
    pub config: Config,
    pending_sends: usize,

    // View-state the renderer reads and the chat loop drives.
    pub picker_cursor: usize,
    pub sidebar_cursor: usize,
    pub sidebar_focused: bool,
    pub theme_dirty: bool,
    pub scroll_offset: u16,
    pub auto_scroll: bool,
}

impl App {
    pub fn new(config: Config, log_file: Option<String>) -> Result<Self, Box<dyn std::error::Error>> {
        let logging = LoggingState::new(log_file)?;
        let theme = config
            .theme
            .as_deref()
            .map(Theme::from_name)
            .unwrap_or_else(Theme::dark_default);

        Ok(App {
            characters: load_builtin_characters(),
            store: SessionStore::new(),
            selection: SelectionState::new(),
            logging,
            theme,
            config,
            pending_sends: 0,
            picker_cursor: 0,
            sidebar_cursor: 0,
            sidebar_focused: false,
            theme_dirty: false,
            scroll_offset: 0,
            auto_scroll: true,
        })
    }

    /// Select a character by id. Returns false for ids not in the roster.
    pub fn select_character(&mut self, character_id: u32, narrow: bool) -> bool {
        let Some(character) = find_character(&self.characters, character_id).cloned() else {
            return false;
        };
        self.selection
            .select_character(&character, &mut self.store, narrow);
        self.auto_scroll = true;
        true
    }

    pub fn select_session(&mut self, session_id: u64, narrow: bool) {
        self.selection.select_session(session_id, narrow);
        self.auto_scroll = true;
    }

    pub fn start_new_session(&mut self, narrow: bool) -> Option<u64> {
        let id = self
            .selection
            .start_new_session(&self.characters, &mut self.store, narrow);
        if id.is_some() {
            self.auto_scroll = true;
        }
        id
    }

    pub fn return_to_picker(&mut self) {
        self.selection.return_to_picker();
    }

    /// The character the chat view shows: the selection, or the last active
    /// character when the user is back on the picker.
    pub fn current_character(&self) -> Option<&Character> {
        let id = self.selection.effective_character()?;
        find_character(&self.characters, id)
    }

    pub fn current_session(&self) -> Option<&Session> {
        let character_id = self.selection.effective_character()?;
        let session_id = self.selection.current_session()?;
        self.store.session(character_id, session_id)
    }

    pub fn pending_sends(&self) -> usize {
        self.pending_sends
    }

    /// First half of a send: append the user message (auto-creating a
    /// session when none is current) and hand back what the network task
    /// needs. Returns `None` when the trimmed input is empty or no character
    /// was ever selected; both are silent no-ops.
    pub fn begin_send(&mut self, text: &str) -> Option<OutboundSend> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }

        let character_id = self.selection.effective_character()?;
        let character = find_character(&self.characters, character_id)?.clone();

        let id = self.store.next_message_id();
        let message = Message::user(id, trimmed, now_rfc3339());

        if let Err(e) = self.logging.log_message(&format!("You: {trimmed}")) {
            tracing::warn!(error = %e, "failed to log user message");
        }

        let outcome =
            self.store
                .append_message(&character, self.selection.current_session(), message);
        if outcome.created_session {
            self.selection.adopt_session(outcome.session_id);
        }

        self.pending_sends += 1;
        self.auto_scroll = true;

        Some(OutboundSend {
            character_id,
            session_id: outcome.session_id,
            message: trimmed.to_string(),
            context: character.context(),
        })
    }

    /// Second half of a send: append the reply, or the fixed apology when
    /// the request failed. Failures are logged, never surfaced; the
    /// conversation stays usable either way.
    pub fn complete_send(&mut self, send: &OutboundSend, result: Result<ChatReply, ChatError>) {
        self.pending_sends = self.pending_sends.saturating_sub(1);

        let (content, timestamp) = match result {
            Ok(reply) => (reply.ai, reply.timestamp),
            Err(err) => {
                tracing::warn!(error = %err, "chat request failed");
                (FALLBACK_REPLY.to_string(), now_rfc3339())
            }
        };

        let Some(character) = find_character(&self.characters, send.character_id).cloned() else {
            return;
        };

        if let Err(e) = self
            .logging
            .log_message(&format!("{}: {content}", character.name))
        {
            tracing::warn!(error = %e, "failed to log reply");
        }

        let id = self.store.next_message_id();
        self.store.append_message(
            &character,
            Some(send.session_id),
            Message::character(id, content, timestamp),
        );
    }

    /// Flip dark/light. The choice is remembered in the config value; the
    /// chat loop persists it on exit.
    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
        self.config.theme = Some(self.theme.name.to_string());
        self.theme_dirty = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    fn app() -> App {
        App::new(Config::default(), None).expect("app")
    }

    fn ok_reply(ai: &str, timestamp: &str) -> Result<ChatReply, ChatError> {
        Ok(ChatReply {
            ai: ai.to_string(),
            timestamp: timestamp.to_string(),
        })
    }

    #[test]
    fn first_selection_seeds_two_sessions_and_adopts_the_first() {
        let mut app = app();

        assert!(app.select_character(1, false));

        let sessions = app.store.sessions_for(1);
        assert_eq!(sessions.len(), 2);
        assert_eq!(app.selection.current_session(), Some(sessions[0].id));
    }

    #[test]
    fn reselection_does_not_alter_existing_sessions() {
        let mut app = app();
        app.select_character(1, false);
        let before: Vec<Session> = app.store.sessions_for(1).to_vec();

        app.return_to_picker();
        app.select_character(1, false);

        assert_eq!(app.store.sessions_for(1), before.as_slice());
    }

    #[test]
    fn selecting_an_unknown_character_is_rejected() {
        let mut app = app();
        assert!(!app.select_character(99, false));
        assert_eq!(app.selection.effective_character(), None);
    }

    #[test]
    fn successful_send_grows_the_session_by_user_then_character() {
        let mut app = app();
        app.select_character(1, false);
        let baseline = app.current_session().unwrap().messages.len();

        let send = app.begin_send("hi").expect("outbound send");
        assert_eq!(app.pending_sends(), 1);

        app.complete_send(&send, ok_reply("hello", "T"));
        assert_eq!(app.pending_sends(), 0);

        let messages = &app.current_session().unwrap().messages;
        assert_eq!(messages.len(), baseline + 2);

        let user = &messages[messages.len() - 2];
        let reply = &messages[messages.len() - 1];
        assert!(user.is_user());
        assert_eq!(user.content, "hi");
        assert!(reply.is_character());
        assert_eq!(reply.content, "hello");
        assert_eq!(reply.timestamp, "T");
    }

    #[test]
    fn failed_send_appends_the_exact_apology() {
        let mut app = app();
        app.select_character(1, false);
        let baseline = app.current_session().unwrap().messages.len();

        let send = app.begin_send("hi").expect("outbound send");
        app.complete_send(&send, Err(ChatError::Status(StatusCode::BAD_GATEWAY)));

        let messages = &app.current_session().unwrap().messages;
        assert_eq!(messages.len(), baseline + 2);
        assert!(messages[messages.len() - 2].is_user());

        let fallback = &messages[messages.len() - 1];
        assert!(fallback.is_character());
        assert_eq!(
            fallback.content,
            "I apologize, Master. I'm having trouble connecting right now. \
             Please try again in a moment."
        );
    }

    #[test]
    fn sending_with_no_character_is_a_silent_noop() {
        let mut app = app();
        assert!(app.begin_send("hi").is_none());
        assert_eq!(app.pending_sends(), 0);
    }

    #[test]
    fn empty_and_whitespace_input_never_dispatches() {
        let mut app = app();
        app.select_character(1, false);
        assert!(app.begin_send("").is_none());
        assert!(app.begin_send("   \n").is_none());
        assert_eq!(app.pending_sends(), 0);
    }

    #[test]
    fn sending_into_a_fresh_session_creates_exactly_one() {
        let mut app = app();
        app.select_character(1, false);
        app.start_new_session(false).expect("new session");
        let count_before = app.store.sessions_for(1).len();

        let send = app.begin_send("hi").expect("outbound send");

        assert_eq!(app.store.sessions_for(1).len(), count_before);
        assert_eq!(app.selection.current_session(), Some(send.session_id));
        let session = app.current_session().unwrap();
        assert_eq!(session.messages.len(), 1);
        assert!(session.messages[0].is_user());
    }

    #[test]
    fn picker_round_trip_preserves_the_conversation() {
        let mut app = app();
        app.select_character(1, false);

        let send = app.begin_send("remember me").unwrap();
        app.complete_send(&send, ok_reply("of course", "T"));
        let session_id = app.selection.current_session().unwrap();
        let messages = app.current_session().unwrap().messages.clone();

        app.return_to_picker();
        assert_eq!(app.selection.current_session(), Some(session_id));

        app.select_character(1, false);
        assert_eq!(app.selection.current_session(), Some(session_id));
        assert_eq!(app.current_session().unwrap().messages, messages);
    }

    #[test]
    fn sends_from_the_picker_use_the_last_active_character() {
        let mut app = app();
        app.select_character(1, false);
        app.return_to_picker();

        let send = app.begin_send("still there?").expect("outbound send");
        assert_eq!(send.character_id, 1);
        assert_eq!(send.context.name, "Sakura");
    }

    #[test]
    fn a_late_reply_lands_in_the_session_captured_at_send_time() {
        let mut app = app();
        app.select_character(1, false);

        let send = app.begin_send("slow one").unwrap();
        let origin = send.session_id;

        // User moves on before the reply arrives.
        app.start_new_session(false).unwrap();
        app.complete_send(&send, ok_reply("finally", "T"));

        let session = app.store.session(1, origin).unwrap();
        assert_eq!(session.last_message().unwrap().content, "finally");
        assert!(app.current_session().unwrap().messages.is_empty());
    }

    #[test]
    fn sakura_scenario_end_to_end() {
        let mut app = app();

        assert!(app.select_character(1, false));
        let sessions = app.store.sessions_for(1);
        assert_eq!(sessions.len(), 2);
        let first = sessions[0].id;
        assert_eq!(app.selection.current_session(), Some(first));

        let send = app.begin_send("hi").expect("outbound send");
        app.complete_send(&send, ok_reply("hello", "T"));

        let messages = &app.store.session(1, first).unwrap().messages;
        let user = &messages[messages.len() - 2];
        let reply = &messages[messages.len() - 1];
        assert!(user.is_user());
        assert_eq!(user.content, "hi");
        assert!(reply.is_character());
        assert_eq!(reply.content, "hello");
    }

    #[test]
    fn theme_toggle_flips_and_records_the_choice() {
        let mut app = app();
        let start = app.theme.name;

        app.toggle_theme();
        assert_ne!(app.theme.name, start);
        assert_eq!(app.config.theme.as_deref(), Some(app.theme.name));

        app.toggle_theme();
        assert_eq!(app.theme.name, start);
    }
}
