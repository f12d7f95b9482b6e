//! Main chat event loop.
//!
//! Terminal setup, keyboard handling, and the channel that carries finished
//! sends back onto the UI loop. Sends are fire-and-forget: the loop keeps
//! accepting input while requests are outstanding, and each completed
//! request appends exactly one reply (or the apology) to the session that
//! was current when it was dispatched. There is no cancellation and no
//! timeout; a hung request simply never resolves.

use std::{error::Error, io, sync::Arc, time::Duration};

use ratatui::crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    text::Span,
    widgets::{Block, Borders},
    Terminal,
};
use tokio::sync::mpsc;
use tui_textarea::TextArea;

use crate::api::client::{ChatClient, ChatError};
use crate::api::ChatReply;
use crate::core::app::{App, OutboundSend, SUGGESTIONS};
use crate::core::character::find_character_by_name;
use crate::core::config::{resolve_api_base, Config, API_BASE_ENV};
use crate::ui::renderer::{max_scroll_offset, ui};
use crate::ui::theme::Theme;
use crate::ui::NARROW_WIDTH;

/// Options collected by the CLI before the terminal is touched.
pub struct ChatOptions {
    pub api_base: Option<String>,
    pub character: Option<String>,
    pub log_file: Option<String>,
    pub theme: Option<String>,
}

type SendResult = (OutboundSend, Result<ChatReply, ChatError>);

pub async fn run_chat(options: ChatOptions) -> Result<(), Box<dyn Error>> {
    let mut config = Config::load()?;
    let api_base = resolve_api_base(
        options.api_base.as_deref(),
        std::env::var(API_BASE_ENV).ok(),
        &config,
    );
    if let Some(theme) = options.theme {
        config.theme = Some(theme);
    }

    let mut app = App::new(config, options.log_file)?;

    // Start in a chat, like the web client: the named character, or the
    // first of the roster. Unknown names fail before the terminal flips.
    let initial_character = match options.character.as_deref() {
        Some(name) => Some(
            find_character_by_name(&app.characters, name)
                .ok_or_else(|| format!("Unknown character: {name}"))?
                .id,
        ),
        None => app.characters.first().map(|c| c.id),
    };

    let client = Arc::new(ChatClient::new(&api_base)?);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_event_loop(&mut terminal, &mut app, client, initial_character).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Remember an in-session theme switch; losing it is not fatal.
    if app.theme_dirty {
        if let Err(e) = app.config.save() {
            tracing::warn!(error = %e, "failed to persist config");
        }
    }

    result
}

async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    client: Arc<ChatClient>,
    initial_character: Option<u32>,
) -> Result<(), Box<dyn Error>> {
    let (tx, mut rx) = mpsc::unbounded_channel::<SendResult>();

    let mut input = TextArea::default();
    style_input(&mut input, &app.theme);

    if let Some(id) = initial_character {
        let narrow = terminal.size()?.width < NARROW_WIDTH;
        app.select_character(id, narrow);
    }

    loop {
        terminal.draw(|f| ui(f, app, &input))?;

        let size = terminal.size()?;
        let narrow = size.width < NARROW_WIDTH;
        // Transcript height: frame minus header, input box, and footer.
        let available_height = size.height.saturating_sub(5);

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    if is_quit(&key) {
                        break;
                    }
                    if app.selection.selected_character().is_none() {
                        handle_picker_key(app, &key, narrow);
                    } else {
                        handle_chat_key(
                            app,
                            &mut input,
                            &key,
                            &tx,
                            &client,
                            narrow,
                            available_height,
                        );
                    }
                }
            }
        }

        // Drain finished sends; each appends exactly one reply.
        while let Ok((send, result)) = rx.try_recv() {
            app.complete_send(&send, result);
        }
    }

    Ok(())
}

fn is_quit(key: &KeyEvent) -> bool {
    key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
}

fn handle_picker_key(app: &mut App, key: &KeyEvent, narrow: bool) {
    match key.code {
        KeyCode::Up | KeyCode::Left => {
            app.picker_cursor = app.picker_cursor.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Right => {
            app.picker_cursor = (app.picker_cursor + 1).min(app.characters.len().saturating_sub(1));
        }
        KeyCode::Enter => {
            if let Some(id) = app.characters.get(app.picker_cursor).map(|c| c.id) {
                app.select_character(id, narrow);
            }
        }
        KeyCode::Esc => {
            // Esc resumes the active chat, if there is one.
            if let Some(id) = app.selection.active_character() {
                app.select_character(id, narrow);
            }
        }
        _ => {}
    }
}

fn handle_chat_key(
    app: &mut App,
    input: &mut TextArea<'static>,
    key: &KeyEvent,
    tx: &mpsc::UnboundedSender<SendResult>,
    client: &Arc<ChatClient>,
    narrow: bool,
    available_height: u16,
) {
    if app.sidebar_focused {
        handle_sidebar_key(app, key, narrow);
        return;
    }

    match (key.code, key.modifiers) {
        (KeyCode::Enter, _) => {
            let text = input.lines().join("\n");
            if let Some(send) = app.begin_send(&text) {
                clear_input(input);
                spawn_send(send, tx.clone(), Arc::clone(client));
            }
        }
        (KeyCode::Esc, _) => {
            app.return_to_picker();
        }
        (KeyCode::Tab, _) => {
            app.sidebar_focused = true;
            app.sidebar_cursor = 0;
            if narrow && !app.selection.sidebar_open() {
                app.selection.toggle_sidebar();
            }
        }
        (KeyCode::Char('n'), m) if m.contains(KeyModifiers::CONTROL) => {
            app.start_new_session(narrow);
        }
        (KeyCode::Char('b'), m) if m.contains(KeyModifiers::CONTROL) => {
            app.selection.toggle_sidebar();
        }
        (KeyCode::Char('t'), m) if m.contains(KeyModifiers::CONTROL) => {
            app.toggle_theme();
            style_input(input, &app.theme);
        }
        (KeyCode::Char(c), m) if m.contains(KeyModifiers::ALT) && c.is_ascii_digit() => {
            insert_suggestion(input, c);
        }
        (KeyCode::Up, _) => {
            app.auto_scroll = false;
            app.scroll_offset = app.scroll_offset.saturating_sub(1);
        }
        (KeyCode::Down, _) => {
            let max = max_scroll_offset(app, available_height);
            app.scroll_offset = app.scroll_offset.saturating_add(1).min(max);
            if app.scroll_offset >= max {
                app.auto_scroll = true;
            }
        }
        _ => {
            input.input(*key);
        }
    }
}

fn handle_sidebar_key(app: &mut App, key: &KeyEvent, narrow: bool) {
    match key.code {
        KeyCode::Tab | KeyCode::Esc => {
            app.sidebar_focused = false;
            if narrow {
                app.selection.close_sidebar();
            }
        }
        KeyCode::Up => {
            app.sidebar_cursor = app.sidebar_cursor.saturating_sub(1);
        }
        KeyCode::Down => {
            let sessions = app
                .selection
                .effective_character()
                .map(|id| app.store.sessions_for(id).len())
                .unwrap_or(0);
            // Row 0 is "New Chat"; sessions start at 1.
            app.sidebar_cursor = (app.sidebar_cursor + 1).min(sessions);
        }
        KeyCode::Enter => {
            app.sidebar_focused = false;
            if app.sidebar_cursor == 0 {
                app.start_new_session(narrow);
            } else {
                let session_id = app.selection.effective_character().and_then(|id| {
                    app.store
                        .sessions_for(id)
                        .get(app.sidebar_cursor - 1)
                        .map(|s| s.id)
                });
                if let Some(id) = session_id {
                    app.select_session(id, narrow);
                }
            }
        }
        _ => {}
    }
}

fn spawn_send(send: OutboundSend, tx: mpsc::UnboundedSender<SendResult>, client: Arc<ChatClient>) {
    tokio::spawn(async move {
        let result = client.send(&send.message, send.context.clone()).await;
        let _ = tx.send((send, result));
    });
}

fn insert_suggestion(input: &mut TextArea<'static>, digit: char) {
    let already_typing = input.lines().iter().any(|line| !line.trim().is_empty());
    if already_typing {
        return;
    }

    let index = digit.to_digit(10).and_then(|d| d.checked_sub(1)).map(|d| d as usize);
    if let Some(suggestion) = index.and_then(|i| SUGGESTIONS.get(i)) {
        input.insert_str(suggestion);
    }
}

fn clear_input(input: &mut TextArea<'static>) {
    input.select_all();
    input.cut();
}

fn style_input(input: &mut TextArea<'static>, theme: &Theme) {
    input.set_style(theme.input_text_style);
    input.set_cursor_line_style(theme.input_text_style);
    input.set_block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(theme.input_border_style)
            .title(Span::styled(
                "Type your message (Enter to send)",
                theme.input_title_style,
            )),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::Config;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn quit_requires_the_control_modifier() {
        assert!(is_quit(&KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL
        )));
        assert!(!is_quit(&key(KeyCode::Char('c'))));
    }

    #[test]
    fn picker_cursor_stays_in_bounds() {
        let mut app = App::new(Config::default(), None).expect("app");

        handle_picker_key(&mut app, &key(KeyCode::Up), false);
        assert_eq!(app.picker_cursor, 0);

        for _ in 0..10 {
            handle_picker_key(&mut app, &key(KeyCode::Down), false);
        }
        assert_eq!(app.picker_cursor, app.characters.len() - 1);
    }

    #[test]
    fn enter_on_the_picker_selects_the_highlighted_character() {
        let mut app = App::new(Config::default(), None).expect("app");

        handle_picker_key(&mut app, &key(KeyCode::Down), false);
        handle_picker_key(&mut app, &key(KeyCode::Enter), false);

        assert_eq!(app.selection.selected_character(), Some(2));
        assert_eq!(app.store.sessions_for(2).len(), 2);
    }

    #[test]
    fn sidebar_enter_on_row_zero_starts_a_new_chat() {
        let mut app = App::new(Config::default(), None).expect("app");
        app.select_character(1, false);
        app.sidebar_focused = true;
        app.sidebar_cursor = 0;

        handle_sidebar_key(&mut app, &key(KeyCode::Enter), false);

        assert!(!app.sidebar_focused);
        assert_eq!(app.store.sessions_for(1).len(), 3);
        assert!(app.current_session().unwrap().messages.is_empty());
    }

    #[test]
    fn sidebar_enter_on_a_session_row_selects_it() {
        let mut app = App::new(Config::default(), None).expect("app");
        app.select_character(1, false);
        let second = app.store.sessions_for(1)[1].id;
        app.sidebar_focused = true;
        app.sidebar_cursor = 2;

        handle_sidebar_key(&mut app, &key(KeyCode::Enter), false);

        assert_eq!(app.selection.current_session(), Some(second));
    }
}
