//! View composition for the picker and chat screens.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};
use tui_textarea::TextArea;

use crate::core::app::{App, SUGGESTIONS};
use crate::core::message::MessageRole;
use crate::ui::NARROW_WIDTH;

pub fn ui(f: &mut Frame, app: &mut App, input: &TextArea) {
    let background = Block::default().style(Style::default().bg(app.theme.background_color));
    f.render_widget(background, f.area());

    if app.selection.selected_character().is_none() {
        draw_picker(f, app);
    } else {
        draw_chat(f, app, input);
    }
}

fn draw_picker(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(f.area());

    let hero = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled("Choose Your Maid", app.theme.title_style)),
        Line::from(Span::styled(
            "Pick a companion to start chatting — previous conversations are saved per character.",
            app.theme.subtitle_style,
        )),
    ])
    .alignment(Alignment::Center);
    f.render_widget(hero, chunks[0]);

    let items: Vec<ListItem> = app
        .characters
        .iter()
        .map(|character| {
            let mut lines = vec![
                Line::from(vec![
                    Span::styled(character.name.clone(), app.theme.character_prefix_style),
                    Span::styled(
                        format!("  {}", character.personality),
                        app.theme.subtitle_style,
                    ),
                ]),
                Line::from(Span::styled(
                    format!("  {}", character.description),
                    app.theme.character_text_style,
                )),
            ];
            if app.selection.active_character() == Some(character.id) {
                lines.push(Line::from(Span::styled(
                    "  ● currently chatting",
                    app.theme.active_marker_style,
                )));
            }
            lines.push(Line::from(""));
            ListItem::new(lines)
        })
        .collect();

    let mut state = ListState::default();
    app.picker_cursor = app.picker_cursor.min(app.characters.len().saturating_sub(1));
    state.select(Some(app.picker_cursor));

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Characters"))
        .highlight_style(app.theme.selection_highlight_style)
        .highlight_symbol("❯ ");
    f.render_stateful_widget(list, chunks[1], &mut state);

    let footer = Paragraph::new(Span::styled(
        "↑/↓ select · Enter chat · Ctrl+C quit",
        app.theme.subtitle_style,
    ))
    .alignment(Alignment::Center);
    f.render_widget(footer, chunks[2]);
}

fn draw_chat(f: &mut Frame, app: &mut App, input: &TextArea) {
    let area = f.area();
    let narrow = area.width < NARROW_WIDTH;
    let sidebar_visible = !narrow || app.selection.sidebar_open();

    if narrow && sidebar_visible {
        // Overlay: the sidebar takes the whole screen until a pick closes it.
        draw_sidebar(f, app, area);
        return;
    }

    if sidebar_visible {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(30), Constraint::Min(0)])
            .split(area);
        draw_sidebar(f, app, columns[0]);
        draw_main_chat(f, app, input, columns[1]);
    } else {
        draw_main_chat(f, app, input, area);
    }
}

fn draw_sidebar(f: &mut Frame, app: &mut App, area: Rect) {
    let title = app
        .current_character()
        .map(|c| format!("Chats — {}", c.name))
        .unwrap_or_else(|| "Chats".to_string());

    let character_id = app.selection.effective_character().unwrap_or_default();
    let sessions = app.store.sessions_for(character_id);

    let mut items: Vec<ListItem> = vec![ListItem::new(Line::from(Span::styled(
        "+ New Chat",
        app.theme.title_style,
    )))];
    items.extend(sessions.iter().map(|session| {
        let marker = if app.selection.current_session() == Some(session.id) {
            "● "
        } else {
            "  "
        };
        ListItem::new(vec![
            Line::from(vec![
                Span::styled(marker, app.theme.active_marker_style),
                Span::styled(session.title.clone(), app.theme.character_text_style),
            ]),
            Line::from(Span::styled(
                format!("    {} messages", session.messages.len()),
                app.theme.subtitle_style,
            )),
        ])
    }));

    // Row 0 is "New Chat"; sessions start at 1.
    app.sidebar_cursor = app.sidebar_cursor.min(sessions.len());
    let mut state = ListState::default();
    if app.sidebar_focused {
        state.select(Some(app.sidebar_cursor));
    }

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(app.theme.selection_highlight_style)
        .highlight_symbol("❯ ");
    f.render_stateful_widget(list, area, &mut state);
}

fn draw_main_chat(f: &mut Frame, app: &mut App, input: &TextArea, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(area);

    draw_chat_header(f, app, chunks[0]);

    let is_empty = app
        .current_session()
        .map(|s| s.messages.is_empty())
        .unwrap_or(true);
    if is_empty {
        draw_empty_state(f, app, chunks[1]);
    } else {
        draw_messages(f, app, chunks[1]);
    }

    f.render_widget(input, chunks[2]);

    let footer = Paragraph::new(Span::styled(
        "Enter send · Tab chats · Ctrl+N new chat · Esc characters · Ctrl+T theme · Ctrl+C quit",
        app.theme.subtitle_style,
    ))
    .alignment(Alignment::Center);
    f.render_widget(footer, chunks[3]);
}

fn draw_chat_header(f: &mut Frame, app: &App, area: Rect) {
    let Some(character) = app.current_character() else {
        return;
    };

    let status = if app.pending_sends() > 0 {
        Span::styled("typing…", app.theme.pending_indicator_style)
    } else {
        Span::styled("online", app.theme.active_marker_style)
    };

    let header = Line::from(vec![
        Span::styled(character.name.clone(), app.theme.character_prefix_style),
        Span::styled(
            format!(" — {}  ", character.personality),
            app.theme.subtitle_style,
        ),
        status,
    ]);
    f.render_widget(Paragraph::new(header), area);
}

fn draw_messages(f: &mut Frame, app: &mut App, area: Rect) {
    let lines = build_display_lines(app);

    let available_height = area.height;
    let total_lines = lines.len() as u16;
    let max_offset = total_lines.saturating_sub(available_height);
    if app.auto_scroll {
        app.scroll_offset = max_offset;
    }
    let scroll_offset = app.scroll_offset.min(max_offset);

    let messages = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .scroll((scroll_offset, 0));
    f.render_widget(messages, area);
}

fn draw_empty_state(f: &mut Frame, app: &App, area: Rect) {
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled("Start a conversation", app.theme.title_style)),
        Line::from(Span::styled(
            "Ask me anything! I'm here to help with your questions, or just to chat.",
            app.theme.subtitle_style,
        )),
        Line::from(""),
    ];
    for (i, suggestion) in SUGGESTIONS.iter().enumerate() {
        lines.push(Line::from(Span::styled(
            format!("Alt+{}  {}", i + 1, suggestion),
            app.theme.character_text_style,
        )));
    }

    let empty = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    f.render_widget(empty, area);
}

/// Flatten the current session into styled lines, one blank spacer line
/// between messages, matching what the transcript log records.
pub fn build_display_lines(app: &App) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    let Some(character) = app.current_character() else {
        return lines;
    };
    let Some(session) = app.current_session() else {
        return lines;
    };

    for msg in &session.messages {
        match msg.role {
            MessageRole::User => {
                lines.push(Line::from(vec![
                    Span::styled("You: ", app.theme.user_prefix_style),
                    Span::styled(msg.content.clone(), app.theme.user_text_style),
                ]));
            }
            MessageRole::Character => {
                for (i, content_line) in msg.content.lines().enumerate() {
                    if i == 0 {
                        lines.push(Line::from(vec![
                            Span::styled(
                                format!("{}: ", character.name),
                                app.theme.character_prefix_style,
                            ),
                            Span::styled(
                                content_line.to_string(),
                                app.theme.character_text_style,
                            ),
                        ]));
                    } else {
                        lines.push(Line::from(Span::styled(
                            content_line.to_string(),
                            app.theme.character_text_style,
                        )));
                    }
                }
            }
        }
        lines.push(Line::from(""));
    }

    lines
}

/// Scroll position that pins the transcript bottom to the viewport bottom.
pub fn max_scroll_offset(app: &App, available_height: u16) -> u16 {
    let total_lines = build_display_lines(app).len() as u16;
    total_lines.saturating_sub(available_height)
}
