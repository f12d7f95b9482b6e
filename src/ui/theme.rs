use ratatui::style::{Color, Modifier, Style};

#[derive(Debug, Clone)]
pub struct Theme {
    pub name: &'static str,

    // Overall background color to paint the full frame
    pub background_color: Color,

    // Chat message styles
    pub user_prefix_style: Style,
    pub user_text_style: Style,
    pub character_prefix_style: Style,
    pub character_text_style: Style,

    // Chrome
    pub title_style: Style,
    pub subtitle_style: Style,
    pub pending_indicator_style: Style,
    pub selection_highlight_style: Style,
    pub active_marker_style: Style,
    pub input_border_style: Style,
    pub input_title_style: Style,

    // Input area
    pub input_text_style: Style,
}

impl Theme {
    pub fn dark_default() -> Self {
        Theme {
            name: "dark",
            background_color: Color::Black,
            user_prefix_style: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            user_text_style: Style::default().fg(Color::Cyan),
            character_prefix_style: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
            character_text_style: Style::default().fg(Color::White),

            title_style: Style::default().fg(Color::Gray),
            subtitle_style: Style::default().fg(Color::DarkGray),
            pending_indicator_style: Style::default().fg(Color::Yellow),
            selection_highlight_style: Style::default()
                .fg(Color::Black)
                .bg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
            active_marker_style: Style::default().fg(Color::Green),
            input_border_style: Style::default().fg(Color::Gray),
            input_title_style: Style::default().fg(Color::Gray),

            input_text_style: Style::default().fg(Color::White),
        }
    }

    pub fn light() -> Self {
        Theme {
            name: "light",
            background_color: Color::White,
            user_prefix_style: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            user_text_style: Style::default().fg(Color::Blue),
            character_prefix_style: Style::default()
                .fg(Color::Red)
                .add_modifier(Modifier::BOLD),
            character_text_style: Style::default().fg(Color::Black),

            title_style: Style::default().fg(Color::DarkGray),
            subtitle_style: Style::default().fg(Color::Gray),
            pending_indicator_style: Style::default().fg(Color::Blue),
            selection_highlight_style: Style::default()
                .fg(Color::White)
                .bg(Color::Red)
                .add_modifier(Modifier::BOLD),
            active_marker_style: Style::default().fg(Color::Green),
            input_border_style: Style::default().fg(Color::Black),
            input_title_style: Style::default().fg(Color::DarkGray),

            input_text_style: Style::default().fg(Color::Black),
        }
    }

    pub fn from_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "light" => Self::light(),
            _ => Self::dark_default(),
        }
    }

    /// The other theme, for the sidebar's dark/light toggle.
    pub fn toggled(&self) -> Self {
        match self.name {
            "light" => Self::dark_default(),
            _ => Self::light(),
        }
    }
}
