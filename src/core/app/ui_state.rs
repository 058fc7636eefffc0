use ratatui::style::{Color, Modifier, Style};
use tui_textarea::TextArea;

/// Transient state owned by the terminal front end: input buffer and scroll position.
pub struct UiState {
    textarea: TextArea<'static>,
    placeholder: String,
    /// First visible conversation line when `auto_scroll` is off.
    pub scroll_offset: u16,
    /// Follow the newest message.
    pub auto_scroll: bool,
    /// Largest useful `scroll_offset`, refreshed on every draw.
    pub max_scroll: u16,
    pub exit_requested: bool,
}

impl UiState {
    pub fn new(placeholder: &str) -> Self {
        let mut ui = Self {
            textarea: TextArea::default(),
            placeholder: placeholder.to_string(),
            scroll_offset: 0,
            auto_scroll: true,
            max_scroll: 0,
            exit_requested: false,
        };
        ui.configure_textarea();
        ui
    }

    fn configure_textarea(&mut self) {
        self.textarea.set_cursor_line_style(Style::default());
        self.textarea.set_placeholder_text(self.placeholder.clone());
        self.textarea.set_placeholder_style(
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        );
    }

    pub fn textarea(&self) -> &TextArea<'static> {
        &self.textarea
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    pub fn input_text(&self) -> String {
        self.textarea.lines().join("\n")
    }

    pub fn apply_textarea_edit<F>(&mut self, f: F)
    where
        F: FnOnce(&mut TextArea<'static>),
    {
        f(&mut self.textarea);
    }

    pub fn clear_input(&mut self) {
        self.textarea = TextArea::default();
        self.configure_textarea();
    }

    /// Swaps the placeholder and returns to the bottom of the (new) conversation.
    pub fn reset_for_zone(&mut self, placeholder: &str) {
        self.placeholder = placeholder.to_string();
        self.configure_textarea();
        self.scroll_to_bottom();
    }

    pub fn scroll_up(&mut self, lines: u16) {
        if self.auto_scroll {
            self.scroll_offset = self.max_scroll;
            self.auto_scroll = false;
        }
        self.scroll_offset = self.scroll_offset.saturating_sub(lines);
    }

    pub fn scroll_down(&mut self, lines: u16) {
        if self.auto_scroll {
            return;
        }
        self.scroll_offset = self
            .scroll_offset
            .saturating_add(lines)
            .min(self.max_scroll);
        if self.scroll_offset >= self.max_scroll {
            self.auto_scroll = true;
        }
    }

    pub fn scroll_to_bottom(&mut self) {
        self.auto_scroll = true;
        self.scroll_offset = self.max_scroll;
    }

    /// Offset the renderer should use for a conversation of `max_scroll` hidden lines.
    pub fn effective_scroll(&mut self, max_scroll: u16) -> u16 {
        self.max_scroll = max_scroll;
        if self.auto_scroll {
            self.scroll_offset = max_scroll;
        } else {
            self.scroll_offset = self.scroll_offset.min(max_scroll);
        }
        self.scroll_offset
    }
}
