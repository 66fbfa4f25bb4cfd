use chatwidget_core::ChatClient;
use ratatui::layout::Rect;

pub struct App {
    // Core state
    pub should_quit: bool,
    pub client: ChatClient,

    // Input line
    pub input: String,
    pub cursor: usize, // cursor position in input, in chars

    // History view
    pub scroll: u16,
    pub follow_newest: bool,
    pub seen_len: usize,
    pub history_height: u16, // Height of history area for scroll calculations
    pub history_lines: u16,  // Wrapped line count of the last drawn history

    // Animation state
    pub animation_frame: u8, // 0-2 for ellipsis animation

    // Panel areas for mouse hit-testing (updated during render)
    pub history_area: Option<Rect>,
    pub send_button_area: Option<Rect>,
}

impl App {
    pub fn new(client: ChatClient) -> Self {
        Self {
            should_quit: false,
            client,
            input: String::new(),
            cursor: 0,
            scroll: 0,
            follow_newest: true,
            seen_len: 0,
            history_height: 0,
            history_lines: 0,
            animation_frame: 0,
            history_area: None,
            send_button_area: None,
        }
    }

    pub fn server_url(&self) -> &str {
        self.client.api().base_url()
    }

    pub fn typing_visible(&self) -> bool {
        self.client.view().pending().is_visible()
    }

    /// Send the input line. Blank input is ignored by the client.
    pub fn submit(&mut self) {
        if self.client.send_message(&mut self.input).is_some() {
            self.cursor = 0;
            self.follow_newest = true;
        }
    }

    // Input editing (cursor is a char index, not a byte index)
    pub fn insert_char(&mut self, c: char) {
        let byte_pos = char_to_byte_index(&self.input, self.cursor);
        self.input.insert(byte_pos, c);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let byte_pos = char_to_byte_index(&self.input, self.cursor);
            self.input.remove(byte_pos);
        }
    }

    pub fn delete(&mut self) {
        if self.cursor < self.input.chars().count() {
            let byte_pos = char_to_byte_index(&self.input, self.cursor);
            self.input.remove(byte_pos);
        }
    }

    pub fn cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn cursor_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.input.chars().count());
    }

    pub fn cursor_home(&mut self) {
        self.cursor = 0;
    }

    pub fn cursor_end(&mut self) {
        self.cursor = self.input.chars().count();
    }

    /// Tick animation frame (called by Tick event)
    pub fn tick_animation(&mut self) {
        if self.typing_visible() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        } else {
            self.animation_frame = 0;
        }
    }

    // History scrolling
    pub fn scroll_up(&mut self, lines: u16) {
        self.scroll = self.scroll.saturating_sub(lines);
        self.follow_newest = false;
    }

    pub fn scroll_down(&mut self, lines: u16, total_lines: u16) {
        let max_scroll = self.max_scroll(total_lines);
        self.scroll = self.scroll.saturating_add(lines).min(max_scroll);
        self.follow_newest = self.scroll >= max_scroll;
    }

    pub fn page(&self) -> u16 {
        self.visible_height().saturating_sub(1).max(1)
    }

    /// Keep the newest entry in view whenever the history has grown.
    pub fn sync_scroll(&mut self, history_len: usize, total_lines: u16) {
        if history_len > self.seen_len {
            self.follow_newest = true;
        }
        self.seen_len = history_len;

        if self.follow_newest {
            self.scroll = self.max_scroll(total_lines);
        }
    }

    fn max_scroll(&self, total_lines: u16) -> u16 {
        total_lines.saturating_sub(self.visible_height())
    }

    fn visible_height(&self) -> u16 {
        if self.history_height > 0 {
            self.history_height
        } else {
            20
        }
    }
}

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}
