use crate::app::keybindings::{KeybindingResolver, KeybindingsConfig};
use crate::dialog::WindowHandle;
use crate::document::EditorWindow;
use chrono::{DateTime, Local};
use unicode_width::UnicodeWidthStr;

/// UI mode determines what the TUI is currently doing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UiMode {
    /// Typing into the document
    #[default]
    Editing,
    /// Help screen overlay
    Help,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Error,
}

/// Message shown in the status bar
#[derive(Debug, Clone, PartialEq)]
pub struct StatusMessage {
    pub text: String,
    pub level: StatusLevel,
    pub at: DateTime<Local>,
}

impl StatusMessage {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            level: StatusLevel::Info,
            at: Local::now(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            level: StatusLevel::Error,
            at: Local::now(),
        }
    }
}

/// Multi-line text buffer with a cursor
///
/// The cursor column counts characters, not bytes. Lines never hold the line
/// terminator; `text()` joins them with the ending detected at load, so a
/// loaded file round-trips unchanged and new lines match the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorBuffer {
    lines: Vec<String>,
    ending: LineEnding,
    row: usize,
    col: usize,
}

/// Line terminator used when joining lines back into text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LineEnding {
    #[default]
    Lf,
    CrLf,
}

impl LineEnding {
    /// CRLF only when every line break in `text` is CRLF
    ///
    /// Mixed files stay `Lf` and keep their stray `\r` inside the lines so
    /// they are written back byte for byte.
    pub fn detect(text: &str) -> Self {
        let breaks = text.matches('\n').count();
        if breaks > 0 && text.matches("\r\n").count() == breaks {
            Self::CrLf
        } else {
            Self::Lf
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::CrLf => "\r\n",
        }
    }
}

impl Default for EditorBuffer {
    fn default() -> Self {
        Self {
            lines: vec![String::new()],
            ending: LineEnding::Lf,
            row: 0,
            col: 0,
        }
    }
}

impl EditorBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_text(text: &str) -> Self {
        let mut buffer = Self::new();
        buffer.set_text(text);
        buffer
    }

    /// Replace the whole content and move the cursor to the start
    pub fn set_text(&mut self, text: &str) {
        self.ending = LineEnding::detect(text);
        self.lines = text
            .split(self.ending.as_str())
            .map(str::to_string)
            .collect();
        self.row = 0;
        self.col = 0;
    }

    pub fn text(&self) -> String {
        self.lines.join(self.ending.as_str())
    }

    pub fn line_ending(&self) -> LineEnding {
        self.ending
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Cursor as (row, column), both zero-based
    pub fn cursor(&self) -> (usize, usize) {
        (self.row, self.col)
    }

    /// Display width of the current line up to the cursor
    pub fn cursor_display_column(&self) -> usize {
        let line = &self.lines[self.row];
        line[..byte_index(line, self.col)].width()
    }

    pub fn insert_char(&mut self, c: char) {
        if c == '\n' {
            self.newline();
            return;
        }
        let line = &mut self.lines[self.row];
        let idx = byte_index(line, self.col);
        line.insert(idx, c);
        self.col += 1;
    }

    /// Insert pasted text; CRLF and LF both split lines
    pub fn insert_str(&mut self, text: &str) {
        for c in text.replace("\r\n", "\n").chars() {
            self.insert_char(c);
        }
    }

    pub fn newline(&mut self) {
        let line = &mut self.lines[self.row];
        let idx = byte_index(line, self.col);
        let rest = line.split_off(idx);
        self.row += 1;
        self.lines.insert(self.row, rest);
        self.col = 0;
    }

    pub fn backspace(&mut self) {
        if self.col > 0 {
            let line = &mut self.lines[self.row];
            let idx = byte_index(line, self.col - 1);
            line.remove(idx);
            self.col -= 1;
        } else if self.row > 0 {
            let line = self.lines.remove(self.row);
            self.row -= 1;
            self.col = char_count(&self.lines[self.row]);
            self.lines[self.row].push_str(&line);
        }
    }

    pub fn delete(&mut self) {
        let len = char_count(&self.lines[self.row]);
        if self.col < len {
            let line = &mut self.lines[self.row];
            let idx = byte_index(line, self.col);
            line.remove(idx);
        } else if self.row + 1 < self.lines.len() {
            let next = self.lines.remove(self.row + 1);
            self.lines[self.row].push_str(&next);
        }
    }

    pub fn move_left(&mut self) {
        if self.col > 0 {
            self.col -= 1;
        } else if self.row > 0 {
            self.row -= 1;
            self.col = char_count(&self.lines[self.row]);
        }
    }

    pub fn move_right(&mut self) {
        if self.col < char_count(&self.lines[self.row]) {
            self.col += 1;
        } else if self.row + 1 < self.lines.len() {
            self.row += 1;
            self.col = 0;
        }
    }

    pub fn move_up(&mut self, count: usize) {
        self.row = self.row.saturating_sub(count);
        self.clamp_col();
    }

    pub fn move_down(&mut self, count: usize) {
        self.row = (self.row + count).min(self.lines.len() - 1);
        self.clamp_col();
    }

    pub fn line_start(&mut self) {
        self.col = 0;
    }

    pub fn line_end(&mut self) {
        self.col = char_count(&self.lines[self.row]);
    }

    fn clamp_col(&mut self) {
        self.col = self.col.min(char_count(&self.lines[self.row]));
    }
}

fn char_count(line: &str) -> usize {
    line.chars().count()
}

fn byte_index(line: &str, col: usize) -> usize {
    line.char_indices()
        .nth(col)
        .map(|(idx, _)| idx)
        .unwrap_or(line.len())
}

/// The editor window: a titled buffer the document manager reads from
#[derive(Debug, Clone, Default)]
pub struct EditorPane {
    pub title: String,
    pub buffer: EditorBuffer,
}

impl EditorPane {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            buffer: EditorBuffer::new(),
        }
    }
}

impl EditorWindow for EditorPane {
    fn text(&self) -> String {
        self.buffer.text()
    }

    fn handle(&self) -> WindowHandle {
        WindowHandle::new(self.title.clone())
    }
}

/// TUI state
pub struct TuiState {
    /// Current UI mode
    pub ui_mode: UiMode,

    /// Last status bar message
    pub status: Option<StatusMessage>,

    /// First visible row
    pub scroll_row: usize,

    /// First visible display column
    pub scroll_col: usize,

    /// Rows available to the editor
    pub viewport_height: usize,

    /// Columns available to the editor
    pub viewport_width: usize,

    /// Keybinding resolver
    pub keybindings: KeybindingResolver,

    /// Dirty flag for UI optimization
    needs_redraw: bool,
}

impl TuiState {
    pub fn new(keybindings: &KeybindingsConfig) -> Self {
        Self {
            ui_mode: UiMode::Editing,
            status: None,
            scroll_row: 0,
            scroll_col: 0,
            viewport_height: 1,
            viewport_width: 1,
            keybindings: KeybindingResolver::from_config(keybindings),
            needs_redraw: true,
        }
    }

    pub fn set_status(&mut self, status: StatusMessage) {
        self.status = Some(status);
        self.mark_dirty();
    }

    /// Adjust scroll offsets so the cursor stays inside the viewport
    pub fn scroll_to_cursor(&mut self, buffer: &EditorBuffer) {
        let (row, _) = buffer.cursor();
        let height = self.viewport_height.max(1);
        if row < self.scroll_row {
            self.scroll_row = row;
        } else if row >= self.scroll_row + height {
            self.scroll_row = row + 1 - height;
        }

        let col = buffer.cursor_display_column();
        let width = self.viewport_width.max(1);
        if col < self.scroll_col {
            self.scroll_col = col;
        } else if col >= self.scroll_col + width {
            self.scroll_col = col + 1 - width;
        }
    }

    pub fn reset_scroll(&mut self) {
        self.scroll_row = 0;
        self.scroll_col = 0;
    }

    /// Mark UI as needing redraw
    pub fn mark_dirty(&mut self) {
        self.needs_redraw = true;
    }

    /// Check if UI needs redraw
    pub fn needs_redraw(&self) -> bool {
        self.needs_redraw
    }

    /// Clear dirty flag after rendering
    pub fn clear_dirty(&mut self) {
        self.needs_redraw = false;
    }
}
