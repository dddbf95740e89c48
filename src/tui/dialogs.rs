//! Modal file pickers and message boxes drawn in the terminal
//!
//! Each dialog runs its own blocking event loop on the shared terminal and
//! returns when the user confirms or dismisses it. The state machines
//! ([`PathPrompt`], [`ButtonRow`]) are independent of the terminal.

use crate::dialog::{Dialogs, FileDialogOptions, MessageBoxOptions, WindowHandle};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::buffer::Buffer;
use std::cell::RefCell;
use std::io::Stdout;
use std::path::{MAIN_SEPARATOR, Path, PathBuf};
use std::rc::Rc;

pub type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Terminal shared between the main loop and modal dialogs
pub type SharedTerminal = Rc<RefCell<Tui>>;

/// Maximum number of directory entries listed by the path prompt
const MAX_ENTRIES: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    Open,
    Save,
}

/// Result of feeding a key to a dialog
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    Pending,
    Done(T),
    Dismissed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub is_dir: bool,
}

/// Path input with a list of matching entries from the current directory
#[derive(Debug, Clone)]
pub struct PathPrompt {
    pub kind: PromptKind,
    pub title: String,
    pub filter_label: String,
    pub input: String,
    pub entries: Vec<DirEntry>,
    pub selected: Option<usize>,
    pub error: Option<String>,
    options: FileDialogOptions,
}

impl PathPrompt {
    pub fn new(kind: PromptKind, options: &FileDialogOptions) -> Self {
        let input = match &options.default_path {
            Some(path) if path.is_dir() => with_trailing_separator(path),
            Some(path) => path.display().to_string(),
            None => std::env::current_dir()
                .map(|dir| with_trailing_separator(&dir))
                .unwrap_or_default(),
        };

        let mut prompt = Self {
            kind,
            title: options.title.clone(),
            filter_label: options
                .filters
                .iter()
                .map(|f| f.label())
                .collect::<Vec<_>>()
                .join("; "),
            input,
            entries: Vec::new(),
            selected: None,
            error: None,
            options: options.clone(),
        };
        prompt.refresh();
        prompt
    }

    /// Directory the input currently points into
    ///
    /// Everything up to the last separator, so a fragment such as `.` is
    /// never folded into the directory.
    pub fn directory(&self) -> PathBuf {
        match self.input.rfind(['/', MAIN_SEPARATOR]) {
            Some(idx) => expand_home(&self.input[..=idx]),
            None => PathBuf::from("."),
        }
    }

    /// File name fragment typed after the last separator
    fn fragment(&self) -> &str {
        match self.input.rfind(['/', MAIN_SEPARATOR]) {
            Some(idx) => &self.input[idx + 1..],
            None => &self.input,
        }
    }

    /// Re-read the directory listing for the current input
    pub fn refresh(&mut self) {
        let fragment = self.fragment().to_lowercase();
        let show_hidden = fragment.starts_with('.');

        let mut entries: Vec<DirEntry> = match std::fs::read_dir(self.directory()) {
            Ok(read_dir) => read_dir
                .flatten()
                .filter_map(|entry| {
                    let name = entry.file_name().to_string_lossy().into_owned();
                    let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
                    if name.starts_with('.') && !show_hidden {
                        return None;
                    }
                    if !name.to_lowercase().starts_with(&fragment) {
                        return None;
                    }
                    if !is_dir && !self.options.accepts(Path::new(&name)) {
                        return None;
                    }
                    Some(DirEntry { name, is_dir })
                })
                .collect(),
            Err(e) => {
                tracing::debug!("Cannot list {:?}: {}", self.directory(), e);
                Vec::new()
            }
        };

        entries.sort_by(|a, b| {
            b.is_dir
                .cmp(&a.is_dir)
                .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        });
        entries.truncate(MAX_ENTRIES);

        self.entries = entries;
        self.selected = None;
    }

    pub fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> Outcome<PathBuf> {
        match code {
            KeyCode::Esc => return Outcome::Dismissed,
            KeyCode::Enter => return self.confirm(),
            KeyCode::Up => {
                self.selected = match self.selected {
                    None | Some(0) => self.entries.len().checked_sub(1),
                    Some(i) => Some(i - 1),
                };
            }
            KeyCode::Down => {
                self.selected = match self.selected {
                    _ if self.entries.is_empty() => None,
                    Some(i) if i + 1 < self.entries.len() => Some(i + 1),
                    _ => Some(0),
                };
            }
            KeyCode::Tab => self.complete(),
            KeyCode::Backspace => {
                self.input.pop();
                self.error = None;
                self.refresh();
            }
            KeyCode::Char(c) if !modifiers.contains(KeyModifiers::CONTROL) => {
                self.input.push(c);
                self.error = None;
                self.refresh();
            }
            _ => {}
        }
        Outcome::Pending
    }

    /// Append pasted text, dropping line breaks
    pub fn paste(&mut self, text: &str) {
        self.input
            .extend(text.chars().filter(|c| *c != '\n' && *c != '\r'));
        self.error = None;
        self.refresh();
    }

    /// Replace the typed fragment with the selected (or only) entry
    fn complete(&mut self) {
        let entry = match (self.selected, self.entries.len()) {
            (Some(i), _) => self.entries.get(i).cloned(),
            (None, 1) => self.entries.first().cloned(),
            _ => None,
        };
        if let Some(entry) = entry {
            self.descend_into(&entry);
        }
    }

    fn descend_into(&mut self, entry: &DirEntry) {
        let cut = self.input.len() - self.fragment().len();
        self.input.truncate(cut);
        self.input.push_str(&entry.name);
        if entry.is_dir {
            self.input.push(MAIN_SEPARATOR);
        }
        self.refresh();
    }

    fn confirm(&mut self) -> Outcome<PathBuf> {
        if let Some(entry) = self.selected.and_then(|i| self.entries.get(i)).cloned() {
            self.descend_into(&entry);
            if entry.is_dir {
                return Outcome::Pending;
            }
        }

        if self.input.trim().is_empty() {
            return Outcome::Pending;
        }

        let path = expand_home(&self.input);
        if path.is_dir() {
            if !self.input.ends_with(['/', MAIN_SEPARATOR]) {
                self.input.push(MAIN_SEPARATOR);
                self.refresh();
            }
            return Outcome::Pending;
        }

        match self.kind {
            PromptKind::Open if !path.is_file() => {
                self.error = Some(format!("No such file: {}", path.display()));
                Outcome::Pending
            }
            PromptKind::Open if !self.options.accepts(&path) => {
                self.error = Some(format!("Not a {}: {}", self.filter_label, path.display()));
                Outcome::Pending
            }
            PromptKind::Open => Outcome::Done(path),
            PromptKind::Save => Outcome::Done(self.options.normalize_save_path(&path)),
        }
    }
}

fn with_trailing_separator(path: &Path) -> String {
    let mut s = path.display().to_string();
    if !s.ends_with(['/', MAIN_SEPARATOR]) {
        s.push(MAIN_SEPARATOR);
    }
    s
}

fn expand_home(input: &str) -> PathBuf {
    match (input.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(input),
    }
}

/// Button selection for a message box
#[derive(Debug, Clone)]
pub struct ButtonRow {
    pub buttons: Vec<String>,
    pub selected: usize,
    cancel_id: Option<usize>,
}

impl ButtonRow {
    pub fn new(options: &MessageBoxOptions) -> Self {
        Self {
            buttons: options.buttons.clone(),
            selected: options
                .default_id
                .min(options.buttons.len().saturating_sub(1)),
            cancel_id: options.cancel_id,
        }
    }

    /// `Done` carries the pressed button; closing the box reports the cancel button
    pub fn handle_key(&mut self, code: KeyCode) -> Outcome<Option<usize>> {
        let count = self.buttons.len();
        if count == 0 {
            return match code {
                KeyCode::Enter | KeyCode::Esc => Outcome::Done(self.cancel_id),
                _ => Outcome::Pending,
            };
        }

        match code {
            KeyCode::Left | KeyCode::BackTab => {
                self.selected = (self.selected + count - 1) % count;
            }
            KeyCode::Right | KeyCode::Tab => {
                self.selected = (self.selected + 1) % count;
            }
            KeyCode::Enter => return Outcome::Done(Some(self.selected)),
            KeyCode::Esc => return Outcome::Done(self.cancel_id),
            KeyCode::Char(c) => {
                let wanted = c.to_lowercase().next();
                if let Some(idx) = self
                    .buttons
                    .iter()
                    .position(|b| b.chars().next().and_then(|f| f.to_lowercase().next()) == wanted)
                {
                    return Outcome::Done(Some(idx));
                }
            }
            _ => {}
        }
        Outcome::Pending
    }
}

/// [`Dialogs`] implementation drawing modal overlays on the terminal
pub struct TerminalDialogs {
    terminal: SharedTerminal,
    /// Last frame of the main screen, painted under the dialog
    backdrop: Option<Buffer>,
}

impl TerminalDialogs {
    pub fn new(terminal: SharedTerminal) -> Self {
        Self {
            terminal,
            backdrop: None,
        }
    }

    pub fn set_backdrop(&mut self, backdrop: Buffer) {
        self.backdrop = Some(backdrop);
    }

    fn run_path_prompt(&mut self, mut prompt: PathPrompt) -> Option<PathBuf> {
        loop {
            let drawn = {
                let mut terminal = self.terminal.borrow_mut();
                terminal
                    .draw(|f| {
                        super::ui::paint_backdrop(f, self.backdrop.as_ref());
                        super::ui::render_path_prompt(f, &prompt);
                    })
                    .map(|_| ())
            };
            if let Err(e) = drawn {
                tracing::error!("Failed to draw file dialog: {}", e);
                return None;
            }

            let outcome = match next_input() {
                Some(Input::Key(key)) => prompt.handle_key(key.code, key.modifiers),
                Some(Input::Paste(text)) => {
                    prompt.paste(&text);
                    Outcome::Pending
                }
                Some(Input::Other) => Outcome::Pending,
                None => Outcome::Dismissed,
            };

            match outcome {
                Outcome::Pending => {}
                Outcome::Done(path) => return Some(path),
                Outcome::Dismissed => return None,
            }
        }
    }
}

enum Input {
    Key(KeyEvent),
    Paste(String),
    Other,
}

/// Block for the next terminal event; `None` if the terminal failed
fn next_input() -> Option<Input> {
    match event::read() {
        Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => Some(Input::Key(key)),
        Ok(Event::Paste(text)) => Some(Input::Paste(text)),
        Ok(_) => Some(Input::Other),
        Err(e) => {
            tracing::error!("Failed to read terminal event: {}", e);
            None
        }
    }
}

impl Dialogs for TerminalDialogs {
    fn show_open_dialog(
        &mut self,
        parent: &WindowHandle,
        options: &FileDialogOptions,
    ) -> Option<PathBuf> {
        tracing::debug!("Open dialog '{}' over '{}'", options.title, parent.title);
        self.run_path_prompt(PathPrompt::new(PromptKind::Open, options))
    }

    fn show_save_dialog(
        &mut self,
        parent: &WindowHandle,
        options: &FileDialogOptions,
    ) -> Option<PathBuf> {
        tracing::debug!("Save dialog '{}' over '{}'", options.title, parent.title);
        self.run_path_prompt(PathPrompt::new(PromptKind::Save, options))
    }

    fn show_message_box(
        &mut self,
        parent: &WindowHandle,
        options: &MessageBoxOptions,
    ) -> Option<usize> {
        tracing::debug!("Message box '{}' over '{}'", options.title, parent.title);
        let mut row = ButtonRow::new(options);

        loop {
            let drawn = {
                let mut terminal = self.terminal.borrow_mut();
                terminal
                    .draw(|f| {
                        super::ui::paint_backdrop(f, self.backdrop.as_ref());
                        super::ui::render_message_box(f, options, &row);
                    })
                    .map(|_| ())
            };
            if let Err(e) = drawn {
                tracing::error!("Failed to draw message box: {}", e);
                return options.cancel_id;
            }

            match next_input() {
                Some(Input::Key(key)) => match row.handle_key(key.code) {
                    Outcome::Pending => {}
                    Outcome::Done(response) => return response,
                    Outcome::Dismissed => return options.cancel_id,
                },
                Some(_) => {}
                None => return options.cancel_id,
            }
        }
    }
}
