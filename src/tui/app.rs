use super::dialogs::{SharedTerminal, TerminalDialogs};
use super::state::{EditorPane, StatusMessage, TuiState, UiMode};
use crate::app::config::{Config, ExportConfig};
use crate::app::keybindings::KeyAction;
use crate::dialog::Dialogs;
use crate::document::{DocumentEvent, DocumentManager, DocumentResult};
use anyhow::Result;
use crossterm::ExecutableCommand;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::event::{DisableBracketedPaste, EnableBracketedPaste};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use std::cell::RefCell;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::mpsc;

/// Spaces inserted for the Tab key
const TAB_WIDTH: usize = 4;

/// Main TUI application
pub struct TuiApp<D: Dialogs = TerminalDialogs> {
    pub state: TuiState,
    pub manager: DocumentManager<EditorPane, D>,
    pub should_quit: bool,
    events: mpsc::Receiver<DocumentEvent>,
    export: ExportConfig,
}

impl<D: Dialogs> TuiApp<D> {
    pub fn new(config: &Config, dialogs: D) -> Self {
        let mut manager = DocumentManager::new(
            EditorPane::new("mdpad"),
            dialogs,
            config.document_settings(),
        );
        let events = manager.subscribe();

        Self {
            state: TuiState::new(&config.keybindings),
            manager,
            should_quit: false,
            events,
            export: config.export.clone(),
        }
    }

    /// Load the file given on the command line
    pub fn open_initial(&mut self, path: &Path) {
        match self.manager.open_path(path) {
            Ok(()) => self.state.set_status(StatusMessage::info(format!(
                "Opened {}",
                self.manager.state().display_name()
            ))),
            Err(e) => {
                tracing::error!("Failed to open {:?}: {}", path, e);
                self.state.set_status(StatusMessage::error(e.to_string()));
            }
        }
        self.drain_events();
    }

    /// Handle a terminal event
    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(KeyEvent {
                code,
                modifiers,
                kind,
                ..
            }) => {
                // Only process key press events, ignore release and repeat
                if kind != KeyEventKind::Press {
                    return;
                }
                match self.state.ui_mode {
                    UiMode::Help => self.state.ui_mode = UiMode::Editing,
                    UiMode::Editing => match self.state.keybindings.resolve(code, modifiers) {
                        Some(action) => self.run_action(action),
                        None => self.handle_edit_key(code, modifiers),
                    },
                }
            }
            Event::Paste(text) => {
                if self.state.ui_mode == UiMode::Editing {
                    tracing::debug!("Paste event received: {} chars", text.len());
                    self.manager.window_mut().buffer.insert_str(&text);
                }
            }
            Event::Resize(width, height) => {
                tracing::debug!("Terminal resized to {}x{}", width, height);
            }
            _ => {}
        }

        self.state.scroll_to_cursor(&self.manager.window().buffer);
        self.state.mark_dirty();
    }

    fn handle_edit_key(&mut self, code: KeyCode, modifiers: KeyModifiers) {
        let page = self.state.viewport_height.max(1);
        let buffer = &mut self.manager.window_mut().buffer;

        match code {
            KeyCode::Char(c)
                if !modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                buffer.insert_char(c)
            }
            KeyCode::Enter => buffer.newline(),
            KeyCode::Tab => buffer.insert_str(&" ".repeat(TAB_WIDTH)),
            KeyCode::Backspace => buffer.backspace(),
            KeyCode::Delete => buffer.delete(),
            KeyCode::Left => buffer.move_left(),
            KeyCode::Right => buffer.move_right(),
            KeyCode::Up => buffer.move_up(1),
            KeyCode::Down => buffer.move_down(1),
            KeyCode::Home => buffer.line_start(),
            KeyCode::End => buffer.line_end(),
            KeyCode::PageUp => buffer.move_up(page),
            KeyCode::PageDown => buffer.move_down(page),
            _ => {}
        }
    }

    /// Run a bound command and report its outcome in the status bar
    pub fn run_action(&mut self, action: KeyAction) {
        tracing::debug!("Running action {:?}", action);

        let outcome: DocumentResult<Option<String>> = match action {
            KeyAction::NewFile => self
                .manager
                .reset_file()
                .map(|done| done.map(|()| "New document".to_string())),
            KeyAction::OpenFile => self
                .manager
                .open_file()
                .map(|path| path.map(|p| format!("Opened {}", p.display()))),
            KeyAction::SaveFile => self
                .manager
                .save_file()
                .map(|path| path.map(|p| format!("Saved {}", p.display()))),
            KeyAction::SaveAsFile => self
                .manager
                .save_as_new_file()
                .map(|path| path.map(|p| format!("Saved {}", p.display()))),
            KeyAction::ExportPdf => {
                let view = self.export.markdown_view(self.manager.window().buffer.text());
                self.manager
                    .export_to_pdf(&view)
                    .map(|path| path.map(|p| format!("Exported {}", p.display())))
            }
            KeyAction::OpenHelp => {
                self.state.ui_mode = UiMode::Help;
                return;
            }
            KeyAction::Quit => {
                self.quit();
                return;
            }
        };

        match outcome {
            Ok(Some(message)) => self.state.set_status(StatusMessage::info(message)),
            Ok(None) => self.state.set_status(StatusMessage::info("Cancelled")),
            Err(e) => {
                tracing::error!("{:?} failed: {}", action, e);
                self.state.set_status(StatusMessage::error(e.to_string()));
            }
        }
        self.drain_events();
    }

    /// Quit, asking about unsaved changes first
    fn quit(&mut self) {
        if !self.manager.is_unsaved() {
            self.should_quit = true;
            return;
        }

        match self.manager.reset_file() {
            Ok(Some(())) => self.should_quit = true,
            Ok(None) => self.state.set_status(StatusMessage::info("Quit cancelled")),
            Err(e) => {
                tracing::error!("Saving before quit failed: {}", e);
                self.state.set_status(StatusMessage::error(e.to_string()));
            }
        }
        self.drain_events();
    }

    /// Apply manager events to the editor buffer
    fn drain_events(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            tracing::debug!("Applying {} event", event.name());
            self.manager.window_mut().buffer.set_text(event.text());
            self.state.reset_scroll();
        }
    }

    /// Record the editor viewport for a terminal of the given size
    pub fn resize(&mut self, width: u16, height: u16) {
        let area = super::ui::editor_area(Rect::new(0, 0, width, height));
        self.state.viewport_height = area.height as usize;
        self.state.viewport_width = area.width as usize;
        self.state.scroll_to_cursor(&self.manager.window().buffer);
    }
}

/// Run the terminal editor until the user quits
pub fn run_tui(config: Config, initial_file: Option<PathBuf>) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    stdout.execute(EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal: SharedTerminal = Rc::new(RefCell::new(Terminal::new(backend)?));

    let mut app = TuiApp::new(&config, TerminalDialogs::new(Rc::clone(&terminal)));
    if let Some(path) = initial_file {
        app.open_initial(&path);
    }

    let result = run_loop(&mut app, &terminal);

    // Cleanup terminal
    let mut terminal = terminal.borrow_mut();
    disable_raw_mode()?;
    terminal.backend_mut().execute(DisableBracketedPaste)?;
    terminal.backend_mut().execute(LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    tracing::info!("Editor closed");
    result
}

fn run_loop(app: &mut TuiApp, terminal: &SharedTerminal) -> Result<()> {
    while !app.should_quit {
        if app.state.needs_redraw() {
            let backdrop = {
                let mut terminal = terminal.borrow_mut();
                let size = terminal.size()?;
                app.resize(size.width, size.height);
                let frame = terminal.draw(|f| super::ui::render(app, f))?;
                frame.buffer.clone()
            };
            app.manager.dialogs_mut().set_backdrop(backdrop);
            app.state.clear_dirty();
        }

        let event = event::read()?;
        app.handle_event(event);
    }
    Ok(())
}
