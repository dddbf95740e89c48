#![allow(dead_code)]

use mdpad::dialog::{Dialogs, FileDialogOptions, MessageBoxOptions, WindowHandle};
use mdpad::document::{DocumentManager, DocumentSettings, EditorWindow};
use mdpad::export::{PrintOptions, RenderError, RenderTarget};
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Initialize logging once for all tests
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// Queued answer for the next dialog
#[derive(Debug, Clone)]
pub enum Answer {
    Open(Option<PathBuf>),
    Save(Option<PathBuf>),
    Message(Option<usize>),
}

/// A dialog the manager asked for
#[derive(Debug, Clone)]
pub enum DialogCall {
    Open(FileDialogOptions),
    Save(FileDialogOptions),
    Message(MessageBoxOptions),
}

/// Dialog provider that replays queued answers and records every call
#[derive(Debug, Default)]
pub struct ScriptedDialogs {
    answers: VecDeque<Answer>,
    pub calls: Vec<DialogCall>,
}

impl ScriptedDialogs {
    pub fn new(answers: impl IntoIterator<Item = Answer>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
            calls: Vec::new(),
        }
    }

    pub fn push(&mut self, answer: Answer) {
        self.answers.push_back(answer);
    }

    pub fn remaining(&self) -> usize {
        self.answers.len()
    }

    pub fn message_calls(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, DialogCall::Message(_)))
            .count()
    }

    pub fn save_calls(&self) -> Vec<&FileDialogOptions> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DialogCall::Save(options) => Some(options),
                _ => None,
            })
            .collect()
    }

    pub fn open_calls(&self) -> Vec<&FileDialogOptions> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DialogCall::Open(options) => Some(options),
                _ => None,
            })
            .collect()
    }
}

impl Dialogs for ScriptedDialogs {
    fn show_open_dialog(
        &mut self,
        _parent: &WindowHandle,
        options: &FileDialogOptions,
    ) -> Option<PathBuf> {
        self.calls.push(DialogCall::Open(options.clone()));
        match self.answers.pop_front() {
            Some(Answer::Open(path)) => path,
            other => panic!("open dialog shown, next answer was {:?}", other),
        }
    }

    fn show_save_dialog(
        &mut self,
        _parent: &WindowHandle,
        options: &FileDialogOptions,
    ) -> Option<PathBuf> {
        self.calls.push(DialogCall::Save(options.clone()));
        match self.answers.pop_front() {
            Some(Answer::Save(path)) => path,
            other => panic!("save dialog shown, next answer was {:?}", other),
        }
    }

    fn show_message_box(
        &mut self,
        _parent: &WindowHandle,
        options: &MessageBoxOptions,
    ) -> Option<usize> {
        self.calls.push(DialogCall::Message(options.clone()));
        match self.answers.pop_front() {
            Some(Answer::Message(response)) => response,
            other => panic!("message box shown, next answer was {:?}", other),
        }
    }
}

/// Editor window holding its text in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryWindow {
    pub text: String,
}

impl MemoryWindow {
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }
}

impl EditorWindow for MemoryWindow {
    fn text(&self) -> String {
        self.text.clone()
    }

    fn handle(&self) -> WindowHandle {
        WindowHandle::new("test window")
    }
}

/// Render target returning fixed bytes or a fixed failure
#[derive(Debug)]
pub struct StubRenderTarget {
    output: Result<Vec<u8>, f32>,
    pub renders: Cell<usize>,
    pub last_options: RefCell<Option<PrintOptions>>,
}

impl StubRenderTarget {
    pub fn ok(bytes: &[u8]) -> Self {
        Self {
            output: Ok(bytes.to_vec()),
            renders: Cell::new(0),
            last_options: RefCell::new(None),
        }
    }

    /// Fails with an invalid font size error
    pub fn failing() -> Self {
        Self {
            output: Err(0.0),
            renders: Cell::new(0),
            last_options: RefCell::new(None),
        }
    }
}

impl RenderTarget for StubRenderTarget {
    fn print_to_pdf(&self, options: &PrintOptions) -> Result<Vec<u8>, RenderError> {
        self.renders.set(self.renders.get() + 1);
        *self.last_options.borrow_mut() = Some(*options);
        match &self.output {
            Ok(bytes) => Ok(bytes.clone()),
            Err(size) => Err(RenderError::InvalidFontSize(*size)),
        }
    }
}

pub type TestManager = DocumentManager<MemoryWindow, ScriptedDialogs>;

/// Settings with no pause before the save picker
pub fn create_test_settings() -> DocumentSettings {
    DocumentSettings {
        save_prompt_delay: Duration::ZERO,
        ..DocumentSettings::default()
    }
}

pub fn create_test_manager(answers: impl IntoIterator<Item = Answer>) -> TestManager {
    DocumentManager::new(
        MemoryWindow::default(),
        ScriptedDialogs::new(answers),
        create_test_settings(),
    )
}

/// Write a file under `dir` and return its path
pub fn write_test_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

pub fn count_occurrences(haystack: &[u8], needle: &[u8]) -> usize {
    haystack.windows(needle.len()).filter(|w| *w == needle).count()
}
