//! Dialog seam used by the document manager
//!
//! Every dialog is a blocking call that returns an optional result: `None`
//! means the user dismissed the dialog. The terminal front end implements
//! [`Dialogs`] with modal overlays; [`preset::PresetDialogs`] answers from a
//! fixed script for headless use.

pub mod preset;

use crate::file::naming;
use std::path::{Path, PathBuf};

/// Handle of the window a dialog is anchored to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowHandle {
    pub title: String,
}

impl WindowHandle {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }
}

/// A named group of file extensions shown by file pickers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFilter {
    pub name: String,
    /// Extensions without the leading dot
    pub extensions: Vec<String>,
}

impl FileFilter {
    pub fn new(name: impl Into<String>, extensions: &[&str]) -> Self {
        Self {
            name: name.into(),
            extensions: extensions.iter().map(|e| e.to_string()).collect(),
        }
    }

    pub fn matches(&self, path: &Path) -> bool {
        naming::has_extension(path, &self.extensions)
    }

    pub fn ensure_extension(&self, path: &Path) -> PathBuf {
        naming::ensure_extension(path, &self.extensions)
    }

    /// Human-readable label, e.g. `markdown file (*.md)`
    pub fn label(&self) -> String {
        let patterns = self
            .extensions
            .iter()
            .map(|e| format!("*.{}", e))
            .collect::<Vec<_>>()
            .join(", ");
        format!("{} ({})", self.name, patterns)
    }
}

/// Options for open and save pickers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDialogOptions {
    pub title: String,
    pub filters: Vec<FileFilter>,
    /// Initial file or directory shown by the picker
    pub default_path: Option<PathBuf>,
}

impl FileDialogOptions {
    pub fn new(title: impl Into<String>, filter: FileFilter) -> Self {
        Self {
            title: title.into(),
            filters: vec![filter],
            default_path: None,
        }
    }

    pub fn with_default_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.default_path = Some(path.into());
        self
    }

    /// True if the path is accepted by any filter (or there are no filters)
    pub fn accepts(&self, path: &Path) -> bool {
        self.filters.is_empty() || self.filters.iter().any(|f| f.matches(path))
    }

    /// Apply the first filter's extension the way a native save picker would
    pub fn normalize_save_path(&self, path: &Path) -> PathBuf {
        if self.accepts(path) {
            return path.to_path_buf();
        }
        match self.filters.first() {
            Some(filter) => filter.ensure_extension(path),
            None => path.to_path_buf(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Question,
    Warning,
    Error,
}

/// Options for a message box with a row of buttons
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageBoxOptions {
    pub title: String,
    pub kind: MessageKind,
    pub message: String,
    pub buttons: Vec<String>,
    /// Button focused when the box opens
    pub default_id: usize,
    /// Button reported when the box is closed without a choice
    pub cancel_id: Option<usize>,
}

/// Answer to the "file has changes" question
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveChoice {
    Save,
    Cancel,
    DontSave,
}

impl SaveChoice {
    pub const BUTTONS: [&'static str; 3] = ["Save", "Cancel", "Don't Save"];

    /// Map a message box response to a choice. A closed box or an unknown
    /// button counts as Cancel.
    pub fn from_response(response: Option<usize>) -> Self {
        match response {
            Some(0) => SaveChoice::Save,
            Some(2) => SaveChoice::DontSave,
            _ => SaveChoice::Cancel,
        }
    }

    /// Options for the three-way unsaved-changes prompt
    pub fn prompt() -> MessageBoxOptions {
        MessageBoxOptions {
            title: "alert".to_string(),
            kind: MessageKind::Question,
            message: "file has changes, do you want to save them?".to_string(),
            buttons: Self::BUTTONS.iter().map(|b| b.to_string()).collect(),
            default_id: 0,
            cancel_id: Some(1),
        }
    }
}

/// Blocking dialog provider
pub trait Dialogs {
    /// Single-file open picker. Returns the chosen file.
    fn show_open_dialog(
        &mut self,
        parent: &WindowHandle,
        options: &FileDialogOptions,
    ) -> Option<PathBuf>;

    /// Save picker. Returns the chosen destination.
    fn show_save_dialog(
        &mut self,
        parent: &WindowHandle,
        options: &FileDialogOptions,
    ) -> Option<PathBuf>;

    /// Message box. Returns the index of the pressed button.
    fn show_message_box(
        &mut self,
        parent: &WindowHandle,
        options: &MessageBoxOptions,
    ) -> Option<usize>;
}

impl<D: Dialogs + ?Sized> Dialogs for Box<D> {
    fn show_open_dialog(
        &mut self,
        parent: &WindowHandle,
        options: &FileDialogOptions,
    ) -> Option<PathBuf> {
        (**self).show_open_dialog(parent, options)
    }

    fn show_save_dialog(
        &mut self,
        parent: &WindowHandle,
        options: &FileDialogOptions,
    ) -> Option<PathBuf> {
        (**self).show_save_dialog(parent, options)
    }

    fn show_message_box(
        &mut self,
        parent: &WindowHandle,
        options: &MessageBoxOptions,
    ) -> Option<usize> {
        (**self).show_message_box(parent, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_choice_from_response() {
        assert_eq!(SaveChoice::from_response(Some(0)), SaveChoice::Save);
        assert_eq!(SaveChoice::from_response(Some(1)), SaveChoice::Cancel);
        assert_eq!(SaveChoice::from_response(Some(2)), SaveChoice::DontSave);
        assert_eq!(SaveChoice::from_response(Some(7)), SaveChoice::Cancel);
        assert_eq!(SaveChoice::from_response(None), SaveChoice::Cancel);
    }

    #[test]
    fn test_prompt_buttons_order() {
        let prompt = SaveChoice::prompt();
        assert_eq!(prompt.buttons, vec!["Save", "Cancel", "Don't Save"]);
        assert_eq!(prompt.kind, MessageKind::Question);
        assert_eq!(prompt.cancel_id, Some(1));
    }

    #[test]
    fn test_filter_label() {
        let filter = FileFilter::new("markdown file", &["md", "markdown"]);
        assert_eq!(filter.label(), "markdown file (*.md, *.markdown)");
    }

    #[test]
    fn test_normalize_save_path_appends_extension() {
        let options = FileDialogOptions::new("save", FileFilter::new("pdf file", &["pdf"]));
        assert_eq!(
            options.normalize_save_path(Path::new("/tmp/out")),
            PathBuf::from("/tmp/out.pdf")
        );
        assert_eq!(
            options.normalize_save_path(Path::new("/tmp/out.PDF")),
            PathBuf::from("/tmp/out.PDF")
        );
    }

    #[test]
    fn test_accepts_without_filters() {
        let options = FileDialogOptions {
            title: "open".to_string(),
            filters: Vec::new(),
            default_path: None,
        };
        assert!(options.accepts(Path::new("anything.bin")));
    }
}
