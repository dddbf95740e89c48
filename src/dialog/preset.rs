use super::{Dialogs, FileDialogOptions, MessageBoxOptions, WindowHandle};
use std::path::PathBuf;

/// Non-interactive dialog provider that answers from fixed values
///
/// Each picker returns its configured path (or `None` to behave as if the
/// user dismissed it). Save destinations go through the same extension
/// normalization a real save picker applies.
#[derive(Debug, Clone, Default)]
pub struct PresetDialogs {
    pub open_path: Option<PathBuf>,
    pub save_path: Option<PathBuf>,
    pub message_response: Option<usize>,
}

impl PresetDialogs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_open_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.open_path = Some(path.into());
        self
    }

    pub fn with_save_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.save_path = Some(path.into());
        self
    }

    pub fn with_message_response(mut self, response: usize) -> Self {
        self.message_response = Some(response);
        self
    }
}

impl Dialogs for PresetDialogs {
    fn show_open_dialog(
        &mut self,
        parent: &WindowHandle,
        options: &FileDialogOptions,
    ) -> Option<PathBuf> {
        tracing::debug!(
            "Preset open dialog '{}' for window '{}': {:?}",
            options.title,
            parent.title,
            self.open_path
        );
        self.open_path.clone()
    }

    fn show_save_dialog(
        &mut self,
        parent: &WindowHandle,
        options: &FileDialogOptions,
    ) -> Option<PathBuf> {
        let chosen = self
            .save_path
            .as_deref()
            .map(|path| options.normalize_save_path(path));
        tracing::debug!(
            "Preset save dialog '{}' for window '{}': {:?}",
            options.title,
            parent.title,
            chosen
        );
        chosen
    }

    fn show_message_box(
        &mut self,
        parent: &WindowHandle,
        options: &MessageBoxOptions,
    ) -> Option<usize> {
        tracing::debug!(
            "Preset message box '{}' for window '{}': {:?}",
            options.title,
            parent.title,
            self.message_response
        );
        self.message_response.or(options.cancel_id)
    }
}
