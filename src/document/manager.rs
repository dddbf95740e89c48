use super::error::{DocumentError, DocumentResult};
use super::events::{DocumentEvent, EventHub};
use super::state::DocumentState;
use super::window::EditorWindow;
use crate::dialog::{Dialogs, FileDialogOptions, FileFilter, SaveChoice};
use crate::export::{PrintOptions, RenderTarget};
use crate::file::naming;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::Duration;

/// Settings the document manager needs from the application config
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentSettings {
    /// Filter for open and save pickers
    pub document_filter: FileFilter,
    /// Filter for the export picker
    pub export_filter: FileFilter,
    /// Where pickers start when the document has no path yet
    pub default_directory: Option<PathBuf>,
    pub print_options: PrintOptions,
    /// Pause between the unsaved-changes prompt and the save picker, so the
    /// message box can close first
    pub save_prompt_delay: Duration,
}

impl Default for DocumentSettings {
    fn default() -> Self {
        Self {
            document_filter: FileFilter::new("markdown file", &["md"]),
            export_filter: FileFilter::new("pdf file", &["pdf"]),
            default_directory: None,
            print_options: PrintOptions::default(),
            save_prompt_delay: Duration::from_millis(100),
        }
    }
}

/// Owns the open document's path and snapshot, and runs the
/// open/save/export/reset workflows against the dialog provider and the
/// filesystem.
///
/// Every cancellable operation returns `Ok(None)` when the user dismisses a
/// dialog; in that case nothing was written and the state is unchanged.
pub struct DocumentManager<W, D> {
    window: W,
    dialogs: D,
    settings: DocumentSettings,
    state: DocumentState,
    events: EventHub,
}

impl<W: EditorWindow, D: Dialogs> DocumentManager<W, D> {
    pub fn new(window: W, dialogs: D, settings: DocumentSettings) -> Self {
        Self {
            window,
            dialogs,
            settings,
            state: DocumentState::new(),
            events: EventHub::new(),
        }
    }

    /// Receive `read-file` and `reset-file` events
    pub fn subscribe(&mut self) -> mpsc::Receiver<DocumentEvent> {
        self.events.subscribe()
    }

    pub fn state(&self) -> &DocumentState {
        &self.state
    }

    pub fn settings(&self) -> &DocumentSettings {
        &self.settings
    }

    pub fn window(&self) -> &W {
        &self.window
    }

    pub fn window_mut(&mut self) -> &mut W {
        &mut self.window
    }

    pub fn dialogs(&self) -> &D {
        &self.dialogs
    }

    pub fn dialogs_mut(&mut self) -> &mut D {
        &mut self.dialogs
    }

    /// True if the live editor text diverges from the last-synced snapshot
    pub fn is_unsaved(&self) -> bool {
        self.state.is_dirty(&self.window.text())
    }

    /// Start a new, empty document.
    ///
    /// With unsaved changes the user is asked first: "Don't Save" discards
    /// them, "Save" saves before clearing, "Cancel" (or closing the prompt)
    /// aborts. A cancelled save aborts the reset too.
    pub fn reset_file(&mut self) -> DocumentResult<Option<()>> {
        if self.is_unsaved() {
            let parent = self.window.handle();
            let response = self.dialogs.show_message_box(&parent, &SaveChoice::prompt());

            match SaveChoice::from_response(response) {
                SaveChoice::Cancel => {
                    tracing::debug!("Reset cancelled at unsaved-changes prompt");
                    return Ok(None);
                }
                SaveChoice::DontSave => {
                    tracing::info!("Discarding unsaved changes to {}", self.state.display_name());
                }
                SaveChoice::Save => {
                    if !self.settings.save_prompt_delay.is_zero() {
                        std::thread::sleep(self.settings.save_prompt_delay);
                    }
                    if self.save_file()?.is_none() {
                        tracing::debug!("Reset cancelled: save before reset was dismissed");
                        return Ok(None);
                    }
                }
            }
        }

        self.state.clear();
        tracing::info!("Document reset");
        self.events.emit(DocumentEvent::Reset {
            text: String::new(),
        });
        Ok(Some(()))
    }

    /// Pick a document with the open picker and load it
    pub fn open_file(&mut self) -> DocumentResult<Option<PathBuf>> {
        let mut options = FileDialogOptions::new("open", self.settings.document_filter.clone());
        options.default_path = self
            .state
            .path()
            .and_then(Path::parent)
            .map(Path::to_path_buf)
            .or_else(|| self.settings.default_directory.clone());

        let parent = self.window.handle();
        let Some(path) = self.dialogs.show_open_dialog(&parent, &options) else {
            tracing::debug!("Open dialog dismissed");
            return Ok(None);
        };

        self.read_file(&path)?;
        Ok(Some(path))
    }

    /// Load a document from a known path without asking
    pub fn open_path(&mut self, path: impl AsRef<Path>) -> DocumentResult<()> {
        self.read_file(path.as_ref())
    }

    /// Write the live text to the current path, or ask for one if there is none
    pub fn save_file(&mut self) -> DocumentResult<Option<PathBuf>> {
        match self.state.path().map(Path::to_path_buf) {
            Some(path) => {
                self.write_file(path.clone())?;
                Ok(Some(path))
            }
            None => self.save_as_new_file(),
        }
    }

    /// Ask for a destination and write the live text there
    pub fn save_as_new_file(&mut self) -> DocumentResult<Option<PathBuf>> {
        let mut options = FileDialogOptions::new("save", self.settings.document_filter.clone());
        options.default_path = self
            .state
            .path()
            .map(Path::to_path_buf)
            .or_else(|| self.settings.default_directory.clone());

        let parent = self.window.handle();
        let Some(path) = self.dialogs.show_save_dialog(&parent, &options) else {
            tracing::debug!("Save dialog dismissed");
            return Ok(None);
        };

        self.write_file(path.clone())?;
        Ok(Some(path))
    }

    /// Ask for a destination and print `target` there as PDF.
    ///
    /// The document state is not touched.
    pub fn export_to_pdf<R: RenderTarget + ?Sized>(
        &mut self,
        target: &R,
    ) -> DocumentResult<Option<PathBuf>> {
        let export_ext = self
            .settings
            .export_filter
            .extensions
            .first()
            .cloned()
            .unwrap_or_else(|| "pdf".to_string());

        let mut options = FileDialogOptions::new("save", self.settings.export_filter.clone());
        options.default_path = self
            .state
            .path()
            .map(|p| naming::sibling_with_extension(p, &export_ext))
            .or_else(|| self.settings.default_directory.clone());

        let parent = self.window.handle();
        let Some(path) = self.dialogs.show_save_dialog(&parent, &options) else {
            tracing::debug!("Export dialog dismissed");
            return Ok(None);
        };

        let bytes = target.print_to_pdf(&self.settings.print_options).map_err(|e| {
            tracing::error!("Rendering for export to {:?} failed: {}", path, e);
            DocumentError::from(e)
        })?;
        std::fs::write(&path, &bytes).map_err(|e| {
            tracing::error!("Failed to write export {:?}: {}", path, e);
            DocumentError::write(&path, e)
        })?;

        tracing::info!("Exported {} bytes to {:?}", bytes.len(), path);
        Ok(Some(path))
    }

    fn read_file(&mut self, path: &Path) -> DocumentResult<()> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            tracing::error!("Failed to read {:?}: {}", path, e);
            DocumentError::read(path, e)
        })?;

        tracing::info!("Opened {:?} ({} bytes)", path, text.len());
        self.state.sync(path.to_path_buf(), text.clone());
        self.events.emit(DocumentEvent::FileRead { text });
        Ok(())
    }

    fn write_file(&mut self, path: PathBuf) -> DocumentResult<()> {
        let text = self.window.text();
        std::fs::write(&path, &text).map_err(|e| {
            tracing::error!("Failed to write {:?}: {}", path, e);
            DocumentError::write(&path, e)
        })?;

        tracing::info!("Saved {:?} ({} bytes)", path, text.len());
        self.state.sync(path, text);
        Ok(())
    }
}
