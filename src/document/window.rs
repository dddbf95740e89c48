use crate::dialog::WindowHandle;

/// The window that owns the live editor buffer
pub trait EditorWindow {
    /// Current content of the editor
    fn text(&self) -> String;

    /// Handle dialogs are anchored to
    fn handle(&self) -> WindowHandle;
}

/// A window with fixed content, for headless use
#[derive(Debug, Clone, Default)]
pub struct StaticWindow {
    title: String,
    text: String,
}

impl StaticWindow {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            text: String::new(),
        }
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }
}

impl EditorWindow for StaticWindow {
    fn text(&self) -> String {
        self.text.clone()
    }

    fn handle(&self) -> WindowHandle {
        WindowHandle::new(self.title.clone())
    }
}
