use crate::file::naming;
use std::path::{Path, PathBuf};

/// Path and last-synced text of the open document
///
/// `text` is the snapshot taken at the last successful read or write, not
/// the live editor buffer. Comparing the two is the unsaved-changes signal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentState {
    path: Option<PathBuf>,
    text: String,
}

impl DocumentState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn has_path(&self) -> bool {
        self.path.is_some()
    }

    /// True if `live` diverges from the snapshot. A never-touched document
    /// (both empty) is clean.
    pub fn is_dirty(&self, live: &str) -> bool {
        if self.text.is_empty() && live.is_empty() {
            return false;
        }
        self.text != live
    }

    pub fn display_name(&self) -> String {
        naming::display_name(self.path())
    }

    /// Record a successful read or write
    pub(crate) fn sync(&mut self, path: PathBuf, text: String) {
        self.path = Some(path);
        self.text = text;
    }

    pub(crate) fn clear(&mut self) {
        self.path = None;
        self.text.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_clean_and_unnamed() {
        let state = DocumentState::new();
        assert!(!state.has_path());
        assert!(!state.is_dirty(""));
        assert_eq!(state.display_name(), "untitled");
    }

    #[test]
    fn test_dirty_when_live_text_diverges() {
        let mut state = DocumentState::new();
        assert!(state.is_dirty("typed"));

        state.sync(PathBuf::from("/tmp/a.md"), "typed".to_string());
        assert!(!state.is_dirty("typed"));
        assert!(state.is_dirty("typed more"));
        assert!(state.is_dirty(""));
    }

    #[test]
    fn test_clear_resets_both_fields() {
        let mut state = DocumentState::new();
        state.sync(PathBuf::from("/tmp/a.md"), "body".to_string());
        assert_eq!(state.display_name(), "a.md");

        state.clear();
        assert_eq!(state, DocumentState::new());
    }
}
