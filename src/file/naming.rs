use std::path::{Path, PathBuf};

/// Returns true if the path's extension is one of `extensions` (case-insensitive).
///
/// Extensions are given without the leading dot. A path without an extension
/// never matches.
pub fn has_extension(path: &Path, extensions: &[String]) -> bool {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return false;
    };
    extensions.iter().any(|allowed| allowed.eq_ignore_ascii_case(ext))
}

/// Appends the first of `extensions` unless the path already carries one of them.
///
/// Mirrors what native save pickers do when a filter is active: `notes`
/// becomes `notes.md`, while `notes.md` and `NOTES.MD` are left alone.
/// A path with a foreign extension keeps it and gets the new one appended
/// (`notes.txt` becomes `notes.txt.md`).
///
/// # Examples
///
/// ```
/// use std::path::{Path, PathBuf};
/// use mdpad::file::naming::ensure_extension;
///
/// let exts = vec!["md".to_string()];
/// assert_eq!(ensure_extension(Path::new("notes"), &exts), PathBuf::from("notes.md"));
/// assert_eq!(ensure_extension(Path::new("notes.md"), &exts), PathBuf::from("notes.md"));
/// ```
pub fn ensure_extension(path: &Path, extensions: &[String]) -> PathBuf {
    let Some(first) = extensions.first() else {
        return path.to_path_buf();
    };
    if has_extension(path, extensions) {
        return path.to_path_buf();
    }

    let mut name = path.as_os_str().to_os_string();
    name.push(".");
    name.push(first);
    PathBuf::from(name)
}

/// Derive a sibling path with a different extension, e.g. `doc.md` -> `doc.pdf`.
///
/// Used to seed the export picker and as the default output of the headless
/// export command.
pub fn sibling_with_extension(path: &Path, extension: &str) -> PathBuf {
    path.with_extension(extension)
}

/// Display name for a document path: the file name, or "untitled" when there is no path.
pub fn display_name(path: Option<&Path>) -> String {
    path.and_then(|p| p.file_name())
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "untitled".to_string())
}
