use crate::export::RenderError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during document file operations
#[derive(Error, Debug)]
pub enum DocumentError {
    /// Failed to read the document from disk
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to write the document or an export to disk
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Rendering the view for export failed
    #[error("Failed to render PDF: {0}")]
    Render(#[from] RenderError),
}

/// Result type for document operations
pub type DocumentResult<T> = Result<T, DocumentError>;

impl DocumentError {
    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }

    /// True if the underlying I/O error was a missing file
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Read { source, .. } | Self::Write { source, .. } => {
                source.kind() == std::io::ErrorKind::NotFound
            }
            Self::Render(_) => false,
        }
    }
}
