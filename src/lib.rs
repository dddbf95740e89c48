pub mod app;
pub mod cli;
pub mod dialog;
pub mod document;
pub mod export;
pub mod file;
pub mod tui;
pub mod util;

pub use app::config::Config;
pub use document::{DocumentError, DocumentManager, DocumentResult};
