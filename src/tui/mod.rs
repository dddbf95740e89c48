//! Terminal front end

pub mod app;
pub mod dialogs;
pub mod state;
pub mod ui;

pub use app::run_tui;
