pub mod config;
pub mod keybindings;
pub mod settings;
