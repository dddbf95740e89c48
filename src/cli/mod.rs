use crate::export::PageSize;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod error;
pub mod handler;

/// mdpad - A terminal markdown editor with PDF export
#[derive(Parser, Debug)]
#[command(name = "mdpad")]
#[command(version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// Markdown file to open in the editor
    pub file: Option<PathBuf>,

    /// Override config directory path
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (TRACE level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export a markdown file to PDF without opening the editor
    Export {
        /// Markdown file to export
        input: PathBuf,

        /// Destination (default: INPUT with a .pdf extension)
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Portrait orientation instead of the configured one
        #[arg(long)]
        portrait: bool,

        /// Paper size instead of the configured one
        #[arg(long, value_name = "SIZE", value_enum, ignore_case = true)]
        page_size: Option<PageSize>,
    },

    /// Write the current settings to settings.toml
    InitConfig {
        /// Overwrite an existing settings file
        #[arg(long)]
        force: bool,
    },
}
