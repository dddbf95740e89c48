use super::Commands;
use super::error;
use crate::app::config::Config;
use crate::dialog::preset::PresetDialogs;
use crate::document::{DocumentManager, StaticWindow};
use crate::export::PageSize;
use crate::file::naming;
use crate::util::paths;
use anyhow::Result;
use std::path::{Path, PathBuf};

/// Handle a CLI command and return exit code
pub fn handle_command(command: Commands, config: &Config) -> i32 {
    let result = match command {
        Commands::Export {
            input,
            output,
            portrait,
            page_size,
        } => handle_export(&input, output, portrait, page_size, config),
        Commands::InitConfig { force } => handle_init_config(force, config),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            error::ERROR
        }
    }
}

/// Export a markdown file to PDF through the same workflow the editor uses
pub fn handle_export(
    input: &Path,
    output: Option<PathBuf>,
    portrait: bool,
    page_size: Option<PageSize>,
    config: &Config,
) -> Result<i32> {
    let mut settings = config.document_settings();
    if portrait {
        settings.print_options.landscape = false;
    }
    if let Some(size) = page_size {
        settings.print_options.page_size = size;
    }

    let output = output.unwrap_or_else(|| naming::sibling_with_extension(input, "pdf"));
    tracing::info!("Exporting {:?} to {:?}", input, output);

    let dialogs = PresetDialogs::new().with_save_path(&output);
    let mut manager = DocumentManager::new(StaticWindow::new("mdpad export"), dialogs, settings);

    if let Err(e) = manager.open_path(input) {
        eprintln!("Error: {}", e);
        return Ok(error::exit_code_for(&e));
    }
    let text = manager.state().text().to_string();
    manager.window_mut().set_text(text.clone());

    let view = config.export.markdown_view(text);
    match manager.export_to_pdf(&view) {
        Ok(Some(path)) => {
            println!("Exported {} to {}", input.display(), path.display());
            Ok(error::SUCCESS)
        }
        Ok(None) => Ok(error::ERROR),
        Err(e) => {
            eprintln!("Error: {}", e);
            Ok(error::exit_code_for(&e))
        }
    }
}

/// Write the effective settings to settings.toml
pub fn handle_init_config(force: bool, config: &Config) -> Result<i32> {
    let path = paths::get_app_config_path()?;
    if path.exists() && !force {
        eprintln!(
            "Error: {} already exists (use --force to overwrite)",
            path.display()
        );
        return Ok(error::ERROR);
    }

    config.save()?;
    println!("Wrote {}", path.display());
    Ok(error::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_init_config_writes_once_unless_forced() {
        let temp_dir = tempfile::tempdir().unwrap();
        paths::set_config_dir_override(Some(temp_dir.path().to_path_buf()));

        let mut config = Config::default();
        config.export.font_size = 13.0;
        let first = handle_init_config(false, &config).unwrap();
        config.export.font_size = 15.0;
        let second = handle_init_config(false, &config).unwrap();
        let after_second = Config::load().unwrap();
        let forced = handle_init_config(true, &config).unwrap();
        let after_forced = Config::load().unwrap();
        paths::set_config_dir_override(None);

        assert_eq!(first, error::SUCCESS);
        assert_eq!(second, error::ERROR);
        assert_eq!(after_second.export.font_size, 13.0);
        assert_eq!(forced, error::SUCCESS);
        assert_eq!(after_forced.export.font_size, 15.0);
    }

    #[test]
    fn test_missing_input_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let code = handle_export(
            &dir.path().join("absent.md"),
            None,
            false,
            None,
            &Config::default(),
        )
        .unwrap();
        assert_eq!(code, error::NOT_FOUND);
    }

    #[test]
    fn test_default_output_sits_next_to_input() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("doc.md");
        std::fs::write(&input, "# doc\n\nbody").unwrap();

        let code = handle_export(
            &input,
            None,
            true,
            Some(PageSize::Letter),
            &Config::default(),
        )
        .unwrap();
        assert_eq!(code, error::SUCCESS);

        let bytes = std::fs::read(dir.path().join("doc.pdf")).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.4"));
    }
}
