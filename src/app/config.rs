use crate::app::keybindings::KeybindingsConfig;
use crate::dialog::FileFilter;
use crate::document::DocumentSettings;
use crate::export::pdf::Rgb;
use crate::export::view::MarkdownView;
use crate::export::{MarginsType, PageSize, PrintOptions};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Application configuration (saved to config/settings.toml)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub files: FilesConfig,
    pub export: ExportConfig,
    pub dialogs: DialogConfig,
    pub keybindings: KeybindingsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Directory pickers start in when the document has no path yet
    pub default_directory: PathBuf,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            default_directory: crate::util::paths::resolve_default_document_directory(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilesConfig {
    pub filter_name: String,
    /// Extensions without the leading dot; the first is appended to bare save names
    pub extensions: Vec<String>,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            filter_name: "markdown file".to_string(),
            extensions: vec!["md".to_string()],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub filter_name: String,
    pub margins_type: MarginsType,
    pub page_size: PageSize,
    pub landscape: bool,
    pub print_background: bool,
    pub font_size: f32,
    /// Space between the print margin and the text, in points
    pub padding: f32,
    /// Page fill as `#rrggbb`, used when `print_background` is on
    pub background: String,
    /// Text colour as `#rrggbb`
    pub foreground: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        let print = PrintOptions::default();
        Self {
            filter_name: "pdf file".to_string(),
            margins_type: print.margins_type,
            page_size: print.page_size,
            landscape: print.landscape,
            print_background: print.print_background,
            font_size: MarkdownView::DEFAULT_FONT_SIZE,
            padding: MarkdownView::DEFAULT_PADDING,
            background: "#ffffff".to_string(),
            foreground: "#000000".to_string(),
        }
    }
}

impl ExportConfig {
    pub fn print_options(&self) -> PrintOptions {
        PrintOptions {
            margins_type: self.margins_type,
            print_background: self.print_background,
            landscape: self.landscape,
            page_size: self.page_size,
        }
    }

    /// Printable view of `source` with the configured font, padding and colours
    pub fn markdown_view(&self, source: impl Into<String>) -> MarkdownView {
        MarkdownView::new(source)
            .with_font_size(self.font_size)
            .with_padding(self.padding)
            .with_colors(
                Rgb::from_hex(&self.background).unwrap_or(Rgb::WHITE),
                Rgb::from_hex(&self.foreground).unwrap_or(Rgb::BLACK),
            )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DialogConfig {
    /// Pause before the save picker opens after the unsaved-changes prompt
    pub save_prompt_delay_ms: u64,
}

impl Default for DialogConfig {
    fn default() -> Self {
        Self {
            save_prompt_delay_ms: 100,
        }
    }
}

impl Config {
    /// Load configuration from settings.toml, falling back to defaults when absent
    pub fn load() -> anyhow::Result<Self> {
        let config_path = crate::util::paths::get_app_config_path()?;
        let config = Self::load_from(&config_path)?;

        if let Err(errors) = crate::app::settings::validate_config(&config) {
            return Err(anyhow::anyhow!(
                "Invalid configuration: {}",
                errors
                    .iter()
                    .map(|e| e.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            ));
        }

        Ok(config)
    }

    /// Save configuration to settings.toml
    pub fn save(&self) -> anyhow::Result<()> {
        if let Err(errors) = crate::app::settings::validate_config(self) {
            return Err(anyhow::anyhow!(
                "Cannot save invalid config: {}",
                errors
                    .iter()
                    .map(|e| e.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            ));
        }

        let config_path = crate::util::paths::get_app_config_path()?;
        self.save_to(&config_path)
    }

    /// Settings for the document manager
    pub fn document_settings(&self) -> DocumentSettings {
        DocumentSettings {
            document_filter: FileFilter {
                name: self.files.filter_name.clone(),
                extensions: self.files.extensions.clone(),
            },
            export_filter: FileFilter::new(self.export.filter_name.clone(), &["pdf"]),
            default_directory: Some(self.general.default_directory.clone()),
            print_options: self.export.print_options(),
            save_prompt_delay: Duration::from_millis(self.dialogs.save_prompt_delay_ms),
        }
    }

    fn load_from(path: &std::path::Path) -> anyhow::Result<Self> {
        use anyhow::Context;

        if path.exists() {
            let content = std::fs::read_to_string(path)
                .context(format!("Failed to read {:?}", path))?;
            let config: Config =
                toml::from_str(&content).context(format!("Failed to parse {:?}", path))?;
            Ok(config)
        } else {
            tracing::info!("Config not found at {:?}, using defaults", path);
            Ok(Self::default())
        }
    }

    fn save_to(&self, path: &std::path::Path) -> anyhow::Result<()> {
        use anyhow::Context;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;

        // Atomic write using temp file + rename
        let temp_path = path.with_extension("toml.tmp");
        std::fs::write(&temp_path, &content).context("Failed to write temp config file")?;
        std::fs::rename(&temp_path, path).context("Failed to rename temp config file")?;

        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serial_test::serial;

    fn create_test_config_toml() -> &'static str {
        r#"
[general]
default_directory = "/home/user/notes"

[files]
filter_name = "notes"
extensions = ["md", "markdown"]

[export]
filter_name = "portable document"
margins_type = "minimum"
page_size = "letter"
landscape = false
print_background = false
font_size = 12.5

[dialogs]
save_prompt_delay_ms = 0
"#
    }

    #[test]
    fn test_config_default_values() {
        let config = Config::default();

        assert_eq!(config.files.filter_name, "markdown file");
        assert_eq!(config.files.extensions, vec!["md"]);
        assert_eq!(config.export.filter_name, "pdf file");
        assert_eq!(config.export.margins_type, MarginsType::None);
        assert_eq!(config.export.page_size, PageSize::A4);
        assert!(config.export.landscape);
        assert!(config.export.print_background);
        assert_eq!(config.dialogs.save_prompt_delay_ms, 100);
    }

    #[test]
    fn test_config_load_missing_file_uses_default() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_path = temp_dir.path().join("nonexistent.toml");

        let config = Config::load_from(&config_path).unwrap();
        assert_eq!(config.files.extensions, vec!["md"]);
        assert_eq!(config.export.font_size, 11.0);
    }

    #[test]
    fn test_config_load_valid_toml() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_path = temp_dir.path().join("settings.toml");
        std::fs::write(&config_path, create_test_config_toml()).unwrap();

        let config = Config::load_from(&config_path).unwrap();

        assert_eq!(config.general.default_directory, PathBuf::from("/home/user/notes"));
        assert_eq!(config.files.filter_name, "notes");
        assert_eq!(config.files.extensions, vec!["md", "markdown"]);
        assert_eq!(config.export.margins_type, MarginsType::Minimum);
        assert_eq!(config.export.page_size, PageSize::Letter);
        assert!(!config.export.landscape);
        assert!(!config.export.print_background);
        assert_eq!(config.export.font_size, 12.5);
        assert_eq!(config.dialogs.save_prompt_delay_ms, 0);
    }

    #[test]
    fn test_config_partial_toml_fills_defaults() {
        let config: Config = toml::from_str("[export]\nlandscape = false\n").unwrap();

        assert!(!config.export.landscape);
        assert_eq!(config.export.page_size, PageSize::A4);
        assert_eq!(config.files.extensions, vec!["md"]);
        assert_eq!(config.dialogs.save_prompt_delay_ms, 100);
    }

    #[test]
    fn test_config_load_invalid_toml_fails() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_path = temp_dir.path().join("settings.toml");
        std::fs::write(&config_path, "this is not valid toml [[[").unwrap();

        assert!(Config::load_from(&config_path).is_err());
    }

    #[test]
    fn test_config_save_load_roundtrip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_path = temp_dir.path().join("settings.toml");

        let mut config = Config::default();
        config.export.page_size = PageSize::A5;
        config.files.extensions = vec!["markdown".to_string()];
        config.save_to(&config_path).unwrap();

        let loaded = Config::load_from(&config_path).unwrap();
        assert_eq!(loaded.export.page_size, PageSize::A5);
        assert_eq!(loaded.files.extensions, vec!["markdown"]);
        assert!(!config_path.with_extension("toml.tmp").exists());
    }

    #[test]
    fn test_document_settings_from_config() {
        let mut config = Config::default();
        config.dialogs.save_prompt_delay_ms = 250;
        config.export.landscape = false;

        let settings = config.document_settings();
        assert_eq!(settings.document_filter.name, "markdown file");
        assert_eq!(settings.export_filter.extensions, vec!["pdf"]);
        assert_eq!(settings.save_prompt_delay, Duration::from_millis(250));
        assert!(!settings.print_options.landscape);
        assert_eq!(
            settings.default_directory,
            Some(config.general.default_directory.clone())
        );
    }

    #[test]
    #[serial]
    fn test_load_and_save_use_config_directory() {
        let temp_dir = tempfile::tempdir().unwrap();
        crate::util::paths::set_config_dir_override(Some(temp_dir.path().to_path_buf()));

        let mut config = Config::load().unwrap();
        config.export.font_size = 14.0;
        config.save().unwrap();

        let reloaded = Config::load().unwrap();
        crate::util::paths::set_config_dir_override(None);

        assert_eq!(reloaded.export.font_size, 14.0);
        assert!(temp_dir.path().join("settings.toml").exists());
    }

    #[test]
    fn test_save_rejects_invalid_config() {
        let mut config = Config::default();
        config.files.extensions.clear();
        assert!(config.save().is_err());
    }
}
