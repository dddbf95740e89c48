use super::config::Config;
use crate::export::pdf::Rgb;

/// Smallest and largest base font size accepted for PDF export
pub const FONT_SIZE_RANGE: std::ops::RangeInclusive<f32> = 4.0..=72.0;
/// Longest accepted pause before the save picker, in milliseconds
pub const MAX_SAVE_PROMPT_DELAY_MS: u64 = 5000;
/// Widest accepted view padding, in points (two inches)
pub const MAX_PADDING: f32 = 144.0;

/// Validation errors for configuration
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// No document extensions configured
    NoDocumentExtensions,
    /// Extension is empty or starts with a dot
    MalformedExtension(String),
    /// Export font size outside FONT_SIZE_RANGE
    FontSizeOutOfRange(f32),
    /// Save prompt delay above MAX_SAVE_PROMPT_DELAY_MS
    SavePromptDelayTooLong(u64),
    /// Export padding negative or above MAX_PADDING
    PaddingOutOfRange(f32),
    /// Export colour is not `#rrggbb`
    InvalidColor(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::NoDocumentExtensions => {
                write!(f, "At least one document extension must be configured")
            }
            ValidationError::MalformedExtension(ext) => {
                write!(
                    f,
                    "Extension '{}' is invalid: use a non-empty name without the leading dot",
                    ext
                )
            }
            ValidationError::FontSizeOutOfRange(size) => {
                write!(
                    f,
                    "Export font size {} is outside {}..={}",
                    size,
                    FONT_SIZE_RANGE.start(),
                    FONT_SIZE_RANGE.end()
                )
            }
            ValidationError::SavePromptDelayTooLong(ms) => {
                write!(
                    f,
                    "Save prompt delay {}ms exceeds the {}ms limit",
                    ms, MAX_SAVE_PROMPT_DELAY_MS
                )
            }
            ValidationError::PaddingOutOfRange(padding) => {
                write!(
                    f,
                    "Export padding {} is outside 0..={}",
                    padding, MAX_PADDING
                )
            }
            ValidationError::InvalidColor(color) => {
                write!(f, "Colour '{}' is invalid: use #rrggbb", color)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Validate configuration, collecting every problem
pub fn validate_config(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.files.extensions.is_empty() {
        errors.push(ValidationError::NoDocumentExtensions);
    }
    for ext in &config.files.extensions {
        if ext.trim().is_empty() || ext.starts_with('.') {
            errors.push(ValidationError::MalformedExtension(ext.clone()));
        }
    }

    if !FONT_SIZE_RANGE.contains(&config.export.font_size) {
        errors.push(ValidationError::FontSizeOutOfRange(config.export.font_size));
    }

    if !(0.0..=MAX_PADDING).contains(&config.export.padding) {
        errors.push(ValidationError::PaddingOutOfRange(config.export.padding));
    }
    for color in [&config.export.background, &config.export.foreground] {
        if Rgb::from_hex(color).is_none() {
            errors.push(ValidationError::InvalidColor(color.clone()));
        }
    }

    if config.dialogs.save_prompt_delay_ms > MAX_SAVE_PROMPT_DELAY_MS {
        errors.push(ValidationError::SavePromptDelayTooLong(
            config.dialogs.save_prompt_delay_ms,
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
