//! PDF export
//!
//! A [`RenderTarget`] prints the current view to paginated PDF bytes. The
//! document manager only sees the trait; [`view::MarkdownView`] is the
//! implementation the editor uses, built from [`layout`] (markdown to
//! positioned lines) and [`pdf`] (serialization).

pub mod layout;
pub mod pdf;
pub mod view;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Points per millimetre
const PT_PER_MM: f32 = 72.0 / 25.4;

/// Errors that can occur while rendering a view to PDF
#[derive(Error, Debug)]
pub enum RenderError {
    /// The markdown source could not be parsed
    #[error("Failed to parse markdown: {0}")]
    Markdown(String),

    /// Margins and padding leave no room for text
    #[error("Page too small: printable area {width:.1}x{height:.1}pt")]
    PageTooSmall { width: f32, height: f32 },

    /// Font size outside the supported range
    #[error("Invalid font size: {0}")]
    InvalidFontSize(f32),
}

/// Page margins around the printable area
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarginsType {
    /// About one centimetre on every side
    Default,
    /// No margins
    #[default]
    None,
    /// The smallest margin printers generally support
    Minimum,
}

impl MarginsType {
    /// Margin width in points
    pub fn points(&self) -> f32 {
        match self {
            MarginsType::Default => 10.0 * PT_PER_MM,
            MarginsType::None => 0.0,
            MarginsType::Minimum => 18.0,
        }
    }
}

/// Paper sizes
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum PageSize {
    A3,
    #[default]
    A4,
    A5,
    Legal,
    Letter,
    Tabloid,
}

impl PageSize {
    /// Portrait (width, height) in points
    pub fn portrait_points(&self) -> (f32, f32) {
        match self {
            PageSize::A3 => (842.0, 1191.0),
            PageSize::A4 => (595.0, 842.0),
            PageSize::A5 => (420.0, 595.0),
            PageSize::Legal => (612.0, 1008.0),
            PageSize::Letter => (612.0, 792.0),
            PageSize::Tabloid => (792.0, 1224.0),
        }
    }
}

/// Options passed to [`RenderTarget::print_to_pdf`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PrintOptions {
    pub margins_type: MarginsType,
    pub print_background: bool,
    pub landscape: bool,
    pub page_size: PageSize,
}

impl Default for PrintOptions {
    fn default() -> Self {
        Self {
            margins_type: MarginsType::None,
            print_background: true,
            landscape: true,
            page_size: PageSize::A4,
        }
    }
}

impl PrintOptions {
    /// Page (width, height) in points, with landscape applied
    pub fn page_dimensions(&self) -> (f32, f32) {
        let (w, h) = self.page_size.portrait_points();
        if self.landscape { (h, w) } else { (w, h) }
    }
}

/// Something that can be printed to a fixed-layout document
pub trait RenderTarget {
    fn print_to_pdf(&self, options: &PrintOptions) -> Result<Vec<u8>, RenderError>;
}

impl<T: RenderTarget + ?Sized> RenderTarget for &T {
    fn print_to_pdf(&self, options: &PrintOptions) -> Result<Vec<u8>, RenderError> {
        (**self).print_to_pdf(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_print_options() {
        let options = PrintOptions::default();
        assert_eq!(options.margins_type, MarginsType::None);
        assert!(options.print_background);
        assert!(options.landscape);
        assert_eq!(options.page_size, PageSize::A4);
    }

    #[test]
    fn test_landscape_swaps_dimensions() {
        let mut options = PrintOptions::default();
        assert_eq!(options.page_dimensions(), (842.0, 595.0));

        options.landscape = false;
        assert_eq!(options.page_dimensions(), (595.0, 842.0));
    }

    #[test]
    fn test_margins_points() {
        assert_eq!(MarginsType::None.points(), 0.0);
        assert_eq!(MarginsType::Minimum.points(), 18.0);
        assert!((MarginsType::Default.points() - 28.35).abs() < 0.01);
    }

    #[test]
    fn test_page_size_cli_names() {
        use clap::ValueEnum;
        assert_eq!(PageSize::from_str("A4", true), Ok(PageSize::A4));
        assert_eq!(PageSize::from_str("letter", false), Ok(PageSize::Letter));
        assert!(PageSize::from_str("b5", true).is_err());
    }

    #[test]
    fn test_print_options_toml_names() {
        let options: PrintOptions = toml::from_str(
            r#"
margins_type = "minimum"
print_background = false
landscape = false
page_size = "letter"
"#,
        )
        .unwrap();
        assert_eq!(options.margins_type, MarginsType::Minimum);
        assert_eq!(options.page_size, PageSize::Letter);
        assert!(!options.print_background);
    }

    #[test]
    fn test_render_error_display() {
        let err = RenderError::PageTooSmall {
            width: 10.0,
            height: 20.0,
        };
        assert_eq!(err.to_string(), "Page too small: printable area 10.0x20.0pt");

        let err = RenderError::InvalidFontSize(0.0);
        assert_eq!(err.to_string(), "Invalid font size: 0");
    }
}
