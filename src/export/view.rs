use super::layout::{self, LayoutSettings};
use super::pdf::{self, PageStyle, Rgb};
use super::{PrintOptions, RenderError, RenderTarget};

/// Markdown text as the editor would show it, printable to PDF
#[derive(Debug, Clone)]
pub struct MarkdownView {
    source: String,
    font_size: f32,
    /// Inner padding of the view, applied inside the print margins
    padding: f32,
    background: Rgb,
    foreground: Rgb,
}

impl MarkdownView {
    pub const DEFAULT_FONT_SIZE: f32 = 11.0;
    pub const DEFAULT_PADDING: f32 = 36.0;

    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            font_size: Self::DEFAULT_FONT_SIZE,
            padding: Self::DEFAULT_PADDING,
            background: Rgb::WHITE,
            foreground: Rgb::BLACK,
        }
    }

    pub fn with_font_size(mut self, size: f32) -> Self {
        self.font_size = size;
        self
    }

    pub fn with_padding(mut self, padding: f32) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_colors(mut self, background: Rgb, foreground: Rgb) -> Self {
        self.background = background;
        self.foreground = foreground;
        self
    }
}

impl RenderTarget for MarkdownView {
    fn print_to_pdf(&self, options: &PrintOptions) -> Result<Vec<u8>, RenderError> {
        let (width, height) = options.page_dimensions();
        let settings = LayoutSettings {
            page_width: width,
            page_height: height,
            margin: options.margins_type.points(),
            padding: self.padding,
            font_size: self.font_size,
        };

        let blocks = layout::parse_blocks(&self.source)?;
        let pages = layout::layout(&blocks, &settings)?;
        tracing::debug!(
            "Laid out {} blocks on {} page(s) ({}x{}pt)",
            blocks.len(),
            pages.len(),
            width,
            height
        );

        let style = PageStyle {
            width,
            height,
            background: options.print_background.then_some(self.background),
            foreground: self.foreground,
        };
        Ok(pdf::write_document(&pages, &style))
    }
}
