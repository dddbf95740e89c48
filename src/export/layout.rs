//! Markdown to positioned lines
//!
//! Parsing produces a flat list of [`Block`]s; [`layout`] wraps them to the
//! printable width and splits them into pages of [`DrawOp`]s. Coordinates
//! are PDF points with the origin at the bottom-left corner of the page.

use super::RenderError;
use markdown::mdast::Node;

/// Line height as a multiple of the font size
const LINE_SPACING: f32 = 1.35;
/// Indentation per nesting level, in multiples of the base font size
const INDENT_EM: f32 = 2.0;
/// Heading sizes relative to the base font size, for depths 1..=6
const HEADING_SCALE: [f32; 6] = [2.0, 1.6, 1.35, 1.2, 1.1, 1.0];

/// The standard fonts used by the PDF writer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    Regular,
    Bold,
    Italic,
    Mono,
}

impl Font {
    pub const ALL: [Font; 4] = [Font::Regular, Font::Bold, Font::Italic, Font::Mono];

    /// Name of the font in the page resource dictionary
    pub fn resource_name(&self) -> &'static str {
        match self {
            Font::Regular => "F1",
            Font::Bold => "F2",
            Font::Italic => "F3",
            Font::Mono => "F4",
        }
    }

    pub fn base_font(&self) -> &'static str {
        match self {
            Font::Regular => "Helvetica",
            Font::Bold => "Helvetica-Bold",
            Font::Italic => "Helvetica-Oblique",
            Font::Mono => "Courier",
        }
    }

    /// Average glyph advance as a fraction of the font size
    fn average_advance(&self) -> f32 {
        match self {
            Font::Mono => 0.6,
            Font::Bold => 0.56,
            Font::Regular | Font::Italic => 0.5,
        }
    }
}

/// A block-level element of the document
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Heading {
        level: u8,
        text: String,
    },
    Paragraph {
        text: String,
        indent: usize,
        quoted: bool,
    },
    ListItem {
        marker: String,
        text: String,
        indent: usize,
        quoted: bool,
    },
    Code {
        text: String,
        indent: usize,
    },
    Rule,
}

/// Drawing operation on a page
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Text {
        x: f32,
        y: f32,
        font: Font,
        size: f32,
        text: String,
    },
    Rule {
        x1: f32,
        x2: f32,
        y: f32,
        width: f32,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageLayout {
    pub ops: Vec<DrawOp>,
}

/// Page geometry and base font size for [`layout`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutSettings {
    pub page_width: f32,
    pub page_height: f32,
    /// Print margin on every side
    pub margin: f32,
    /// The view's own padding inside the margin
    pub padding: f32,
    pub font_size: f32,
}

impl LayoutSettings {
    fn inset(&self) -> f32 {
        self.margin + self.padding
    }

    fn printable_width(&self) -> f32 {
        self.page_width - 2.0 * self.inset()
    }

    fn printable_height(&self) -> f32 {
        self.page_height - 2.0 * self.inset()
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct BlockContext {
    indent: usize,
    quoted: bool,
}

impl BlockContext {
    fn nested(self) -> Self {
        Self {
            indent: self.indent + 1,
            ..self
        }
    }

    fn quoted(self) -> Self {
        Self {
            indent: self.indent + 1,
            quoted: true,
        }
    }
}

/// Parse markdown source into blocks
pub fn parse_blocks(source: &str) -> Result<Vec<Block>, RenderError> {
    let root = markdown::to_mdast(source, &markdown::ParseOptions::gfm())
        .map_err(|e| RenderError::Markdown(e.to_string()))?;

    let mut blocks = Vec::new();
    collect_blocks(&root, BlockContext::default(), &mut blocks);
    Ok(blocks)
}

fn inline_text(node: &Node) -> String {
    node.to_string().replace('\n', " ")
}

fn collect_blocks(node: &Node, ctx: BlockContext, out: &mut Vec<Block>) {
    match node {
        Node::Heading(heading) => out.push(Block::Heading {
            level: heading.depth.clamp(1, 6),
            text: inline_text(node),
        }),
        Node::Paragraph(_) => out.push(Block::Paragraph {
            text: inline_text(node),
            indent: ctx.indent,
            quoted: ctx.quoted,
        }),
        Node::Code(code) => out.push(Block::Code {
            text: code.value.clone(),
            indent: ctx.indent,
        }),
        Node::Html(html) => out.push(Block::Paragraph {
            text: html.value.clone(),
            indent: ctx.indent,
            quoted: ctx.quoted,
        }),
        Node::ThematicBreak(_) => out.push(Block::Rule),
        Node::Blockquote(quote) => {
            for child in &quote.children {
                collect_blocks(child, ctx.quoted(), out);
            }
        }
        Node::List(list) => {
            let start = list.start.unwrap_or(1);
            for (i, item) in list.children.iter().enumerate() {
                let marker = if list.ordered {
                    format!("{}.", start + i as u32)
                } else {
                    "\u{2022}".to_string()
                };
                collect_list_item(item, marker, ctx, out);
            }
        }
        Node::Table(table) => {
            for row in &table.children {
                let cells = row
                    .children()
                    .map(|cells| cells.iter().map(|c| inline_text(c)).collect::<Vec<_>>())
                    .unwrap_or_default();
                out.push(Block::Paragraph {
                    text: cells.join(" | "),
                    indent: ctx.indent,
                    quoted: ctx.quoted,
                });
            }
        }
        other => {
            if let Some(children) = other.children() {
                for child in children {
                    collect_blocks(child, ctx, out);
                }
            }
        }
    }
}

fn collect_list_item(item: &Node, marker: String, ctx: BlockContext, out: &mut Vec<Block>) {
    let children = item.children().map(|c| c.as_slice()).unwrap_or_default();
    let mut rest = children;

    match children.first() {
        Some(first @ Node::Paragraph(_)) => {
            out.push(Block::ListItem {
                marker,
                text: inline_text(first),
                indent: ctx.indent,
                quoted: ctx.quoted,
            });
            rest = &children[1..];
        }
        _ => out.push(Block::ListItem {
            marker,
            text: String::new(),
            indent: ctx.indent,
            quoted: ctx.quoted,
        }),
    }

    for child in rest {
        collect_blocks(child, ctx.nested(), out);
    }
}

/// Accumulates lines into pages, breaking when the cursor reaches the bottom inset
struct Paginator {
    settings: LayoutSettings,
    pages: Vec<PageLayout>,
    current: PageLayout,
    /// Top of the next line
    cursor: f32,
}

impl Paginator {
    fn new(settings: LayoutSettings) -> Self {
        Self {
            settings,
            pages: Vec::new(),
            current: PageLayout::default(),
            cursor: settings.page_height - settings.inset(),
        }
    }

    fn at_page_top(&self) -> bool {
        self.cursor >= self.settings.page_height - self.settings.inset()
    }

    fn new_page(&mut self) {
        let page = std::mem::take(&mut self.current);
        self.pages.push(page);
        self.cursor = self.settings.page_height - self.settings.inset();
    }

    /// Reserve vertical space for one line, breaking the page if needed.
    /// Returns the top of the reserved line.
    fn reserve(&mut self, height: f32) -> f32 {
        if self.cursor - height < self.settings.inset() && !self.at_page_top() {
            self.new_page();
        }
        let top = self.cursor;
        self.cursor -= height;
        top
    }

    fn gap(&mut self, height: f32) {
        if !self.at_page_top() {
            self.cursor -= height;
        }
    }

    fn text_line(&mut self, x: f32, font: Font, size: f32, text: String) {
        let top = self.reserve(size * LINE_SPACING);
        if text.is_empty() {
            return;
        }
        self.current.ops.push(DrawOp::Text {
            x,
            y: top - size,
            font,
            size,
            text,
        });
    }

    fn rule(&mut self) {
        let height = self.settings.font_size * LINE_SPACING;
        let top = self.reserve(height);
        let left = self.settings.inset();
        self.current.ops.push(DrawOp::Rule {
            x1: left,
            x2: self.settings.page_width - left,
            y: top - height / 2.0,
            width: 0.75,
        });
    }

    fn finish(mut self) -> Vec<PageLayout> {
        if !self.current.ops.is_empty() || self.pages.is_empty() {
            self.pages.push(self.current);
        }
        self.pages
    }
}

/// Number of glyphs that fit in `width` points
fn columns_for(width: f32, font: Font, size: f32) -> usize {
    ((width / (size * font.average_advance())).floor() as usize).max(1)
}

fn wrap(text: &str, columns: usize) -> Vec<String> {
    if text.trim().is_empty() {
        return vec![String::new()];
    }
    textwrap::wrap(text, columns)
        .into_iter()
        .map(|line| line.into_owned())
        .collect()
}

/// Hard-split a line every `columns` characters, keeping leading whitespace
fn chunk(line: &str, columns: usize) -> Vec<String> {
    let chars: Vec<char> = line.chars().collect();
    if chars.is_empty() {
        return vec![String::new()];
    }
    chars
        .chunks(columns)
        .map(|c| c.iter().collect::<String>())
        .collect()
}

/// Lay out blocks into pages
pub fn layout(blocks: &[Block], settings: &LayoutSettings) -> Result<Vec<PageLayout>, RenderError> {
    let size = settings.font_size;
    if !(size.is_finite() && size > 0.0) {
        return Err(RenderError::InvalidFontSize(size));
    }

    let largest_line = size * HEADING_SCALE[0] * LINE_SPACING;
    let min_width = size * Font::Mono.average_advance() * 8.0;
    if settings.printable_width() < min_width || settings.printable_height() < largest_line {
        return Err(RenderError::PageTooSmall {
            width: settings.printable_width().max(0.0),
            height: settings.printable_height().max(0.0),
        });
    }

    let left = settings.inset();
    let full_width = settings.printable_width();
    let indent_width = size * INDENT_EM;
    let block_gap = size * 0.6;

    let mut pages = Paginator::new(*settings);

    for block in blocks {
        match block {
            Block::Heading { level, text } => {
                let scale = HEADING_SCALE[(*level as usize).clamp(1, 6) - 1];
                let heading_size = size * scale;
                pages.gap(heading_size * 0.4);
                let columns = columns_for(full_width, Font::Bold, heading_size);
                for line in wrap(text, columns) {
                    pages.text_line(left, Font::Bold, heading_size, line);
                }
            }
            Block::Paragraph {
                text,
                indent,
                quoted,
            } => {
                let font = if *quoted { Font::Italic } else { Font::Regular };
                let x = left + *indent as f32 * indent_width;
                let width = (full_width - *indent as f32 * indent_width).max(min_width);
                for line in wrap(text, columns_for(width, font, size)) {
                    pages.text_line(x, font, size, line);
                }
            }
            Block::ListItem {
                marker,
                text,
                indent,
                quoted,
            } => {
                let font = if *quoted { Font::Italic } else { Font::Regular };
                let x = left + *indent as f32 * indent_width;
                let hang = (marker.chars().count() + 1) as f32 * size * font.average_advance();
                let width = (full_width - *indent as f32 * indent_width - hang).max(min_width);
                let lines = wrap(text, columns_for(width, font, size));
                for (i, line) in lines.into_iter().enumerate() {
                    if i == 0 {
                        pages.text_line(x, font, size, format!("{} {}", marker, line));
                    } else {
                        pages.text_line(x + hang, font, size, line);
                    }
                }
            }
            Block::Code { text, indent } => {
                let x = left + *indent as f32 * indent_width;
                let width = (full_width - *indent as f32 * indent_width).max(min_width);
                let columns = columns_for(width, Font::Mono, size);
                for source_line in text.lines() {
                    for line in chunk(source_line, columns) {
                        pages.text_line(x, Font::Mono, size, line);
                    }
                }
            }
            Block::Rule => pages.rule(),
        }
        pages.gap(block_gap);
    }

    Ok(pages.finish())
}
