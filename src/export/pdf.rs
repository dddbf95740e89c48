//! Minimal PDF 1.4 writer for laid-out pages
//!
//! Output uses only the standard Type 1 fonts with WinAnsiEncoding, so no
//! font data is embedded. Characters outside that encoding print as `?`.

use super::layout::{DrawOp, Font, PageLayout};

/// RGB colour with components in 0.0..=1.0
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb(pub f32, pub f32, pub f32);

impl Rgb {
    pub const WHITE: Rgb = Rgb(1.0, 1.0, 1.0);
    pub const BLACK: Rgb = Rgb(0.0, 0.0, 0.0);

    /// Parse `#rrggbb`; the leading `#` is optional
    pub fn from_hex(hex: &str) -> Option<Rgb> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .ok()
                .map(|v| f32::from(v) / 255.0)
        };
        Some(Rgb(channel(0)?, channel(2)?, channel(4)?))
    }
}

/// Page-level drawing parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageStyle {
    pub width: f32,
    pub height: f32,
    /// Fill behind the content, when the background is printed
    pub background: Option<Rgb>,
    pub foreground: Rgb,
}

/// Serialize pages into a complete PDF document
pub fn write_document(pages: &[PageLayout], style: &PageStyle) -> Vec<u8> {
    let mut writer = ObjectWriter::new();

    // Fixed object numbers: 1 catalog, 2 page tree, 3.. fonts, then page/content pairs
    let font_base = 3;
    let first_page = font_base + Font::ALL.len();
    let page_ids: Vec<usize> = (0..pages.len()).map(|i| first_page + 2 * i).collect();

    writer.object(1, b"<< /Type /Catalog /Pages 2 0 R >>");

    let kids = page_ids
        .iter()
        .map(|id| format!("{} 0 R", id))
        .collect::<Vec<_>>()
        .join(" ");
    writer.object(
        2,
        format!("<< /Type /Pages /Kids [{}] /Count {} >>", kids, pages.len()).as_bytes(),
    );

    for (i, font) in Font::ALL.iter().enumerate() {
        writer.object(
            font_base + i,
            format!(
                "<< /Type /Font /Subtype /Type1 /BaseFont /{} /Encoding /WinAnsiEncoding >>",
                font.base_font()
            )
            .as_bytes(),
        );
    }

    let font_resources = Font::ALL
        .iter()
        .enumerate()
        .map(|(i, font)| format!("/{} {} 0 R", font.resource_name(), font_base + i))
        .collect::<Vec<_>>()
        .join(" ");

    for (page, &page_id) in pages.iter().zip(&page_ids) {
        let content_id = page_id + 1;
        writer.object(
            page_id,
            format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {} {}] /Resources << /Font << {} >> >> /Contents {} 0 R >>",
                number(style.width),
                number(style.height),
                font_resources,
                content_id
            )
            .as_bytes(),
        );

        let content = content_stream(page, style);
        let mut stream = format!("<< /Length {} >>\nstream\n", content.len()).into_bytes();
        stream.extend_from_slice(&content);
        stream.extend_from_slice(b"\nendstream");
        writer.object(content_id, &stream);
    }

    writer.finish()
}

fn content_stream(page: &PageLayout, style: &PageStyle) -> Vec<u8> {
    let mut out = Vec::new();

    if let Some(Rgb(r, g, b)) = style.background {
        out.extend_from_slice(
            format!(
                "{} {} {} rg\n0 0 {} {} re f\n",
                number(r),
                number(g),
                number(b),
                number(style.width),
                number(style.height)
            )
            .as_bytes(),
        );
    }

    let Rgb(r, g, b) = style.foreground;
    let colour = format!("{} {} {}", number(r), number(g), number(b));
    out.extend_from_slice(format!("{} rg\n{} RG\n", colour, colour).as_bytes());

    for op in &page.ops {
        match op {
            DrawOp::Text {
                x,
                y,
                font,
                size,
                text,
            } => {
                out.extend_from_slice(
                    format!(
                        "BT /{} {} Tf {} {} Td ",
                        font.resource_name(),
                        number(*size),
                        number(*x),
                        number(*y)
                    )
                    .as_bytes(),
                );
                out.push(b'(');
                out.extend_from_slice(&escape_text(text));
                out.extend_from_slice(b") Tj ET\n");
            }
            DrawOp::Rule { x1, x2, y, width } => {
                out.extend_from_slice(
                    format!(
                        "{} w {} {} m {} {} l S\n",
                        number(*width),
                        number(*x1),
                        number(*y),
                        number(*x2),
                        number(*y)
                    )
                    .as_bytes(),
                );
            }
        }
    }

    out
}

/// Format a coordinate with at most two decimals and no trailing zeros
fn number(value: f32) -> String {
    let formatted = format!("{:.2}", value);
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    match trimmed {
        "" | "-0" => "0".to_string(),
        other => other.to_string(),
    }
}

/// Encode text as WinAnsi bytes inside a PDF literal string
fn escape_text(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len());
    for ch in text.chars() {
        let byte = win_ansi(ch).unwrap_or(b'?');
        if matches!(byte, b'(' | b')' | b'\\') {
            out.push(b'\\');
        }
        out.push(byte);
    }
    out
}

fn win_ansi(ch: char) -> Option<u8> {
    let code = ch as u32;
    match code {
        0x20..=0x7E => Some(code as u8),
        0xA0..=0xFF => Some(code as u8),
        _ => match ch {
            '\t' => Some(b' '),
            '\u{20AC}' => Some(0x80),
            '\u{2026}' => Some(0x85),
            '\u{2018}' => Some(0x91),
            '\u{2019}' => Some(0x92),
            '\u{201C}' => Some(0x93),
            '\u{201D}' => Some(0x94),
            '\u{2022}' => Some(0x95),
            '\u{2013}' => Some(0x96),
            '\u{2014}' => Some(0x97),
            '\u{2122}' => Some(0x99),
            _ => None,
        },
    }
}

/// Tracks byte offsets of numbered objects for the cross-reference table
struct ObjectWriter {
    buf: Vec<u8>,
    offsets: Vec<(usize, usize)>,
}

impl ObjectWriter {
    fn new() -> Self {
        // Binary comment marks the file as 8-bit
        let mut buf = b"%PDF-1.4\n".to_vec();
        buf.extend_from_slice(&[b'%', 0xE2, 0xE3, 0xCF, 0xD3, b'\n']);
        Self {
            buf,
            offsets: Vec::new(),
        }
    }

    fn object(&mut self, id: usize, body: &[u8]) {
        self.offsets.push((id, self.buf.len()));
        self.buf.extend_from_slice(format!("{} 0 obj\n", id).as_bytes());
        self.buf.extend_from_slice(body);
        self.buf.extend_from_slice(b"\nendobj\n");
    }

    fn finish(mut self) -> Vec<u8> {
        self.offsets.sort_by_key(|(id, _)| *id);
        let size = self.offsets.last().map(|(id, _)| id + 1).unwrap_or(1);

        let xref_offset = self.buf.len();
        self.buf
            .extend_from_slice(format!("xref\n0 {}\n0000000000 65535 f \n", size).as_bytes());

        let mut next = 1;
        for (id, offset) in &self.offsets {
            // Gaps in numbering are written as free entries
            while next < *id {
                self.buf.extend_from_slice(b"0000000000 65535 f \n");
                next += 1;
            }
            self.buf
                .extend_from_slice(format!("{:010} 00000 n \n", offset).as_bytes());
            next += 1;
        }

        self.buf.extend_from_slice(
            format!(
                "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
                size, xref_offset
            )
            .as_bytes(),
        );
        self.buf
    }
}
