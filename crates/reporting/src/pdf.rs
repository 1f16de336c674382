//! Minimal single-page PDF 1.4 writer.
//!
//! Only what receipts and certificates need: lines of Helvetica text at a
//! given size, left-aligned or centred, flowing down an A4 page. Text outside
//! printable ASCII is replaced with `?`.

const PAGE_WIDTH: f32 = 595.0;
const PAGE_HEIGHT: f32 = 842.0;
const MARGIN: f32 = 50.0;
/// Average Helvetica glyph width as a fraction of the font size.
const GLYPH_WIDTH: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

#[derive(Debug, Clone)]
struct Line {
    text: String,
    size: f32,
    align: Align,
    y: f32,
}

/// Builds one page of text, top to bottom.
#[derive(Debug, Clone)]
pub struct PdfPage {
    lines: Vec<Line>,
    cursor: f32,
}

impl Default for PdfPage {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfPage {
    pub fn new() -> Self {
        Self {
            lines: Vec::new(),
            cursor: PAGE_HEIGHT - MARGIN,
        }
    }

    /// Writes a line and moves the cursor below it.
    pub fn text(&mut self, text: impl AsRef<str>, size: f32, align: Align) -> &mut Self {
        self.cursor -= size * 1.2;
        self.lines.push(Line {
            text: sanitize(text.as_ref()),
            size,
            align,
            y: self.cursor,
        });
        self
    }

    /// Leaves `lines` blank lines of 12pt text.
    pub fn gap(&mut self, lines: u8) -> &mut Self {
        self.cursor -= 14.4 * f32::from(lines);
        self
    }

    fn content_stream(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            let x = match line.align {
                Align::Left => MARGIN,
                Align::Center => {
                    let width = line.text.chars().count() as f32 * line.size * GLYPH_WIDTH;
                    ((PAGE_WIDTH - width) / 2.0).max(MARGIN)
                }
            };
            out.push_str(&format!(
                "BT /F1 {:.1} Tf {:.1} {:.1} Td ({}) Tj ET\n",
                line.size,
                x,
                line.y,
                escape(&line.text)
            ));
        }
        out
    }

    /// Serializes the page into a complete PDF document.
    pub fn render(&self) -> Vec<u8> {
        let content = self.content_stream();
        let objects = [
            "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
            "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
            format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {PAGE_WIDTH:.0} {PAGE_HEIGHT:.0}] \
                 /Resources << /Font << /F1 4 0 R >> >> /Contents 5 0 R >>"
            ),
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
                .to_string(),
            format!(
                "<< /Length {} >>\nstream\n{}endstream",
                content.len(),
                content
            ),
        ];

        let mut out = b"%PDF-1.4\n".to_vec();
        let mut offsets = Vec::with_capacity(objects.len());
        for (i, body) in objects.iter().enumerate() {
            offsets.push(out.len());
            out.extend_from_slice(format!("{} 0 obj\n{}\nendobj\n", i + 1, body).as_bytes());
        }

        let xref = out.len();
        let mut trailer = format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
        for offset in offsets {
            trailer.push_str(&format!("{offset:010} 00000 n \n"));
        }
        trailer.push_str(&format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
            objects.len() + 1,
            xref
        ));
        out.extend_from_slice(trailer.as_bytes());
        out
    }
}

fn sanitize(text: &str) -> String {
    text.chars()
        .map(|c| if (' '..='~').contains(&c) { c } else { '?' })
        .collect()
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '(' | ')' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
