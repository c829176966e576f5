//! A minimal PDF writer for certificates.
//!
//! Produces a single A4 landscape page using the standard Helvetica fonts,
//! so no font data is embedded. Text is WinAnsi encoded; a character outside
//! Latin-1 fails the render rather than being dropped from the page. Images
//! are not embedded: the logo falls back to its initials and the signature
//! to a signature line.

use std::fmt::Write;

use credence_common::views::CertificateStatus;

use super::{CertificateLayout, RenderError, Rgb, Theme};

const PAGE_WIDTH: f32 = 842.0;
const PAGE_HEIGHT: f32 = 595.0;
const MARGIN: f32 = 28.0;
const DESCRIPTION_WRAP: usize = 100;
const DESCRIPTION_MAX_LINES: usize = 3;
const TEXT_INSET: f32 = 60.0;
const MIN_FITTED_SIZE: f32 = 8.0;

const WHITE: Rgb = Rgb(255, 255, 255);
const RULE: Rgb = Rgb(209, 213, 219);
const REVOKED: Rgb = Rgb(220, 110, 110);

#[derive(Debug, Clone, Copy)]
enum Font {
    Regular,
    Bold,
    Italic,
}

impl Font {
    fn resource(self) -> &'static str {
        match self {
            Font::Regular => "F1",
            Font::Bold => "F2",
            Font::Italic => "F3",
        }
    }

    /// Average glyph advance as a fraction of the font size.
    fn advance(self) -> f32 {
        match self {
            Font::Regular | Font::Italic => 0.52,
            Font::Bold => 0.58,
        }
    }

    fn width(self, size: f32, text: &str) -> f32 {
        text.chars().count() as f32 * size * self.advance()
    }
}

/// Encode text as a PDF literal string, parentheses included.
fn literal(text: &str) -> Result<String, RenderError> {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('(');
    for c in text.chars() {
        match c {
            '(' | ')' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            ' '..='~' => out.push(c),
            '\u{a0}'..='\u{ff}' => write!(out, "\\{:03o}", c as u32)?,
            _ => return Err(RenderError::UnsupportedCharacter(c)),
        }
    }
    out.push(')');
    Ok(out)
}

fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        if !line.is_empty() && line.chars().count() + 1 + word.chars().count() > width {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

#[derive(Default)]
struct Canvas {
    ops: String,
}

impl Canvas {
    fn fill_color(&mut self, color: Rgb) -> std::fmt::Result {
        let (r, g, b) = color.unit();
        writeln!(self.ops, "{r:.3} {g:.3} {b:.3} rg")
    }

    fn stroke_color(&mut self, color: Rgb) -> std::fmt::Result {
        let (r, g, b) = color.unit();
        writeln!(self.ops, "{r:.3} {g:.3} {b:.3} RG")
    }

    fn fill_rect(&mut self, color: Rgb, x: f32, y: f32, w: f32, h: f32) -> std::fmt::Result {
        self.fill_color(color)?;
        writeln!(self.ops, "{x:.2} {y:.2} {w:.2} {h:.2} re f")
    }

    fn stroke_rect(
        &mut self,
        color: Rgb,
        line_width: f32,
        x: f32,
        y: f32,
        w: f32,
        h: f32,
    ) -> std::fmt::Result {
        self.stroke_color(color)?;
        writeln!(self.ops, "{line_width:.2} w {x:.2} {y:.2} {w:.2} {h:.2} re S")
    }

    fn line(&mut self, color: Rgb, x1: f32, y1: f32, x2: f32, y2: f32) -> std::fmt::Result {
        self.stroke_color(color)?;
        writeln!(self.ops, "1 w {x1:.2} {y1:.2} m {x2:.2} {y2:.2} l S")
    }

    fn fill_circle(&mut self, color: Rgb, cx: f32, cy: f32, r: f32) -> std::fmt::Result {
        // Four cubic Bezier arcs.
        let k = r * 0.552_284_8;
        self.fill_color(color)?;
        writeln!(self.ops, "{:.2} {:.2} m", cx + r, cy)?;
        writeln!(
            self.ops,
            "{:.2} {:.2} {:.2} {:.2} {:.2} {:.2} c",
            cx + r, cy + k, cx + k, cy + r, cx, cy + r
        )?;
        writeln!(
            self.ops,
            "{:.2} {:.2} {:.2} {:.2} {:.2} {:.2} c",
            cx - k, cy + r, cx - r, cy + k, cx - r, cy
        )?;
        writeln!(
            self.ops,
            "{:.2} {:.2} {:.2} {:.2} {:.2} {:.2} c",
            cx - r, cy - k, cx - k, cy - r, cx, cy - r
        )?;
        writeln!(
            self.ops,
            "{:.2} {:.2} {:.2} {:.2} {:.2} {:.2} c f",
            cx + k, cy - r, cx + r, cy - k, cx + r, cy
        )
    }

    fn text(
        &mut self,
        font: Font,
        size: f32,
        color: Rgb,
        x: f32,
        y: f32,
        text: &str,
    ) -> Result<(), RenderError> {
        let encoded = literal(text)?;
        self.fill_color(color)?;
        writeln!(
            self.ops,
            "BT /{} {size:.1} Tf {x:.2} {y:.2} Td {encoded} Tj ET",
            font.resource(),
        )?;
        Ok(())
    }

    fn text_centered_at(
        &mut self,
        font: Font,
        size: f32,
        color: Rgb,
        cx: f32,
        y: f32,
        text: &str,
    ) -> Result<(), RenderError> {
        let x = cx - font.width(size, text) / 2.0;
        self.text(font, size, color, x, y, text)
    }

    fn text_centered(
        &mut self,
        font: Font,
        size: f32,
        color: Rgb,
        y: f32,
        text: &str,
    ) -> Result<(), RenderError> {
        self.text_centered_at(font, size, color, PAGE_WIDTH / 2.0, y, text)
    }

    /// Centred text set at `size`, or smaller if it would not fit between
    /// the page's text insets.
    fn text_fitted(
        &mut self,
        font: Font,
        size: f32,
        color: Rgb,
        y: f32,
        text: &str,
    ) -> Result<(), RenderError> {
        self.text_centered(font, fitted_size(font, size, text), color, y, text)
    }
}

fn fitted_size(font: Font, size: f32, text: &str) -> f32 {
    let available = PAGE_WIDTH - 2.0 * TEXT_INSET;
    let width = font.width(size, text);
    if width <= available {
        size
    } else {
        (size * available / width).max(MIN_FITTED_SIZE)
    }
}

fn draw(layout: &CertificateLayout, theme: Theme) -> Result<String, RenderError> {
    let mut c = Canvas::default();

    c.fill_rect(theme.paper, 0.0, 0.0, PAGE_WIDTH, PAGE_HEIGHT)?;
    if theme.ornate {
        c.stroke_rect(theme.primary, 3.0, 18.0, 18.0, PAGE_WIDTH - 36.0, PAGE_HEIGHT - 36.0)?;
        c.stroke_rect(
            theme.accent,
            1.0,
            MARGIN,
            MARGIN,
            PAGE_WIDTH - 2.0 * MARGIN,
            PAGE_HEIGHT - 2.0 * MARGIN,
        )?;
    } else {
        c.fill_rect(theme.accent, 0.0, PAGE_HEIGHT - 10.0, PAGE_WIDTH, 10.0)?;
    }

    // Header
    c.fill_circle(theme.primary, 90.0, 500.0, 34.0)?;
    c.text_centered_at(Font::Bold, 24.0, WHITE, 90.0, 492.0, &layout.logo_initials)?;
    c.text_centered(Font::Bold, 30.0, theme.primary, 490.0, layout.heading)?;
    c.line(RULE, 50.0, 455.0, PAGE_WIDTH - 50.0, 455.0)?;

    // Body
    c.text_centered(Font::Italic, 16.0, theme.muted, 425.0, layout.awarded_to)?;
    c.text_fitted(Font::Bold, 32.0, theme.primary, 385.0, &layout.recipient)?;
    c.text_centered(Font::Italic, 16.0, theme.muted, 352.0, layout.completion_line)?;
    c.text_fitted(Font::Bold, 24.0, theme.accent, 318.0, &layout.program)?;

    let mut y = 290.0;
    if let Some(description) = &layout.description {
        for line in wrap(description, DESCRIPTION_WRAP)
            .iter()
            .take(DESCRIPTION_MAX_LINES)
        {
            c.text_centered(Font::Regular, 12.0, theme.muted, y, line)?;
            y -= 16.0;
        }
    }

    if !layout.metrics.is_empty() {
        const BOX_W: f32 = 150.0;
        const BOX_H: f32 = 40.0;
        const GAP: f32 = 12.0;

        let n = layout.metrics.len() as f32;
        let total = n * BOX_W + (n - 1.0) * GAP;
        let top = y - 8.0;
        let mut x = (PAGE_WIDTH - total) / 2.0;
        for metric in &layout.metrics {
            c.fill_rect(theme.panel, x, top - BOX_H, BOX_W, BOX_H)?;
            let cx = x + BOX_W / 2.0;
            c.text_centered_at(Font::Regular, 9.0, theme.muted, cx, top - 14.0, metric.label)?;
            c.text_centered_at(Font::Bold, 13.0, theme.primary, cx, top - 32.0, &metric.value)?;
            x += BOX_W + GAP;
        }
    }

    // Dates and signatory
    c.text(Font::Regular, 13.0, theme.muted, 60.0, 150.0, &layout.date_range)?;
    c.text(Font::Regular, 13.0, theme.muted, 60.0, 132.0, &layout.duration)?;

    let sig_x = PAGE_WIDTH - 160.0;
    c.line(RULE, sig_x - 80.0, 160.0, sig_x + 80.0, 160.0)?;
    c.text_centered_at(Font::Bold, 12.0, Rgb(31, 41, 55), sig_x, 144.0, &layout.signatory_name)?;
    c.text_centered_at(
        Font::Regular,
        10.0,
        theme.muted,
        sig_x,
        130.0,
        &layout.signatory_position,
    )?;

    // Footer band
    let band_y = MARGIN + 2.0;
    c.fill_rect(theme.primary, MARGIN + 2.0, band_y, PAGE_WIDTH - 2.0 * MARGIN - 4.0, 56.0)?;
    c.text(Font::Bold, 12.0, WHITE, 48.0, band_y + 24.0, &layout.footer_uid)?;
    c.text_centered(Font::Regular, 8.0, WHITE, band_y + 30.0, "Scan or visit to verify")?;
    c.text_fitted(Font::Regular, 9.0, WHITE, band_y + 16.0, &layout.qr_payload)?;
    let site_x = PAGE_WIDTH - 48.0 - Font::Bold.width(12.0, &layout.site_label);
    c.text(Font::Bold, 12.0, WHITE, site_x, band_y + 24.0, &layout.site_label)?;

    if layout.status == CertificateStatus::Revoked {
        c.text_centered(Font::Bold, 72.0, REVOKED, 230.0, "REVOKED")?;
    }

    Ok(c.ops)
}

/// Lay `layout` out as a one-page PDF.
pub fn render(layout: &CertificateLayout, theme: Theme) -> Result<Vec<u8>, RenderError> {
    let content = draw(layout, theme)?;
    let title = format!("Internship Certificate {}", layout.certificate_id);

    let objects = [
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
        format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {PAGE_WIDTH:.0} {PAGE_HEIGHT:.0}] \
             /Resources << /Font << /F1 5 0 R /F2 6 0 R /F3 7 0 R >> >> /Contents 4 0 R >>"
        ),
        format!(
            "<< /Length {} >>\nstream\n{}endstream",
            content.len(),
            content
        ),
        font_object("Helvetica"),
        font_object("Helvetica-Bold"),
        font_object("Helvetica-Oblique"),
        format!(
            "<< /Title {} /Subject {} /Producer (credence) >>",
            literal(&title)?,
            literal(&layout.qr_payload)?
        ),
    ];

    let mut out = String::from("%PDF-1.4\n");
    let mut offsets = Vec::with_capacity(objects.len());
    for (i, body) in objects.iter().enumerate() {
        offsets.push(out.len());
        write!(out, "{} 0 obj\n{}\nendobj\n", i + 1, body)?;
    }

    let xref_at = out.len();
    write!(out, "xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1)?;
    for offset in offsets {
        write!(out, "{offset:010} 00000 n \n")?;
    }
    write!(
        out,
        "trailer\n<< /Size {} /Root 1 0 R /Info {} 0 R >>\nstartxref\n{}\n%%EOF\n",
        objects.len() + 1,
        objects.len(),
        xref_at
    )?;

    Ok(out.into_bytes())
}

fn font_object(base: &str) -> String {
    format!("<< /Type /Font /Subtype /Type1 /BaseFont /{base} /Encoding /WinAnsiEncoding >>")
}
