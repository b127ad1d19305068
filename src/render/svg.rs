//! SVG backend. Elements are appended as text and wrapped on [`SvgDocument::finish`].

use super::font::GLYPH_HEIGHT;
use super::{Align, Rect, Rgb, Surface, WHITE};

pub struct SvgDocument {
    width: u32,
    height: u32,
    body: String,
}

fn fill(color: Rgb) -> String {
    format!("rgb({},{},{})", color[0], color[1], color[2])
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

impl SvgDocument {
    pub fn new(width: u32, height: u32) -> Self {
        SvgDocument {
            width,
            height,
            body: String::new(),
        }
    }

    /// Close the document and return its text.
    pub fn finish(self) -> String {
        let mut svg = String::new();
        svg.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        svg.push('\n');
        svg.push_str(&format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = self.width,
            h = self.height
        ));
        svg.push('\n');
        svg.push_str(&format!(
            r#"<rect x="0" y="0" width="{}" height="{}" fill="{}"/>"#,
            self.width,
            self.height,
            fill(WHITE)
        ));
        svg.push('\n');
        svg.push_str(&self.body);
        svg.push_str("</svg>\n");
        svg
    }

    fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, color: Rgb) {
        self.body.push_str(&format!(
            r#"<line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="{}" stroke-width="1"/>"#,
            x1,
            y1,
            x2,
            y2,
            fill(color)
        ));
        self.body.push('\n');
    }
}

impl Surface for SvgDocument {
    fn fill_rect(&mut self, rect: Rect, color: Rgb) {
        let finite = [rect.x, rect.y, rect.w, rect.h].iter().all(|v| v.is_finite());
        if !finite || rect.w <= 0.0 || rect.h <= 0.0 {
            return;
        }
        self.body.push_str(&format!(
            r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="{}"/>"#,
            rect.x,
            rect.y,
            rect.w,
            rect.h,
            fill(color)
        ));
        self.body.push('\n');
    }

    fn hline(&mut self, x0: f64, x1: f64, y: f64, color: Rgb) {
        self.line(x0, y, x1, y, color);
    }

    fn vline(&mut self, x: f64, y0: f64, y1: f64, color: Rgb) {
        self.line(x, y0, x, y1, color);
    }

    fn text(&mut self, x: f64, y: f64, text: &str, align: Align, scale: u32, color: Rgb) {
        let anchor = match align {
            Align::Left => "start",
            Align::Center => "middle",
            Align::Right => "end",
        };
        self.body.push_str(&format!(
            r#"<text x="{:.1}" y="{:.1}" font-family="monospace" font-size="{}" text-anchor="{}" dominant-baseline="central" fill="{}">{}</text>"#,
            x,
            y,
            GLYPH_HEIGHT * scale + 2,
            anchor,
            fill(color),
            escape(text)
        ));
        self.body.push('\n');
    }

    fn vertical_text(&mut self, x: f64, y: f64, text: &str, scale: u32, color: Rgb) {
        self.body.push_str(&format!(
            r#"<text x="{x:.1}" y="{y:.1}" transform="rotate(-90 {x:.1} {y:.1})" font-family="monospace" font-size="{}" text-anchor="middle" dominant-baseline="central" fill="{}">{}</text>"#,
            GLYPH_HEIGHT * scale + 2,
            fill(color),
            escape(text)
        ));
        self.body.push('\n');
    }
}
