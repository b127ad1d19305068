//! RGB pixel buffer the chart is rasterised into.

use image::RgbImage;

use super::font::{self, GLYPH_HEIGHT};
use super::{Align, Rect, RenderError, Rgb, Surface, WHITE};

pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Canvas {
    /// A white canvas.
    pub fn new(width: u32, height: u32) -> Self {
        Canvas {
            width,
            height,
            pixels: WHITE.repeat(width as usize * height as usize),
        }
    }

    /// Byte offset of pixel `(x, y)`; callers check the bounds.
    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 3
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = self.index(x, y);
        self.pixels
            .get(idx..idx + 3)
            .map(|p| [p[0], p[1], p[2]])
    }

    /// Set one pixel; anything off the canvas is dropped.
    fn put(&mut self, x: i64, y: i64, color: Rgb) {
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            return;
        }
        let idx = self.index(x as u32, y as u32);
        if let Some(p) = self.pixels.get_mut(idx..idx + 3) {
            p.copy_from_slice(&color);
        }
    }

    fn fill_block(&mut self, x: i64, y: i64, size: u32, color: Rgb) {
        for dy in 0..i64::from(size) {
            for dx in 0..i64::from(size) {
                self.put(x + dx, y + dy, color);
            }
        }
    }

    pub fn into_image(self) -> Result<RgbImage, RenderError> {
        let (width, height) = (self.width, self.height);
        RgbImage::from_raw(width, height, self.pixels).ok_or(RenderError::Buffer { width, height })
    }
}

/// Pixel span `[start, end)` covering `[from, to]`, at least one pixel wide.
fn span(from: f64, to: f64) -> (i64, i64) {
    let start = from.round() as i64;
    let end = (to.round() as i64).max(start + 1);
    (start, end)
}

impl Surface for Canvas {
    fn fill_rect(&mut self, rect: Rect, color: Rgb) {
        let finite = [rect.x, rect.y, rect.w, rect.h].iter().all(|v| v.is_finite());
        if !finite || rect.w <= 0.0 || rect.h <= 0.0 {
            return;
        }
        let (x0, x1) = span(rect.x, rect.right());
        let (y0, y1) = span(rect.y, rect.bottom());
        for y in y0..y1 {
            for x in x0..x1 {
                self.put(x, y, color);
            }
        }
    }

    fn hline(&mut self, x0: f64, x1: f64, y: f64, color: Rgb) {
        let (start, end) = span(x0.min(x1), x0.max(x1));
        let y = y.round() as i64;
        for x in start..=end {
            self.put(x, y, color);
        }
    }

    fn vline(&mut self, x: f64, y0: f64, y1: f64, color: Rgb) {
        let (start, end) = span(y0.min(y1), y0.max(y1));
        let x = x.round() as i64;
        for y in start..=end {
            self.put(x, y, color);
        }
    }

    fn text(&mut self, x: f64, y: f64, text: &str, align: Align, scale: u32, color: Rgb) {
        let width = f64::from(font::text_width(text) * scale);
        let left = match align {
            Align::Left => x,
            Align::Center => x - width / 2.0,
            Align::Right => x - width,
        };
        let left = left.round() as i64;
        let top = (y - f64::from(GLYPH_HEIGHT * scale) / 2.0).round() as i64;
        let step = i64::from(font::ADVANCE * scale);

        for (i, c) in text.chars().enumerate() {
            let base_x = left + i as i64 * step;
            for (col, row) in font::lit_pixels(font::glyph(c)) {
                let px = base_x + i64::from(col * scale);
                let py = top + i64::from(row * scale);
                self.fill_block(px, py, scale, color);
            }
        }
    }

    fn vertical_text(&mut self, x: f64, y: f64, text: &str, scale: u32, color: Rgb) {
        let length = f64::from(font::text_width(text) * scale);
        // Reading direction is bottom to top; glyph rows grow rightwards.
        let left = (x - f64::from(GLYPH_HEIGHT * scale) / 2.0).round() as i64;
        let bottom = (y + length / 2.0).round() as i64;
        let step = i64::from(font::ADVANCE * scale);
        let scale_i = i64::from(scale);

        for (i, c) in text.chars().enumerate() {
            let base = i as i64 * step;
            for (col, row) in font::lit_pixels(font::glyph(c)) {
                let along = base + i64::from(col) * scale_i;
                let px = left + i64::from(row) * scale_i;
                let py = bottom - along - scale_i;
                self.fill_block(px, py, scale, color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::BLACK;

    const RED: Rgb = [255, 0, 0];

    fn count(canvas: &Canvas, color: Rgb) -> usize {
        (0..canvas.height())
            .flat_map(|y| (0..canvas.width()).map(move |x| (x, y)))
            .filter(|&(x, y)| canvas.pixel(x, y) == Some(color))
            .count()
    }

    #[test]
    fn starts_white() {
        let canvas = Canvas::new(4, 3);
        assert_eq!(count(&canvas, WHITE), 12);
        assert_eq!(canvas.pixel(4, 0), None);
    }

    #[test]
    fn indexes_wide_canvases_without_overflow() {
        let mut canvas = Canvas::new(70_000, 2);
        canvas.fill_rect(Rect { x: 69_999.0, y: 1.0, w: 1.0, h: 1.0 }, RED);
        assert_eq!(canvas.pixel(69_999, 1), Some(RED));
        assert_eq!(canvas.pixel(69_999, 0), Some(WHITE));
        assert_eq!(canvas.index(69_999, 1), (70_000 + 69_999) * 3);
    }

    #[test]
    fn fills_rounded_rectangles() {
        let mut canvas = Canvas::new(10, 10);
        canvas.fill_rect(Rect { x: 1.4, y: 2.0, w: 3.0, h: 2.2 }, RED);
        assert_eq!(count(&canvas, RED), 6);
        assert_eq!(canvas.pixel(1, 2), Some(RED));
        assert_eq!(canvas.pixel(3, 3), Some(RED));
        assert_eq!(canvas.pixel(4, 2), Some(WHITE));
    }

    #[test]
    fn thin_rectangles_keep_one_pixel() {
        let mut canvas = Canvas::new(10, 10);
        canvas.fill_rect(Rect { x: 5.0, y: 5.0, w: 0.2, h: 0.2 }, RED);
        assert_eq!(count(&canvas, RED), 1);
    }

    #[test]
    fn clips_and_skips_degenerate_rectangles() {
        let mut canvas = Canvas::new(5, 5);
        canvas.fill_rect(Rect { x: -3.0, y: -3.0, w: 5.0, h: 5.0 }, RED);
        assert_eq!(count(&canvas, RED), 4);
        canvas.fill_rect(Rect { x: 1.0, y: 1.0, w: f64::NAN, h: 2.0 }, BLACK);
        canvas.fill_rect(Rect { x: 1.0, y: 1.0, w: 0.0, h: 2.0 }, BLACK);
        assert_eq!(count(&canvas, BLACK), 0);
    }

    #[test]
    fn draws_axis_lines() {
        let mut canvas = Canvas::new(10, 10);
        canvas.hline(7.0, 2.0, 4.0, BLACK);
        canvas.vline(0.0, 0.0, 9.0, RED);
        assert_eq!(count(&canvas, BLACK), 6);
        assert_eq!(count(&canvas, RED), 10);
    }

    #[test]
    fn writes_scaled_text() {
        let mut canvas = Canvas::new(40, 20);
        canvas.text(0.0, 8.0, "-", Align::Left, 2, BLACK);
        // A dash is one row of five font pixels.
        assert_eq!(count(&canvas, BLACK), 5 * 4);
        assert_eq!(canvas.pixel(0, 6), Some(BLACK));
        assert_eq!(canvas.pixel(9, 7), Some(BLACK));
        assert_eq!(canvas.pixel(9, 8), Some(WHITE));
    }

    #[test]
    fn right_aligned_text_ends_at_anchor() {
        let mut canvas = Canvas::new(40, 20);
        canvas.text(20.0, 8.0, "-", Align::Right, 1, BLACK);
        assert_eq!(canvas.pixel(19, 7), Some(BLACK));
        assert_eq!(canvas.pixel(15, 7), Some(BLACK));
        assert_eq!(canvas.pixel(20, 7), Some(WHITE));
    }

    #[test]
    fn vertical_text_is_rotated() {
        let mut canvas = Canvas::new(20, 20);
        canvas.vertical_text(10.0, 10.0, "-", 1, BLACK);
        // The dash becomes a vertical stroke five pixels tall.
        let column: Vec<u32> = (0..20).filter(|&y| canvas.pixel(9, y) == Some(BLACK)).collect();
        assert_eq!(column.len(), 5);
        assert_eq!(count(&canvas, BLACK), 5);
    }

    #[test]
    fn converts_to_image() -> Result<(), RenderError> {
        let mut canvas = Canvas::new(3, 2);
        canvas.fill_rect(Rect { x: 0.0, y: 0.0, w: 1.0, h: 1.0 }, RED);
        let image = canvas.into_image()?;
        assert_eq!(image.dimensions(), (3, 2));
        assert_eq!(image.get_pixel(0, 0).0, RED);
        assert_eq!(image.get_pixel(2, 1).0, WHITE);
        Ok(())
    }
}
