//! Terminal preview: the raster canvas printed with upper half blocks, each
//! character cell showing two vertically stacked pixels in 24-bit colour.

use std::io::{self, Write};

use super::canvas::Canvas;

const UPPER_HALF_BLOCK: char = '\u{2580}';
const RESET: &str = "\x1b[0m";

/// Print `canvas` scaled to `columns` characters wide.
pub fn write_preview<W: Write>(canvas: &Canvas, columns: u32, out: &mut W) -> io::Result<()> {
    if canvas.width() == 0 || canvas.height() == 0 {
        return out.flush();
    }
    let columns = columns.clamp(1, canvas.width().max(1));
    let step = f64::from(canvas.width()) / f64::from(columns);
    let rows = (f64::from(canvas.height()) / step).floor() as u32;

    let sample = |col: u32, row: u32| {
        let x = (f64::from(col) * step) as u32;
        let y = (f64::from(row) * step) as u32;
        canvas.pixel(x, y)
    };

    for pair in 0..rows.div_ceil(2) {
        for col in 0..columns {
            let top = sample(col, pair * 2).unwrap_or([0, 0, 0]);
            match sample(col, pair * 2 + 1) {
                Some(bottom) if pair * 2 + 1 < rows => write!(
                    out,
                    "\x1b[38;2;{};{};{}m\x1b[48;2;{};{};{}m{}",
                    top[0], top[1], top[2], bottom[0], bottom[1], bottom[2], UPPER_HALF_BLOCK
                )?,
                _ => write!(
                    out,
                    "{}\x1b[38;2;{};{};{}m{}",
                    RESET, top[0], top[1], top[2], UPPER_HALF_BLOCK
                )?,
            }
        }
        writeln!(out, "{}", RESET)?;
    }
    out.flush()
}
