//! Two-panel cluster chart: prevalence bars on the left, entropy heat-strip
//! with a colorbar on the right.
//!
//! The chart is described once against the [`Surface`] trait and drawn by
//! either backend: the raster [`canvas::Canvas`] (PNG and friends, and the
//! terminal preview) or [`svg::SvgDocument`].

pub mod canvas;
pub mod colormap;
pub mod font;
pub mod svg;
pub mod terminal;

use std::path::{Path, PathBuf};

use image::ImageFormat;
use log::{debug, info};
use thiserror::Error;

use crate::parse::ClusterRecord;
use canvas::Canvas;
use svg::SvgDocument;

pub type Rgb = [u8; 3];

pub const WHITE: Rgb = [255, 255, 255];
pub const BLACK: Rgb = [0, 0, 0];
const BAR_RED: Rgb = [255, 0, 0];
const GRID_GREY: Rgb = [176, 176, 176];

/// Fraction of a row covered by a percentage bar.
const PERCENT_BAR_HEIGHT: f64 = 0.4;
/// Fraction of a row covered by an entropy cell.
const ENTROPY_BAR_HEIGHT: f64 = 0.8;
const PERCENT_MAJOR_STEP: f64 = 10.0;
const PERCENT_MINOR_STEP: f64 = 5.0;
/// Headroom added past the longest percentage bar.
const PERCENT_MARGIN: f64 = 0.05;
/// Above this many positions every other tick label is left blank.
const DENSE_TICKS: u32 = 8;
/// Number of bands the colorbar gradient is drawn with.
const COLORBAR_STEPS: usize = 101;
const COLORBAR_TICK_STEP: f64 = 0.2;

const DEFAULT_PERCENT_LABEL: &str = "Prefixes";
const POSITION_TITLE: &str = "IPv6 nybble (hex character)";
const CLUSTER_TITLE: &str = "Cluster ID";
const COLORBAR_TITLE: &str = "Median entropy";

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("canvas of {width}x{height} does not match its pixel buffer")]
    Buffer { width: u32, height: u32 },
}

/// Horizontal placement of a text run relative to its anchor point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// Something the chart can be drawn on. Coordinates are pixels with the
/// origin in the top-left corner.
pub trait Surface {
    fn fill_rect(&mut self, rect: Rect, color: Rgb);

    fn hline(&mut self, x0: f64, x1: f64, y: f64, color: Rgb);

    fn vline(&mut self, x: f64, y0: f64, y1: f64, color: Rgb);

    /// Draw `text` on one line, vertically centred on `y`.
    fn text(&mut self, x: f64, y: f64, text: &str, align: Align, scale: u32, color: Rgb);

    /// Draw `text` rotated a quarter turn counter-clockwise, centred on `(x, y)`.
    fn vertical_text(&mut self, x: f64, y: f64, text: &str, scale: u32, color: Rgb);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    /// Rectangle between two corners given in any order.
    pub fn spanning(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Rect {
            x: x0.min(x1),
            y: y0.min(y1),
            w: (x1 - x0).abs(),
            h: (y1 - y0).abs(),
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }
}

/// Everything the renderer needs to know about one chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartView {
    pub records: Vec<ClusterRecord>,
    /// Position label of the first profile entry.
    pub offset: u32,
    /// Number of positions that get a tick.
    pub length: u32,
    /// Prefix of the percentage axis title.
    pub axis_label: Option<String>,
}

impl ChartView {
    pub fn percent_title(&self) -> String {
        format!("{} [%]", self.axis_label.as_deref().unwrap_or(DEFAULT_PERCENT_LABEL))
    }

    /// Rows on the vertical axis; an empty chart still gets one.
    fn rows(&self) -> usize {
        self.records.len().max(1)
    }

    /// Right end of the (inverted) percentage axis.
    fn percent_limit(&self) -> f64 {
        let max = self
            .records
            .iter()
            .map(|r| r.percentage)
            .filter(|p| p.is_finite())
            .fold(0.0_f64, f64::max);
        if max > 0.0 {
            max * (1.0 + PERCENT_MARGIN)
        } else {
            1.0
        }
    }

    /// Number of unit-wide columns the entropy panel spans.
    fn position_span(&self) -> u32 {
        let widest = self.records.iter().map(|r| r.profile.len()).max().unwrap_or(0) as u32;
        widest.max(self.length).max(1)
    }

    /// Tick positions of the entropy panel with their labels. Labels at even
    /// indices are blank once there are more than eight ticks. Positions past
    /// `u32::MAX` are not ticked.
    pub fn position_ticks(&self) -> Vec<(u32, String)> {
        (0..self.length)
            .map_while(|x| self.offset.checked_add(x).map(|position| (x, position)))
            .map(|(x, position)| {
                let label = if self.length > DENSE_TICKS && x % 2 == 0 {
                    String::new()
                } else {
                    position.to_string()
                };
                (position, label)
            })
            .collect()
    }
}

/// Pixel rectangles of the three plot areas for a given figure size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub width: u32,
    pub height: u32,
    pub percent: Rect,
    pub entropy: Rect,
    pub colorbar: Rect,
    /// Integer zoom applied to the bitmap font and tick lengths.
    pub scale: u32,
}

impl Layout {
    // Figure fractions of the plotting area.
    const LEFT: f64 = 0.125;
    const RIGHT: f64 = 0.9;
    const TOP: f64 = 0.12;
    const BOTTOM: f64 = 0.18;
    /// Gap between grid columns, relative to one column.
    const WSPACE: f64 = 0.09;
    const COLUMNS: f64 = 4.0;
    /// Share of the entropy column given to the colorbar, and the gap before it.
    const COLORBAR_FRACTION: f64 = 0.15;
    const COLORBAR_PAD: f64 = 0.02;
    const COLORBAR_ASPECT: f64 = 20.0;
    /// Figure height the font is designed for.
    const BASE_HEIGHT: u32 = 300;

    pub fn new(width: u32, height: u32) -> Self {
        let (w, h) = (f64::from(width), f64::from(height));
        let left = w * Self::LEFT;
        let right = w * Self::RIGHT;
        let top = h * Self::TOP;
        let plot_h = h * (1.0 - Self::BOTTOM) - top;

        let column = (right - left) / (Self::COLUMNS + (Self::COLUMNS - 1.0) * Self::WSPACE);
        let gap = column * Self::WSPACE;

        let percent = Rect { x: left, y: top, w: column, h: plot_h };

        let grid_x = left + column + gap;
        let grid_w = right - grid_x;
        let entropy_w = grid_w * (1.0 - Self::COLORBAR_FRACTION - Self::COLORBAR_PAD);
        let entropy = Rect { x: grid_x, y: top, w: entropy_w, h: plot_h };

        let colorbar_w = (plot_h / Self::COLORBAR_ASPECT).min(grid_w * Self::COLORBAR_FRACTION);
        let colorbar = Rect {
            x: entropy.right() + grid_w * Self::COLORBAR_PAD,
            y: top,
            w: colorbar_w,
            h: plot_h,
        };

        Layout {
            width,
            height,
            percent,
            entropy,
            colorbar,
            scale: (height / Self::BASE_HEIGHT).max(1),
        }
    }

    fn tick_len(&self, major: bool) -> f64 {
        let base = if major { 4.0 } else { 2.0 };
        base * f64::from(self.scale)
    }

    fn line_height(&self) -> f64 {
        f64::from(font::GLYPH_HEIGHT * self.scale)
    }
}

/// Vertical pixel centre of 1-based `row` in a panel with `rows` rows.
fn row_center(panel: &Rect, rows: usize, row: usize) -> f64 {
    panel.y + (row as f64 - 0.5) / rows as f64 * panel.h
}

/// Horizontal pixel of `percent` on the inverted percentage axis.
fn percent_x(panel: &Rect, limit: f64, percent: f64) -> f64 {
    panel.right() - percent / limit * panel.w
}

/// Horizontal pixel of profile position `position`; column edges sit on halves.
fn position_x(panel: &Rect, offset: u32, span: u32, position: f64) -> f64 {
    let start = f64::from(offset) - 0.5;
    panel.x + (position - start) / f64::from(span) * panel.w
}

/// Draw the whole chart onto `surface`.
pub fn draw_chart<S: Surface>(surface: &mut S, view: &ChartView, layout: &Layout) {
    debug!(
        "Layout: percent panel {:?}, entropy panel {:?}, colorbar {:?}",
        layout.percent, layout.entropy, layout.colorbar
    );
    draw_percent_panel(surface, view, layout);
    draw_entropy_panel(surface, view, layout);
    draw_colorbar(surface, layout);
}

fn draw_percent_panel<S: Surface>(surface: &mut S, view: &ChartView, layout: &Layout) {
    let panel = layout.percent;
    let rows = view.rows();
    let limit = view.percent_limit();
    let scale = layout.scale;

    // Gridlines sit below the bars.
    let minor_count = (limit / PERCENT_MINOR_STEP).floor() as u32;
    for k in 0..=minor_count {
        let x = percent_x(&panel, limit, f64::from(k) * PERCENT_MINOR_STEP);
        surface.vline(x, panel.y, panel.bottom(), GRID_GREY);
    }

    for (idx, record) in view.records.iter().enumerate() {
        let y = row_center(&panel, rows, idx + 1);
        let half = PERCENT_BAR_HEIGHT / 2.0 * panel.h / rows as f64;
        let x0 = percent_x(&panel, limit, 0.0);
        let x1 = percent_x(&panel, limit, record.percentage.clamp(0.0, limit));
        surface.fill_rect(Rect::spanning(x0, y - half, x1, y + half), BAR_RED);
    }

    frame(surface, &panel);

    let label_y = panel.bottom() + layout.tick_len(true) + layout.line_height();
    for k in 0..=minor_count {
        let value = f64::from(k) * PERCENT_MINOR_STEP;
        let x = percent_x(&panel, limit, value);
        let major = value % PERCENT_MAJOR_STEP == 0.0;
        surface.vline(x, panel.bottom(), panel.bottom() + layout.tick_len(major), BLACK);
        if major {
            surface.text(x, label_y, &format!("{value:.0}"), Align::Center, scale, BLACK);
        }
    }
    surface.text(
        panel.x + panel.w / 2.0,
        label_y + 1.75 * layout.line_height(),
        &view.percent_title(),
        Align::Center,
        scale,
        BLACK,
    );

    let mut widest = 0;
    for row in 1..=view.records.len() {
        let y = row_center(&panel, rows, row);
        surface.hline(panel.x - layout.tick_len(true), panel.x, y, BLACK);
        let label = row.to_string();
        widest = widest.max(font::text_width(&label));
        surface.text(panel.x - 2.0 * layout.tick_len(true), y, &label, Align::Right, scale, BLACK);
    }
    let title_x = panel.x - 2.0 * layout.tick_len(true) - f64::from(widest * scale) - layout.line_height();
    surface.vertical_text(title_x, panel.y + panel.h / 2.0, CLUSTER_TITLE, scale, BLACK);
}

fn draw_entropy_panel<S: Surface>(surface: &mut S, view: &ChartView, layout: &Layout) {
    let panel = layout.entropy;
    let rows = view.rows();
    let span = view.position_span();
    let scale = layout.scale;

    for (idx, record) in view.records.iter().enumerate() {
        let y = row_center(&panel, rows, idx + 1);
        let half = ENTROPY_BAR_HEIGHT / 2.0 * panel.h / rows as f64;
        for (x, &entropy) in record.profile.iter().enumerate() {
            let Some(color) = colormap::jet(entropy) else {
                continue;
            };
            let centre = f64::from(view.offset) + x as f64;
            let x0 = position_x(&panel, view.offset, span, centre - 0.5);
            let x1 = position_x(&panel, view.offset, span, centre + 0.5);
            surface.fill_rect(Rect::spanning(x0, y - half, x1, y + half), color);
        }
    }

    frame(surface, &panel);

    let label_y = panel.bottom() + layout.tick_len(true) + layout.line_height();
    for (position, label) in view.position_ticks() {
        let x = position_x(&panel, view.offset, span, f64::from(position));
        surface.vline(x, panel.bottom(), panel.bottom() + layout.tick_len(true), BLACK);
        if !label.is_empty() {
            surface.text(x, label_y, &label, Align::Center, scale, BLACK);
        }
    }
    surface.text(
        panel.x + panel.w / 2.0,
        label_y + 1.75 * layout.line_height(),
        POSITION_TITLE,
        Align::Center,
        scale,
        BLACK,
    );

    for row in 1..=view.records.len() {
        let y = row_center(&panel, rows, row);
        surface.hline(panel.x - layout.tick_len(true), panel.x, y, BLACK);
    }
}

fn draw_colorbar<S: Surface>(surface: &mut S, layout: &Layout) {
    let bar = layout.colorbar;
    let scale = layout.scale;
    let band = bar.h / COLORBAR_STEPS as f64;

    for step in 0..COLORBAR_STEPS {
        let value = step as f64 / (COLORBAR_STEPS - 1) as f64;
        let Some(color) = colormap::jet(value) else {
            continue;
        };
        let y1 = bar.bottom() - step as f64 * band;
        surface.fill_rect(Rect::spanning(bar.x, y1 - band, bar.right(), y1), color);
    }

    frame(surface, &bar);

    let ticks = (1.0 / COLORBAR_TICK_STEP).round() as u32;
    let mut widest = 0;
    for k in 0..=ticks {
        let value = f64::from(k) * COLORBAR_TICK_STEP;
        let y = bar.bottom() - value * bar.h;
        let label = format!("{value:.1}");
        widest = widest.max(font::text_width(&label));
        surface.hline(bar.right(), bar.right() + layout.tick_len(true), y, BLACK);
        surface.text(bar.right() + 2.0 * layout.tick_len(true), y, &label, Align::Left, scale, BLACK);
    }
    let title_x = bar.right() + 2.0 * layout.tick_len(true) + f64::from(widest * scale) + layout.line_height();
    surface.vertical_text(title_x, bar.y + bar.h / 2.0, COLORBAR_TITLE, scale, BLACK);
}

fn frame<S: Surface>(surface: &mut S, rect: &Rect) {
    surface.hline(rect.x, rect.right(), rect.y, BLACK);
    surface.hline(rect.x, rect.right(), rect.bottom(), BLACK);
    surface.vline(rect.x, rect.y, rect.bottom(), BLACK);
    surface.vline(rect.right(), rect.y, rect.bottom(), BLACK);
}

/// Render the chart into a pixel canvas.
pub fn rasterize(view: &ChartView, layout: &Layout) -> Canvas {
    let mut canvas = Canvas::new(layout.width, layout.height);
    draw_chart(&mut canvas, view, layout);
    canvas
}

fn is_svg(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("svg"))
        .unwrap_or(false)
}

/// Write the chart to `path`. SVG is chosen by extension; everything else is
/// rasterised and handed to the image encoder for that extension.
pub fn save_figure(view: &ChartView, layout: &Layout, path: &Path) -> Result<(), RenderError> {
    if is_svg(path) {
        info!("Rendering SVG...");
        let mut document = SvgDocument::new(layout.width, layout.height);
        draw_chart(&mut document, view, layout);
        info!("Saving to {:?}...", path);
        std::fs::write(path, document.finish()).map_err(|source| RenderError::Io {
            path: path.to_path_buf(),
            source,
        })
    } else {
        info!("Rendering image...");
        let image = rasterize(view, layout).into_image()?;
        info!("Saving to {:?}...", path);
        let saved = match path.extension() {
            Some(_) => image.save(path),
            None => image.save_with_format(path, ImageFormat::Png),
        };
        saved.map_err(|source| RenderError::Image {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    fn record(profile: &[f64], percentage: f64) -> ClusterRecord {
        ClusterRecord {
            profile: profile.to_vec(),
            percentage,
            entropy_summary: 0.5,
        }
    }

    #[fixture]
    fn view() -> ChartView {
        ChartView {
            records: vec![
                record(&[0.0, 0.25, 0.5, 0.75], 62.5),
                record(&[1.0, 0.5, 0.0, 0.0], 25.0),
                record(&[0.1, 0.1, 0.1, 0.9], 12.5),
            ],
            offset: 9,
            length: 4,
            axis_label: None,
        }
    }

    /// Records every call so tests can check what the chart asked for.
    #[derive(Default)]
    struct Recorder {
        rects: Vec<(Rect, Rgb)>,
        texts: Vec<String>,
        vertical: Vec<String>,
    }

    impl Surface for Recorder {
        fn fill_rect(&mut self, rect: Rect, color: Rgb) {
            self.rects.push((rect, color));
        }
        fn hline(&mut self, _: f64, _: f64, _: f64, _: Rgb) {}
        fn vline(&mut self, _: f64, _: f64, _: f64, _: Rgb) {}
        fn text(&mut self, _: f64, _: f64, text: &str, _: Align, _: u32, _: Rgb) {
            self.texts.push(text.to_string());
        }
        fn vertical_text(&mut self, _: f64, _: f64, text: &str, _: u32, _: Rgb) {
            self.vertical.push(text.to_string());
        }
    }

    fn draw(view: &ChartView) -> Recorder {
        let mut recorder = Recorder::default();
        draw_chart(&mut recorder, view, &Layout::new(800, 300));
        recorder
    }

    #[rstest]
    fn one_percentage_bar_per_record(view: ChartView) {
        let recorder = draw(&view);
        let bars: Vec<_> = recorder.rects.iter().filter(|(_, c)| *c == BAR_RED).collect();
        assert_eq!(bars.len(), view.records.len());
        // Rows run top to bottom in input order.
        assert!(bars.windows(2).all(|pair| pair[0].0.y < pair[1].0.y));
        // Longer bars reach further left on the inverted axis.
        assert!(bars[0].0.x < bars[1].0.x && bars[1].0.x < bars[2].0.x);
    }

    fn view_layout() -> Layout {
        Layout::new(800, 300)
    }

    fn entropy_cells(recorder: &Recorder) -> usize {
        let panel = view_layout().entropy;
        recorder
            .rects
            .iter()
            .filter(|(r, _)| r.x >= panel.x - 0.5 && r.right() <= panel.right() + 0.5)
            .count()
    }

    #[rstest]
    fn one_cell_per_profile_entry(view: ChartView) {
        assert_eq!(entropy_cells(&draw(&view)), 12);
    }

    #[rstest]
    fn nan_entries_leave_a_gap(mut view: ChartView) {
        view.records[0].profile[1] = f64::NAN;
        assert_eq!(entropy_cells(&draw(&view)), 11);
    }

    #[rstest]
    fn labels_and_titles(view: ChartView) {
        let recorder = draw(&view);
        for expected in ["Prefixes [%]", POSITION_TITLE, "0", "10", "60", "9", "12", "0.0", "0.4", "1.0", "1", "3"] {
            assert!(recorder.texts.iter().any(|t| t == expected), "missing {expected}");
        }
        assert_eq!(recorder.vertical, vec![CLUSTER_TITLE.to_string(), COLORBAR_TITLE.to_string()]);
    }

    #[rstest]
    fn custom_axis_label(mut view: ChartView) {
        view.axis_label = Some("Addresses".to_string());
        assert_eq!(view.percent_title(), "Addresses [%]");
        assert!(draw(&view).texts.iter().any(|t| t == "Addresses [%]"));
    }

    #[rstest]
    #[case::sparse(9, 4, vec!["9", "10", "11", "12"])]
    #[case::eight(0, 8, vec!["0", "1", "2", "3", "4", "5", "6", "7"])]
    #[case::dense(9, 10, vec!["", "10", "", "12", "", "14", "", "16", "", "18"])]
    fn position_tick_labels(mut view: ChartView, #[case] offset: u32, #[case] length: u32, #[case] expected: Vec<&str>) {
        view.offset = offset;
        view.length = length;
        let ticks = view.position_ticks();
        let positions: Vec<u32> = ticks.iter().map(|(p, _)| *p).collect();
        let labels: Vec<&str> = ticks.iter().map(|(_, l)| l.as_str()).collect();
        assert_eq!(positions, (offset..offset + length).collect::<Vec<_>>());
        assert_eq!(labels, expected);
    }

    #[test]
    fn colorbar_spans_full_scale() {
        let view = ChartView { records: Vec::new(), offset: 9, length: 0, axis_label: None };
        let layout = view_layout();
        let recorder = draw(&view);
        let bands: Vec<_> = recorder
            .rects
            .iter()
            .filter(|(r, _)| r.x >= layout.colorbar.x - 0.5)
            .collect();
        assert_eq!(bands.len(), COLORBAR_STEPS);
        assert_eq!(bands.first().map(|(_, c)| *c), colormap::jet(0.0));
        assert_eq!(bands.last().map(|(_, c)| *c), colormap::jet(1.0));
    }

    #[test]
    fn layout_panels_do_not_overlap() {
        for (w, h) in [(800, 300), (1600, 600), (400, 150)] {
            let layout = Layout::new(w, h);
            assert!(layout.percent.right() < layout.entropy.x);
            assert!(layout.entropy.right() < layout.colorbar.x);
            assert!(layout.colorbar.right() < f64::from(w));
            assert_eq!(layout.percent.h, layout.entropy.h);
            // The entropy panel spans three of the four grid columns.
            assert!(layout.entropy.w > 2.0 * layout.percent.w);
        }
        assert_eq!(Layout::new(1600, 600).scale, 2);
        assert_eq!(Layout::new(400, 150).scale, 1);
    }

    #[rstest]
    fn ticks_stop_at_the_last_representable_position(mut view: ChartView) {
        view.offset = u32::MAX;
        view.length = 2;
        let ticks = view.position_ticks();
        assert_eq!(ticks, vec![(u32::MAX, u32::MAX.to_string())]);
        // Drawing must not overflow either.
        let recorder = draw(&view);
        assert!(recorder.texts.iter().any(|t| *t == u32::MAX.to_string()));
    }

    #[test]
    fn save_without_extension_writes_png() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::TempDir::new()?;
        let path = dir.path().join("chart");
        let view = ChartView {
            records: vec![record(&[0.2, 0.8], 50.0)],
            offset: 9,
            length: 2,
            axis_label: None,
        };
        save_figure(&view, &Layout::new(200, 100), &path)?;
        let bytes = std::fs::read(&path)?;
        assert!(bytes.starts_with(b"\x89PNG\r\n\x1a\n"));
        Ok(())
    }

    #[rstest]
    fn percent_axis_headroom(view: ChartView) {
        assert!((view.percent_limit() - 65.625).abs() < 1e-9);
        let empty = ChartView { records: Vec::new(), ..view };
        assert_eq!(empty.percent_limit(), 1.0);
    }
}
