//! Command-line options and the read -> parse -> render pipeline behind them.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;

use clap::Parser;
use log::{debug, info};
use thiserror::Error;

use crate::parse::{self, ParseError};
use crate::render::{self, terminal, ChartView, Layout, RenderError};

/// Largest `-s`/`-l`; keeps `offset + length` within `u32`.
const MAX_POSITION: i64 = (u32::MAX / 2) as i64;
/// Largest chart side in pixels.
const MAX_DIMENSION: i64 = 16_384;
/// Largest terminal preview width in characters.
const MAX_COLUMNS: i64 = 1_000;

#[derive(Parser, Debug, Clone)]
#[command(name = "clusterplot")]
#[command(about = "Plot the results of entropy clustering.", long_about = None)]
pub struct Args {
    // Input / output
    /// Read cluster summaries from this FILE instead of standard input.
    #[arg(long = "file", value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Save the chart to this FILE (SVG or a raster format, by extension).
    #[arg(long = "save", value_name = "FILE")]
    pub save: Option<PathBuf>,

    // Chart Options
    /// What was clustered; used as the percentage axis label.
    #[arg(long = "type", value_name = "LABEL")]
    pub label: Option<String>,

    /// Position of the first profile entry. Negative means infer it from the input.
    #[arg(
        short = 's',
        value_name = "N",
        default_value_t = -1,
        allow_negative_numbers = true,
        value_parser = clap::value_parser!(i64).range(..=MAX_POSITION),
    )]
    pub start: i64,

    /// Number of positions to label. Negative means the length of the first profile.
    #[arg(
        short = 'l',
        value_name = "N",
        default_value_t = -1,
        allow_negative_numbers = true,
        value_parser = clap::value_parser!(i64).range(..=MAX_POSITION),
    )]
    pub length: i64,

    /// Set the width in pixels of the chart.
    #[arg(
        short = 'x',
        long = "width",
        value_name = "N",
        default_value_t = 800,
        value_parser = clap::value_parser!(u32).range(1..=MAX_DIMENSION),
    )]
    pub width: u32,

    /// Set the height in pixels of the chart.
    #[arg(
        short = 'y',
        long = "height",
        value_name = "N",
        default_value_t = 300,
        value_parser = clap::value_parser!(u32).range(1..=MAX_DIMENSION),
    )]
    pub height: u32,

    /// Width in characters of the terminal preview shown when not saving.
    #[arg(
        short = 'c',
        long = "columns",
        value_name = "N",
        default_value_t = 100,
        value_parser = clap::value_parser!(u32).range(1..=MAX_COLUMNS),
    )]
    pub columns: u32,

    // Logging
    /// Verbosity level (0 = error, 1 = info, 2 = debug).
    #[arg(short = 'v', long = "verbose", value_name = "N", default_value_t = 1)]
    pub verbose: u8,
}

impl Args {
    /// User-supplied offset; negative values mean "not given".
    pub fn offset(&self) -> Option<u32> {
        u32::try_from(self.start).ok()
    }

    /// User-supplied tick count; negative values mean "not given".
    pub fn label_length(&self) -> Option<u32> {
        u32::try_from(self.length).ok()
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

fn open_input(args: &Args) -> Result<Box<dyn BufRead>, Error> {
    match &args.file {
        Some(path) => {
            let file = File::open(path).map_err(|source| Error::Open {
                path: path.clone(),
                source,
            })?;
            Ok(Box::new(BufReader::new(file)))
        }
        None => Ok(Box::new(io::stdin().lock())),
    }
}

/// Parse the input named by `args` into a chart description.
pub fn load_view(args: &Args) -> Result<ChartView, Error> {
    info!("Reading clusters...");
    let input = parse::parse_clusters(open_input(args)?, args.offset())?;
    let length = parse::resolve_length(&input.records, args.label_length())?;

    info!(
        "Found {} clusters, offset {} ({:?}), {} positions",
        input.records.len(),
        input.offset.value,
        input.offset.origin,
        length
    );

    Ok(ChartView {
        records: input.records,
        offset: input.offset.value,
        length,
        axis_label: args.label.clone(),
    })
}

/// Run the whole pipeline. The confirmation message, or the terminal
/// preview when nothing is saved, goes to `out`.
pub fn run<W: Write>(args: &Args, out: &mut W) -> Result<(), Error> {
    let view = load_view(args)?;
    let layout = Layout::new(args.width, args.height);

    match &args.save {
        Some(path) => {
            render::save_figure(&view, &layout, path)?;
            writeln!(out, "Saved to {}", path.display()).map_err(|source| RenderError::Io {
                path: path.clone(),
                source,
            })?;
        }
        None => {
            info!("Rendering preview...");
            let canvas = render::rasterize(&view, &layout);
            debug!("Preview of {}x{} canvas at {} columns", canvas.width(), canvas.height(), args.columns);
            terminal::write_preview(&canvas, args.columns, out).map_err(|source| RenderError::Io {
                path: PathBuf::from("<stdout>"),
                source,
            })?;
        }
    }

    info!("Done.");
    Ok(())
}
