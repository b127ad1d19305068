//! Plot the summaries printed by an entropy clustering run: one prevalence
//! bar and one entropy heat-strip per cluster.

pub mod cli;
pub mod parse;
pub mod render;

pub use cli::{run, Args, Error};
pub use parse::{ClusterInput, ClusterRecord, Offset, OffsetOrigin, ParseError};
pub use render::{ChartView, Layout, RenderError};
