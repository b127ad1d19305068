//! Reader for the cluster summary lines written by the entropy clustering tool.
//!
//! Only two kinds of lines matter. Lines starting with `cluster` carry one
//! record each:
//!
//! ```text
//! cluster  1: [0.000 0.250 0.875] 12.500 0.330
//! ```
//!
//! and the first line starting with `2` (a prefix listing such as
//! `2001:db8::/32 (2 0 0 1) ...`) tells us where the profile starts when no
//! offset was given on the command line.

use std::io::BufRead;
use std::num::ParseFloatError;

use log::debug;
use thiserror::Error;

/// Characters dropped from a record line before the profile (`cluster NN: [`).
const RECORD_PREFIX_LEN: usize = 13;

/// Offset used when nothing better can be inferred.
pub const DEFAULT_OFFSET: u32 = 9;

/// Base of the inferred offset, before counting the skipped nybbles.
const INFERRED_OFFSET_BASE: u32 = 10;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: record is shorter than the `cluster NN: [` prefix")]
    Truncated { line: usize },

    #[error("line {line}: no closing `]` after the profile")]
    MissingBracket { line: usize },

    #[error("line {line}: expected percentage and entropy after `]`, found {found} value(s)")]
    MissingDetails { line: usize, found: usize },

    #[error("line {line}: `{token}` is not a number: {source}")]
    InvalidFloat {
        line: usize,
        token: String,
        #[source]
        source: ParseFloatError,
    },

    #[error("no cluster records in input, cannot derive the profile length")]
    NoClusters,
}

/// One cluster summary line.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterRecord {
    /// Entropy per observed character position.
    pub profile: Vec<f64>,
    /// Share of all inputs that fell into this cluster, in percent.
    pub percentage: f64,
    /// Summary value printed after the percentage; kept but not plotted.
    pub entropy_summary: f64,
}

/// Where the starting offset came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OffsetOrigin {
    /// Given on the command line.
    Supplied,
    /// Counted from the parenthesised group of a prefix line.
    Inferred,
    /// No usable prefix line; [`DEFAULT_OFFSET`] was used.
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Offset {
    pub value: u32,
    pub origin: OffsetOrigin,
}

impl Offset {
    pub fn supplied(value: u32) -> Self {
        Offset { value, origin: OffsetOrigin::Supplied }
    }

    fn fallback() -> Self {
        Offset { value: DEFAULT_OFFSET, origin: OffsetOrigin::Fallback }
    }
}

/// Records in input order plus the resolved offset.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterInput {
    pub records: Vec<ClusterRecord>,
    pub offset: Offset,
}

/// Parse every line of `reader`.
///
/// `offset` is the value given by the user, if any. When it is `None` the
/// first line starting with `2` is used to infer it, and [`DEFAULT_OFFSET`] is
/// used when no such line exists. The first malformed record line aborts the
/// whole parse.
pub fn parse_clusters<R: BufRead>(reader: R, offset: Option<u32>) -> Result<ClusterInput, ParseError> {
    let mut offset = offset.map(Offset::supplied);
    let mut records = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if offset.is_none() && line.starts_with('2') {
            let inferred = infer_offset(line);
            debug!(
                "Offset {} ({:?}) taken from line {}",
                inferred.value,
                inferred.origin,
                idx + 1
            );
            offset = Some(inferred);
        }

        if !line.starts_with("cluster") {
            continue;
        }
        records.push(parse_record_line(line, idx + 1)?);
    }

    let offset = offset.unwrap_or_else(|| {
        debug!("No prefix line seen, using offset {}", DEFAULT_OFFSET);
        Offset::fallback()
    });

    Ok(ClusterInput { records, offset })
}

/// Infer the starting offset from a prefix line.
///
/// The line without its final character is searched for the first `)` and
/// the last `(` before it; every space between them marks one skipped
/// nybble. Lines without such a group fall back to [`DEFAULT_OFFSET`].
pub fn infer_offset(line: &str) -> Offset {
    let body = match line.char_indices().last() {
        Some((last, _)) => &line[..last],
        None => line,
    };

    let group = body
        .find(')')
        .and_then(|close| body[..close].rfind('(').map(|open| &body[open..close]));

    match group {
        Some(group) => {
            let spaces = group.chars().filter(|&c| c == ' ').count() as u32;
            Offset {
                value: INFERRED_OFFSET_BASE + spaces,
                origin: OffsetOrigin::Inferred,
            }
        }
        None => Offset::fallback(),
    }
}

/// Parse one `cluster` line; `line_no` is only used in error messages.
pub fn parse_record_line(line: &str, line_no: usize) -> Result<ClusterRecord, ParseError> {
    let body = line
        .get(RECORD_PREFIX_LEN..)
        .ok_or(ParseError::Truncated { line: line_no })?;

    let close = body
        .find(']')
        .ok_or(ParseError::MissingBracket { line: line_no })?;

    let profile = parse_floats(&body[..close], line_no)?;

    // Skip the bracket and the separator after it.
    let details = match body.get(close + 2..) {
        Some(rest) => parse_floats(rest, line_no)?,
        None => Vec::new(),
    };

    match details[..] {
        [percentage, entropy_summary, ..] => Ok(ClusterRecord {
            profile,
            percentage,
            entropy_summary,
        }),
        _ => Err(ParseError::MissingDetails {
            line: line_no,
            found: details.len(),
        }),
    }
}

fn parse_floats(text: &str, line_no: usize) -> Result<Vec<f64>, ParseError> {
    text.split_whitespace()
        .map(|token| {
            token.parse::<f64>().map_err(|source| ParseError::InvalidFloat {
                line: line_no,
                token: token.to_string(),
                source,
            })
        })
        .collect()
}

/// Number of positions to label: the user's value, or the first profile length.
pub fn resolve_length(records: &[ClusterRecord], length: Option<u32>) -> Result<u32, ParseError> {
    match length {
        Some(length) => Ok(length),
        None => records
            .first()
            .map(|record| record.profile.len() as u32)
            .ok_or(ParseError::NoClusters),
    }
}
