//! Tabular (CSV) parsing.
//!
//! Two modes are available:
//!
//! - [`TabularMode::Simple`] (default): positional split on `,` with no quote handling. A
//!   quoted field containing a comma or a line break is split like any other text.
//! - [`TabularMode::Quoted`]: RFC 4180-style parsing through the `csv` crate, for callers
//!   that need embedded delimiters.
//!
//! In both modes the first line is the header row and every cell is trimmed.

use crate::error::IngestionResult;
use crate::types::{ParsedContent, TabularData, TabularRow};

/// How tabular content is split into cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TabularMode {
    /// Plain split on line breaks and commas.
    #[default]
    Simple,
    /// Quote-aware parsing; rows may have varying widths.
    Quoted,
}

/// Parser entry used by the format dispatcher (simple mode).
pub fn parse(input: &str) -> IngestionResult<ParsedContent> {
    Ok(ParsedContent::Tabular(parse_simple(input)))
}

/// Parser entry for quote-aware mode.
pub fn parse_quoted_content(input: &str) -> IngestionResult<ParsedContent> {
    parse_quoted(input).map(ParsedContent::Tabular)
}

/// Parse with the given mode.
pub fn parse_tabular(input: &str, mode: TabularMode) -> IngestionResult<TabularData> {
    match mode {
        TabularMode::Simple => Ok(parse_simple(input)),
        TabularMode::Quoted => parse_quoted(input),
    }
}

/// Positional split: trim the whole input, split lines on `\n`, cells on `,`.
///
/// Never fails. Empty input yields one empty header and no rows.
pub fn parse_simple(input: &str) -> TabularData {
    let mut lines = input.trim().split('\n');
    let headers: Vec<String> = lines
        .next()
        .unwrap_or_default()
        .split(',')
        .map(|h| h.trim().to_string())
        .collect();

    let rows = lines
        .map(|line| zip_row(&headers, line.split(',').map(str::trim)))
        .collect();

    TabularData::new(headers, rows)
}

/// Quote-aware parse through the `csv` crate.
pub fn parse_quoted(input: &str) -> IngestionResult<TabularData> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input.trim().as_bytes());

    let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result?;
        rows.push(zip_row(&headers, record.iter()));
    }

    Ok(TabularData::new(headers, rows))
}

// Extra cells are dropped; missing cells leave the key absent. Duplicate headers: last wins.
fn zip_row<'a>(headers: &[String], cells: impl Iterator<Item = &'a str>) -> TabularRow {
    let mut row = TabularRow::new();
    for (header, cell) in headers.iter().zip(cells) {
        row.insert(header.clone(), cell.to_string());
    }
    row
}
