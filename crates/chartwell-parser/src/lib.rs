//! # Chartwell Parser
//!
//! Parser for delimited text datasets. This crate turns raw text into a
//! [`Dataset`] of headers and raw string cells.
//!
//! The split is naive: lines are split on newlines and fields
//! on the delimiter, with no support for quoted fields or escaped
//! delimiters. Every field is trimmed of surrounding whitespace.
//!
//! ## Usage
//!
//! ```
//! # use chartwell_parser::{parse, ParseOptions};
//! let dataset = parse("month,sales\nJan,10\nFeb,12\n", &ParseOptions::default());
//!
//! assert_eq!(dataset.headers(), ["month", "sales"]);
//! assert_eq!(dataset.row_count(), 2);
//! ```

mod delimiter;

pub use delimiter::{Delimiter, UnknownDelimiter};

use log::{debug, info, warn};

use chartwell_core::dataset::{Cell, Dataset, positional_header};

/// Options controlling how text is split into a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    has_header_row: bool,
    delimiter: Delimiter,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            has_header_row: true,
            delimiter: Delimiter::default(),
        }
    }
}

impl ParseOptions {
    /// Creates parse options.
    ///
    /// # Arguments
    ///
    /// * `has_header_row` - Whether the first non-blank line holds column names
    /// * `delimiter` - Field separator, or [`Delimiter::Auto`] to sniff it
    pub fn new(has_header_row: bool, delimiter: Delimiter) -> Self {
        Self {
            has_header_row,
            delimiter,
        }
    }

    pub fn has_header_row(&self) -> bool {
        self.has_header_row
    }

    pub fn delimiter(&self) -> Delimiter {
        self.delimiter
    }

    pub fn with_header_row(mut self, has_header_row: bool) -> Self {
        self.has_header_row = has_header_row;
        self
    }

    pub fn with_delimiter(mut self, delimiter: Delimiter) -> Self {
        self.delimiter = delimiter;
        self
    }
}

/// Parse delimited text into a dataset.
///
/// 1. **Lines** - Split on newlines and drop blank lines
/// 2. **Delimiter** - Resolve the separator (sniffed from the first line for
///    [`Delimiter::Auto`])
/// 3. **Fields** - Split every line on the separator and trim each field
/// 4. **Headers** - Take the first line as headers, or synthesize
///    `Column 1..=n` from the first row's width
///
/// Parsing never fails. Empty input yields an empty dataset, and rows whose
/// width differs from the header row are kept unmodified.
///
/// # Example
///
/// ```
/// # use chartwell_parser::{parse, ParseOptions};
/// let options = ParseOptions::default().with_header_row(false);
/// let dataset = parse("1,2\n3,4", &options);
///
/// assert_eq!(dataset.headers(), ["Column 1", "Column 2"]);
/// assert_eq!(dataset.row_count(), 2);
/// ```
pub fn parse(text: &str, options: &ParseOptions) -> Dataset {
    let lines: Vec<&str> = text.lines().filter(|line| !line.trim().is_empty()).collect();

    let Some(first_line) = lines.first() else {
        debug!("Input has no non-blank lines");
        return Dataset::empty();
    };

    let separator = options.delimiter.resolve(first_line);
    let mut records = lines.iter().map(|line| split_fields(line, separator));

    let (headers, rows): (Vec<String>, Vec<Vec<Cell>>) = if options.has_header_row {
        let headers = records
            .next()
            .map(|fields| fields.into_iter().map(String::from).collect())
            .unwrap_or_default();
        (headers, records.map(into_cells).collect())
    } else {
        let rows: Vec<Vec<Cell>> = records.map(into_cells).collect();
        let width = rows.first().map_or(0, Vec::len);
        ((0..width).map(positional_header).collect(), rows)
    };

    let ragged = rows.iter().filter(|row| row.len() != headers.len()).count();
    if ragged > 0 {
        warn!(ragged_rows = ragged, columns = headers.len(); "Rows differ in width from the header row");
    }

    info!(columns = headers.len(), rows = rows.len(); "Parsed dataset");
    Dataset::new(headers, rows)
}

fn split_fields(line: &str, separator: char) -> Vec<&str> {
    line.split(separator).map(str::trim).collect()
}

fn into_cells(fields: Vec<&str>) -> Vec<Cell> {
    fields.into_iter().map(Cell::from).collect()
}
