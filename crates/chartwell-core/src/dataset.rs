//! Dataset model: headers plus rows of raw string cells.
//!
//! A [`Dataset`] is produced by the parser and never mutated afterwards.
//! Loading new text replaces the whole value. Rows may be ragged: a row
//! shorter or longer than the header row is kept as-is, and reading past
//! its end yields `None`.

use serde::{Deserialize, Serialize};

/// A single raw field of a dataset.
///
/// Cells carry the trimmed source text only. Numeric interpretation happens
/// at the point of use through [`Cell::to_number`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cell {
    raw: String,
}

impl Cell {
    /// Creates a cell from its raw text.
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    /// Returns the raw text of the cell.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Interprets the cell as a floating-point number.
    ///
    /// Parsing takes the longest leading numeric prefix, so `"12%"` yields
    /// `12.0` and `"3.5 kg"` yields `3.5`. Text without a leading number,
    /// `NaN`, and values that overflow to infinity yield `None`.
    ///
    /// # Examples
    ///
    /// ```
    /// use chartwell_core::dataset::Cell;
    ///
    /// assert_eq!(Cell::new("42").to_number(), Some(42.0));
    /// assert_eq!(Cell::new("-1.5e2x").to_number(), Some(-150.0));
    /// assert_eq!(Cell::new("abc").to_number(), None);
    /// ```
    pub fn to_number(&self) -> Option<f64> {
        let prefix = numeric_prefix(self.raw.trim_start())?;
        prefix.parse::<f64>().ok().filter(|value| value.is_finite())
    }
}

impl From<&str> for Cell {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for Cell {
    fn from(raw: String) -> Self {
        Self { raw }
    }
}

/// Returns the longest prefix of `text` that forms a decimal float literal.
fn numeric_prefix(text: &str) -> Option<&str> {
    let bytes = text.as_bytes();
    let count_digits = |from: usize| {
        bytes[from..]
            .iter()
            .take_while(|byte| byte.is_ascii_digit())
            .count()
    };

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }

    let integer_digits = count_digits(end);
    end += integer_digits;

    let mut fraction_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        fraction_digits = count_digits(end + 1);
        if integer_digits > 0 || fraction_digits > 0 {
            end += 1 + fraction_digits;
        }
    }

    if integer_digits == 0 && fraction_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exponent_end = end + 1;
        if matches!(bytes.get(exponent_end), Some(b'+' | b'-')) {
            exponent_end += 1;
        }
        let exponent_digits = count_digits(exponent_end);
        if exponent_digits > 0 {
            end = exponent_end + exponent_digits;
        }
    }

    Some(&text[..end])
}

/// A rectangular-ish table of raw cells with named columns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    headers: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Dataset {
    /// Creates a dataset from headers and rows.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        Self { headers, rows }
    }

    /// Creates a dataset with no headers and no rows.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns the column headers.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Returns all rows.
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Returns the number of columns, as defined by the headers.
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Returns the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if the dataset has no rows to plot.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the index of the last column, or `None` when there are no columns.
    pub fn last_column_index(&self) -> Option<usize> {
        self.headers.len().checked_sub(1)
    }

    /// Returns the header text of `column`, if that column exists.
    pub fn header(&self, column: usize) -> Option<&str> {
        self.headers.get(column).map(String::as_str)
    }

    /// Returns a display name for `column`.
    ///
    /// Blank or missing headers fall back to the positional `Column N`
    /// (1-based).
    pub fn column_name(&self, column: usize) -> String {
        match self.header(column) {
            Some(header) if !header.is_empty() => header.to_string(),
            _ => positional_header(column),
        }
    }

    /// Returns the cell at `row`, `column`, or `None` if either is out of range.
    pub fn cell(&self, row: usize, column: usize) -> Option<&Cell> {
        self.rows.get(row).and_then(|cells| cells.get(column))
    }
}

/// Returns the synthesized header for a zero-based column index.
pub fn positional_header(column: usize) -> String {
    format!("Column {}", column + 1)
}
