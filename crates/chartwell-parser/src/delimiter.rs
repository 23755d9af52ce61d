//! Field delimiters and delimiter sniffing.

use std::{fmt, str::FromStr};

use log::debug;
use thiserror::Error;

/// Error returned when a delimiter name cannot be recognized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown delimiter `{0}`, expected one of: comma, semicolon, tab, pipe, auto")]
pub struct UnknownDelimiter(pub String);

/// The character that separates fields on a line.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Delimiter {
    #[default]
    Comma,
    Semicolon,
    Tab,
    Pipe,
    /// Pick the most frequent candidate on the first non-blank line.
    Auto,
}

impl Delimiter {
    /// Delimiters considered by [`Delimiter::Auto`], in tie-breaking order.
    pub const CANDIDATES: [Delimiter; 4] = [Self::Comma, Self::Semicolon, Self::Tab, Self::Pipe];

    /// Returns the separator character, or `None` for [`Delimiter::Auto`].
    pub fn as_char(self) -> Option<char> {
        match self {
            Self::Comma => Some(','),
            Self::Semicolon => Some(';'),
            Self::Tab => Some('\t'),
            Self::Pipe => Some('|'),
            Self::Auto => None,
        }
    }

    /// Resolves this delimiter to a concrete separator.
    ///
    /// Fixed delimiters return their own character. [`Delimiter::Auto`]
    /// counts each candidate in `sample` and returns the most frequent one;
    /// ties go to the earlier candidate and a sample with no candidate at
    /// all resolves to a comma.
    ///
    /// # Examples
    ///
    /// ```
    /// # use chartwell_parser::Delimiter;
    /// assert_eq!(Delimiter::Auto.resolve("a;b;c"), ';');
    /// assert_eq!(Delimiter::Auto.resolve("a,b;c"), ',');
    /// assert_eq!(Delimiter::Auto.resolve("abc"), ',');
    /// assert_eq!(Delimiter::Pipe.resolve("a,b"), '|');
    /// ```
    pub fn resolve(self, sample: &str) -> char {
        if let Some(separator) = self.as_char() {
            return separator;
        }

        let mut best = (',', 0);
        for candidate in Self::CANDIDATES.iter().filter_map(|d| d.as_char()) {
            let count = sample.matches(candidate).count();
            if count > best.1 {
                best = (candidate, count);
            }
        }

        debug!(separator:? = best.0, occurrences = best.1; "Sniffed delimiter");
        best.0
    }
}

impl fmt::Display for Delimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Comma => "comma",
            Self::Semicolon => "semicolon",
            Self::Tab => "tab",
            Self::Pipe => "pipe",
            Self::Auto => "auto",
        };
        f.write_str(name)
    }
}

impl FromStr for Delimiter {
    type Err = UnknownDelimiter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "," | "comma" => Ok(Self::Comma),
            ";" | "semicolon" => Ok(Self::Semicolon),
            "\t" | "\\t" | "tab" => Ok(Self::Tab),
            "|" | "pipe" => Ok(Self::Pipe),
            "auto" => Ok(Self::Auto),
            other => Err(UnknownDelimiter(other.to_string())),
        }
    }
}
