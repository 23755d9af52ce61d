//! Chart selection: which columns feed which part of a chart.
//!
//! A [`ChartSelection`] records the user's choices over a [`Dataset`]: the
//! [`ChartKind`], the label column, the value column for proportion charts,
//! the series columns for bar and line charts, and per-column color
//! overrides. Selections are reset with [`ChartSelection::for_dataset`]
//! whenever a new dataset is loaded.

use std::{collections::BTreeMap, fmt, str::FromStr};

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{color::Color, dataset::Dataset};

/// The kinds of chart that can be built.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Bar,
    #[default]
    Line,
    Pie,
    Doughnut,
}

impl ChartKind {
    /// All chart kinds, in display order.
    pub const ALL: [ChartKind; 4] = [Self::Bar, Self::Line, Self::Pie, Self::Doughnut];

    /// Returns the lowercase name of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bar => "bar",
            Self::Line => "line",
            Self::Pie => "pie",
            Self::Doughnut => "doughnut",
        }
    }

    /// Returns `true` for kinds that plot a single column as parts of a whole.
    pub fn is_proportional(&self) -> bool {
        matches!(self, Self::Pie | Self::Doughnut)
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bar" => Ok(Self::Bar),
            "line" => Ok(Self::Line),
            "pie" => Ok(Self::Pie),
            "doughnut" | "donut" => Ok(Self::Doughnut),
            other => Err(format!(
                "unknown chart kind `{other}`, expected one of: bar, line, pie, doughnut"
            )),
        }
    }
}

/// Errors reported by [`ChartSelection::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("{role} column {index} is out of range for a dataset with {column_count} columns")]
    ColumnOutOfRange {
        role: &'static str,
        index: usize,
        column_count: usize,
    },
}

/// The user's mapping of dataset columns onto a chart.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChartSelection {
    kind: ChartKind,
    label_column: usize,
    value_column: usize,
    series_columns: IndexSet<usize>,
    series_colors: BTreeMap<usize, Color>,
}

impl ChartSelection {
    /// Creates the initial selection for a freshly loaded dataset.
    ///
    /// The label column is the first column, the value column is the second
    /// (or the only one), and no series or color overrides are chosen. The
    /// chart kind is kept from `kind`.
    pub fn for_dataset(dataset: &Dataset, kind: ChartKind) -> Self {
        let value_column = dataset.last_column_index().map_or(0, |last| last.min(1));
        Self {
            kind,
            label_column: 0,
            value_column,
            series_columns: IndexSet::new(),
            series_colors: BTreeMap::new(),
        }
    }

    /// Returns the chart kind.
    pub fn kind(&self) -> ChartKind {
        self.kind
    }

    /// Returns the column supplying category labels.
    pub fn label_column(&self) -> usize {
        self.label_column
    }

    /// Returns the column supplying magnitudes for proportion charts.
    pub fn value_column(&self) -> usize {
        self.value_column
    }

    /// Returns the explicitly selected series columns, in selection order.
    pub fn series_columns(&self) -> &IndexSet<usize> {
        &self.series_columns
    }

    /// Returns the per-column color overrides.
    pub fn series_colors(&self) -> &BTreeMap<usize, Color> {
        &self.series_colors
    }

    /// Returns the color override for `column`, if any.
    pub fn series_color(&self, column: usize) -> Option<Color> {
        self.series_colors.get(&column).copied()
    }

    /// Returns the columns plotted as series for bar and line charts.
    ///
    /// Falls back to the value column when no series column is selected.
    pub fn effective_series_columns(&self) -> Vec<usize> {
        if self.series_columns.is_empty() {
            vec![self.value_column]
        } else {
            self.series_columns.iter().copied().collect()
        }
    }

    /// Returns the columns that the current chart kind actually reads values from.
    pub fn plotted_columns(&self) -> Vec<usize> {
        if self.kind.is_proportional() {
            vec![self.value_column]
        } else {
            self.effective_series_columns()
        }
    }

    /// Switches the chart kind. Column choices are kept.
    pub fn set_kind(&mut self, kind: ChartKind) {
        self.kind = kind;
    }

    /// Sets the column supplying category labels.
    pub fn set_label_column(&mut self, column: usize) {
        self.label_column = column;
    }

    /// Sets the column supplying magnitudes for proportion charts.
    pub fn set_value_column(&mut self, column: usize) {
        self.value_column = column;
    }

    /// Adds `column` to the series selection. Returns `false` if it was already selected.
    pub fn select_series(&mut self, column: usize) -> bool {
        self.series_columns.insert(column)
    }

    /// Removes `column` from the series selection, keeping the order of the rest.
    pub fn deselect_series(&mut self, column: usize) -> bool {
        self.series_columns.shift_remove(&column)
    }

    /// Sets the color override for `column`.
    pub fn set_series_color(&mut self, column: usize, color: Color) {
        self.series_colors.insert(column, color);
    }

    /// Removes the color override for `column`.
    pub fn clear_series_color(&mut self, column: usize) -> Option<Color> {
        self.series_colors.remove(&column)
    }

    /// Builder-style variant of [`set_kind`](Self::set_kind).
    pub fn with_kind(mut self, kind: ChartKind) -> Self {
        self.kind = kind;
        self
    }

    /// Builder-style variant of [`set_label_column`](Self::set_label_column).
    pub fn with_label_column(mut self, column: usize) -> Self {
        self.label_column = column;
        self
    }

    /// Builder-style variant of [`set_value_column`](Self::set_value_column).
    pub fn with_value_column(mut self, column: usize) -> Self {
        self.value_column = column;
        self
    }

    /// Builder-style variant of [`select_series`](Self::select_series).
    pub fn with_series(mut self, columns: impl IntoIterator<Item = usize>) -> Self {
        self.series_columns.extend(columns);
        self
    }

    /// Builder-style variant of [`set_series_color`](Self::set_series_color).
    pub fn with_series_color(mut self, column: usize, color: Color) -> Self {
        self.series_colors.insert(column, color);
        self
    }

    /// Checks that every column the selection refers to exists.
    ///
    /// Color overrides are not checked; an override for an unplotted column
    /// is simply unused.
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError::ColumnOutOfRange`] for the first index that
    /// is not below `column_count`.
    pub fn validate(&self, column_count: usize) -> Result<(), SelectionError> {
        check_column("label", self.label_column, column_count)?;
        if self.kind.is_proportional() {
            check_column("value", self.value_column, column_count)?;
        } else {
            for column in self.effective_series_columns() {
                check_column("series", column, column_count)?;
            }
        }
        Ok(())
    }

    /// Like [`validate`](Self::validate), but checks the value column and
    /// every series column whatever the chart kind.
    ///
    /// A selection that passes stays valid across [`set_kind`](Self::set_kind).
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError::ColumnOutOfRange`] for the first index that
    /// is not below `column_count`.
    pub fn validate_all(&self, column_count: usize) -> Result<(), SelectionError> {
        check_column("label", self.label_column, column_count)?;
        check_column("value", self.value_column, column_count)?;
        for &column in &self.series_columns {
            check_column("series", column, column_count)?;
        }
        Ok(())
    }
}

fn check_column(role: &'static str, index: usize, column_count: usize) -> Result<(), SelectionError> {
    if index < column_count {
        Ok(())
    } else {
        Err(SelectionError::ColumnOutOfRange {
            role,
            index,
            column_count,
        })
    }
}
