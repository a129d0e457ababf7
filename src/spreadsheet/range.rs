use crate::spreadsheet::reference::col_to_index;
use crate::spreadsheet::reference::index_to_col;
use crate::spreadsheet::reference::row_to_index;
use crate::spreadsheet::sheet::Worksheet;
use regex::Regex;
use std::fmt::Display;
use thiserror::Error;

/// Errors raised while parsing or resolving range references.
#[derive(Error, Debug)]
pub enum RangeError {
    /// Malformed notation or inverted boundaries
    #[error("Invalid range reference '{0}'")]
    InvalidRangeError(String),

    /// The range resolves to no rows, so no header row is available
    #[error("Range '{0}' contains no rows")]
    EmptyRangeError(String),
}

/// An Excel-style rectangular range with optional boundaries.
///
/// Bounds are 0-based and inclusive on both ends. A `None` side is open and
/// clamps to the worksheet's populated extent at resolution time.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Range {
    /// Lower row bound (0-based index), None for unbounded
    pub row_lower_bound: Option<usize>,
    /// Upper row bound (0-based index), None for unbounded
    pub row_upper_bound: Option<usize>,
    /// Lower column bound (0-based index), None for unbounded
    pub col_lower_bound: Option<usize>,
    /// Upper column bound (0-based index), None for unbounded
    pub col_upper_bound: Option<usize>,
}

/// A fully resolved rectangle, 0-based inclusive bounds.
#[derive(Copy, Clone, Debug)]
pub(crate) struct Rectangle {
    pub(crate) row_lower: usize,
    pub(crate) row_upper: usize,
    pub(crate) col_lower: usize,
    pub(crate) col_upper: usize,
}

impl TryFrom<&str> for Range {
    type Error = RangeError;

    /// Parses A1 notation: a cell ("A1"), a rectangle ("A1:D10"), a column
    /// span ("A:D"), or a row span ("1:10"). Inverted boundaries are rejected
    /// together with malformed input, before any conversion takes place.
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let pattern = Regex::new(r"^([A-Z]*)(\d*)(:([A-Z]*)(\d*))?$").expect("Hardcode regex pattern");
        let invalid = || RangeError::InvalidRangeError(value.to_owned());
        let normalized = value.trim().to_ascii_uppercase();
        let captures = pattern.captures(normalized.as_str()).ok_or_else(invalid)?;

        let parse_col = |index: usize| -> Result<Option<usize>, RangeError> {
            match captures.get(index).map(|matcher| matcher.as_str()).unwrap_or("") {
                "" => Ok(None),
                label => col_to_index(label).map(Some).ok_or_else(invalid),
            }
        };
        let parse_row = |index: usize| -> Result<Option<usize>, RangeError> {
            match captures.get(index).map(|matcher| matcher.as_str()).unwrap_or("") {
                "" => Ok(None),
                label => row_to_index(label).map(Some).ok_or_else(invalid),
            }
        };

        let col_lower = parse_col(1)?;
        let row_lower = parse_row(2)?;
        let range = if captures.get(3).is_some() {
            Range {
                row_lower_bound: row_lower,
                row_upper_bound: parse_row(5)?,
                col_lower_bound: col_lower,
                col_upper_bound: parse_col(4)?,
            }
        } else {
            // No colon: the upper boundary collapses onto the lower one
            Range {
                row_lower_bound: row_lower,
                row_upper_bound: row_lower,
                col_lower_bound: col_lower,
                col_upper_bound: col_lower,
            }
        };

        // Each axis must be fully bounded or fully open, with at least one bounded
        let cols_bounded = range.col_lower_bound.is_some() && range.col_upper_bound.is_some();
        let cols_open = range.col_lower_bound.is_none() && range.col_upper_bound.is_none();
        let rows_bounded = range.row_lower_bound.is_some() && range.row_upper_bound.is_some();
        let rows_open = range.row_lower_bound.is_none() && range.row_upper_bound.is_none();
        if !(cols_bounded || cols_open) || !(rows_bounded || rows_open) || (cols_open && rows_open) {
            return Err(invalid());
        }

        let rows_inverted = range.row_lower_bound.zip(range.row_upper_bound)
            .map(|(lower, upper)| upper < lower)
            .unwrap_or(false);
        let cols_inverted = range.col_lower_bound.zip(range.col_upper_bound)
            .map(|(lower, upper)| upper < lower)
            .unwrap_or(false);
        if rows_inverted || cols_inverted {
            return Err(invalid());
        }

        Ok(range)
    }
}

impl Range {
    /// Resolves the range against a worksheet, clamping open sides to the
    /// populated extent. A side that cannot be resolved because the worksheet
    /// holds no cells yields `EmptyRangeError`.
    pub(crate) fn resolve(&self, sheet: &Worksheet) -> Result<Rectangle, RangeError> {
        let empty = || RangeError::EmptyRangeError(self.to_string());
        let row_lower = match self.row_lower_bound {
            Some(bound) => bound,
            None => sheet.row_bounds().ok_or_else(empty)?.0,
        };
        let row_upper = match self.row_upper_bound {
            Some(bound) => bound,
            None => sheet.row_bounds().ok_or_else(empty)?.1,
        };
        let col_lower = match self.col_lower_bound {
            Some(bound) => bound,
            None => sheet.col_bounds().ok_or_else(empty)?.0,
        };
        let col_upper = match self.col_upper_bound {
            Some(bound) => bound,
            None => sheet.col_bounds().ok_or_else(empty)?.1,
        };
        Ok(Rectangle { row_lower, row_upper, col_lower, col_upper })
    }
}

impl Display for Range {
    /// Renders the range back to A1 notation.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let side = |row: Option<usize>, col: Option<usize>| {
            let mut text = String::new();
            if let Some(col) = col {
                text.push_str(&index_to_col(col));
            }
            if let Some(row) = row {
                text.push_str(&(row + 1).to_string());
            }
            text
        };
        let lower = side(self.row_lower_bound, self.col_lower_bound);
        let upper = side(self.row_upper_bound, self.col_upper_bound);
        if self.row_lower_bound == self.row_upper_bound && self.col_lower_bound == self.col_upper_bound {
            write!(f, "{}", lower)
        } else {
            write!(f, "{}:{}", lower, upper)
        }
    }
}
