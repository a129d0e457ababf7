//! Generic row/column records extracted from worksheet ranges.

use crate::error::SheetTablesError;
use crate::spreadsheet::cell::CellValue;
use crate::spreadsheet::range::Range;
use crate::spreadsheet::range::RangeError;
use crate::spreadsheet::sheet::Worksheet;

/// Column-labeled, row-ordered records extracted from a worksheet range.
///
/// Labels come from the range's first row in left-to-right order, used as-is:
/// duplicate or empty labels pass through unchanged. Every following row
/// becomes one record. The structure owns its values and keeps no reference
/// to the originating worksheet.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DataTable {
    labels: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl DataTable {
    /// Converts the worksheet cells within `range` into records, first row as
    /// header. A header-only range yields a table with zero records; a range
    /// without any rows yields `EmptyRangeError`.
    pub fn from_range(sheet: &Worksheet, range: &Range) -> Result<DataTable, RangeError> {
        let rectangle = range.resolve(sheet)?;
        let mut rows = sheet.rows(rectangle);
        let labels = match rows.next() {
            Some(header) => header.iter().map(|value| value.to_string()).collect(),
            None => return Err(RangeError::EmptyRangeError(range.to_string())),
        };
        let records = rows.collect();
        Ok(DataTable {
            labels,
            rows: records,
        })
    }

    /// Column labels, left-to-right.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Number of records (header row excluded).
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when the table holds no records.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Gets one record by 0-based position.
    pub fn record(&self, index: usize) -> Option<Record<'_>> {
        self.rows.get(index).map(|cells| Record {
            labels: &self.labels,
            cells,
        })
    }

    /// Iterates the records in source-row order.
    pub fn records(&self) -> impl Iterator<Item = Record<'_>> + '_ {
        self.rows.iter().map(|cells| Record {
            labels: &self.labels,
            cells,
        })
    }
}

/// One record of a `DataTable`: positional cells with by-label access.
#[derive(Copy, Clone, Debug)]
pub struct Record<'a> {
    labels: &'a [String],
    cells: &'a [CellValue],
}

impl<'a> Record<'a> {
    /// Gets a value by column label; the first match wins for duplicates.
    pub fn get(&self, label: &str) -> Option<&'a CellValue> {
        self.labels
            .iter()
            .position(|candidate| candidate == label)
            .and_then(|index| self.cells.get(index))
    }

    /// Gets a value by 0-based column position.
    pub fn at(&self, index: usize) -> Option<&'a CellValue> {
        self.cells.get(index)
    }

    /// All values in column order.
    pub fn cells(&self) -> &'a [CellValue] {
        self.cells
    }
}

/// Converts the worksheet cells within the A1-style `reference` into a
/// column-labeled table, treating the first row as the header.
pub fn range_to_table(sheet: &Worksheet, reference: &str) -> Result<DataTable, SheetTablesError> {
    let range = Range::try_from(reference)?;
    Ok(DataTable::from_range(sheet, &range)?)
}
