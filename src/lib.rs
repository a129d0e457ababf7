//! # sheet_tables
//!
//! A data-loading convenience library for laboratory spreadsheet files. It opens
//! an Excel workbook, enumerates its worksheets, discovers the named tables
//! defined on each worksheet, and converts every table's rectangular cell range
//! into generic row/column records for downstream analysis.
//!
//! ## Features
//!
//! - **Native workbook reading**: `.xlsx` and `.xlsm` files are read directly
//!   from their ZIP container, no external spreadsheet engine required
//! - **Named-table discovery**: table definitions are resolved through the
//!   worksheet relationship parts, exactly as the workbook records them
//! - **Typed cell values**: Bool, Number, Text, Date, Time, DateTime and Error
//!   values, honoring both the 1900 and 1904 date systems
//! - **Range extraction**: any A1-style rectangular range converts to a
//!   column-labeled table, first row as header
//! - **Ordered results**: worksheets and tables keep workbook order
//!
//! ## Example
//!
//! ```no_run
//! use sheet_tables::XlsxImporter;
//!
//! # fn main() -> Result<(), sheet_tables::SheetTablesError> {
//! let contents = XlsxImporter::new("lab_data.xlsx")?.load()?;
//! let tasks = contents.table("EC Tasks", "TasksList").expect("table exists");
//! for record in tasks.records() {
//!     println!("{:?}", record.get("Name"));
//! }
//! # Ok(())
//! # }
//! ```

mod error;

pub mod helpers;

pub mod dataset;
pub mod importer;
pub mod spreadsheet;

pub use crate::dataset::{range_to_table, DataTable, Record};
pub use crate::error::{ResultMessage, SheetTablesError};
pub use crate::importer::{LoadOptions, WorkbookContents, XlsxImporter};
pub use crate::spreadsheet::cell::{Cell, CellValue};
pub use crate::spreadsheet::range::{Range, RangeError};
pub use crate::spreadsheet::sheet::Worksheet;
pub use crate::spreadsheet::table::TableDefinition;
pub use crate::spreadsheet::{SpreadsheetError, Workbook};
