//! Workbook importing: canonical path handling, worksheet selection, and the
//! one-shot build of the worksheet → table → records mapping.

use crate::dataset::DataTable;
use crate::error::ResultMessage;
use crate::error::SheetTablesError;
use crate::spreadsheet::sheet::Worksheet;
use crate::spreadsheet::SpreadsheetError;
use crate::spreadsheet::Workbook;
use glob::Pattern;
use indexmap::IndexMap;
use std::io::Read;
use std::io::Seek;
use std::path::Path;
use std::path::PathBuf;

/// Options controlling which worksheets an importer loads.
#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    /// Sheet name patterns; None loads every worksheet.
    pub sheet_patterns: Option<Vec<Pattern>>,
}

impl LoadOptions {
    /// Checks if a sheet name matches the selection patterns.
    /// Returns true if no patterns are specified or if any pattern matches.
    pub(crate) fn accept(&self, sheet_name: &str) -> bool {
        if let Some(patterns) = &self.sheet_patterns {
            patterns.iter().any(|pattern| pattern.matches(sheet_name))
        } else {
            true
        }
    }
}

/// Imports an Excel workbook from a canonical, immutable path.
///
/// Any accepted path representation is normalized once at construction time,
/// and the file extension is validated before any I/O happens.
#[derive(Clone, Debug)]
pub struct XlsxImporter {
    path: PathBuf,
    options: LoadOptions,
}

impl XlsxImporter {
    /// Creates an importer loading every worksheet.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<XlsxImporter, SheetTablesError> {
        XlsxImporter::with_options(path, LoadOptions::default())
    }

    /// Creates an importer with explicit load options.
    pub fn with_options<P: AsRef<Path>>(
        path: P,
        options: LoadOptions,
    ) -> Result<XlsxImporter, SheetTablesError> {
        let path = path.as_ref();
        match path.extension().and_then(|extension| extension.to_str()) {
            Some("xlsx") | Some("xlsm") => (),
            _ => Err(SpreadsheetError::UnsupportedFormatError(
                path.to_string_lossy().to_string(),
            ))?,
        }
        Ok(XlsxImporter {
            path: path.to_path_buf(),
            options,
        })
    }

    /// The canonical workbook path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Opens the workbook and extracts every selected worksheet together with
    /// its named tables.
    pub fn load(&self) -> Result<WorkbookContents, SheetTablesError> {
        let mut workbook = Workbook::open(&self.path)
            .with_prefix("Open workbook failed")?;
        WorkbookContents::from_workbook(&mut workbook, &self.options)
    }
}

/// An immutable snapshot of a workbook: every selected worksheet plus the
/// explicit two-level mapping worksheet name → table name → records.
#[derive(Debug, Default)]
pub struct WorkbookContents {
    worksheets: IndexMap<String, Worksheet>,
    tables: IndexMap<String, IndexMap<String, DataTable>>,
}

impl WorkbookContents {
    /// Builds the snapshot in a single pass over the workbook: every selected
    /// worksheet is read once, and each of its named tables converts to
    /// records against that worksheet.
    pub fn from_workbook<RS: Read + Seek>(
        workbook: &mut Workbook<RS>,
        options: &LoadOptions,
    ) -> Result<WorkbookContents, SheetTablesError> {
        let mut worksheets = IndexMap::new();
        let mut tables = IndexMap::new();
        for sheet_name in workbook.sheet_names() {
            if !options.accept(&sheet_name) {
                continue;
            }
            let worksheet = workbook.read_sheet(&sheet_name)?;
            let mut sheet_tables = IndexMap::new();
            for definition in workbook.table_definitions(&sheet_name)? {
                let table = DataTable::from_range(&worksheet, &definition.reference)?;
                sheet_tables.insert(definition.name.to_owned(), table);
            }
            tables.insert(sheet_name.to_owned(), sheet_tables);
            worksheets.insert(sheet_name, worksheet);
        }
        log::debug!("loaded {} worksheets from '{}'", worksheets.len(), workbook.name());
        Ok(WorkbookContents { worksheets, tables })
    }

    /// Worksheet names in workbook order.
    pub fn sheet_names(&self) -> Vec<String> {
        self.worksheets.keys().map(|name| name.to_owned()).collect()
    }

    /// Gets a loaded worksheet by name.
    pub fn worksheet(&self, sheet_name: &str) -> Option<&Worksheet> {
        self.worksheets.get(sheet_name)
    }

    /// Gets the named tables of one worksheet, in definition order.
    pub fn tables(&self, sheet_name: &str) -> Option<&IndexMap<String, DataTable>> {
        self.tables.get(sheet_name)
    }

    /// Gets one named table.
    pub fn table(&self, sheet_name: &str, table_name: &str) -> Option<&DataTable> {
        self.tables.get(sheet_name)?.get(table_name)
    }
}
