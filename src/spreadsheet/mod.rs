//! # Workbook Reading Module
//!
//! Reads Excel workbooks (`.xlsx`, `.xlsm`) directly from their ZIP container:
//! workbook metadata, shared strings, number formats, worksheet cells, and the
//! named-table definitions attached to each worksheet. Cell values come out
//! typed, honoring both the 1900 and 1904 date systems.

pub mod cell;
pub mod range;
pub(crate) mod reference;
pub mod sheet;
pub mod table;

use crate::error::SheetTablesError;
use crate::helpers::xml::XmlAttributeHelper;
use crate::helpers::xml::XmlNodeHelper;
use crate::helpers::xml::XmlReader;
use crate::helpers::xml::XmlTextContextHelper;
use crate::helpers::zip::ZipHelper;
use crate::match_xml_events;
use crate::spreadsheet::cell::Cell;
use crate::spreadsheet::cell::CellType;
use crate::spreadsheet::cell::CellValue;
use crate::spreadsheet::reference::index_to_reference;
use crate::spreadsheet::reference::reference_to_index;
use crate::spreadsheet::sheet::Worksheet;
use crate::spreadsheet::table::parse_table_definition;
use crate::spreadsheet::table::TableDefinition;
use crate::spreadsheet::table::TableError;
use quick_xml::events::Event;
use quick_xml::name::QName;
use std::borrow::Cow;
use std::collections::HashMap;
use std::ffi::OsStr;
use std::fs::File;
use std::io::BufRead;
use std::io::BufReader;
use std::io::Read;
use std::io::Seek;
use std::path::Path;
use thiserror::Error;
use zip::ZipArchive;

// XML tag names for the SpreadsheetML parts
const TAG_CUSTOM_FORMATS: QName = QName(b"numFmts");  // Custom number formats container
const TAG_CUSTOM_FORMAT: QName = QName(b"numFmt");    // Individual custom number format
const TAG_FORMAT_INDEXES: QName = QName(b"cellXfs");  // Cell format indexes container
const TAG_FORMAT_INDEX: QName = QName(b"xf");         // Individual cell format index
const TAG_SHARED_STRING_ITEM: QName = QName(b"si");   // Shared string table item
const TAG_PHONETIC_TEXT: QName = QName(b"rPh");       // Phonetic text for Asian languages
const TAG_TEXT: QName = QName(b"t");                  // Text content within strings
const TAG_WORKBOOK_PROPERTIES: QName = QName(b"workbookPr"); // Workbook properties
const TAG_SHEET: QName = QName(b"sheet");             // Worksheet definition
const TAG_ROW: QName = QName(b"row");                 // Row in worksheet
const TAG_CELL: QName = QName(b"c");                  // Cell in worksheet
const TAG_INLINE_STRING: QName = QName(b"is");        // Inline string value
const TAG_VALUE: QName = QName(b"v");                 // Cell value content

// Local names matched without their namespace prefix
const TAG_RELATIONSHIP: &[u8] = b"Relationship";
const TAG_TABLE_PART: &[u8] = b"tablePart";

/// Errors raised while reading a workbook container.
#[derive(Error, Debug)]
pub enum SpreadsheetError {
    /// Unsupported or unrecognized file extension
    #[error("Cannot detect file format for '{0}'")]
    UnsupportedFormatError(String),

    /// The workbook defines no worksheets
    #[error("Workbook '{0}' contains no worksheets")]
    EmptyWorkbookError(String),

    /// A required archive part is absent
    #[error("Missing workbook part '{0}'")]
    MissingPartError(String),

    /// The requested worksheet does not exist
    #[error("Worksheet '{0}' not found")]
    SheetNotFoundError(String),

    /// A cell value could not be converted to its declared type
    #[error("Invalid cell value in '{sheet}' at {position}: {message}")]
    CellValueError {
        sheet: String,
        position: String,
        message: String,
    },
}

/// Type alias for buffered file reading
pub type FileReader = BufReader<File>;

/// An opened Excel workbook.
///
/// Holds the ZIP archive and the metadata parsed once at open time: worksheet
/// names with their part paths (in workbook order), the shared string table,
/// and the number-format classification per cell style.
#[derive(Debug)]
pub struct Workbook<RS: Read + Seek> {
    name: String,
    zip: ZipArchive<RS>,
    sheets: Vec<(String, String)>,
    shared_strings: Vec<String>,
    number_formats: Vec<CellType>,
}

impl Workbook<FileReader> {
    /// Opens a workbook file, detecting the format from the file extension.
    /// Only `.xlsx` and `.xlsm` files are accepted.
    pub fn open<P>(path: P) -> Result<Workbook<FileReader>, SheetTablesError>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        match path.extension().and_then(OsStr::to_str) {
            Some("xlsx") | Some("xlsm") => (),
            _ => Err(SpreadsheetError::UnsupportedFormatError(
                path.to_string_lossy().to_string(),
            ))?,
        }
        let file = File::open(path)?;
        Workbook::from_reader(&path.to_string_lossy(), BufReader::new(file))
    }
}

impl<RS: Read + Seek> Workbook<RS> {
    /// Opens a workbook from any seekable reader; `name` is used in
    /// diagnostics only. Tests feed in-memory archives through this.
    pub fn from_reader(name: &str, reader: RS) -> Result<Workbook<RS>, SheetTablesError> {
        let mut zip = ZipArchive::new(reader)?;
        let (sheets, is_1904) = load_workbook(&mut zip)?;
        if sheets.is_empty() {
            Err(SpreadsheetError::EmptyWorkbookError(name.to_owned()))?
        }
        let shared_strings = load_shared_strings(&mut zip)?;
        let number_formats = load_number_formats(&mut zip, is_1904)?;
        log::debug!("opened workbook '{}' with {} worksheets", name, sheets.len());
        Ok(Workbook {
            name: name.to_owned(),
            zip,
            sheets,
            shared_strings,
            number_formats,
        })
    }

    /// Returns the workbook name given at open time.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the names of all worksheets, in workbook order.
    pub fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|(name, _)| name.to_owned()).collect()
    }

    fn sheet_part(&self, sheet_name: &str) -> Result<String, SpreadsheetError> {
        self.sheets
            .iter()
            .find(|(name, _)| name == sheet_name)
            .map(|(_, part)| part.to_owned())
            .ok_or_else(|| SpreadsheetError::SheetNotFoundError(sheet_name.to_owned()))
    }

    /// Parses one worksheet part into an in-memory `Worksheet`.
    ///
    /// Shared string references resolve against the workbook's string table;
    /// cells without an explicit position fall back to positional counting.
    pub fn read_sheet(&mut self, sheet_name: &str) -> Result<Worksheet, SheetTablesError> {
        let part = self.sheet_part(sheet_name)?;
        let mut reader = self
            .zip
            .xml_reader(&part)?
            .ok_or_else(|| SpreadsheetError::MissingPartError(part.to_owned()))?;

        let mut sheet = Worksheet::new(sheet_name);
        let mut row_count = 0usize;
        let mut col_count = 0usize;
        let mut row = 0usize;
        let mut col = 0usize;
        let mut kind = CellType::default();
        let mut value = String::new();
        match_xml_events!(reader => {
            Event::End(event) if event.name() == TAG_ROW => {
                row_count += 1;
                col_count = 0;
            }
            Event::Start(event) if event.name() == TAG_CELL => {
                (row, col) = event.get_attribute_value("r")?
                    .and_then(|reference| reference_to_index(&reference))
                    .unwrap_or((row_count, col_count));
                col_count += 1;
                kind = event.get_attribute_value("t")?.map(|t| {
                    match t.as_ref() {
                        "inlineStr" | "str" => CellType::InlineString,
                        "s" => CellType::SharedString,
                        "d" => CellType::IsoDateTime,
                        "b" => CellType::Boolean,
                        "e" => CellType::Error,
                        _ => CellType::Number,
                    }
                }).unwrap_or(CellType::Number);
                if let Some(format_id) = event.get_attribute_value("s")? {
                    if kind == CellType::Number && !format_id.is_empty() {
                        let index = format_id.parse::<usize>()?;
                        kind = self.number_formats.get(index).copied().unwrap_or(CellType::Number);
                    }
                }
            }
            Event::Start(event) if kind != CellType::Empty && event.name() == TAG_INLINE_STRING => {
                value = read_string_value(&mut reader, TAG_INLINE_STRING, false)?;
            }
            Event::Start(event) if kind != CellType::Empty && event.name() == TAG_VALUE => {
                value = read_string_value(&mut reader, TAG_VALUE, true)?;
            }
            Event::End(event) if kind != CellType::Empty && !value.is_empty() && event.name() == TAG_CELL => {
                let raw = if kind == CellType::SharedString {
                    let index = value.parse::<usize>()?;
                    self.shared_strings.get(index).cloned().unwrap_or_default()
                } else {
                    value.to_owned()
                };
                let cell_value = CellValue::from_raw(kind, &raw)
                    .map_err(|error| SpreadsheetError::CellValueError {
                        sheet: sheet_name.to_owned(),
                        position: index_to_reference(row, col),
                        message: error.to_string(),
                    })?;
                sheet.push(Cell { row, col, value: cell_value });
                value.clear();
            }
        });
        Ok(sheet)
    }

    /// Lists the named tables defined on one worksheet.
    ///
    /// The worksheet part names its table parts by relationship id; the ids
    /// resolve through the sheet's relationship part.
    pub fn table_definitions(&mut self, sheet_name: &str) -> Result<Vec<TableDefinition>, SheetTablesError> {
        let part = self.sheet_part(sheet_name)?;
        let mut reader = self
            .zip
            .xml_reader(&part)?
            .ok_or_else(|| SpreadsheetError::MissingPartError(part.to_owned()))?;

        let mut ids = Vec::<String>::new();
        match_xml_events!(reader => {
            Event::Start(event) if event.local_name().as_ref() == TAG_TABLE_PART => {
                for result in event.attributes() {
                    let attribute = result?;
                    if attribute.key.local_name().as_ref() == b"id" {
                        ids.push(attribute.get_value()?.to_string());
                    }
                }
            }
        });
        drop(reader);
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let relationships = load_relationships(&mut self.zip, &rels_path(&part), &part, "/table")?;
        let mut definitions = Vec::<TableDefinition>::new();
        for id in ids {
            let table_part = relationships
                .get(&id)
                .ok_or_else(|| TableError::DanglingTablePartError(sheet_name.to_owned(), id.to_owned()))?;
            let mut reader = self
                .zip
                .xml_reader(table_part)?
                .ok_or_else(|| SpreadsheetError::MissingPartError(table_part.to_owned()))?;
            definitions.push(parse_table_definition(&mut reader, table_part)?);
        }
        log::debug!(
            "worksheet '{}' defines {} named tables",
            sheet_name,
            definitions.len(),
        );
        Ok(definitions)
    }
}

/// Loads worksheet names and part paths from the workbook part, plus the
/// 1904 date-system flag. Sheets without a relationship target are skipped.
fn load_workbook<RS: Read + Seek>(
    zip: &mut ZipArchive<RS>,
) -> Result<(Vec<(String, String)>, bool), SheetTablesError> {
    let relationships = load_relationships(zip, "xl/_rels/workbook.xml.rels", "xl/workbook.xml", "/worksheet")?;
    let mut reader = zip
        .xml_reader("xl/workbook.xml")?
        .ok_or_else(|| SpreadsheetError::MissingPartError("xl/workbook.xml".to_string()))?;
    let mut sheets: Vec<(String, String)> = Vec::new();
    let mut is_1904 = false;
    match_xml_events!(reader => {
        Event::Start(event) if event.name() == TAG_SHEET => {
            let mut name = None::<Cow<str>>;
            let mut id = None::<Cow<str>>;
            for result in event.attributes() {
                let attribute = result?;
                let key = attribute.key.local_name();
                if key.as_ref() == b"name" {
                    name = Some(attribute.get_value()?);
                } else if key.as_ref() == b"id" {
                    id = Some(attribute.get_value()?);
                }
            }
            if let Some((name, id)) = name.zip(id) {
                if let Some(part) = relationships.get(&id.to_string()) {
                    sheets.push((name.to_string(), part.to_owned()));
                } else {
                    log::warn!("worksheet '{}' has no relationship target, skipped", name);
                }
            }
        }
        Event::Start(event) if event.name() == TAG_WORKBOOK_PROPERTIES => {
            is_1904 = event.get_attribute_value("date1904")?
                .map(|value| value.eq("1") || value.eq("true"))
                .unwrap_or(false);
        }
    });
    Ok((sheets, is_1904))
}

/// Loads a relationship part, keeping relationships whose type ends with
/// `kind_suffix`. Targets resolve relative to `base_part`. A missing
/// relationship part yields an empty mapping.
fn load_relationships<RS: Read + Seek>(
    zip: &mut ZipArchive<RS>,
    rels_part: &str,
    base_part: &str,
    kind_suffix: &str,
) -> Result<HashMap<String, String>, SheetTablesError> {
    let mut reader = match zip.xml_reader(rels_part)? {
        Some(reader) => reader,
        None => return Ok(HashMap::new()),
    };
    let mut relationships: HashMap<String, String> = HashMap::new();
    match_xml_events!(reader => {
        Event::Start(event) if event.local_name().as_ref() == TAG_RELATIONSHIP => {
            let id = event.get_attribute_value("Id")?;
            let kind = event.get_attribute_value("Type")?;
            let target = event.get_attribute_value("Target")?;
            if kind.map(|it| it.ends_with(kind_suffix)).unwrap_or(true) {
                if let Some((id, target)) = id.zip(target) {
                    relationships.insert(id.to_string(), resolve_part_path(base_part, &target));
                }
            }
        }
    });
    Ok(relationships)
}

/// Loads number-format classifications from the styles part, one entry per
/// cell style index. A missing styles part yields no classifications.
fn load_number_formats<RS: Read + Seek>(
    zip: &mut ZipArchive<RS>,
    is_1904: bool,
) -> Result<Vec<CellType>, SheetTablesError> {
    let mut reader = match zip.xml_reader("xl/styles.xml")? {
        Some(reader) => reader,
        None => return Ok(Vec::new()),
    };

    let mut custom_formats_context = false;
    let mut custom_formats = HashMap::<String, CellType>::new();

    let mut format_indexes_context = false;
    let mut format_indexes = Vec::<String>::new();

    match_xml_events!(reader => {
        Event::Start(event) if !custom_formats_context && event.name() == TAG_CUSTOM_FORMATS => {
            custom_formats_context = true;
        }
        Event::End(event) if custom_formats_context && event.name() == TAG_CUSTOM_FORMATS => {
            custom_formats_context = false;
        }
        Event::Start(event) if custom_formats_context && event.name() == TAG_CUSTOM_FORMAT => {
            let id = event.get_attribute_value("numFmtId")?;
            let format = event.get_attribute_value("formatCode")?;
            if let Some((id, format)) = id.zip(format) {
                let kind = CellType::parse_custom_number_format(&format, is_1904);
                custom_formats.insert(id.to_string(), kind);
            }
        }

        Event::Start(event) if !format_indexes_context && event.name() == TAG_FORMAT_INDEXES => {
            format_indexes_context = true;
        }
        Event::End(event) if format_indexes_context && event.name() == TAG_FORMAT_INDEXES => {
            format_indexes_context = false;
        }
        Event::Start(event) if format_indexes_context && event.name() == TAG_FORMAT_INDEX => {
            if let Some(id) = event.get_attribute_value("numFmtId")? {
                format_indexes.push(id.to_string());
            }
        }
    });

    Ok(format_indexes
        .iter()
        .map(|id| {
            custom_formats
                .get(id)
                .copied()
                .or_else(|| CellType::parse_builtin_number_format_id(id, is_1904))
                .unwrap_or(CellType::Number)
        })
        .collect())
}

/// Loads the shared string table; absent part means no shared strings.
fn load_shared_strings<RS: Read + Seek>(
    zip: &mut ZipArchive<RS>,
) -> Result<Vec<String>, SheetTablesError> {
    let mut reader = match zip.xml_reader("xl/sharedStrings.xml")? {
        Some(reader) => reader,
        None => return Ok(Vec::new()),
    };
    let mut shared_strings = Vec::<String>::new();
    match_xml_events!(reader => {
        Event::Start(event) if event.name() == TAG_SHARED_STRING_ITEM => {
            shared_strings.push(read_string_value(&mut reader, TAG_SHARED_STRING_ITEM, false)?);
        }
    });
    Ok(shared_strings)
}

/// Reads string content up to `end_tag`, skipping phonetic annotations and
/// resolving entity and character references.
fn read_string_value<R: BufRead>(
    reader: &mut XmlReader<R>,
    end_tag: QName,
    is_text_content: bool,
) -> Result<String, SheetTablesError> {
    let mut is_phonetic_text = false;
    let mut is_text = is_text_content;
    let mut text = String::new();
    match_xml_events!(reader => {
        Event::End(event) if event.name() == end_tag => break,
        Event::Start(event) if event.name() == TAG_PHONETIC_TEXT => is_phonetic_text = true,
        Event::End(event) if event.name() == TAG_PHONETIC_TEXT => is_phonetic_text = false,
        Event::Start(event) if !is_phonetic_text && event.name() == TAG_TEXT => is_text = true,
        Event::End(event) if is_text && event.name() == TAG_TEXT => is_text = false,
        Event::Text(event) if is_text => text.push_bytes_text(&event)?,
        Event::CData(event) if is_text => text.push_str(&event.xml_content()?),
        Event::GeneralRef(event) if is_text => text.push_bytes_ref(&event)?,
    });
    Ok(text)
}

/// Computes the relationship part path for an archive part
/// ("xl/worksheets/sheet1.xml" -> "xl/worksheets/_rels/sheet1.xml.rels").
fn rels_path(part: &str) -> String {
    match part.rsplit_once('/') {
        Some((directory, file)) => format!("{directory}/_rels/{file}.rels"),
        None => format!("_rels/{part}.rels"),
    }
}

/// Resolves a relationship target against the part that declares it.
/// Absolute targets strip their leading slash; relative targets resolve
/// `.` and `..` segments against the base part's directory.
fn resolve_part_path(base_part: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_owned();
    }
    let mut segments: Vec<&str> = base_part.split('/').collect();
    segments.pop();
    for segment in target.split('/') {
        match segment {
            ".." => {
                segments.pop();
            }
            "." => (),
            segment => segments.push(segment),
        }
    }
    segments.join("/")
}

#[cfg(test)]
pub(crate) mod fixtures {
    use std::io::Cursor;
    use std::io::Write;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    /// Builds an in-memory ZIP archive from (part name, content) pairs.
    pub(crate) fn archive(parts: &[(&str, &str)]) -> Cursor<Vec<u8>> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();
        for (name, content) in parts {
            writer.start_file(*name, options).expect(name);
            writer.write_all(content.as_bytes()).expect(name);
        }
        let mut cursor = writer.finish().expect("finish archive");
        cursor.set_position(0);
        cursor
    }

    pub(crate) const WORKBOOK: &str = concat!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
        r#"<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main""#,
        r#" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#,
        r#"<workbookPr/>"#,
        r#"<sheets>"#,
        r#"<sheet name="EC Tasks" sheetId="1" r:id="rId1"/>"#,
        r#"<sheet name="Summary" sheetId="2" r:id="rId2"/>"#,
        r#"</sheets>"#,
        r#"</workbook>"#,
    );

    pub(crate) const WORKBOOK_RELS: &str = concat!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
        r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
        r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/>"#,
        r#"<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet2.xml"/>"#,
        r#"</Relationships>"#,
    );

    pub(crate) const SHARED_STRINGS: &str = concat!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
        r#"<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" count="4" uniqueCount="4">"#,
        r#"<si><t>Name</t></si>"#,
        r#"<si><t>Age</t></si>"#,
        r#"<si><t>Alice</t></si>"#,
        r#"<si><t>Bob</t></si>"#,
        r#"</sst>"#,
    );

    pub(crate) const STYLES: &str = concat!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
        r#"<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#,
        r#"<numFmts count="1"><numFmt numFmtId="164" formatCode="yyyy-mm-dd"/></numFmts>"#,
        r#"<cellXfs count="2"><xf numFmtId="0"/><xf numFmtId="164"/></cellXfs>"#,
        r#"</styleSheet>"#,
    );

    pub(crate) const SHEET1: &str = concat!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
        r#"<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main""#,
        r#" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#,
        r#"<sheetData>"#,
        r#"<row r="1"><c r="A1" t="s"><v>0</v></c><c r="B1" t="s"><v>1</v></c></row>"#,
        r#"<row r="2"><c r="A2" t="s"><v>2</v></c><c r="B2"><v>30</v></c></row>"#,
        r#"<row r="3"><c r="A3" t="s"><v>3</v></c><c r="B3"><v>25</v></c></row>"#,
        r#"</sheetData>"#,
        r#"<tableParts count="1"><tablePart r:id="rId1"/></tableParts>"#,
        r#"</worksheet>"#,
    );

    pub(crate) const SHEET1_RELS: &str = concat!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
        r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
        r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/table" Target="../tables/table1.xml"/>"#,
        r#"</Relationships>"#,
    );

    pub(crate) const TABLE1: &str = concat!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
        r#"<table xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main""#,
        r#" id="1" name="TasksList" displayName="TasksList" ref="A1:B3" headerRowCount="1">"#,
        r#"<tableColumns count="2">"#,
        r#"<tableColumn id="1" name="Name"/><tableColumn id="2" name="Age"/>"#,
        r#"</tableColumns>"#,
        r#"</table>"#,
    );

    pub(crate) const SHEET2: &str = concat!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
        r#"<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#,
        r#"<sheetData>"#,
        r#"<row r="1"><c r="A1" t="str"><v>When</v></c><c r="B1" t="b"><v>1</v></c></row>"#,
        r#"<row r="2"><c r="A2" s="1"><v>25569</v></c><c r="B2" t="e"><v>#N/A</v></c></row>"#,
        r#"</sheetData>"#,
        r#"</worksheet>"#,
    );

    /// The standard two-sheet fixture: one sheet with a named table, one with
    /// typed scalar cells.
    pub(crate) fn workbook_archive() -> Cursor<Vec<u8>> {
        archive(&[
            ("xl/workbook.xml", WORKBOOK),
            ("xl/_rels/workbook.xml.rels", WORKBOOK_RELS),
            ("xl/sharedStrings.xml", SHARED_STRINGS),
            ("xl/styles.xml", STYLES),
            ("xl/worksheets/sheet1.xml", SHEET1),
            ("xl/worksheets/_rels/sheet1.xml.rels", SHEET1_RELS),
            ("xl/tables/table1.xml", TABLE1),
            ("xl/worksheets/sheet2.xml", SHEET2),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::archive;
    use super::fixtures::workbook_archive;
    use super::*;
    use chrono::NaiveDate;

    fn workbook() -> Workbook<std::io::Cursor<Vec<u8>>> {
        Workbook::from_reader("fixture.xlsx", workbook_archive()).expect("open fixture")
    }

    #[test]
    fn sheet_names_keep_workbook_order() {
        assert_eq!(workbook().sheet_names(), vec!["EC Tasks", "Summary"]);
    }

    #[test]
    fn read_sheet_resolves_shared_strings() {
        let mut workbook = workbook();
        let sheet = workbook.read_sheet("EC Tasks").unwrap();

        assert_eq!(sheet.value_at(0, 0), CellValue::Text("Name".to_owned()));
        assert_eq!(sheet.value_at(0, 1), CellValue::Text("Age".to_owned()));
        assert_eq!(sheet.value_at(1, 0), CellValue::Text("Alice".to_owned()));
        assert_eq!(sheet.value_at(1, 1), CellValue::Number(30.0));
        assert_eq!(sheet.value_at(2, 0), CellValue::Text("Bob".to_owned()));
        assert_eq!(sheet.value_at(2, 1), CellValue::Number(25.0));
    }

    #[test]
    fn read_sheet_types_scalar_cells() {
        let mut workbook = workbook();
        let sheet = workbook.read_sheet("Summary").unwrap();

        assert_eq!(sheet.value_at(0, 0), CellValue::Text("When".to_owned()));
        assert_eq!(sheet.value_at(0, 1), CellValue::Bool(true));
        assert_eq!(
            sheet.value_at(1, 0),
            CellValue::Date(NaiveDate::from_ymd_opt(1970, 1, 1).unwrap()),
        );
        assert_eq!(sheet.value_at(1, 1), CellValue::Error("#N/A".to_owned()));
    }

    #[test]
    fn read_sheet_counts_unreferenced_cells() {
        let source = archive(&[
            ("xl/workbook.xml", fixtures::WORKBOOK),
            ("xl/_rels/workbook.xml.rels", fixtures::WORKBOOK_RELS),
            (
                "xl/worksheets/sheet1.xml",
                concat!(
                    r#"<worksheet><sheetData>"#,
                    r#"<row><c t="inlineStr"><is><t>alpha</t></is></c><c><v>1</v></c></row>"#,
                    r#"<row><c><v>2</v></c></row>"#,
                    r#"</sheetData></worksheet>"#,
                ),
            ),
            ("xl/worksheets/sheet2.xml", r#"<worksheet><sheetData/></worksheet>"#),
        ]);
        let mut workbook = Workbook::from_reader("positional.xlsx", source).unwrap();
        let sheet = workbook.read_sheet("EC Tasks").unwrap();

        assert_eq!(sheet.value_at(0, 0), CellValue::Text("alpha".to_owned()));
        assert_eq!(sheet.value_at(0, 1), CellValue::Number(1.0));
        assert_eq!(sheet.value_at(1, 0), CellValue::Number(2.0));
    }

    #[test]
    fn read_sheet_unknown_name() {
        let mut workbook = workbook();
        let error = workbook.read_sheet("Missing").unwrap_err();
        assert!(matches!(
            error,
            SheetTablesError::SpreadsheetError(SpreadsheetError::SheetNotFoundError(_)),
        ));
    }

    #[test]
    fn table_definitions_resolve_through_rels() {
        let mut workbook = workbook();
        let definitions = workbook.table_definitions("EC Tasks").unwrap();

        assert_eq!(definitions.len(), 1);
        assert_eq!(definitions[0].name, "TasksList");
        assert_eq!(definitions[0].reference.to_string(), "A1:B3");
        assert_eq!(definitions[0].header_rows, 1);
    }

    #[test]
    fn table_definitions_empty_without_table_parts() {
        let mut workbook = workbook();
        assert!(workbook.table_definitions("Summary").unwrap().is_empty());
    }

    #[test]
    fn open_rejects_unknown_extensions() {
        let error = Workbook::open("lab_data.csv").unwrap_err();
        assert!(matches!(
            error,
            SheetTablesError::SpreadsheetError(SpreadsheetError::UnsupportedFormatError(_)),
        ));
    }

    #[test]
    fn from_reader_rejects_sheetless_workbooks() {
        let source = archive(&[
            ("xl/workbook.xml", r#"<workbook><sheets/></workbook>"#),
            ("xl/_rels/workbook.xml.rels", fixtures::WORKBOOK_RELS),
        ]);
        let error = Workbook::from_reader("empty.xlsx", source).unwrap_err();
        assert!(matches!(
            error,
            SheetTablesError::SpreadsheetError(SpreadsheetError::EmptyWorkbookError(_)),
        ));
    }

    #[test]
    fn part_path_resolution() {
        assert_eq!(resolve_part_path("xl/workbook.xml", "worksheets/sheet1.xml"), "xl/worksheets/sheet1.xml");
        assert_eq!(resolve_part_path("xl/worksheets/sheet1.xml", "../tables/table1.xml"), "xl/tables/table1.xml");
        assert_eq!(resolve_part_path("xl/worksheets/sheet1.xml", "/xl/tables/table1.xml"), "xl/tables/table1.xml");
        assert_eq!(resolve_part_path("xl/workbook.xml", "./worksheets/sheet1.xml"), "xl/worksheets/sheet1.xml");
        assert_eq!(rels_path("xl/worksheets/sheet1.xml"), "xl/worksheets/_rels/sheet1.xml.rels");
        assert_eq!(rels_path("xl/workbook.xml"), "xl/_rels/workbook.xml.rels");
    }
}
