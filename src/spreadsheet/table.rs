use crate::error::SheetTablesError;
use crate::helpers::xml::XmlNodeHelper;
use crate::helpers::xml::XmlReader;
use crate::match_xml_events;
use crate::spreadsheet::range::Range;
use quick_xml::events::Event;
use quick_xml::name::QName;
use std::borrow::Cow;
use std::io::BufRead;
use thiserror::Error;

const TAG_TABLE: QName = QName(b"table");

/// Errors raised while reading named-table definitions.
#[derive(Error, Debug)]
pub enum TableError {
    #[error("Table part '{0}' contains no table element")]
    MissingTableError(String),

    #[error("Table part '{0}' is missing its name")]
    MissingNameError(String),

    #[error("Table part '{0}' is missing its range reference")]
    MissingReferenceError(String),

    #[error("Worksheet '{0}' references unknown table part '{1}'")]
    DanglingTablePartError(String, String),
}

/// A named table as its worksheet defines it: a worksheet-scoped name and the
/// rectangular range holding the header row and data rows.
#[derive(Clone, Debug)]
pub struct TableDefinition {
    /// Table name, unique within the workbook
    pub name: String,
    /// Name shown in formulas and the UI
    pub display_name: String,
    /// Cell range covered by the table, header row included
    pub reference: Range,
    /// Number of header rows recorded by the workbook (usually 1)
    pub header_rows: usize,
}

/// Reads one table definition from a table part.
pub(crate) fn parse_table_definition<R: BufRead>(
    reader: &mut XmlReader<R>,
    part: &str,
) -> Result<TableDefinition, SheetTablesError> {
    let mut definition = None;
    match_xml_events!(reader => {
        Event::Start(event) if event.name() == TAG_TABLE => {
            let name = event.get_attribute_value("name")?
                .map(Cow::into_owned)
                .ok_or_else(|| TableError::MissingNameError(part.to_owned()))?;
            let reference = event.get_attribute_value("ref")?
                .ok_or_else(|| TableError::MissingReferenceError(part.to_owned()))?;
            let reference = Range::try_from(reference.as_ref())?;
            let display_name = event.get_attribute_value("displayName")?
                .map(Cow::into_owned)
                .unwrap_or_else(|| name.to_owned());
            let header_rows = event.parse_attribute_value::<usize>("headerRowCount")?.unwrap_or(1);
            definition = Some(TableDefinition {
                name,
                display_name,
                reference,
                header_rows,
            });
            break;
        }
    });
    definition.ok_or_else(|| TableError::MissingTableError(part.to_owned()).into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(xml: &str) -> Result<TableDefinition, SheetTablesError> {
        let mut reader = XmlReader::new(xml.as_bytes());
        parse_table_definition(&mut reader, "xl/tables/table1.xml")
    }

    #[test]
    fn parse_full_definition() {
        let definition = parse(concat!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
            r#"<table xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main""#,
            r#" id="1" name="TasksList" displayName="Tasks_List" ref="A1:B3" headerRowCount="1">"#,
            r#"<tableColumns count="2">"#,
            r#"<tableColumn id="1" name="Name"/><tableColumn id="2" name="Age"/>"#,
            r#"</tableColumns></table>"#,
        )).unwrap();

        assert_eq!(definition.name, "TasksList");
        assert_eq!(definition.display_name, "Tasks_List");
        assert_eq!(definition.reference, Range::try_from("A1:B3").unwrap());
        assert_eq!(definition.header_rows, 1);
    }

    #[test]
    fn parse_defaults() {
        let definition = parse(r#"<table name="Other" ref="C2:D2"/>"#).unwrap();

        assert_eq!(definition.display_name, "Other");
        assert_eq!(definition.header_rows, 1);
    }

    #[test]
    fn parse_missing_name() {
        let error = parse(r#"<table ref="A1:B3"/>"#).unwrap_err();
        assert!(matches!(
            error,
            SheetTablesError::TableError(TableError::MissingNameError(_)),
        ));
    }

    #[test]
    fn parse_missing_reference() {
        let error = parse(r#"<table name="TasksList"/>"#).unwrap_err();
        assert!(matches!(
            error,
            SheetTablesError::TableError(TableError::MissingReferenceError(_)),
        ));
    }

    #[test]
    fn parse_invalid_reference() {
        let error = parse(r#"<table name="TasksList" ref="D4:A1"/>"#).unwrap_err();
        assert!(matches!(error, SheetTablesError::RangeError(_)));
    }

    #[test]
    fn parse_missing_table_element() {
        let error = parse(r#"<worksheet/>"#).unwrap_err();
        assert!(matches!(
            error,
            SheetTablesError::TableError(TableError::MissingTableError(_)),
        ));
    }
}
