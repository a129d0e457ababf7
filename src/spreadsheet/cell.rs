use crate::spreadsheet::reference::index_to_reference;
use chrono::Duration;
use chrono::NaiveDate;
use chrono::NaiveDateTime;
use chrono::NaiveTime;
use std::fmt::Display;
use thiserror::Error;

/// Errors raised while converting raw cell text into typed values.
#[derive(Error, Debug)]
pub enum CellError {
    #[error("Parse '{0}' as number failed")]
    NumberFormatError(String),

    #[error("Parse '{0}' as date or time failed")]
    DateTimeFormatError(String),
}

/// Classification of raw cell content, combining the cell's declared type
/// with the number format attached to it.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub(crate) enum CellType {
    #[default]
    Empty,
    /// Boolean values (true/false)
    Boolean,
    /// Numeric values
    Number,
    /// Date/time values stored as serial numbers from the 1900 epoch
    NumberDateTime1900,
    /// Date values stored as serial numbers from the 1900 epoch
    NumberDate1900,
    /// Time values stored as serial numbers from the 1900 epoch
    NumberTime1900,
    /// Date/time values stored as serial numbers from the 1904 epoch
    NumberDateTime1904,
    /// Date values stored as serial numbers from the 1904 epoch
    NumberDate1904,
    /// Time values stored as serial numbers from the 1904 epoch
    NumberTime1904,
    /// ISO 8601 date/time strings
    IsoDateTime,
    /// Inline string values
    InlineString,
    /// Shared string table references
    SharedString,
    /// Error values
    Error,
}

impl CellType {
    /// Parses built-in Excel number format IDs to determine cell type.
    pub(crate) fn parse_builtin_number_format_id(id: &str, is_1904: bool) -> Option<Self> {
        match id {
            "22" => Some(if is_1904 { Self::NumberDateTime1904 } else { Self::NumberDateTime1900 }),
            "14" | "15" | "16" | "17" => Some(if is_1904 { Self::NumberDate1904 } else { Self::NumberDate1900 }),
            "18" | "19" | "20" | "21" | "45" | "46" | "47" => Some(if is_1904 { Self::NumberTime1904 } else { Self::NumberTime1900 }),
            _ => None,
        }
    }

    /// Parses custom number format strings to determine cell type.
    /// Scans the format code for date/time characters, skipping escaped
    /// characters, quoted literals, and color/condition sections.
    pub(crate) fn parse_custom_number_format(format: &str, is_1904: bool) -> Self {
        let mut is_escaped = false;
        let mut is_literal = false;
        let mut is_date = false;
        let mut is_time = false;
        let mut is_color = false;
        for character in format.chars() {
            match character {
                _ if is_escaped => is_escaped = false,
                '_' | '\\' if !is_escaped => is_escaped = true,

                '"' if is_literal => is_literal = false,
                '"' if !is_literal && !is_color => is_literal = true,

                ']' if is_color => is_color = false,
                '[' if !is_color && !is_literal => is_color = true,
                _ if is_literal || is_color => (),

                'Y' | 'y' | 'D' | 'd' => is_date = true,
                'H' | 'h' | 'S' | 's' => is_time = true,
                _ => (),
            }
        }

        match (is_date, is_time, is_1904) {
            (true, true, false) => Self::NumberDateTime1900,
            (true, true, true) => Self::NumberDateTime1904,
            (true, false, false) => Self::NumberDate1900,
            (true, false, true) => Self::NumberDate1904,
            (false, true, false) => Self::NumberTime1900,
            (false, true, true) => Self::NumberTime1904,
            (false, false, _) => Self::Number,
        }
    }
}

/// A typed cell value extracted from a worksheet.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum CellValue {
    /// No value present
    #[default]
    Empty,
    Bool(bool),
    Number(f64),
    Text(String),
    Date(NaiveDate),
    Time(NaiveTime),
    DateTime(NaiveDateTime),
    /// A spreadsheet error literal such as "#N/A"
    Error(String),
}

impl CellValue {
    /// Builds a typed value from classified raw cell text.
    pub(crate) fn from_raw(kind: CellType, raw: &str) -> Result<CellValue, CellError> {
        match kind {
            CellType::Empty => Ok(CellValue::Empty),
            CellType::Boolean => Ok(CellValue::Bool(raw == "1" || raw.eq_ignore_ascii_case("true"))),
            CellType::Number => parse_number(raw).map(CellValue::Number),
            CellType::NumberDate1900 => parse_number(raw)
                .map(|serial| CellValue::Date(serial_to_date(serial, false))),
            CellType::NumberDate1904 => parse_number(raw)
                .map(|serial| CellValue::Date(serial_to_date(serial, true))),
            CellType::NumberTime1900 | CellType::NumberTime1904 => parse_number(raw)
                .map(|serial| CellValue::Time(serial_to_time(serial))),
            CellType::NumberDateTime1900 => parse_number(raw)
                .map(|serial| CellValue::DateTime(serial_to_date(serial, false).and_time(serial_to_time(serial)))),
            CellType::NumberDateTime1904 => parse_number(raw)
                .map(|serial| CellValue::DateTime(serial_to_date(serial, true).and_time(serial_to_time(serial)))),
            CellType::IsoDateTime => parse_iso_datetime(raw),
            CellType::InlineString | CellType::SharedString => Ok(CellValue::Text(raw.to_owned())),
            CellType::Error => Ok(CellValue::Error(raw.to_owned())),
        }
    }

    /// True when the cell holds no value.
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }
}

impl Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Bool(value) => write!(f, "{}", value),
            CellValue::Number(value) => write!(f, "{}", value),
            CellValue::Text(value) => write!(f, "{}", value),
            CellValue::Date(value) => write!(f, "{}", value.format("%Y-%m-%d")),
            CellValue::Time(value) => write!(f, "{}", value.format("%H:%M:%S")),
            CellValue::DateTime(value) => write!(f, "{}", value.format("%Y-%m-%d %H:%M:%S")),
            CellValue::Error(value) => write!(f, "{}", value),
        }
    }
}

/// A single populated cell with its 0-based position and typed value.
#[derive(Clone, Debug, PartialEq)]
pub struct Cell {
    /// Row index (0-based)
    pub row: usize,
    /// Column index (0-based)
    pub col: usize,
    /// Typed cell value
    pub value: CellValue,
}

impl Cell {
    /// Returns the Excel-style cell reference (e.g., "A1", "B2").
    pub fn reference(&self) -> String {
        index_to_reference(self.row, self.col)
    }
}

fn parse_number(raw: &str) -> Result<f64, CellError> {
    raw.parse::<f64>().map_err(|_| CellError::NumberFormatError(raw.to_owned()))
}

/// Converts an Excel serial day count to a date.
/// Compensates the Lotus 1-2-3 leap year bug on the 1900 epoch.
fn serial_to_date(serial: f64, is_1904: bool) -> NaiveDate {
    let days = serial.trunc() as i64;
    let days = days + if is_1904 {
        1462
    } else if days < 60 {
        1
    } else {
        0
    };
    NaiveDate::from_ymd_opt(1899, 12, 30).expect("Epoch literal") + Duration::days(days)
}

/// Converts the fractional part of an Excel serial to a time of day.
fn serial_to_time(serial: f64) -> NaiveTime {
    let milliseconds = ((serial.fract() * 86_400_000f64).round() as u32).min(86_399_999);
    let seconds = milliseconds / 1_000;
    let nanoseconds = (milliseconds % 1_000) * 1_000_000;
    NaiveTime::from_num_seconds_from_midnight_opt(seconds, nanoseconds).expect("Within one day")
}

fn parse_iso_datetime(raw: &str) -> Result<CellValue, CellError> {
    let invalid = || CellError::DateTimeFormatError(raw.to_owned());
    if raw.contains('T') {
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .map(CellValue::DateTime)
            .map_err(|_| invalid())
    } else if raw.contains(':') {
        NaiveTime::parse_from_str(raw, "%H:%M:%S%.f")
            .map(CellValue::Time)
            .map_err(|_| invalid())
    } else {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map(CellValue::Date)
            .map_err(|_| invalid())
    }
}
