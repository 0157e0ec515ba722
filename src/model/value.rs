//! Cell values - parsing cell text into typed values
//!
//! Every column declares a type once in its heading. Cell text is parsed
//! according to that type when the table is attached.

use crate::error::ParseError;
use chrono::{Datelike, NaiveDate};
use regex::Regex;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// Separators accepted between day, month and year
static DATE_SEPARATOR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[-./\\ ]").unwrap());

/// Month names as they appear in dates ("15 марта 2024"), genitive case
const MONTHS: [&str; 12] = [
    "января",
    "февраля",
    "марта",
    "апреля",
    "мая",
    "июня",
    "июля",
    "августа",
    "сентября",
    "октября",
    "ноября",
    "декабря",
];

/// Declared semantic kind of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Int,
    Date,
    String,
}

impl ColumnType {
    pub fn name(&self) -> &'static str {
        match self {
            ColumnType::Int => "int",
            ColumnType::Date => "date",
            ColumnType::String => "string",
        }
    }
}

impl FromStr for ColumnType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "int" => Ok(ColumnType::Int),
            "date" => Ok(ColumnType::Date),
            "string" => Ok(ColumnType::String),
            other => Err(other.to_string()),
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A parsed cell value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypedValue {
    Int(i64),
    Date(NaiveDate),
    Text(String),
}

/// A cell's value as attached: parsed, or kept raw when parsing failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellValue {
    Parsed(TypedValue),
    Malformed { raw: String, error: ParseError },
}

impl CellValue {
    pub fn from_text(raw: &str, column_type: ColumnType) -> Self {
        match parse(raw, column_type) {
            Ok(value) => CellValue::Parsed(value),
            Err(error) => CellValue::Malformed {
                raw: raw.to_string(),
                error,
            },
        }
    }

    pub fn typed(&self) -> Option<&TypedValue> {
        match self {
            CellValue::Parsed(value) => Some(value),
            CellValue::Malformed { .. } => None,
        }
    }
}

/// Parse cell text according to the column type
pub fn parse(raw: &str, column_type: ColumnType) -> Result<TypedValue, ParseError> {
    match column_type {
        ColumnType::Int => parse_int(raw).map(TypedValue::Int),
        ColumnType::Date => parse_date(raw).map(TypedValue::Date),
        ColumnType::String => Ok(TypedValue::Text(raw.to_string())),
    }
}

pub fn parse_int(raw: &str) -> Result<i64, ParseError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| ParseError::not_an_integer(raw))
}

/// Parse `day<sep>month<sep>year`, where month is a number or a month name
pub fn parse_date(raw: &str) -> Result<NaiveDate, ParseError> {
    let tokens: Vec<&str> = DATE_SEPARATOR.split(raw.trim()).collect();
    if tokens.len() != 3 {
        return Err(ParseError::DateTokenCount {
            raw: raw.to_string(),
            found: tokens.len(),
        });
    }

    let day = number(raw, tokens[0], "day")?;
    let year = number(raw, tokens[2], "year")?;
    let month_token = tokens[1];
    let month_index = if month_token.chars().count() > 2 {
        month_from_name(month_token)?
    } else {
        number(raw, month_token, "month")? - 1
    };

    calendar_date(raw, year, month_index, day)
}

/// Parse a filter term for a date column: `year-month-day`, split on `-` only
pub fn parse_date_term(raw: &str) -> Result<NaiveDate, ParseError> {
    let tokens: Vec<&str> = raw.trim().split('-').collect();
    if tokens.len() != 3 {
        return Err(ParseError::DateTokenCount {
            raw: raw.to_string(),
            found: tokens.len(),
        });
    }
    let year = number(raw, tokens[0], "year")?;
    let month = number(raw, tokens[1], "month")?;
    let day = number(raw, tokens[2], "day")?;
    calendar_date(raw, year, month - 1, day)
}

fn month_from_name(token: &str) -> Result<i32, ParseError> {
    let lower = token.to_lowercase();
    MONTHS
        .iter()
        .position(|m| *m == lower)
        .map(|i| i as i32)
        .ok_or_else(|| ParseError::UnknownMonth {
            month: token.to_string(),
        })
}

fn number(raw: &str, token: &str, part: &'static str) -> Result<i32, ParseError> {
    token.parse::<i32>().map_err(|_| ParseError::DateNotNumeric {
        raw: raw.to_string(),
        part,
    })
}

/// Build a date from a zero-based month index; overflowing parts are rejected
fn calendar_date(raw: &str, year: i32, month_index: i32, day: i32) -> Result<NaiveDate, ParseError> {
    let out_of_range = || ParseError::DateOutOfRange {
        raw: raw.to_string(),
    };
    let month = u32::try_from(month_index + 1).map_err(|_| out_of_range())?;
    let day = u32::try_from(day).map_err(|_| out_of_range())?;
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(out_of_range)
}

/// Ordering used for sorting values of the same column
pub fn compare(a: &TypedValue, b: &TypedValue) -> Ordering {
    match (a, b) {
        (TypedValue::Int(x), TypedValue::Int(y)) => x.cmp(y),
        (TypedValue::Date(x), TypedValue::Date(y)) => x.cmp(y),
        (TypedValue::Text(x), TypedValue::Text(y)) => compare_text(x, y),
        // Columns are homogeneous; keep a total order anyway
        _ => rank(a).cmp(&rank(b)),
    }
}

fn rank(value: &TypedValue) -> u8 {
    match value {
        TypedValue::Int(_) => 0,
        TypedValue::Date(_) => 1,
        TypedValue::Text(_) => 2,
    }
}

/// Dictionary order: letters compare case-insensitively, `ё` sorts with `е`,
/// and exact case only breaks ties
pub fn compare_text(a: &str, b: &str) -> Ordering {
    fn fold(s: &str) -> String {
        s.to_lowercase().replace('ё', "е")
    }
    fold(a).cmp(&fold(b)).then_with(|| a.cmp(b))
}

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypedValue::Int(n) => write!(f, "{}", n),
            TypedValue::Date(d) => write!(f, "{:02}.{:02}.{}", d.day(), d.month(), d.year()),
            TypedValue::Text(s) => f.write_str(s),
        }
    }
}
