//! Balance/equity history parsing.
//!
//! Accepts the account-history export format, one snapshot per line:
//!
//! ```text
//! <DATE>	<BALANCE>	<EQUITY>	<DEPOSIT LOAD>
//! 2020.04.15 00:00	10000.00	10000.00	0.0000
//! ```
//!
//! The header line is optional. Fields are tab-separated; lines without tabs
//! are split on whitespace, in which case the date and time arrive as two
//! tokens and are rejoined. Any malformed line aborts the whole parse.

use std::borrow::Cow;
use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use thiserror::Error;

use crate::domain::TimeSeriesPoint;

/// Token that marks the optional header line.
pub const HEADER_SENTINEL: &str = "<DATE>";

/// Timestamp layout used by the history export.
pub const TIMESTAMP_FORMAT: &str = "%Y.%m.%d %H:%M";

const TIMESTAMP_FORMAT_SECONDS: &str = "%Y.%m.%d %H:%M:%S";
const DATE_FORMAT: &str = "%Y.%m.%d";
const TIME_FORMAT: &str = "%H:%M";

/// Numeric column of a history line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Balance,
    Equity,
    DepositLoad,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Balance => "balance",
            Field::Equity => "equity",
            Field::DepositLoad => "deposit load",
        };
        f.write_str(name)
    }
}

/// Errors from parsing a history log. Line numbers are 1-based.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("input contains no data lines")]
    Empty,

    #[error("line {line}: expected 4 fields (date-time, balance, equity, deposit load), found {found}")]
    FieldCount { line: usize, found: usize },

    #[error("line {line}: invalid timestamp '{value}' (expected YYYY.MM.DD HH:MM)")]
    InvalidTimestamp { line: usize, value: String },

    #[error("line {line}: invalid {field} value '{value}'")]
    InvalidNumber {
        line: usize,
        field: Field,
        value: String,
    },
}

/// Parse a full history log into time-series points, in input order.
pub fn parse_trade_data(raw: &str) -> Result<Vec<TimeSeriesPoint>, ParseError> {
    let mut points = Vec::new();
    let mut seen_first = false;

    for (idx, line) in raw.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        if !seen_first {
            seen_first = true;
            if line.contains(HEADER_SENTINEL) {
                continue;
            }
        }
        points.push(parse_line(line, idx + 1)?);
    }

    if points.is_empty() {
        return Err(ParseError::Empty);
    }

    tracing::debug!(points = points.len(), "parsed balance/equity history");
    Ok(points)
}

/// Parse a single data line. `line_no` is only used for error reporting.
pub fn parse_line(line: &str, line_no: usize) -> Result<TimeSeriesPoint, ParseError> {
    let fields = split_fields(line);
    if fields.len() != 4 {
        return Err(ParseError::FieldCount {
            line: line_no,
            found: fields.len(),
        });
    }

    Ok(TimeSeriesPoint {
        timestamp: parse_timestamp(&fields[0], line_no)?,
        balance: parse_number(&fields[1], Field::Balance, line_no)?,
        equity: parse_number(&fields[2], Field::Equity, line_no)?,
        deposit_load: parse_number(&fields[3], Field::DepositLoad, line_no)?,
    })
}

fn split_fields(line: &str) -> Vec<Cow<'_, str>> {
    if line.contains('\t') {
        return line
            .split('\t')
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .map(Cow::Borrowed)
            .collect();
    }

    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() == 5 && NaiveTime::parse_from_str(tokens[1], TIME_FORMAT).is_ok() {
        let mut fields = Vec::with_capacity(4);
        fields.push(Cow::Owned(format!("{} {}", tokens[0], tokens[1])));
        fields.extend(tokens[2..].iter().map(|t| Cow::Borrowed(*t)));
        return fields;
    }
    tokens.into_iter().map(Cow::Borrowed).collect()
}

fn parse_timestamp(value: &str, line_no: usize) -> Result<NaiveDateTime, ParseError> {
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT_SECONDS))
        .or_else(|_| NaiveDate::parse_from_str(value, DATE_FORMAT).map(|d| d.and_time(NaiveTime::MIN)))
        .map_err(|_| ParseError::InvalidTimestamp {
            line: line_no,
            value: value.to_string(),
        })
}

fn parse_number(value: &str, field: Field, line_no: usize) -> Result<f64, ParseError> {
    match value.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(ParseError::InvalidNumber {
            line: line_no,
            field,
            value: value.to_string(),
        }),
    }
}
