//! Input data: account-history log parsing.

pub mod parse;

pub use parse::{parse_line, parse_trade_data, Field, ParseError, HEADER_SENTINEL, TIMESTAMP_FORMAT};
