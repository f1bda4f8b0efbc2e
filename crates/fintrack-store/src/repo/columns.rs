//! Column value conversions
//!
//! Timestamps are UTC Unix milliseconds, calendar dates are `YYYY-MM-DD`
//! text and enums are their spelled-out names.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use rusqlite::types::Type;
use rusqlite::Row;
use std::str::FromStr;

const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn millis(ts: &DateTime<Utc>) -> i64 {
    ts.timestamp_millis()
}

pub fn opt_millis(ts: &Option<DateTime<Utc>>) -> Option<i64> {
    ts.as_ref().map(millis)
}

pub fn date_text(date: &NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn opt_date_text(date: &Option<NaiveDate>) -> Option<String> {
    date.as_ref().map(date_text)
}

fn conversion_error(idx: usize, ty: Type, message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, ty, message.into())
}

fn timestamp_from_millis(idx: usize, value: i64) -> rusqlite::Result<DateTime<Utc>> {
    Utc.timestamp_millis_opt(value).single().ok_or_else(|| {
        conversion_error(idx, Type::Integer, format!("timestamp {} out of range", value))
    })
}

fn date_from_text(idx: usize, value: &str) -> rusqlite::Result<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|e| conversion_error(idx, Type::Text, format!("date '{}': {}", value, e)))
}

pub fn get_timestamp(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    timestamp_from_millis(idx, row.get(idx)?)
}

pub fn get_opt_timestamp(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<DateTime<Utc>>> {
    row.get::<_, Option<i64>>(idx)?
        .map(|v| timestamp_from_millis(idx, v))
        .transpose()
}

pub fn get_date(row: &Row<'_>, idx: usize) -> rusqlite::Result<NaiveDate> {
    let text: String = row.get(idx)?;
    date_from_text(idx, &text)
}

pub fn get_opt_date(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<NaiveDate>> {
    row.get::<_, Option<String>>(idx)?
        .map(|text| date_from_text(idx, &text))
        .transpose()
}

/// Decode an enum stored as its name
pub fn get_enum<T>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr<Err = String>,
{
    let text: String = row.get(idx)?;
    text.parse()
        .map_err(|e: String| conversion_error(idx, Type::Text, e))
}

/// Quote an SQL identifier
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
