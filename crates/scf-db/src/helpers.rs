//! Column decoding shared by the repos.
//!
//! Timestamps are written with `to_rfc3339()`, but rows inserted by raw SQL
//! (migrations, tests, the catalog import) carry `SQLite`'s
//! `YYYY-MM-DD HH:MM:SS` default, so both are accepted.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::de::IntoDeserializer;
use serde::de::value::{Error as ValueError, StrDeserializer};

use crate::error::DatabaseError;

const SQLITE_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M:%S%.f"];

/// Decode a timestamp column.
///
/// # Errors
///
/// Returns `DatabaseError::Query` when `raw` matches no accepted format.
pub fn parse_datetime(raw: &str) -> Result<DateTime<Utc>, DatabaseError> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }
    SQLITE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| DatabaseError::Query(format!("unrecognized timestamp '{raw}'")))
}

/// Decode a nullable timestamp column; NULL and `""` are both `None`.
///
/// # Errors
///
/// See [`parse_datetime`].
pub fn parse_optional_datetime(raw: Option<&str>) -> Result<Option<DateTime<Utc>>, DatabaseError> {
    raw.filter(|s| !s.is_empty()).map(parse_datetime).transpose()
}

/// Decode a stored `snake_case` tag into one of the scf-core enums.
///
/// # Errors
///
/// Returns `DatabaseError::Query` for an unknown tag.
pub fn parse_enum<T: serde::de::DeserializeOwned>(raw: &str) -> Result<T, DatabaseError> {
    let de: StrDeserializer<'_, ValueError> = raw.into_deserializer();
    T::deserialize(de).map_err(|e| DatabaseError::Query(format!("unknown tag '{raw}': {e}")))
}

/// Read a nullable TEXT column, folding `""` into `None`.
///
/// # Errors
///
/// Returns `DatabaseError` if the column read fails.
pub fn get_opt_string(row: &libsql::Row, idx: i32) -> Result<Option<String>, DatabaseError> {
    Ok(row
        .get::<Option<String>>(idx)?
        .filter(|s| !s.is_empty()))
}

/// Deserialize a JSON TEXT column into `T`.
///
/// # Errors
///
/// Returns `DatabaseError::Query` naming `column` if the JSON is invalid.
pub fn parse_json<T: serde::de::DeserializeOwned>(s: &str, column: &str) -> Result<T, DatabaseError> {
    serde_json::from_str(s)
        .map_err(|e| DatabaseError::Query(format!("Invalid JSON in column '{column}': {e}")))
}

/// Serialize `value` for a JSON TEXT column.
///
/// # Errors
///
/// Returns `DatabaseError::Other` if serialization fails.
pub fn to_json<T: serde::Serialize>(value: &T) -> Result<String, DatabaseError> {
    serde_json::to_string(value).map_err(|e| DatabaseError::Other(e.into()))
}
