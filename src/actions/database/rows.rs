// src/actions/database/rows.rs

//! Convert driver rows into JSON objects keyed by column name.
//!
//! Integers, floats and booleans map to JSON numbers and booleans. Text maps
//! to strings. Binary data is rendered as lowercase hex. PostgreSQL and MySQL
//! additionally decode `NUMERIC`/`DECIMAL` (as exact decimal text), date and
//! time types (ISO 8601 text), `UUID` and `JSON`/`JSONB` (as JSON). A column
//! none of the typed decoders accept is read as raw bytes: UTF-8 becomes a
//! string, anything else hex. SQL `NULL` is always `null`.

use serde_json::{Map, Number, Value};
use sqlx::mysql::MySqlRow;
use sqlx::postgres::PgRow;
use sqlx::sqlite::SqliteRow;
use sqlx::types::chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use sqlx::types::{Decimal, JsonValue, Uuid};
use sqlx::{Column, ColumnIndex, Decode, Row, Type, TypeInfo};
use tiberius::{ColumnData, FromSql};
use tracing::debug;

pub fn pg_row_to_json(row: &PgRow) -> Value {
    row_to_json(row, |row, idx| {
        decode_as(row, idx, |v: Decimal| Value::String(v.to_string()))
            .or_else(|| decode_as(row, idx, |v: Uuid| Value::String(v.to_string())))
            .or_else(|| decode_as(row, idx, |v: JsonValue| v))
            .or_else(|| decode_temporal(row, idx))
            .or_else(|| decode_common(row, idx))
    })
}

pub fn mysql_row_to_json(row: &MySqlRow) -> Value {
    row_to_json(row, |row, idx| {
        decode_as(row, idx, |v: Decimal| Value::String(v.to_string()))
            .or_else(|| decode_as(row, idx, |v: JsonValue| v))
            .or_else(|| decode_temporal(row, idx))
            .or_else(|| decode_as(row, idx, |v: u64| Value::from(v)))
            .or_else(|| decode_common(row, idx))
    })
}

/// SQLite only has integer, real, text and blob storage.
pub fn sqlite_row_to_json(row: &SqliteRow) -> Value {
    row_to_json(row, |row, idx| decode_common(row, idx))
}

pub fn mssql_row_to_json(row: tiberius::Row) -> Value {
    let names: Vec<String> = row
        .columns()
        .iter()
        .map(|c| c.name().to_string())
        .collect();

    let mut out = Map::new();
    for (name, data) in names.into_iter().zip(row) {
        out.insert(name, mssql_value(data));
    }
    Value::Object(out)
}

fn row_to_json<R>(row: &R, decode: impl Fn(&R, usize) -> Option<Value>) -> Value
where
    R: Row,
    usize: ColumnIndex<R>,
    for<'r> Vec<u8>: Decode<'r, R::Database> + Type<R::Database>,
{
    let mut out = Map::new();
    for (idx, column) in row.columns().iter().enumerate() {
        let value = decode(row, idx).unwrap_or_else(|| {
            debug!(
                column = column.name(),
                sql_type = column.type_info().name(),
                "no typed decoder for column; reading raw value"
            );
            decode_raw(row, idx)
        });
        out.insert(column.name().to_string(), value);
    }
    Value::Object(out)
}

/// `Some` when the column has a type `T` accepts, `None` to try the next.
fn decode_as<'r, R, T>(row: &'r R, idx: usize, to_json: impl FnOnce(T) -> Value) -> Option<Value>
where
    R: Row,
    usize: ColumnIndex<R>,
    T: Decode<'r, R::Database> + Type<R::Database>,
{
    row.try_get::<Option<T>, _>(idx)
        .ok()
        .map(|v| v.map(to_json).unwrap_or(Value::Null))
}

fn decode_common<R>(row: &R, idx: usize) -> Option<Value>
where
    R: Row,
    usize: ColumnIndex<R>,
    for<'r> i64: Decode<'r, R::Database> + Type<R::Database>,
    for<'r> i32: Decode<'r, R::Database> + Type<R::Database>,
    for<'r> i16: Decode<'r, R::Database> + Type<R::Database>,
    for<'r> f64: Decode<'r, R::Database> + Type<R::Database>,
    for<'r> f32: Decode<'r, R::Database> + Type<R::Database>,
    for<'r> bool: Decode<'r, R::Database> + Type<R::Database>,
    for<'r> String: Decode<'r, R::Database> + Type<R::Database>,
    for<'r> Vec<u8>: Decode<'r, R::Database> + Type<R::Database>,
{
    decode_as(row, idx, |v: i64| Value::from(v))
        .or_else(|| decode_as(row, idx, |v: i32| Value::from(v)))
        .or_else(|| decode_as(row, idx, |v: i16| Value::from(v)))
        .or_else(|| decode_as(row, idx, float))
        .or_else(|| decode_as(row, idx, |v: f32| float(f64::from(v))))
        .or_else(|| decode_as(row, idx, Value::Bool))
        .or_else(|| decode_as(row, idx, Value::String))
        .or_else(|| decode_as(row, idx, |v: Vec<u8>| Value::String(hex(&v))))
}

fn decode_temporal<R>(row: &R, idx: usize) -> Option<Value>
where
    R: Row,
    usize: ColumnIndex<R>,
    for<'r> DateTime<Utc>: Decode<'r, R::Database> + Type<R::Database>,
    for<'r> NaiveDateTime: Decode<'r, R::Database> + Type<R::Database>,
    for<'r> NaiveDate: Decode<'r, R::Database> + Type<R::Database>,
    for<'r> NaiveTime: Decode<'r, R::Database> + Type<R::Database>,
{
    decode_as(row, idx, |v: DateTime<Utc>| Value::String(v.to_rfc3339()))
        .or_else(|| decode_as(row, idx, |v: NaiveDateTime| Value::String(iso_datetime(v))))
        .or_else(|| decode_as(row, idx, |v: NaiveDate| Value::String(v.to_string())))
        .or_else(|| decode_as(row, idx, |v: NaiveTime| Value::String(v.to_string())))
}

fn decode_raw<R>(row: &R, idx: usize) -> Value
where
    R: Row,
    usize: ColumnIndex<R>,
    for<'r> Vec<u8>: Decode<'r, R::Database> + Type<R::Database>,
{
    match row.try_get_unchecked::<Option<Vec<u8>>, _>(idx) {
        Ok(Some(bytes)) => match String::from_utf8(bytes) {
            Ok(text) => Value::String(text),
            Err(err) => Value::String(hex(err.as_bytes())),
        },
        Ok(None) | Err(_) => Value::Null,
    }
}

fn mssql_value(data: ColumnData<'static>) -> Value {
    match data {
        ColumnData::U8(v) => v.map(Value::from).unwrap_or(Value::Null),
        ColumnData::I16(v) => v.map(Value::from).unwrap_or(Value::Null),
        ColumnData::I32(v) => v.map(Value::from).unwrap_or(Value::Null),
        ColumnData::I64(v) => v.map(Value::from).unwrap_or(Value::Null),
        ColumnData::F32(v) => v.map(|f| float(f64::from(f))).unwrap_or(Value::Null),
        ColumnData::F64(v) => v.map(float).unwrap_or(Value::Null),
        ColumnData::Bit(v) => v.map(Value::Bool).unwrap_or(Value::Null),
        ColumnData::String(v) => v
            .map(|s| Value::String(s.into_owned()))
            .unwrap_or(Value::Null),
        ColumnData::Guid(v) => v
            .map(|g| Value::String(g.to_string()))
            .unwrap_or(Value::Null),
        ColumnData::Binary(v) => v.map(|b| Value::String(hex(&b))).unwrap_or(Value::Null),
        other => mssql_converted(&other),
    }
}

/// Numeric and temporal values go through tiberius' own conversions. What
/// is left (XML, mostly) is rendered as debug text.
fn mssql_converted(data: &ColumnData<'static>) -> Value {
    from_sql(data, |v: Decimal| Value::String(v.to_string()))
        .or_else(|| from_sql(data, |v: DateTime<FixedOffset>| Value::String(v.to_rfc3339())))
        .or_else(|| from_sql(data, |v: NaiveDateTime| Value::String(iso_datetime(v))))
        .or_else(|| from_sql(data, |v: NaiveDate| Value::String(v.to_string())))
        .or_else(|| from_sql(data, |v: NaiveTime| Value::String(v.to_string())))
        .unwrap_or_else(|| {
            debug!(?data, "no decoder for sql server value; rendering debug text");
            Value::String(format!("{data:?}"))
        })
}

fn from_sql<'a, T>(data: &'a ColumnData<'static>, to_json: impl FnOnce(T) -> Value) -> Option<Value>
where
    T: FromSql<'a>,
{
    T::from_sql(data)
        .ok()
        .map(|v| v.map(to_json).unwrap_or(Value::Null))
}

fn float(v: f64) -> Value {
    Number::from_f64(v).map(Value::Number).unwrap_or(Value::Null)
}

fn iso_datetime(v: NaiveDateTime) -> String {
    v.format("%Y-%m-%dT%H:%M:%S%.f").to_string()
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::borrow::Cow;
    use tiberius::numeric::Numeric;

    #[test]
    fn bytes_render_as_lowercase_hex() {
        assert_eq!(hex(&[0xde, 0xad, 0xbe, 0xef]), "deadbeef");
        assert_eq!(hex(&[]), "");
    }

    #[test]
    fn mssql_scalars_keep_their_json_type() {
        assert_eq!(mssql_value(ColumnData::I32(Some(7))), json!(7));
        assert_eq!(mssql_value(ColumnData::F64(Some(1.5))), json!(1.5));
        assert_eq!(mssql_value(ColumnData::Bit(Some(true))), json!(true));
        assert_eq!(
            mssql_value(ColumnData::String(Some(Cow::Borrowed("hi")))),
            json!("hi")
        );
        assert_eq!(mssql_value(ColumnData::String(None)), Value::Null);
        assert_eq!(
            mssql_value(ColumnData::Binary(Some(Cow::Owned(vec![1, 255])))),
            json!("01ff")
        );
    }

    #[test]
    fn mssql_numeric_is_exact_decimal_text() {
        let n = Numeric::new_with_scale(12345, 2);
        assert_eq!(mssql_value(ColumnData::Numeric(Some(n))), json!("123.45"));
        assert_eq!(mssql_value(ColumnData::Numeric(None)), Value::Null);
    }
}
