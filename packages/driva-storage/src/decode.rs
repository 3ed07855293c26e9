//! Positional column decoders.
//!
//! Warehouse loads are not strict about column types, so each decoder accepts every Postgres type
//! that carries the same value. A column of any other type fails with `ColumnDecode`.

use sqlx::{
	Row,
	error::UnexpectedNullError,
	postgres::PgRow,
};
use time::{OffsetDateTime, PrimitiveDateTime};
use uuid::Uuid;

/// `text`, `varchar` or `uuid`.
pub fn text(row: &PgRow, index: usize) -> Result<Option<String>, sqlx::Error> {
	match row.try_get::<Option<String>, _>(index) {
		Err(sqlx::Error::ColumnDecode { .. }) =>
			Ok(row.try_get::<Option<Uuid>, _>(index)?.map(|id| id.to_string())),
		other => other,
	}
}

/// `int8`, `int4` or `int2`.
pub fn integer(row: &PgRow, index: usize) -> Result<Option<i64>, sqlx::Error> {
	if let Ok(value) = row.try_get::<Option<i64>, _>(index) {
		return Ok(value);
	}
	if let Ok(value) = row.try_get::<Option<i32>, _>(index) {
		return Ok(value.map(i64::from));
	}

	Ok(row.try_get::<Option<i16>, _>(index)?.map(i64::from))
}

/// `float8`, `float4` or any integer column.
pub fn float(row: &PgRow, index: usize) -> Result<Option<f64>, sqlx::Error> {
	if let Ok(value) = row.try_get::<Option<f64>, _>(index) {
		return Ok(value);
	}
	if let Ok(value) = row.try_get::<Option<f32>, _>(index) {
		return Ok(value.map(f64::from));
	}

	Ok(integer(row, index)?.map(|value| value as f64))
}

pub fn boolean(row: &PgRow, index: usize) -> Result<Option<bool>, sqlx::Error> {
	row.try_get::<Option<bool>, _>(index)
}

/// `timestamptz` is taken as is; `timestamp` carries no zone and is read as UTC.
pub fn timestamp(row: &PgRow, index: usize) -> Result<Option<OffsetDateTime>, sqlx::Error> {
	match row.try_get::<Option<OffsetDateTime>, _>(index) {
		Err(sqlx::Error::ColumnDecode { .. }) => Ok(row
			.try_get::<Option<PrimitiveDateTime>, _>(index)?
			.map(PrimitiveDateTime::assume_utc)),
		other => other,
	}
}

pub fn required<T>(value: Option<T>, index: usize) -> Result<T, sqlx::Error> {
	value.ok_or_else(|| sqlx::Error::ColumnDecode {
		index: index.to_string(),
		source: Box::new(UnexpectedNullError),
	})
}
