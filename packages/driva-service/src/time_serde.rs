pub mod option;

use serde::Serializer;
use time::{OffsetDateTime, UtcOffset, macros::format_description};

/// Renders `value` in UTC as `YYYY-MM-DDTHH:MM:SSZ`. Sub-second precision is dropped.
pub fn format_utc(value: OffsetDateTime) -> Result<String, time::error::Format> {
	value
		.to_offset(UtcOffset::UTC)
		.format(format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]Z"))
}

pub fn serialize<S>(value: &OffsetDateTime, serializer: S) -> Result<S::Ok, S::Error>
where
	S: Serializer,
{
	let formatted = format_utc(*value).map_err(serde::ser::Error::custom)?;

	serializer.serialize_str(&formatted)
}
