//! Optional filters for the analytics enrichment listing.
//!
//! Every value reaches Postgres as a bind parameter. The column names below are fixed and are the
//! only text spliced into the statement.

use sqlx::{Postgres, QueryBuilder};
use time::{
	Date, OffsetDateTime, PrimitiveDateTime, UtcOffset,
	format_description::well_known::{Iso8601, Rfc3339},
	macros::format_description,
};
use uuid::Uuid;

use crate::{Error, Result};

const CREATED_AT_COLUMN: &str = "data_criacao";
const STATUS_COLUMN: &str = "status_processamento";
const WORKSPACE_COLUMN: &str = "id_workspace::text";

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct EnrichmentStatusRequest {
	pub start_date: Option<String>,
	pub end_date: Option<String>,
	pub processing_status: Option<String>,
	pub workspace_id: Option<String>,
}

/// Inclusive bounds, already normalized to RFC 3339 UTC strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateRange {
	pub start: String,
	pub end: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
	pub date_range: Option<DateRange>,
	/// Upper-cased.
	pub status: Option<String>,
	/// Canonical hyphenated form.
	pub workspace_id: Option<String>,
}
impl FilterCriteria {
	pub fn from_request(req: &EnrichmentStatusRequest) -> Result<Self> {
		let start = non_blank(req.start_date.as_deref());
		let end = non_blank(req.end_date.as_deref());
		let date_range = match (start, end) {
			(Some(start), Some(end)) => Some(DateRange {
				start: normalize_timestamp(start, "start_date")?,
				end: normalize_timestamp(end, "end_date")?,
			}),
			(None, None) => None,
			_ => {
				tracing::debug!("Ignoring date range with a single bound.");

				None
			},
		};
		let status = non_blank(req.processing_status.as_deref()).map(str::to_uppercase);
		let workspace_id = non_blank(req.workspace_id.as_deref())
			.map(|raw| {
				Uuid::parse_str(raw).map(|id| id.to_string()).map_err(|_| Error::InvalidRequest {
					message: "workspace_id must be a valid UUID.".to_string(),
				})
			})
			.transpose()?;

		Ok(Self { date_range, status, workspace_id })
	}

	pub fn is_empty(&self) -> bool {
		self.date_range.is_none() && self.status.is_none() && self.workspace_id.is_none()
	}

	/// Bind values in the order `push_where` emits their placeholders.
	pub fn bind_values(&self) -> Vec<&str> {
		let mut values = Vec::new();

		if let Some(range) = &self.date_range {
			values.push(range.start.as_str());
			values.push(range.end.as_str());
		}
		if let Some(status) = &self.status {
			values.push(status.as_str());
		}
		if let Some(workspace_id) = &self.workspace_id {
			values.push(workspace_id.as_str());
		}

		values
	}

	/// Appends ` WHERE ...` joined with `AND`, or nothing when no filter is set.
	pub fn push_where(&self, builder: &mut QueryBuilder<'_, Postgres>) {
		if self.is_empty() {
			return;
		}

		builder.push(" WHERE ");

		let mut separated = builder.separated(" AND ");

		if let Some(range) = &self.date_range {
			separated.push(format!("{CREATED_AT_COLUMN} BETWEEN "));
			separated
				.push_bind_unseparated(range.start.clone())
				.push_unseparated("::timestamptz AND ")
				.push_bind_unseparated(range.end.clone())
				.push_unseparated("::timestamptz");
		}
		if let Some(status) = &self.status {
			separated.push(format!("{STATUS_COLUMN} = "));
			separated.push_bind_unseparated(status.clone());
		}
		if let Some(workspace_id) = &self.workspace_id {
			separated.push(format!("{WORKSPACE_COLUMN} = "));
			separated.push_bind_unseparated(workspace_id.clone());
		}
	}
}

fn non_blank(value: Option<&str>) -> Option<&str> {
	value.map(str::trim).filter(|value| !value.is_empty())
}

/// Parses an ISO 8601 timestamp and re-renders it in UTC with a `Z` suffix. A value without an
/// offset is taken as UTC; a bare date means midnight UTC. Date and time may be separated by a
/// space instead of `T`.
pub fn normalize_timestamp(raw: &str, field: &str) -> Result<String> {
	let invalid = || Error::InvalidRequest {
		message: format!("{field} must be an ISO 8601 timestamp."),
	};
	let parsed = parse_timestamp(raw).ok_or_else(invalid)?;
	// Offsets can push a value at the edge of the calendar out of range.
	let utc = parsed.checked_to_offset(UtcOffset::UTC).ok_or_else(invalid)?;

	utc.format(&Rfc3339).map_err(|_| invalid())
}

fn parse_timestamp(raw: &str) -> Option<OffsetDateTime> {
	if let Ok(value) = OffsetDateTime::parse(raw, &Rfc3339) {
		return Some(value);
	}
	if let Ok(value) = OffsetDateTime::parse(raw, &Iso8601::DEFAULT) {
		return Some(value);
	}
	if let Ok(value) = PrimitiveDateTime::parse(raw, &Iso8601::DEFAULT) {
		return Some(value.assume_utc());
	}
	if let Ok(value) = OffsetDateTime::parse(
		raw,
		format_description!(
			"[year]-[month]-[day] [hour]:[minute]:[second][optional [.[subsecond]]][offset_hour sign:mandatory]:[offset_minute]"
		),
	) {
		return Some(value);
	}
	if let Ok(value) = PrimitiveDateTime::parse(
		raw,
		format_description!("[year]-[month]-[day] [hour]:[minute]:[second][optional [.[subsecond]]]"),
	) {
		return Some(value.assume_utc());
	}

	Date::parse(raw, format_description!("[year]-[month]-[day]"))
		.ok()
		.map(|date| date.midnight().assume_utc())
}
