//! Row models. Each model reads its table by column position, so the column order of the
//! underlying table is part of the contract.

use sqlx::{FromRow, postgres::PgRow};
use time::OffsetDateTime;

use crate::decode;

/// One row of the seed listing table, columns 0..=7.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichmentRecord {
	pub id: i64,
	pub id_workspace: Option<String>,
	pub workspace_name: Option<String>,
	pub total_contacts: Option<i64>,
	pub contact_type: Option<String>,
	pub status: Option<String>,
	pub created_at: Option<OffsetDateTime>,
	pub updated_at: Option<OffsetDateTime>,
}
impl<'r> FromRow<'r, PgRow> for EnrichmentRecord {
	fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
		Ok(Self {
			id: decode::required(decode::integer(row, 0)?, 0)?,
			id_workspace: decode::text(row, 1)?,
			workspace_name: decode::text(row, 2)?,
			total_contacts: decode::integer(row, 3)?,
			contact_type: decode::text(row, 4)?,
			status: decode::text(row, 5)?,
			created_at: decode::timestamp(row, 6)?,
			updated_at: decode::timestamp(row, 7)?,
		})
	}
}

/// One row of the gold analytics table, columns 0..=13.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichmentFact {
	pub id: i64,
	pub id_workspace: Option<String>,
	pub workspace_name: Option<String>,
	pub total_contacts: Option<i64>,
	pub contact_type: Option<String>,
	pub processing_status: Option<String>,
	pub processing_minutes: Option<f64>,
	pub minutes_per_contact: Option<f64>,
	pub processing_succeeded: Option<bool>,
	pub size_category: Option<String>,
	pub needs_reprocessing: Option<bool>,
	pub created_at: Option<OffsetDateTime>,
	pub updated_at: Option<OffsetDateTime>,
	pub warehouse_updated_at: Option<OffsetDateTime>,
}
impl<'r> FromRow<'r, PgRow> for EnrichmentFact {
	fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
		Ok(Self {
			id: decode::required(decode::integer(row, 0)?, 0)?,
			id_workspace: decode::text(row, 1)?,
			workspace_name: decode::text(row, 2)?,
			total_contacts: decode::integer(row, 3)?,
			contact_type: decode::text(row, 4)?,
			processing_status: decode::text(row, 5)?,
			processing_minutes: decode::float(row, 6)?,
			minutes_per_contact: decode::float(row, 7)?,
			processing_succeeded: decode::boolean(row, 8)?,
			size_category: decode::text(row, 9)?,
			needs_reprocessing: decode::boolean(row, 10)?,
			created_at: decode::timestamp(row, 11)?,
			updated_at: decode::timestamp(row, 12)?,
			warehouse_updated_at: decode::timestamp(row, 13)?,
		})
	}
}

/// Workspace id, workspace name, job count.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkspaceJobCount {
	pub id_workspace: Option<String>,
	pub workspace_name: Option<String>,
	pub total_jobs: i64,
}
impl<'r> FromRow<'r, PgRow> for WorkspaceJobCount {
	fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
		Ok(Self {
			id_workspace: decode::text(row, 0)?,
			workspace_name: decode::text(row, 1)?,
			total_jobs: decode::required(decode::integer(row, 2)?, 2)?,
		})
	}
}

/// Job size buckets as stored in `categoria_tamanho_job`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeCategory {
	Small,
	Medium,
	Large,
	VeryLarge,
}
impl SizeCategory {
	pub const ALL: [Self; 4] = [Self::Small, Self::Medium, Self::Large, Self::VeryLarge];

	pub fn as_str(self) -> &'static str {
		match self {
			Self::Small => "PEQUENO",
			Self::Medium => "MEDIO",
			Self::Large => "GRANDE",
			Self::VeryLarge => "MUITO_GRANDE",
		}
	}
}
