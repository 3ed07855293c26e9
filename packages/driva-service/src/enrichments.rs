use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
	DrivaService, Result,
	pagination::{PageMeta, PageRequest},
};
use driva_storage::{models::EnrichmentRecord, schema::SEED_TABLE};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListEnrichmentsRequest {
	pub page: Option<i64>,
	pub limit: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EnrichmentItem {
	pub id: i64,
	pub id_workspace: Option<String>,
	pub workspace_name: Option<String>,
	pub total_contacts: Option<i64>,
	pub contact_type: Option<String>,
	pub status: Option<String>,
	#[serde(with = "crate::time_serde::option")]
	pub created_at: Option<OffsetDateTime>,
	#[serde(with = "crate::time_serde::option")]
	pub updated_at: Option<OffsetDateTime>,
}
impl From<EnrichmentRecord> for EnrichmentItem {
	fn from(record: EnrichmentRecord) -> Self {
		Self {
			id: record.id,
			id_workspace: record.id_workspace,
			workspace_name: record.workspace_name,
			total_contacts: record.total_contacts,
			contact_type: record.contact_type,
			status: record.status,
			created_at: record.created_at,
			updated_at: record.updated_at,
		}
	}
}

#[derive(Debug, Clone, Serialize)]
pub struct EnrichmentsPage {
	pub meta: PageMeta,
	pub data: Vec<EnrichmentItem>,
}

impl DrivaService {
	pub async fn list_enrichments(&self, req: ListEnrichmentsRequest) -> Result<EnrichmentsPage> {
		let page = PageRequest::new(req.page, req.limit)?;
		let limit = i64::from(page.limit());
		let offset = page.offset();
		let mut conn = self.db.acquire().await?;
		let total_sql = format!("SELECT COUNT(*) FROM {SEED_TABLE}");
		let total_items: i64 = sqlx::query_scalar(&total_sql).fetch_one(&mut *conn).await?;
		let window_sql = format!(
			"SELECT COUNT(*) FROM (SELECT 1 FROM {SEED_TABLE} ORDER BY id LIMIT $1 OFFSET $2) AS page_window"
		);
		let items_on_page: i64 = sqlx::query_scalar(&window_sql)
			.bind(limit)
			.bind(offset)
			.fetch_one(&mut *conn)
			.await?;
		let rows_sql = format!("SELECT * FROM {SEED_TABLE} ORDER BY id LIMIT $1 OFFSET $2");
		let records: Vec<EnrichmentRecord> = sqlx::query_as(&rows_sql)
			.bind(limit)
			.bind(offset)
			.fetch_all(&mut *conn)
			.await?;
		let meta = PageMeta::new(page, count(items_on_page), count(total_items));

		Ok(EnrichmentsPage { meta, data: records.into_iter().map(EnrichmentItem::from).collect() })
	}
}

pub(crate) fn count(value: i64) -> u64 {
	u64::try_from(value).unwrap_or(0)
}
