use serde::{Deserialize, Serialize};
use sqlx::{Postgres, QueryBuilder};
use time::OffsetDateTime;

use crate::{
	DrivaService, Error, Result,
	enrichments::count,
	filter::{EnrichmentStatusRequest, FilterCriteria},
	pagination::MAX_LIMIT,
};
use driva_storage::{
	models::{EnrichmentFact, SizeCategory, WorkspaceJobCount},
	schema::GOLD_TABLE,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Overview {
	pub total_jobs: u64,
	pub small_jobs: u64,
	pub medium_jobs: u64,
	pub large_jobs: u64,
	pub very_large_jobs: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct EnrichmentFactItem {
	#[serde(rename = "id_enriquecimento")]
	pub id: i64,
	pub id_workspace: Option<String>,
	#[serde(rename = "nome_workspace")]
	pub workspace_name: Option<String>,
	#[serde(rename = "total_contatos")]
	pub total_contacts: Option<i64>,
	#[serde(rename = "tipo_contato")]
	pub contact_type: Option<String>,
	#[serde(rename = "status_processamento")]
	pub processing_status: Option<String>,
	#[serde(rename = "duracao_processamento_minutos")]
	pub processing_minutes: Option<f64>,
	#[serde(rename = "tempo_por_contato_minutos")]
	pub minutes_per_contact: Option<f64>,
	#[serde(rename = "processamento_sucesso")]
	pub processing_succeeded: Option<bool>,
	#[serde(rename = "categoria_tamanho_job")]
	pub size_category: Option<String>,
	#[serde(rename = "necessita_reprocessamento")]
	pub needs_reprocessing: Option<bool>,
	#[serde(rename = "data_criacao", with = "crate::time_serde::option")]
	pub created_at: Option<OffsetDateTime>,
	#[serde(rename = "data_atualizacao", with = "crate::time_serde::option")]
	pub updated_at: Option<OffsetDateTime>,
	#[serde(rename = "data_atualizacao_dw", with = "crate::time_serde::option")]
	pub warehouse_updated_at: Option<OffsetDateTime>,
}
impl From<EnrichmentFact> for EnrichmentFactItem {
	fn from(fact: EnrichmentFact) -> Self {
		Self {
			id: fact.id,
			id_workspace: fact.id_workspace,
			workspace_name: fact.workspace_name,
			total_contacts: fact.total_contacts,
			contact_type: fact.contact_type,
			processing_status: fact.processing_status,
			processing_minutes: fact.processing_minutes,
			minutes_per_contact: fact.minutes_per_contact,
			processing_succeeded: fact.processing_succeeded,
			size_category: fact.size_category,
			needs_reprocessing: fact.needs_reprocessing,
			created_at: fact.created_at,
			updated_at: fact.updated_at,
			warehouse_updated_at: fact.warehouse_updated_at,
		}
	}
}

#[derive(Debug, Clone, Serialize)]
pub struct EnrichmentStatusResponse {
	pub data: Vec<EnrichmentFactItem>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TopWorkspacesRequest {
	/// Absent returns every workspace.
	pub limit: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WorkspaceJobsItem {
	pub id_workspace: Option<String>,
	pub nome_workspace: Option<String>,
	pub total_jobs: u64,
}
impl From<WorkspaceJobCount> for WorkspaceJobsItem {
	fn from(row: WorkspaceJobCount) -> Self {
		Self {
			id_workspace: row.id_workspace,
			nome_workspace: row.workspace_name,
			total_jobs: count(row.total_jobs),
		}
	}
}

#[derive(Debug, Clone, Serialize)]
pub struct TopWorkspacesResponse {
	pub data: Vec<WorkspaceJobsItem>,
}

impl DrivaService {
	pub async fn overview(&self) -> Result<Overview> {
		let mut conn = self.db.acquire().await?;
		let sql = overview_sql();
		let mut query = sqlx::query_as::<_, (i64, i64, i64, i64, i64)>(&sql);

		for category in SizeCategory::ALL {
			query = query.bind(category.as_str());
		}

		let (total, small, medium, large, very_large) = query.fetch_one(&mut *conn).await?;

		Ok(Overview {
			total_jobs: count(total),
			small_jobs: count(small),
			medium_jobs: count(medium),
			large_jobs: count(large),
			very_large_jobs: count(very_large),
		})
	}

	pub async fn enrichment_status(
		&self,
		req: EnrichmentStatusRequest,
	) -> Result<EnrichmentStatusResponse> {
		let filter = FilterCriteria::from_request(&req)?;
		let mut builder = status_query(&filter);
		let mut conn = self.db.acquire().await?;
		let facts: Vec<EnrichmentFact> =
			builder.build_query_as().fetch_all(&mut *conn).await?;

		Ok(EnrichmentStatusResponse {
			data: facts.into_iter().map(EnrichmentFactItem::from).collect(),
		})
	}

	pub async fn top_workspaces(&self, req: TopWorkspacesRequest) -> Result<TopWorkspacesResponse> {
		let limit = match req.limit {
			None => None,
			Some(value) if (1..=i64::from(MAX_LIMIT)).contains(&value) => Some(value),
			Some(_) => {
				return Err(Error::InvalidRequest {
					message: format!("limit must be between 1 and {MAX_LIMIT}."),
				});
			},
		};
		let mut builder = top_workspaces_query(limit);
		let mut conn = self.db.acquire().await?;
		let rows: Vec<WorkspaceJobCount> = builder.build_query_as().fetch_all(&mut *conn).await?;

		Ok(TopWorkspacesResponse { data: rows.into_iter().map(WorkspaceJobsItem::from).collect() })
	}
}

fn overview_sql() -> String {
	format!(
		"\
SELECT
	COUNT(*),
	COUNT(*) FILTER (WHERE categoria_tamanho_job = $1),
	COUNT(*) FILTER (WHERE categoria_tamanho_job = $2),
	COUNT(*) FILTER (WHERE categoria_tamanho_job = $3),
	COUNT(*) FILTER (WHERE categoria_tamanho_job = $4)
FROM {GOLD_TABLE}"
	)
}

/// Rows come back in fact id order, the first column of the table.
fn status_query(filter: &FilterCriteria) -> QueryBuilder<'static, Postgres> {
	let mut builder = QueryBuilder::new(format!("SELECT * FROM {GOLD_TABLE}"));

	filter.push_where(&mut builder);
	builder.push(" ORDER BY 1");

	builder
}

/// Highest job count first; equal counts fall back to ascending workspace id.
fn top_workspaces_query(limit: Option<i64>) -> QueryBuilder<'static, Postgres> {
	let mut builder = QueryBuilder::new(format!(
		"\
SELECT id_workspace, nome_workspace, COUNT(*) AS total_jobs
FROM {GOLD_TABLE}
GROUP BY id_workspace, nome_workspace
ORDER BY total_jobs DESC, id_workspace ASC"
	));

	if let Some(limit) = limit {
		builder.push(" LIMIT ");
		builder.push_bind(limit);
	}

	builder
}
