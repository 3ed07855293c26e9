//! Warehouse tables read by the API.
//!
//! The API never writes to these tables. The DDL below mirrors the warehouse layout and is only
//! applied for local development and tests.

pub const SEED_TABLE: &str = "api_enrichments_seed.enriquecimentos";
pub const GOLD_TABLE: &str = "gold.enriquecimentos";

pub fn render_schema() -> String {
	format!(
		"\
CREATE SCHEMA IF NOT EXISTS api_enrichments_seed;
CREATE SCHEMA IF NOT EXISTS gold;
CREATE TABLE IF NOT EXISTS {SEED_TABLE} (
	id BIGINT PRIMARY KEY,
	id_workspace UUID NOT NULL,
	nome_workspace TEXT NOT NULL,
	total_contatos INTEGER NOT NULL,
	tipo_contato TEXT NOT NULL,
	status TEXT NOT NULL,
	data_criacao TIMESTAMP,
	data_atualizacao TIMESTAMP
);
CREATE TABLE IF NOT EXISTS {GOLD_TABLE} (
	id_enriquecimento BIGINT PRIMARY KEY,
	id_workspace UUID NOT NULL,
	nome_workspace TEXT NOT NULL,
	total_contatos INTEGER NOT NULL,
	tipo_contato TEXT NOT NULL,
	status_processamento TEXT NOT NULL,
	duracao_processamento_minutos DOUBLE PRECISION,
	tempo_por_contato_minutos DOUBLE PRECISION,
	processamento_sucesso BOOLEAN,
	categoria_tamanho_job TEXT,
	necessita_reprocessamento BOOLEAN,
	data_criacao TIMESTAMP,
	data_atualizacao TIMESTAMP,
	data_atualizacao_dw TIMESTAMPTZ
);
CREATE INDEX IF NOT EXISTS gold_enriquecimentos_data_criacao_idx ON {GOLD_TABLE} (data_criacao);
CREATE INDEX IF NOT EXISTS gold_enriquecimentos_workspace_idx ON {GOLD_TABLE} (id_workspace);"
	)
}

#[cfg(test)]
mod tests {
	#[test]
	fn schema_statements_split_cleanly() {
		let sql = super::render_schema();
		let statements =
			sql.split(';').map(str::trim).filter(|statement| !statement.is_empty()).count();

		assert_eq!(statements, 6);
		assert!(sql.contains("CREATE TABLE IF NOT EXISTS api_enrichments_seed.enriquecimentos"));
		assert!(sql.contains("CREATE TABLE IF NOT EXISTS gold.enriquecimentos"));
	}

	#[test]
	fn timestamp_columns_accept_nulls() {
		let sql = super::render_schema();

		for line in sql.lines().filter(|line| line.trim_start().starts_with("data_")) {
			assert!(!line.contains("NOT NULL"), "Timestamp column must be nullable: {line}");
		}
	}
}
