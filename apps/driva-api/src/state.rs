use std::sync::Arc;

use driva_service::DrivaService;
use driva_storage::db::Db;

use crate::{auth::AuthGate, fault::FaultInjector};

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<DrivaService>,
	pub auth: AuthGate,
	pub faults: FaultInjector,
}
impl AppState {
	pub async fn new(config: driva_config::Config) -> color_eyre::Result<Self> {
		let db = Db::new(&config.storage.postgres)?;

		if config.storage.postgres.bootstrap_schema {
			db.ensure_schema().await?;
		}

		let service = DrivaService::new(db);

		Ok(Self {
			service: Arc::new(service),
			auth: AuthGate::new(&config.security.api_key),
			faults: FaultInjector::new(config.chaos.fault_probability),
		})
	}
}
