pub mod analytics;
pub mod enrichments;
pub mod filter;
pub mod pagination;
pub mod time_serde;

mod error;

pub use analytics::{
	EnrichmentFactItem, EnrichmentStatusResponse, Overview, TopWorkspacesRequest,
	TopWorkspacesResponse, WorkspaceJobsItem,
};
pub use enrichments::{EnrichmentItem, EnrichmentsPage, ListEnrichmentsRequest};
pub use error::{Error, Result};
pub use filter::{EnrichmentStatusRequest, FilterCriteria};
pub use pagination::{PageMeta, PageRequest};

use driva_storage::db::Db;

/// Read-only queries over the enrichment warehouse.
///
/// Each call checks out one connection, runs its statements on it one after another and hands
/// it back when done. Calls share no state.
pub struct DrivaService {
	pub db: Db,
}
impl DrivaService {
	pub fn new(db: Db) -> Self {
		Self { db }
	}
}
