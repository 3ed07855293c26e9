use axum::{
	Json, Router,
	extract::{Query, State, rejection::QueryRejection},
	http::StatusCode,
	middleware,
	response::{IntoResponse, Response},
	routing::get,
};
use serde::Serialize;

use crate::{
	auth::{self, AuthRejection},
	fault,
	state::AppState,
};
use driva_service::{
	EnrichmentStatusRequest, EnrichmentStatusResponse, EnrichmentsPage, Error as ServiceError,
	ListEnrichmentsRequest, Overview, TopWorkspacesRequest, TopWorkspacesResponse,
};

pub const INVALID_REQUEST: &str = "INVALID_REQUEST";

/// `/health` stays outside both layers. Auth runs first, so unauthenticated callers never reach
/// the fault injector.
pub fn router(state: AppState) -> Router {
	let protected = Router::new()
		.route("/people/v1/enrichments", get(list_enrichments))
		.route("/analytics/overview", get(overview))
		.route("/analytics/enrichments/status", get(enrichment_status))
		.route("/analytics/workspaces/top", get(top_workspaces))
		.route_layer(middleware::from_fn_with_state(state.clone(), fault::inject_faults))
		.route_layer(middleware::from_fn_with_state(state.clone(), auth::require_api_key));

	Router::new().route("/health", get(health)).merge(protected).with_state(state)
}

#[derive(Debug, Serialize)]
struct HealthBody {
	status: &'static str,
}

async fn health() -> Json<HealthBody> {
	Json(HealthBody { status: "ok" })
}

async fn list_enrichments(
	State(state): State<AppState>,
	query: Result<Query<ListEnrichmentsRequest>, QueryRejection>,
) -> Result<Json<EnrichmentsPage>, ApiError> {
	let Query(req) = query?;
	let response = state.service.list_enrichments(req).await?;

	Ok(Json(response))
}

async fn overview(State(state): State<AppState>) -> Result<Json<Overview>, ApiError> {
	let response = state.service.overview().await?;

	Ok(Json(response))
}

async fn enrichment_status(
	State(state): State<AppState>,
	query: Result<Query<EnrichmentStatusRequest>, QueryRejection>,
) -> Result<Json<EnrichmentStatusResponse>, ApiError> {
	let Query(req) = query?;
	let response = state.service.enrichment_status(req).await?;

	Ok(Json(response))
}

async fn top_workspaces(
	State(state): State<AppState>,
	query: Result<Query<TopWorkspacesRequest>, QueryRejection>,
) -> Result<Json<TopWorkspacesResponse>, ApiError> {
	let Query(req) = query?;
	let response = state.service.top_workspaces(req).await?;

	Ok(Json(response))
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}
impl ApiError {
	fn new(
		status: StatusCode,
		error_code: impl Into<String>,
		message: impl Into<String>,
		fields: Option<Vec<String>>,
	) -> Self {
		Self { status, error_code: error_code.into(), message: message.into(), fields }
	}

	pub fn status(&self) -> StatusCode {
		self.status
	}

	pub fn rate_limited() -> Self {
		json_error(StatusCode::TOO_MANY_REQUESTS, "RATE_LIMITED", "Too many requests.", None)
	}
}

pub fn json_error(
	status: StatusCode,
	code: &str,
	message: impl Into<String>,
	fields: Option<Vec<String>>,
) -> ApiError {
	ApiError::new(status, code, message, fields)
}

impl From<ServiceError> for ApiError {
	fn from(err: ServiceError) -> Self {
		match err {
			ServiceError::InvalidRequest { message } =>
				json_error(StatusCode::UNPROCESSABLE_ENTITY, INVALID_REQUEST, message, None),
			ServiceError::Storage { message } => {
				tracing::error!(error = %message, "Database query failed.");

				json_error(
					StatusCode::INTERNAL_SERVER_ERROR,
					"DATABASE_ERROR",
					"Database error.",
					None,
				)
			},
		}
	}
}

impl From<AuthRejection> for ApiError {
	fn from(rejection: AuthRejection) -> Self {
		match rejection {
			AuthRejection::Missing => json_error(
				StatusCode::UNAUTHORIZED,
				"AUTH_MISSING",
				"Authorization header is required.",
				None,
			),
			AuthRejection::Invalid =>
				json_error(StatusCode::FORBIDDEN, "AUTH_INVALID", "Invalid API key.", None),
		}
	}
}

impl From<QueryRejection> for ApiError {
	fn from(rejection: QueryRejection) -> Self {
		json_error(StatusCode::UNPROCESSABLE_ENTITY, INVALID_REQUEST, rejection.body_text(), None)
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body =
			ErrorBody { error_code: self.error_code, message: self.message, fields: self.fields };

		(self.status, Json(body)).into_response()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn storage_errors_hide_details() {
		let err = ApiError::from(ServiceError::Storage {
			message: "password authentication failed for user \"driva\"".to_string(),
		});

		assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
		assert_eq!(err.message, "Database error.");
		assert_eq!(err.error_code, "DATABASE_ERROR");
	}

	#[test]
	fn validation_errors_are_unprocessable() {
		let err = ApiError::from(ServiceError::InvalidRequest {
			message: "limit must be between 1 and 100.".to_string(),
		});

		assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
		assert_eq!(err.error_code, INVALID_REQUEST);
		assert_eq!(err.message, "limit must be between 1 and 100.");
	}

	#[test]
	fn auth_rejections_map_to_distinct_statuses() {
		assert_eq!(ApiError::from(AuthRejection::Missing).status(), StatusCode::UNAUTHORIZED);
		assert_eq!(ApiError::from(AuthRejection::Invalid).status(), StatusCode::FORBIDDEN);
	}
}
