use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};

use crate::{routes::ApiError, state::AppState};

/// Rejects a configurable share of authenticated requests with a synthetic rate limit.
#[derive(Clone, Copy, Debug)]
pub struct FaultInjector {
	probability: f64,
}
impl FaultInjector {
	pub fn new(probability: f64) -> Self {
		Self { probability: probability.clamp(0.0, 1.0) }
	}

	pub fn probability(&self) -> f64 {
		self.probability
	}

	/// `draw` is uniform in `[0, 1)`, so 0.0 never trips and 1.0 always does.
	pub fn trips(&self, draw: f64) -> bool {
		draw < self.probability
	}

	pub fn roll(&self) -> bool {
		self.trips(rand::random::<f64>())
	}
}

pub async fn inject_faults(
	State(state): State<AppState>,
	req: Request<Body>,
	next: Next,
) -> Result<Response, ApiError> {
	if state.faults.roll() {
		tracing::debug!(path = %req.uri().path(), "Injected synthetic rate limit.");

		return Err(ApiError::rate_limited());
	}

	Ok(next.run(req).await)
}
