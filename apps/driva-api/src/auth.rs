use std::{fmt, sync::Arc};

use axum::{
	body::Body,
	extract::State,
	http::{HeaderValue, Request, header::AUTHORIZATION},
	middleware::Next,
	response::Response,
};

use crate::{routes::ApiError, state::AppState};

/// Matches `Authorization` against `Bearer <api_key>` exactly, after trimming the header.
#[derive(Clone)]
pub struct AuthGate {
	expected: Arc<str>,
}
impl AuthGate {
	pub fn new(api_key: &str) -> Self {
		Self { expected: format!("Bearer {api_key}").into() }
	}

	pub fn check(&self, header: Option<&HeaderValue>) -> Result<(), AuthRejection> {
		let Some(raw) = header else {
			return Err(AuthRejection::Missing);
		};
		// Non-ASCII bytes can never match a configured key.
		let value = raw.to_str().map_err(|_| AuthRejection::Invalid)?.trim();

		if value.is_empty() {
			return Err(AuthRejection::Missing);
		}
		if value != &*self.expected {
			return Err(AuthRejection::Invalid);
		}

		Ok(())
	}
}
impl fmt::Debug for AuthGate {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("AuthGate").field("expected", &"<redacted>").finish()
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthRejection {
	Missing,
	Invalid,
}

pub async fn require_api_key(
	State(state): State<AppState>,
	req: Request<Body>,
	next: Next,
) -> Result<Response, ApiError> {
	if let Err(rejection) = state.auth.check(req.headers().get(AUTHORIZATION)) {
		tracing::debug!(path = %req.uri().path(), ?rejection, "Rejected request at auth gate.");

		return Err(rejection.into());
	}

	Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn gate() -> AuthGate {
		AuthGate::new("secret-key")
	}

	#[test]
	fn exact_bearer_token_passes() {
		let header = HeaderValue::from_static("Bearer secret-key");

		assert_eq!(gate().check(Some(&header)), Ok(()));
	}

	#[test]
	fn surrounding_whitespace_is_ignored() {
		let header = HeaderValue::from_static("  Bearer secret-key ");

		assert_eq!(gate().check(Some(&header)), Ok(()));
	}

	#[test]
	fn absent_or_blank_header_is_missing() {
		assert_eq!(gate().check(None), Err(AuthRejection::Missing));

		let blank = HeaderValue::from_static("   ");

		assert_eq!(gate().check(Some(&blank)), Err(AuthRejection::Missing));
	}

	#[test]
	fn anything_else_is_invalid() {
		for raw in ["Bearer other", "bearer secret-key", "secret-key", "Bearer  secret-key", "Basic x"]
		{
			let header = HeaderValue::from_static(raw);

			assert_eq!(gate().check(Some(&header)), Err(AuthRejection::Invalid), "{raw}");
		}
	}

	#[test]
	fn opaque_header_bytes_are_invalid() {
		let header = HeaderValue::from_bytes(b"Bearer \xffsecret").expect("valid header bytes");

		assert_eq!(gate().check(Some(&header)), Err(AuthRejection::Invalid));
	}

	#[test]
	fn debug_hides_the_key() {
		assert!(!format!("{:?}", gate()).contains("secret-key"));
	}
}
