pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Storage error: {message}")]
	Storage { message: String },
}
impl From<sqlx::Error> for Error {
	fn from(err: sqlx::Error) -> Self {
		Self::Storage { message: err.to_string() }
	}
}

impl From<driva_storage::Error> for Error {
	fn from(err: driva_storage::Error) -> Self {
		match err {
			driva_storage::Error::Sqlx(inner) => Self::Storage { message: inner.to_string() },
			// Only reachable through connection settings, never through caller input.
			driva_storage::Error::InvalidArgument(message) => Self::Storage { message },
		}
	}
}
