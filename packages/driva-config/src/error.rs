pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Failed to read config file at {path:?}.")]
	ReadConfig { path: std::path::PathBuf, source: std::io::Error },
	#[error("Failed to extract config: {source}")]
	Extract { source: Box<figment::Error> },
	#[error("Environment variable {name} is invalid: {message}")]
	Env { name: String, message: String },
	#[error("{message}")]
	Validation { message: String },
}
impl From<figment::Error> for Error {
	fn from(err: figment::Error) -> Self {
		Self::Extract { source: Box::new(err) }
	}
}
