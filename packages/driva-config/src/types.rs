use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
	#[serde(default)]
	pub service: Service,
	#[serde(default)]
	pub storage: Storage,
	/// Defaults to an empty key, which validation rejects.
	#[serde(default)]
	pub security: Security,
	#[serde(default)]
	pub chaos: Chaos,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
}
impl Default for Service {
	fn default() -> Self {
		Self { http_bind: default_http_bind(), log_level: default_log_level() }
	}
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Storage {
	pub postgres: Postgres,
}

#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct Postgres {
	/// Optional. When set, takes precedence over the discrete connection fields.
	pub dsn: Option<String>,
	pub host: String,
	pub port: u16,
	pub database: String,
	pub user: String,
	pub password: String,
	pub pool_max_conns: u32,
	pub acquire_timeout_ms: u64,
	/// Extra attempts after the first failed connection acquisition.
	pub connect_retries: u32,
	pub connect_retry_delay_ms: u64,
	/// Create the warehouse tables on start. Meant for local development.
	pub bootstrap_schema: bool,
}
impl Default for Postgres {
	fn default() -> Self {
		Self {
			dsn: None,
			host: "postgres".to_string(),
			port: 5_432,
			database: "driva-dw".to_string(),
			user: "driva".to_string(),
			password: "driva".to_string(),
			pool_max_conns: 10,
			acquire_timeout_ms: 5_000,
			connect_retries: 1,
			connect_retry_delay_ms: 200,
			bootstrap_schema: false,
		}
	}
}
impl std::fmt::Debug for Postgres {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Postgres")
			.field("dsn", &self.dsn.as_ref().map(|_| "[redacted]"))
			.field("host", &self.host)
			.field("port", &self.port)
			.field("database", &self.database)
			.field("user", &self.user)
			.field("password", &"[redacted]")
			.field("pool_max_conns", &self.pool_max_conns)
			.field("acquire_timeout_ms", &self.acquire_timeout_ms)
			.field("connect_retries", &self.connect_retries)
			.field("connect_retry_delay_ms", &self.connect_retry_delay_ms)
			.field("bootstrap_schema", &self.bootstrap_schema)
			.finish()
	}
}

#[derive(Clone, Default, Deserialize)]
pub struct Security {
	pub api_key: String,
}
impl std::fmt::Debug for Security {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Security").field("api_key", &"[redacted]").finish()
	}
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Chaos {
	/// Probability in [0, 1] that an authenticated request is rejected with 429.
	pub fault_probability: f64,
}
impl Default for Chaos {
	fn default() -> Self {
		Self { fault_probability: DEFAULT_FAULT_PROBABILITY }
	}
}

pub const DEFAULT_FAULT_PROBABILITY: f64 = 0.05;

fn default_http_bind() -> String {
	"0.0.0.0:8000".to_string()
}

fn default_log_level() -> String {
	"info".to_string()
}
