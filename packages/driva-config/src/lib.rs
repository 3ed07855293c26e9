mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Chaos, Config, DEFAULT_FAULT_PROBABILITY, Postgres, Security, Service, Storage};

use std::{fs, path::Path};

use figment::{
	Figment,
	providers::{Env, Format, Toml},
};

/// Staging key for `DB_CONNECT_RETRY_DELAY`, which is given in seconds.
const RETRY_DELAY_SECS_KEY: &str = "db_connect_retry_delay";
/// Deployment variables and the config keys they override.
const ENV_KEYS: [(&str, &str); 12] = [
	("HTTP_BIND", "service.http_bind"),
	("LOG_LEVEL", "service.log_level"),
	("DATABASE_URL", "storage.postgres.dsn"),
	("DB_HOST", "storage.postgres.host"),
	("DB_PORT", "storage.postgres.port"),
	("DB_NAME", "storage.postgres.database"),
	("DB_USR", "storage.postgres.user"),
	("DB_PSW", "storage.postgres.password"),
	("DB_CONNECT_RETRIES", "storage.postgres.connect_retries"),
	("DB_CONNECT_RETRY_DELAY", RETRY_DELAY_SECS_KEY),
	("FAULT_PROBABILITY", "chaos.fault_probability"),
	("API_KEY", "security.api_key"),
];

/// Loads a TOML file and overlays the deployment environment variables on top of it.
pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	extract(Figment::new().merge(Toml::string(&raw)).merge(env_provider()))
}

/// Builds the configuration from the environment alone. Unset variables keep their defaults.
pub fn from_env() -> Result<Config> {
	extract(Figment::new().merge(env_provider()))
}

/// Maps `DB_HOST`, `DB_PORT`, `DB_NAME`, `DB_USR`, `DB_PSW`, `DATABASE_URL`,
/// `DB_CONNECT_RETRIES`, `DB_CONNECT_RETRY_DELAY`, `API_KEY`, `HTTP_BIND`, `LOG_LEVEL` and
/// `FAULT_PROBABILITY` onto their config keys. Nothing else is read from the environment.
pub fn env_provider() -> Env {
	let names = ENV_KEYS.map(|(name, _)| name);

	Env::raw().only(&names).map(|key| {
		match ENV_KEYS.iter().find(|(name, _)| key.as_str().eq_ignore_ascii_case(name)) {
			Some((_, path)) => (*path).into(),
			None => key.as_str().to_string().into(),
		}
	})
}

/// Extracts, normalizes and validates a config from any figment.
pub fn extract(figment: Figment) -> Result<Config> {
	let mut cfg: Config = figment.extract()?;

	if let Some(delay_ms) = retry_delay_override(&figment)? {
		cfg.storage.postgres.connect_retry_delay_ms = delay_ms;
	}

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}
	if cfg.security.api_key.is_empty() {
		return Err(Error::Validation {
			message: "security.api_key must be non-empty.".to_string(),
		});
	}

	let postgres = &cfg.storage.postgres;

	if postgres.dsn.is_none() {
		if postgres.host.trim().is_empty() {
			return Err(Error::Validation {
				message: "storage.postgres.host must be non-empty.".to_string(),
			});
		}
		if postgres.port == 0 {
			return Err(Error::Validation {
				message: "storage.postgres.port must be greater than zero.".to_string(),
			});
		}
		if postgres.database.trim().is_empty() {
			return Err(Error::Validation {
				message: "storage.postgres.database must be non-empty.".to_string(),
			});
		}
	}
	if postgres.pool_max_conns == 0 {
		return Err(Error::Validation {
			message: "storage.postgres.pool_max_conns must be greater than zero.".to_string(),
		});
	}
	if postgres.acquire_timeout_ms == 0 {
		return Err(Error::Validation {
			message: "storage.postgres.acquire_timeout_ms must be greater than zero.".to_string(),
		});
	}

	let probability = cfg.chaos.fault_probability;

	if !probability.is_finite() {
		return Err(Error::Validation {
			message: "chaos.fault_probability must be a finite number.".to_string(),
		});
	}
	if !(0.0..=1.0).contains(&probability) {
		return Err(Error::Validation {
			message: "chaos.fault_probability must be in the range 0.0-1.0.".to_string(),
		});
	}

	Ok(())
}

fn retry_delay_override(figment: &Figment) -> Result<Option<u64>> {
	if !figment.contains(RETRY_DELAY_SECS_KEY) {
		return Ok(None);
	}

	let delay_secs: f64 = figment.extract_inner(RETRY_DELAY_SECS_KEY)?;

	if !delay_secs.is_finite() || delay_secs < 0.0 {
		return Err(Error::Env {
			name: "DB_CONNECT_RETRY_DELAY".to_string(),
			message: "must be a non-negative number of seconds.".to_string(),
		});
	}

	Ok(Some((delay_secs * 1_000.0).round() as u64))
}

fn normalize(cfg: &mut Config) {
	cfg.security.api_key = cfg.security.api_key.trim().to_string();

	if cfg.storage.postgres.dsn.as_deref().map(|dsn| dsn.trim().is_empty()).unwrap_or(false) {
		cfg.storage.postgres.dsn = None;
	}
}
