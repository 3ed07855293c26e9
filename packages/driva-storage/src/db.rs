use std::{str::FromStr, time::Duration};

use sqlx::{
	PgPool, Postgres,
	pool::PoolConnection,
	postgres::{PgConnectOptions, PgPoolOptions},
};
use tokio::time;

use crate::{Error, Result, schema};

/// Connection acquisition policy applied to every request.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
	pub retries: u32,
	pub delay: Duration,
}

pub struct Db {
	pub pool: PgPool,
	pub retry: RetryPolicy,
}
impl Db {
	/// Builds the pool without touching the network. Connections are opened on first use.
	pub fn new(cfg: &driva_config::Postgres) -> Result<Self> {
		let options = connect_options(cfg)?;
		let pool = PgPoolOptions::new()
			.max_connections(cfg.pool_max_conns)
			.acquire_timeout(Duration::from_millis(cfg.acquire_timeout_ms))
			.connect_lazy_with(options);
		let retry = RetryPolicy {
			retries: cfg.connect_retries,
			delay: Duration::from_millis(cfg.connect_retry_delay_ms),
		};

		Ok(Self { pool, retry })
	}

	/// Checks out one connection for the caller. The connection goes back to the pool when the
	/// returned guard is dropped, on success and on error alike.
	pub async fn acquire(&self) -> Result<PoolConnection<Postgres>> {
		let mut attempt = 0;

		loop {
			match self.pool.acquire().await {
				Ok(conn) => return Ok(conn),
				Err(err) if attempt < self.retry.retries => {
					attempt += 1;

					tracing::warn!(
						attempt,
						retries = self.retry.retries,
						error = %err,
						"Failed to acquire a database connection. Retrying."
					);

					time::sleep(self.retry.delay).await;
				},
				Err(err) => return Err(err.into()),
			}
		}
	}

	pub async fn ensure_schema(&self) -> Result<()> {
		let lock_id: i64 = 4_418_220;
		// Advisory locks are held per connection. Use a single transaction so the lock is scoped to
		// one connection and automatically released when the transaction ends.
		let mut tx = self.pool.begin().await?;

		sqlx::query("SELECT pg_advisory_xact_lock($1)").bind(lock_id).execute(&mut *tx).await?;

		for statement in schema::render_schema().split(';') {
			let trimmed = statement.trim();

			if trimmed.is_empty() {
				continue;
			}

			sqlx::query(trimmed).execute(&mut *tx).await?;
		}

		tx.commit().await?;

		Ok(())
	}
}

pub fn connect_options(cfg: &driva_config::Postgres) -> Result<PgConnectOptions> {
	let options = match cfg.dsn.as_deref() {
		Some(dsn) => PgConnectOptions::from_str(dsn)
			.map_err(|err| Error::InvalidArgument(format!("Failed to parse Postgres DSN: {err}.")))?,
		None => PgConnectOptions::new()
			.host(&cfg.host)
			.port(cfg.port)
			.database(&cfg.database)
			.username(&cfg.user)
			.password(&cfg.password),
	};

	// Zone-less timestamps are compared and rendered as UTC.
	Ok(options.options([("timezone", "UTC")]))
}
