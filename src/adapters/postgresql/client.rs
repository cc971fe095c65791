//! PostgreSQL store implementation
//!
//! Wraps a small deadpool connection pool per database. The pool is built
//! lazily: no connection is opened until a step calls [`RelationalStore::connect`].

use crate::adapters::database::traits::{RelationalStore, StoreConnection};
use crate::adapters::postgresql::adapter::PostgreSQLConnection;
use crate::config::ConnectionConfig;
use crate::domain::{PipelineError, Result};
use async_trait::async_trait;
use deadpool_postgres::{Manager, ManagerConfig, Pool, RecyclingMethod, Runtime};
use secrecy::ExposeSecret;
use std::time::Duration;
use tokio_postgres::NoTls;

/// PostgreSQL database used as a pipeline source or warehouse
pub struct PostgreSQLStore {
    /// Store label for logs and errors
    name: String,

    /// Connection pool
    pool: Pool,

    /// Connection target without credentials
    display: String,
}

impl PostgreSQLStore {
    /// Create a new PostgreSQL store
    ///
    /// # Arguments
    ///
    /// * `name` - Label used in logs and errors
    /// * `config` - Connection parameters
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Configuration`] if the pool cannot be built.
    pub fn new(name: impl Into<String>, config: &ConnectionConfig) -> Result<Self> {
        let name = name.into();
        let timeout = Duration::from_secs(config.connect_timeout_seconds);

        let mut pg_config = tokio_postgres::Config::new();
        pg_config
            .host(&config.host)
            .port(config.port)
            .dbname(&config.dbname)
            .user(&config.user)
            .password(config.password.expose_secret().as_str())
            .connect_timeout(timeout)
            .application_name("dwhsync");

        let manager = Manager::from_config(
            pg_config,
            NoTls,
            ManagerConfig {
                recycling_method: RecyclingMethod::Fast,
            },
        );

        let pool = Pool::builder(manager)
            .max_size(config.max_connections)
            .runtime(Runtime::Tokio1)
            .wait_timeout(Some(timeout))
            .create_timeout(Some(timeout))
            .recycle_timeout(Some(timeout))
            .build()
            .map_err(|e| {
                PipelineError::Configuration(format!(
                    "Failed to create connection pool for {name}: {e}"
                ))
            })?;

        Ok(Self {
            name,
            pool,
            display: config.display_safe(),
        })
    }

    /// Connection target without the password
    pub fn display_safe(&self) -> &str {
        &self.display
    }
}

#[async_trait]
impl RelationalStore for PostgreSQLStore {
    fn name(&self) -> &str {
        &self.name
    }

    async fn connect(&self) -> Result<Box<dyn StoreConnection>> {
        let client = self.pool.get().await.map_err(|e| {
            tracing::error!(
                store = %self.name,
                target = %self.display,
                error = %e,
                "Failed to connect to PostgreSQL"
            );
            PipelineError::connection_unavailable(&self.name, e)
        })?;

        tracing::debug!(store = %self.name, target = %self.display, "Connected to PostgreSQL");
        Ok(Box::new(PostgreSQLConnection::new(self.name.clone(), client)))
    }
}
