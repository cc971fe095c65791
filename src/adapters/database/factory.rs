//! Store factory
//!
//! Builds the source and warehouse stores from configuration.

use crate::adapters::database::traits::RelationalStore;
use crate::adapters::postgresql::PostgreSQLStore;
use crate::config::DwhSyncConfig;
use crate::domain::Result;
use std::sync::Arc;

/// Source and warehouse stores for one pipeline
pub struct Stores {
    pub source: Arc<dyn RelationalStore>,
    pub warehouse: Arc<dyn RelationalStore>,
}

/// Create the source and warehouse stores
///
/// No connection is opened here; the first one is acquired by the step that
/// needs it.
///
/// # Errors
///
/// Returns an error if a connection pool cannot be built from the configuration.
pub fn create_stores(config: &DwhSyncConfig) -> Result<Stores> {
    tracing::info!(
        source = %config.source.connection.display_safe(),
        warehouse = %config.warehouse.connection.display_safe(),
        "Creating PostgreSQL stores"
    );

    let source = PostgreSQLStore::new("source", &config.source.connection)?;
    let warehouse = PostgreSQLStore::new("warehouse", &config.warehouse.connection)?;

    Ok(Stores {
        source: Arc::new(source),
        warehouse: Arc::new(warehouse),
    })
}
