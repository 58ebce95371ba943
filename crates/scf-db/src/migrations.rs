//! Embedded schema, applied on every open. Statements are `IF NOT EXISTS`,
//! so re-applying is a no-op.

use crate::ScfDb;
use crate::error::DatabaseError;

/// (name, SQL) in application order.
const MIGRATIONS: &[(&str, &str)] = &[("001_initial", include_str!("../migrations/001_initial.sql"))];

impl ScfDb {
    pub(crate) async fn run_migrations(&self) -> Result<(), DatabaseError> {
        for (name, sql) in MIGRATIONS {
            self.conn
                .execute_batch(sql)
                .await
                .map_err(|e| DatabaseError::Migration(format!("{name}: {e}")))?;
            tracing::debug!(migration = name, "schema applied");
        }
        Ok(())
    }
}
