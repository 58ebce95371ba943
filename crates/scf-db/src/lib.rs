//! # scf-db
//!
//! libSQL storage for SCF project bootstrapping.
//!
//! Holds the page graph (pages with an adjacency-list parent column,
//! reciprocal page relations), the derived artifacts (evidence requests,
//! auditors), and the read-only SCF catalog. On top of the repositories sit
//! the bootstrap pipeline, which compiles an SCF configuration document into
//! that graph inside one transaction, and the read-side document assembler.

pub mod assembler;
pub mod bootstrap;
pub mod error;
pub mod helpers;
mod migrations;
pub mod repos;
pub mod service;

#[cfg(test)]
mod test_support;

use error::DatabaseError;
use libsql::Builder;

/// Central database handle.
///
/// Wraps a libSQL database and its single connection. `:memory:` databases
/// are per-connection, so everything goes through `conn`.
pub struct ScfDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
}

impl ScfDb {
    /// Open a local database at the given path, or `":memory:"`.
    ///
    /// Runs migrations automatically on open.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;

        // Enable foreign keys (must be per-connection in SQLite)
        conn.execute("PRAGMA foreign_keys = ON", ())
            .await
            .map_err(|e| DatabaseError::Migration(format!("PRAGMA foreign_keys: {e}")))?;

        let scf_db = Self { db, conn };
        scf_db.run_migrations().await?;
        Ok(scf_db)
    }

    /// Access the underlying libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }

    /// Cheap liveness probe.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn ping(&self) -> Result<(), DatabaseError> {
        let mut rows = self.conn.query("SELECT 1", ()).await?;
        rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Ok(())
    }
}

/// Mint a prefixed identifier such as `"doc-a3f8b2c1d4e5f607"`.
///
/// The 16 hex chars come from `randomblob(8)`; taking a connection lets
/// callers mint ids inside an open transaction.
///
/// # Errors
///
/// Returns `DatabaseError` if the query fails or returns no rows.
pub async fn generate_id(conn: &libsql::Connection, prefix: &str) -> Result<String, DatabaseError> {
    let mut rows = conn
        .query("SELECT ?1 || '-' || lower(hex(randomblob(8)))", [prefix])
        .await?;
    let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
    Ok(row.get::<String>(0)?)
}
