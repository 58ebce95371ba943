//! Repository modules for every persisted SCF entity.
//!
//! A `Repo` borrows a connection, which may be a transaction's (libSQL's
//! `Transaction` derefs to `Connection`). Each module adds methods to `Repo`
//! via `impl Repo<'_>` blocks.

pub mod auditor;
pub mod catalog;
pub mod evidence_request;
pub mod organization;
pub mod page;
pub mod project;
pub mod relation;

use crate::error::DatabaseError;

#[derive(Clone, Copy)]
pub struct Repo<'c> {
    conn: &'c libsql::Connection,
}

impl<'c> Repo<'c> {
    #[must_use]
    pub const fn new(conn: &'c libsql::Connection) -> Self {
        Self { conn }
    }

    #[must_use]
    pub const fn conn(&self) -> &'c libsql::Connection {
        self.conn
    }

    /// Generate a prefixed object ID on this repo's connection.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn generate_id(&self, prefix: &str) -> Result<String, DatabaseError> {
        crate::generate_id(self.conn, prefix).await
    }

    /// Run a `SELECT COUNT(*)` style query that returns one integer.
    pub(crate) async fn count(
        &self,
        sql: &str,
        params: impl libsql::params::IntoParams,
    ) -> Result<u32, DatabaseError> {
        let mut rows = self.conn.query(sql, params).await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        let n = row.get::<i64>(0)?;
        u32::try_from(n).map_err(|_| DatabaseError::InvalidState(format!("count out of range: {n}")))
    }
}
