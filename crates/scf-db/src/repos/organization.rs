//! Organization lookups and the seeding helper used by the import job.

use chrono::Utc;

use scf_core::entities::Organization;
use scf_core::ids::PREFIX_ORGANIZATION;

use super::Repo;
use crate::error::DatabaseError;
use crate::helpers::parse_datetime;

fn row_to_organization(row: &libsql::Row) -> Result<Organization, DatabaseError> {
    Ok(Organization {
        object_id: row.get::<String>(0)?,
        name: row.get::<String>(1)?,
        created_at: parse_datetime(&row.get::<String>(2)?)?,
    })
}

impl Repo<'_> {
    pub async fn create_organization(&self, name: &str) -> Result<Organization, DatabaseError> {
        let now = Utc::now();
        let object_id = self.generate_id(PREFIX_ORGANIZATION).await?;
        self.conn()
            .execute(
                "INSERT INTO organizations (object_id, name, created_at) VALUES (?1, ?2, ?3)",
                libsql::params![object_id.as_str(), name, now.to_rfc3339()],
            )
            .await?;
        Ok(Organization {
            object_id,
            name: name.to_string(),
            created_at: now,
        })
    }

    pub async fn get_organization(
        &self,
        object_id: &str,
    ) -> Result<Option<Organization>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                "SELECT object_id, name, created_at FROM organizations WHERE object_id = ?1",
                [object_id],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_organization(&row)?)),
            None => Ok(None),
        }
    }
}
