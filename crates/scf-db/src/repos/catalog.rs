//! SCF catalog reads, plus the insert seam used by the import job and tests.

use scf_core::entities::{FrameworkMapping, ScfRisk, ScfThreat};

use super::Repo;
use crate::error::DatabaseError;

impl Repo<'_> {
    pub async fn get_risk(&self, object_id: &str) -> Result<Option<ScfRisk>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                "SELECT object_id, title, description FROM scf_risks WHERE object_id = ?1",
                [object_id],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(ScfRisk {
                object_id: row.get::<String>(0)?,
                title: row.get::<String>(1)?,
                description: row.get::<String>(2)?,
            })),
            None => Ok(None),
        }
    }

    pub async fn get_threat(&self, object_id: &str) -> Result<Option<ScfThreat>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                "SELECT object_id, title, description FROM scf_threats WHERE object_id = ?1",
                [object_id],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(ScfThreat {
                object_id: row.get::<String>(0)?,
                title: row.get::<String>(1)?,
                description: row.get::<String>(2)?,
            })),
            None => Ok(None),
        }
    }

    /// Framework mapping rows for one catalog control, unordered.
    pub async fn list_framework_mappings(
        &self,
        scf_object_id: &str,
    ) -> Result<Vec<FrameworkMapping>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                "SELECT scf_object_id, framework, external_id FROM scf_framework_maps WHERE scf_object_id = ?1",
                [scf_object_id],
            )
            .await?;
        let mut mappings = Vec::new();
        while let Some(row) = rows.next().await? {
            mappings.push(FrameworkMapping {
                scf_object_id: row.get::<String>(0)?,
                framework: row.get::<String>(1)?,
                external_id: row.get::<String>(2)?,
            });
        }
        Ok(mappings)
    }

    pub async fn upsert_risk(&self, risk: &ScfRisk) -> Result<(), DatabaseError> {
        self.conn()
            .execute(
                "INSERT INTO scf_risks (object_id, title, description) VALUES (?1, ?2, ?3)
                 ON CONFLICT(object_id) DO UPDATE SET title = excluded.title, description = excluded.description",
                libsql::params![
                    risk.object_id.as_str(),
                    risk.title.as_str(),
                    risk.description.as_str()
                ],
            )
            .await?;
        Ok(())
    }

    pub async fn upsert_threat(&self, threat: &ScfThreat) -> Result<(), DatabaseError> {
        self.conn()
            .execute(
                "INSERT INTO scf_threats (object_id, title, description) VALUES (?1, ?2, ?3)
                 ON CONFLICT(object_id) DO UPDATE SET title = excluded.title, description = excluded.description",
                libsql::params![
                    threat.object_id.as_str(),
                    threat.title.as_str(),
                    threat.description.as_str()
                ],
            )
            .await?;
        Ok(())
    }

    pub async fn insert_framework_mapping(
        &self,
        mapping: &FrameworkMapping,
    ) -> Result<(), DatabaseError> {
        self.conn()
            .execute(
                "INSERT INTO scf_framework_maps (scf_object_id, framework, external_id) VALUES (?1, ?2, ?3)",
                libsql::params![
                    mapping.scf_object_id.as_str(),
                    mapping.framework.as_str(),
                    mapping.external_id.as_str()
                ],
            )
            .await?;
        Ok(())
    }
}
