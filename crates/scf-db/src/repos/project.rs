//! Project repository: find-or-create keyed by (organization, name).

use chrono::Utc;

use scf_core::entities::Project;
use scf_core::enums::ProjectStatus;
use scf_core::ids::PREFIX_PROJECT;

use super::Repo;
use crate::error::DatabaseError;
use crate::helpers::{parse_datetime, parse_enum};

const PROJECT_COLUMNS: &str = "object_id, organization_id, name, description, status, \
     compliance_score, created_at, updated_at";

fn row_to_project(row: &libsql::Row) -> Result<Project, DatabaseError> {
    Ok(Project {
        object_id: row.get::<String>(0)?,
        organization_id: row.get::<String>(1)?,
        name: row.get::<String>(2)?,
        description: row.get::<String>(3)?,
        status: parse_enum(&row.get::<String>(4)?)?,
        compliance_score: row.get::<f64>(5)?,
        created_at: parse_datetime(&row.get::<String>(6)?)?,
        updated_at: parse_datetime(&row.get::<String>(7)?)?,
    })
}

impl Repo<'_> {
    pub async fn get_project(
        &self,
        organization_id: &str,
        object_id: &str,
    ) -> Result<Option<Project>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                &format!(
                    "SELECT {PROJECT_COLUMNS} FROM projects WHERE organization_id = ?1 AND object_id = ?2"
                ),
                [organization_id, object_id],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_project(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn find_project_by_name(
        &self,
        organization_id: &str,
        name: &str,
    ) -> Result<Option<Project>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                &format!(
                    "SELECT {PROJECT_COLUMNS} FROM projects WHERE organization_id = ?1 AND name = ?2"
                ),
                [organization_id, name],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_project(&row)?)),
            None => Ok(None),
        }
    }

    /// Return the project named `name`, creating it with `description` if absent.
    ///
    /// The boolean is true when this call created the row. An existing
    /// project keeps its description.
    pub async fn find_or_create_project(
        &self,
        organization_id: &str,
        name: &str,
        description: &str,
    ) -> Result<(Project, bool), DatabaseError> {
        if let Some(existing) = self.find_project_by_name(organization_id, name).await? {
            return Ok((existing, false));
        }

        let now = Utc::now();
        let object_id = self.generate_id(PREFIX_PROJECT).await?;
        let status = ProjectStatus::Active;
        self.conn()
            .execute(
                "INSERT INTO projects (object_id, organization_id, name, description, status, compliance_score, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                libsql::params![
                    object_id.as_str(),
                    organization_id,
                    name,
                    description,
                    status.as_str(),
                    0.0_f64,
                    now.to_rfc3339(),
                    now.to_rfc3339()
                ],
            )
            .await?;

        Ok((
            Project {
                object_id,
                organization_id: organization_id.to_string(),
                name: name.to_string(),
                description: description.to_string(),
                status,
                compliance_score: 0.0,
                created_at: now,
                updated_at: now,
            },
            true,
        ))
    }

    /// Overwrite the stored description and bump `updated_at`. No-op when
    /// the text is unchanged.
    pub async fn set_project_description(
        &self,
        project: &mut Project,
        description: &str,
    ) -> Result<(), DatabaseError> {
        if project.description == description {
            return Ok(());
        }
        let now = Utc::now();
        self.conn()
            .execute(
                "UPDATE projects SET description = ?1, updated_at = ?2 WHERE object_id = ?3",
                libsql::params![description, now.to_rfc3339(), project.object_id.as_str()],
            )
            .await?;
        project.description = description.to_string();
        project.updated_at = now;
        Ok(())
    }
}
