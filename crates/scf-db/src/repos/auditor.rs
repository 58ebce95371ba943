//! Auditor repository. One auditor per (project, name); each bootstrap
//! rewrites its plan, run metadata is left to the external runner.

use chrono::Utc;

use scf_core::entities::{Auditor, AuditorInstructions};
use scf_core::ids::PREFIX_AUDITOR;

use super::Repo;
use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, parse_datetime, parse_json, parse_optional_datetime, to_json};

const AUDITOR_COLUMNS: &str = "object_id, organization_id, project_id, name, description, schedule, \
     is_active, instructions, last_run_at, run_count, last_status, created_at";

fn row_to_auditor(row: &libsql::Row) -> Result<Auditor, DatabaseError> {
    Ok(Auditor {
        object_id: row.get::<String>(0)?,
        organization_id: row.get::<String>(1)?,
        project_id: row.get::<String>(2)?,
        name: row.get::<String>(3)?,
        description: row.get::<String>(4)?,
        schedule: row.get::<String>(5)?,
        is_active: row.get::<i64>(6)? != 0,
        instructions: parse_json(&row.get::<String>(7)?, "instructions")?,
        last_run_at: parse_optional_datetime(get_opt_string(row, 8)?.as_deref())?,
        run_count: row.get::<i64>(9)?,
        last_status: row.get::<String>(10)?,
        created_at: parse_datetime(&row.get::<String>(11)?)?,
    })
}

impl Repo<'_> {
    pub async fn find_auditor(
        &self,
        project_id: &str,
        name: &str,
    ) -> Result<Option<Auditor>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                &format!("SELECT {AUDITOR_COLUMNS} FROM auditors WHERE project_id = ?1 AND name = ?2"),
                [project_id, name],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_auditor(&row)?)),
            None => Ok(None),
        }
    }

    /// Create the project's auditor named `name`, or point an existing one
    /// at the new plan. Run metadata of an existing auditor is kept. The
    /// boolean is true on creation.
    pub async fn upsert_auditor(
        &self,
        organization_id: &str,
        project_id: &str,
        name: &str,
        description: &str,
        instructions: AuditorInstructions,
    ) -> Result<(Auditor, bool), DatabaseError> {
        if let Some(mut existing) = self.find_auditor(project_id, name).await? {
            self.conn()
                .execute(
                    "UPDATE auditors SET description = ?1, instructions = ?2 WHERE object_id = ?3",
                    libsql::params![description, to_json(&instructions)?, existing.object_id.as_str()],
                )
                .await?;
            existing.description = description.to_string();
            existing.instructions = instructions;
            return Ok((existing, false));
        }

        let now = Utc::now();
        let object_id = self.generate_id(PREFIX_AUDITOR).await?;
        self.conn()
            .execute(
                "INSERT INTO auditors (object_id, organization_id, project_id, name, description, schedule,
                     is_active, instructions, last_run_at, run_count, last_status, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, '', 1, ?6, NULL, 0, '', ?7)",
                libsql::params![
                    object_id.as_str(),
                    organization_id,
                    project_id,
                    name,
                    description,
                    to_json(&instructions)?,
                    now.to_rfc3339()
                ],
            )
            .await?;

        Ok((
            Auditor {
                object_id,
                organization_id: organization_id.to_string(),
                project_id: project_id.to_string(),
                name: name.to_string(),
                description: description.to_string(),
                schedule: String::new(),
                is_active: true,
                instructions,
                last_run_at: None,
                run_count: 0,
                last_status: String::new(),
                created_at: now,
            },
            true,
        ))
    }

    pub async fn list_auditors(&self, project_id: &str) -> Result<Vec<Auditor>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                &format!("SELECT {AUDITOR_COLUMNS} FROM auditors WHERE project_id = ?1 ORDER BY rowid"),
                [project_id],
            )
            .await?;
        let mut auditors = Vec::new();
        while let Some(row) = rows.next().await? {
            auditors.push(row_to_auditor(&row)?);
        }
        Ok(auditors)
    }
}
