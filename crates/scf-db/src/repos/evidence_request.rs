//! Evidence request repository. Unique per (page, evidence id).

use chrono::Utc;

use scf_core::entities::{EvidenceRequest, SuggestedSource};
use scf_core::enums::{EvidencePriority, EvidenceStatus};
use scf_core::ids::PREFIX_EVIDENCE_REQUEST;

use super::Repo;
use crate::error::DatabaseError;
use crate::helpers::{parse_datetime, parse_enum, parse_json, to_json};

const EVIDENCE_COLUMNS: &str = "object_id, project_id, page_id, evidence_id, title, description, \
     required_type, suggested_sources, acceptance_criteria, priority, status, created_by, created_at";

fn row_to_evidence_request(row: &libsql::Row) -> Result<EvidenceRequest, DatabaseError> {
    Ok(EvidenceRequest {
        object_id: row.get::<String>(0)?,
        project_id: row.get::<String>(1)?,
        page_id: row.get::<String>(2)?,
        evidence_id: row.get::<String>(3)?,
        title: row.get::<String>(4)?,
        description: row.get::<String>(5)?,
        required_type: row.get::<String>(6)?,
        suggested_sources: parse_json(&row.get::<String>(7)?, "suggested_sources")?,
        acceptance_criteria: row.get::<String>(8)?,
        priority: parse_enum(&row.get::<String>(9)?)?,
        status: parse_enum(&row.get::<String>(10)?)?,
        created_by: row.get::<String>(11)?,
        created_at: parse_datetime(&row.get::<String>(12)?)?,
    })
}

/// Fields of an evidence request to find or create.
#[derive(Debug, Clone)]
pub struct NewEvidenceRequest {
    pub page_id: String,
    pub evidence_id: String,
    pub title: String,
    pub description: String,
    pub required_type: String,
    pub suggested_sources: Vec<SuggestedSource>,
    pub acceptance_criteria: String,
    pub priority: EvidencePriority,
    pub created_by: String,
}

impl Repo<'_> {
    pub async fn find_evidence_request(
        &self,
        page_id: &str,
        evidence_id: &str,
    ) -> Result<Option<EvidenceRequest>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                &format!(
                    "SELECT {EVIDENCE_COLUMNS} FROM evidence_requests WHERE page_id = ?1 AND evidence_id = ?2"
                ),
                [page_id, evidence_id],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_evidence_request(&row)?)),
            None => Ok(None),
        }
    }

    /// Return the request for (page, evidence id), creating it as `pending`
    /// if absent. The boolean is true when this call created the row.
    pub async fn find_or_create_evidence_request(
        &self,
        project_id: &str,
        new: NewEvidenceRequest,
    ) -> Result<(EvidenceRequest, bool), DatabaseError> {
        if let Some(existing) = self.find_evidence_request(&new.page_id, &new.evidence_id).await? {
            return Ok((existing, false));
        }

        let now = Utc::now();
        let object_id = self.generate_id(PREFIX_EVIDENCE_REQUEST).await?;
        let status = EvidenceStatus::Pending;
        self.conn()
            .execute(
                "INSERT INTO evidence_requests (object_id, project_id, page_id, evidence_id, title, description,
                     required_type, suggested_sources, acceptance_criteria, priority, status, created_by, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
                libsql::params![
                    object_id.as_str(),
                    project_id,
                    new.page_id.as_str(),
                    new.evidence_id.as_str(),
                    new.title.as_str(),
                    new.description.as_str(),
                    new.required_type.as_str(),
                    to_json(&new.suggested_sources)?,
                    new.acceptance_criteria.as_str(),
                    new.priority.as_str(),
                    status.as_str(),
                    new.created_by.as_str(),
                    now.to_rfc3339()
                ],
            )
            .await?;

        Ok((
            EvidenceRequest {
                object_id,
                project_id: project_id.to_string(),
                page_id: new.page_id,
                evidence_id: new.evidence_id,
                title: new.title,
                description: new.description,
                required_type: new.required_type,
                suggested_sources: new.suggested_sources,
                acceptance_criteria: new.acceptance_criteria,
                priority: new.priority,
                status,
                created_by: new.created_by,
                created_at: now,
            },
            true,
        ))
    }

    pub async fn list_evidence_requests_for_page(
        &self,
        page_id: &str,
    ) -> Result<Vec<EvidenceRequest>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                &format!(
                    "SELECT {EVIDENCE_COLUMNS} FROM evidence_requests WHERE page_id = ?1 ORDER BY rowid"
                ),
                [page_id],
            )
            .await?;
        let mut requests = Vec::new();
        while let Some(row) = rows.next().await? {
            requests.push(row_to_evidence_request(&row)?);
        }
        Ok(requests)
    }

    pub async fn count_evidence_requests(&self, project_id: &str) -> Result<u32, DatabaseError> {
        self.count(
            "SELECT COUNT(*) FROM evidence_requests WHERE project_id = ?1",
            [project_id],
        )
        .await
    }
}
