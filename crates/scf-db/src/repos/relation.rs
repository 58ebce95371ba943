//! Page relation repository. Relations are written in reciprocal pairs.

use chrono::Utc;

use scf_core::entities::PageRelation;
use scf_core::enums::RelationType;
use scf_core::ids::PREFIX_RELATION;

use super::Repo;
use crate::error::DatabaseError;
use crate::helpers::{parse_datetime, parse_enum};

fn row_to_relation(row: &libsql::Row) -> Result<PageRelation, DatabaseError> {
    Ok(PageRelation {
        object_id: row.get::<String>(0)?,
        project_id: row.get::<String>(1)?,
        from_page_id: row.get::<String>(2)?,
        to_page_id: row.get::<String>(3)?,
        relation_type: parse_enum(&row.get::<String>(4)?)?,
        created_at: parse_datetime(&row.get::<String>(5)?)?,
    })
}

impl Repo<'_> {
    /// Insert one directed relation unless the same (from, to, type) exists.
    ///
    /// Returns true when a row was written.
    pub async fn insert_relation(
        &self,
        project_id: &str,
        from_page_id: &str,
        to_page_id: &str,
        relation_type: RelationType,
    ) -> Result<bool, DatabaseError> {
        let object_id = self.generate_id(PREFIX_RELATION).await?;
        let affected = self
            .conn()
            .execute(
                "INSERT OR IGNORE INTO page_relations (object_id, project_id, from_page_id, to_page_id, relation_type, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                libsql::params![
                    object_id.as_str(),
                    project_id,
                    from_page_id,
                    to_page_id,
                    relation_type.as_str(),
                    Utc::now().to_rfc3339()
                ],
            )
            .await?;
        Ok(affected > 0)
    }

    /// Write `from → to` tagged `relation_type`, and `to → from` tagged with
    /// its inverse. Returns the number of rows written (0, 1 or 2).
    pub async fn link_pages(
        &self,
        project_id: &str,
        from_page_id: &str,
        to_page_id: &str,
        relation_type: RelationType,
    ) -> Result<u32, DatabaseError> {
        let reverse = self
            .insert_relation(project_id, to_page_id, from_page_id, relation_type.inverse())
            .await?;
        let forward = self
            .insert_relation(project_id, from_page_id, to_page_id, relation_type)
            .await?;
        Ok(u32::from(forward) + u32::from(reverse))
    }

    /// Relations originating at `page_id`, in insertion order.
    pub async fn list_relations_from(
        &self,
        page_id: &str,
    ) -> Result<Vec<PageRelation>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                "SELECT object_id, project_id, from_page_id, to_page_id, relation_type, created_at
                 FROM page_relations WHERE from_page_id = ?1 ORDER BY rowid",
                [page_id],
            )
            .await?;
        let mut relations = Vec::new();
        while let Some(row) = rows.next().await? {
            relations.push(row_to_relation(&row)?);
        }
        Ok(relations)
    }

    pub async fn count_relations(&self, project_id: &str) -> Result<u32, DatabaseError> {
        self.count(
            "SELECT COUNT(*) FROM page_relations WHERE project_id = ?1",
            [project_id],
        )
        .await
    }
}
