//! Page repository: find-or-create by stable key, adjacency-list traversal.

use chrono::Utc;

use scf_core::entities::Page;
use scf_core::enums::{PageKind, PageStatus};
use scf_core::ids::PREFIX_PAGE;

use super::Repo;
use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, parse_datetime, parse_enum, to_json};

const PAGE_COLUMNS: &str = "object_id, organization_id, project_id, parent_id, template_page_id, \
     title, content, status, page_kind, scf_control_id, frameworks, sort_order, created_at, updated_at";

fn row_to_page(row: &libsql::Row) -> Result<Page, DatabaseError> {
    Ok(Page {
        object_id: row.get::<String>(0)?,
        organization_id: row.get::<String>(1)?,
        project_id: row.get::<String>(2)?,
        parent_id: get_opt_string(row, 3)?,
        template_page_id: row.get::<String>(4)?,
        title: row.get::<String>(5)?,
        content: row.get::<String>(6)?,
        status: parse_enum(&row.get::<String>(7)?)?,
        page_kind: get_opt_string(row, 8)?
            .map(|k| parse_enum::<PageKind>(&k))
            .transpose()?,
        scf_control_id: get_opt_string(row, 9)?,
        frameworks: get_opt_string(row, 10)?,
        sort_order: row.get::<i64>(11)?,
        created_at: parse_datetime(&row.get::<String>(12)?)?,
        updated_at: parse_datetime(&row.get::<String>(13)?)?,
    })
}

/// A page to find or create.
#[derive(Debug, Clone)]
pub struct NewPage {
    pub parent_id: Option<String>,
    pub template_page_id: String,
    pub title: String,
    pub content: String,
    pub status: PageStatus,
    pub page_kind: PageKind,
    pub scf_control_id: Option<String>,
    /// Stored as a JSON array; empty stores NULL.
    pub frameworks: Vec<String>,
    pub sort_order: i64,
}

impl NewPage {
    #[must_use]
    pub fn new(template_page_id: impl Into<String>, title: impl Into<String>, kind: PageKind) -> Self {
        Self {
            parent_id: None,
            template_page_id: template_page_id.into(),
            title: title.into(),
            content: String::new(),
            status: PageStatus::Draft,
            page_kind: kind,
            scf_control_id: None,
            frameworks: Vec::new(),
            sort_order: 0,
        }
    }

    #[must_use]
    pub fn parent(mut self, parent_id: &str) -> Self {
        self.parent_id = Some(parent_id.to_string());
        self
    }

    #[must_use]
    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    #[must_use]
    pub const fn status(mut self, status: PageStatus) -> Self {
        self.status = status;
        self
    }

    #[must_use]
    pub const fn sort_order(mut self, sort_order: i64) -> Self {
        self.sort_order = sort_order;
        self
    }

    #[must_use]
    pub fn control(mut self, control_id: &str, frameworks: Vec<String>) -> Self {
        self.scf_control_id = Some(control_id.to_string());
        self.frameworks = frameworks;
        self
    }
}

impl Repo<'_> {
    pub async fn get_page(
        &self,
        project_id: &str,
        object_id: &str,
    ) -> Result<Option<Page>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                &format!("SELECT {PAGE_COLUMNS} FROM pages WHERE project_id = ?1 AND object_id = ?2"),
                [project_id, object_id],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_page(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn find_page_by_key(
        &self,
        project_id: &str,
        template_page_id: &str,
    ) -> Result<Option<Page>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                &format!(
                    "SELECT {PAGE_COLUMNS} FROM pages WHERE project_id = ?1 AND template_page_id = ?2"
                ),
                [project_id, template_page_id],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_page(&row)?)),
            None => Ok(None),
        }
    }

    /// Return the page with `new.template_page_id`, inserting it if absent.
    ///
    /// The boolean is true when this call created the row. Existing pages
    /// are returned untouched.
    pub async fn find_or_create_page(
        &self,
        organization_id: &str,
        project_id: &str,
        new: NewPage,
    ) -> Result<(Page, bool), DatabaseError> {
        if let Some(existing) = self.find_page_by_key(project_id, &new.template_page_id).await? {
            return Ok((existing, false));
        }

        let now = Utc::now();
        let object_id = self.generate_id(PREFIX_PAGE).await?;
        let frameworks = if new.frameworks.is_empty() {
            None
        } else {
            Some(to_json(&new.frameworks)?)
        };

        self.conn()
            .execute(
                "INSERT INTO pages (object_id, organization_id, project_id, parent_id, template_page_id,
                     title, content, status, page_kind, scf_control_id, frameworks, sort_order, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
                libsql::params![
                    object_id.as_str(),
                    organization_id,
                    project_id,
                    new.parent_id.as_deref(),
                    new.template_page_id.as_str(),
                    new.title.as_str(),
                    new.content.as_str(),
                    new.status.as_str(),
                    new.page_kind.as_str(),
                    new.scf_control_id.as_deref(),
                    frameworks.as_deref(),
                    new.sort_order,
                    now.to_rfc3339(),
                    now.to_rfc3339()
                ],
            )
            .await?;

        Ok((
            Page {
                object_id,
                organization_id: organization_id.to_string(),
                project_id: project_id.to_string(),
                parent_id: new.parent_id,
                template_page_id: new.template_page_id,
                title: new.title,
                content: new.content,
                status: new.status,
                page_kind: Some(new.page_kind),
                scf_control_id: new.scf_control_id,
                frameworks,
                sort_order: new.sort_order,
                created_at: now,
                updated_at: now,
            },
            true,
        ))
    }

    /// Children of `parent_id`, or the project's roots when `None`, ordered
    /// by `sort_order`.
    pub async fn list_child_pages(
        &self,
        project_id: &str,
        parent_id: Option<&str>,
    ) -> Result<Vec<Page>, DatabaseError> {
        let mut rows = match parent_id {
            Some(parent) => {
                self.conn()
                    .query(
                        &format!(
                            "SELECT {PAGE_COLUMNS} FROM pages WHERE project_id = ?1 AND parent_id = ?2
                             ORDER BY sort_order, rowid"
                        ),
                        [project_id, parent],
                    )
                    .await?
            }
            None => {
                self.conn()
                    .query(
                        &format!(
                            "SELECT {PAGE_COLUMNS} FROM pages WHERE project_id = ?1 AND parent_id IS NULL
                             ORDER BY sort_order, rowid"
                        ),
                        [project_id],
                    )
                    .await?
            }
        };

        let mut pages = Vec::new();
        while let Some(row) = rows.next().await? {
            pages.push(row_to_page(&row)?);
        }
        Ok(pages)
    }

    pub async fn count_pages(&self, project_id: &str) -> Result<u32, DatabaseError> {
        self.count("SELECT COUNT(*) FROM pages WHERE project_id = ?1", [project_id])
            .await
    }
}
