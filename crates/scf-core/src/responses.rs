//! Response types returned as JSON by the HTTP surface.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{EvidenceRequest, Page, Project};
use crate::enums::{PageKind, PageStatus, ProjectStatus, RelationType};

/// Project fields echoed after bootstrapping.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ProjectSummary {
    pub object_id: String,
    pub name: String,
    pub description: String,
    pub status: ProjectStatus,
    pub compliance_score: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Project> for ProjectSummary {
    fn from(p: Project) -> Self {
        Self {
            object_id: p.object_id,
            name: p.name,
            description: p.description,
            status: p.status,
            compliance_score: p.compliance_score,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

/// Aggregate counts for one bootstrap call.
///
/// `controls` is the number of control pages the call processed. The other
/// fields count rows this call created, so resubmitting an unchanged
/// configuration reports zero documents, evidence requests and auditors.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct BootstrapStats {
    pub controls: u32,
    pub documents: u32,
    pub evidence_requests: u32,
    pub auditors: u32,
}

/// Response from `POST /org/{org_id}/project/from-scf-config`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct BootstrapResponse {
    pub project: ProjectSummary,
    pub stats: BootstrapStats,
}

/// External ids of one framework a control maps to.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct FrameworkMappingGroup {
    pub framework: String,
    pub external_ids: Vec<String>,
}

/// A page with its decoded control metadata.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct DocumentFull {
    pub object_id: String,
    pub template_page_id: String,
    pub title: String,
    pub content: String,
    pub status: PageStatus,
    pub page_kind: PageKind,
    pub is_control: bool,
    pub parent_id: Option<String>,
    pub sort_order: i64,
    pub frameworks: Vec<String>,
    pub scf_id: Option<String>,
    pub framework_mappings: Vec<FrameworkMappingGroup>,
    pub evidence_requests: Vec<EvidenceRequest>,
}

/// Target of an outgoing relation, tagged with the relation as stored.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct RelatedPage {
    pub object_id: String,
    pub template_page_id: String,
    pub title: String,
    pub status: PageStatus,
    pub page_kind: PageKind,
    pub is_control: bool,
    pub relation_type: RelationType,
}

impl RelatedPage {
    #[must_use]
    pub fn new(target: &Page, relation_type: RelationType) -> Self {
        Self {
            object_id: target.object_id.clone(),
            template_page_id: target.template_page_id.clone(),
            title: target.title.clone(),
            status: target.status,
            page_kind: target.kind(),
            is_control: target.is_control(),
            relation_type,
        }
    }
}

/// Response from `GET .../document/{document_id}/full`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct DocumentFullResponse {
    pub document: DocumentFull,
    pub related_pages: Vec<RelatedPage>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct DocumentTreeNode {
    pub object_id: String,
    pub template_page_id: String,
    pub title: String,
    pub status: PageStatus,
    pub page_kind: PageKind,
    pub sort_order: i64,
    pub children: Vec<DocumentTreeNode>,
}

impl DocumentTreeNode {
    #[must_use]
    pub fn leaf(page: &Page) -> Self {
        Self {
            object_id: page.object_id.clone(),
            template_page_id: page.template_page_id.clone(),
            title: page.title.clone(),
            status: page.status,
            page_kind: page.kind(),
            sort_order: page.sort_order,
            children: Vec::new(),
        }
    }

    /// Number of nodes in this subtree, including itself.
    #[must_use]
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(Self::node_count).sum::<usize>()
    }
}

/// Response from `GET .../document/tree`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct DocumentTreeResponse {
    pub project_id: String,
    pub roots: Vec<DocumentTreeNode>,
}

/// Response from `GET /healthz`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct HealthResponse {
    pub status: String,
}
