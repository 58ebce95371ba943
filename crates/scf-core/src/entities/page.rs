use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{PageKind, PageStatus};
use crate::keys::infer_page_kind;

/// A node in a project's document hierarchy.
///
/// The tree is an adjacency list: `parent_id` points at another page of the
/// same project, or is `None` for roots.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Page {
    pub object_id: String,
    pub organization_id: String,
    pub project_id: String,
    pub parent_id: Option<String>,
    /// Stable key, unique per project.
    pub template_page_id: String,
    pub title: String,
    pub content: String,
    pub status: PageStatus,
    /// `None` for rows written without a kind; see [`Page::kind`].
    pub page_kind: Option<PageKind>,
    pub scf_control_id: Option<String>,
    /// JSON array of framework keys, as stored.
    pub frameworks: Option<String>,
    pub sort_order: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Page {
    /// Stored kind, or the kind implied by the stable key.
    #[must_use]
    pub fn kind(&self) -> PageKind {
        self.page_kind
            .unwrap_or_else(|| infer_page_kind(&self.template_page_id))
    }

    /// True iff the page references a catalog control.
    #[must_use]
    pub fn is_control(&self) -> bool {
        self.scf_control_id
            .as_deref()
            .is_some_and(|id| !id.trim().is_empty())
    }

    /// The referenced control id, trimmed.
    #[must_use]
    pub fn scf_id(&self) -> Option<String> {
        self.scf_control_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(ToOwned::to_owned)
    }

    /// Decoded framework keys. Missing or malformed JSON yields an empty list.
    #[must_use]
    pub fn framework_keys(&self) -> Vec<String> {
        self.frameworks
            .as_deref()
            .and_then(|raw| serde_json::from_str(raw).ok())
            .unwrap_or_default()
    }
}
