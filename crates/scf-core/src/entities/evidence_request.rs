use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{EvidencePriority, EvidenceStatus};

/// Evidence requested for one control page. Unique per (page, evidence id).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct EvidenceRequest {
    pub object_id: String,
    pub project_id: String,
    pub page_id: String,
    /// Evidence item id from the configuration document.
    pub evidence_id: String,
    pub title: String,
    pub description: String,
    pub required_type: String,
    pub suggested_sources: Vec<SuggestedSource>,
    pub acceptance_criteria: String,
    pub priority: EvidencePriority,
    pub status: EvidenceStatus,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

/// Where the evidence is expected to come from.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct SuggestedSource {
    #[serde(rename = "type")]
    pub source_type: String,
    pub evidence_id: String,
    pub area_of_focus: String,
    pub artifact: String,
    pub control_ids: Vec<String>,
}
