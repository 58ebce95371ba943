use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// An automated-assessment definition. Unique per (project, name).
///
/// Run metadata starts empty; the external auditor service owns it.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Auditor {
    pub object_id: String,
    pub organization_id: String,
    pub project_id: String,
    pub name: String,
    pub description: String,
    pub schedule: String,
    pub is_active: bool,
    pub instructions: AuditorInstructions,
    pub last_run_at: Option<DateTime<Utc>>,
    pub run_count: i64,
    pub last_status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AuditorInstructions {
    pub requirements: Vec<AuditRequirement>,
    pub passing_score: u32,
    pub evaluation_instructions: String,
    pub targets: Vec<AuditTarget>,
}

/// One assessment objective turned into a scored requirement.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AuditRequirement {
    pub id: String,
    pub title: String,
    pub description: String,
    pub context: String,
    pub success_criteria: Vec<String>,
    pub failure_criteria: Vec<String>,
    pub weight: u32,
}

/// A control page the auditor should assess.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AuditTarget {
    pub control_id: String,
    pub document_object_id: String,
}
