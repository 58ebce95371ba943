//! Read-only catalog rows, seeded by an external import job.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ScfRisk {
    pub object_id: String,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ScfThreat {
    pub object_id: String,
    pub title: String,
    pub description: String,
}

/// One external framework id a catalog control maps to.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct FrameworkMapping {
    pub scf_object_id: String,
    pub framework: String,
    pub external_id: String,
}
