use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::RelationType;

/// A directed, typed edge between two pages of one project.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct PageRelation {
    pub object_id: String,
    pub project_id: String,
    pub from_page_id: String,
    pub to_page_id: String,
    pub relation_type: RelationType,
    pub created_at: DateTime<Utc>,
}
