use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A tenant. Owned by the excluded CRUD layer; bootstrapping only looks it up.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Organization {
    pub object_id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}
