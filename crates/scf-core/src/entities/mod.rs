//! Entity structs for persisted SCF project objects.
//!
//! Each entity maps to a table in the libSQL database (see
//! `scf-db/migrations/001_initial.sql`). All structs derive `Serialize`,
//! `Deserialize`, and `JsonSchema` for JSON roundtrip and schema validation.

mod auditor;
mod catalog;
mod evidence_request;
mod organization;
mod page;
mod project;
mod relation;

pub use auditor::{AuditRequirement, AuditTarget, Auditor, AuditorInstructions};
pub use catalog::{FrameworkMapping, ScfRisk, ScfThreat};
pub use evidence_request::{EvidenceRequest, SuggestedSource};
pub use organization::Organization;
pub use page::Page;
pub use project::Project;
pub use relation::PageRelation;
